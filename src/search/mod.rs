//! Name search over documentation entries.
//!
//! This module provides the immutable index, query normalization, tiered scoring,
//! matching with category assignment, and the query engine composing them.

// Module declarations
pub(crate) mod index;
pub(crate) mod matcher;
pub(crate) mod query;
pub(crate) mod rustdoc;
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{Entry, SearchIndex, Signature, cache_file_path};
pub use matcher::{Category, Match, match_query, match_token};
pub use query::{ResultSet, SearchOptions, search, search_with};
pub use rustdoc::{ItemKind, entries_from_crate};
pub use scoring::{MatchTier, Score, compare_entries, natural_cmp};
pub use tokenize::{ParsedQuery, Tokenization, normalize};
