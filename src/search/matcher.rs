//! Scans an index for entries matching a query and assigns result categories.

use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::index::{Entry, IndexedEntry, SearchIndex};
use super::scoring::{Score, compare_entries};
use super::tokenize::ParsedQuery;

/// Result group an entry is reported under.
///
/// DO NOT add doc comments to individual variants - see `ItemKind`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Others,
    InArgs,
    Returned,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Others, Self::InArgs, Self::Returned];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Others => "others",
            Self::InArgs => "in_args",
            Self::Returned => "returned",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

/// A scored association between a query and an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub entry: &'a Entry,
    pub score: Score,
    pub category: Category,
}

impl Match<'_> {
    /// Ranking order: best score first, then natural path order.
    pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| compare_entries(self.entry, other.entry))
    }
}

/// Matches a single normalized token against every entry name.
///
/// Every entry whose normalized name contains `token` is returned in the
/// `Others` category, sorted by rank. No matches is an empty vector.
pub fn match_token<'a>(index: &'a SearchIndex, token: &str) -> Vec<Match<'a>> {
    let mut matches: Vec<Match<'a>> = index
        .indexed()
        .filter_map(|indexed| {
            Score::for_name(indexed.name, token).map(|score| Match {
                entry: indexed.entry,
                score,
                category: Category::Others,
            })
        })
        .collect();
    matches.sort_by(Match::rank_cmp);
    matches
}

/// Matches a parsed query, applying its kind and path filters.
///
/// Name matches go to `Others`. Entries whose name does not match but whose
/// signature mentions the query as a type name go to `InArgs` (parameter) or
/// `Returned` (return type). Each entry lands in at most one category.
pub fn match_query<'a>(index: &'a SearchIndex, query: &ParsedQuery) -> Vec<Match<'a>> {
    let mut matches: Vec<Match<'a>> = index
        .indexed()
        .filter(|indexed| {
            query
                .kind
                .is_none_or(|kind| kind.accepts(indexed.entry.kind))
        })
        .filter(|indexed| path_matches(indexed.path, &query.path))
        .filter_map(|indexed| classify(indexed, &query.name))
        .collect();
    matches.sort_by(Match::rank_cmp);
    matches
}

fn classify<'a>(indexed: IndexedEntry<'a>, token: &str) -> Option<Match<'a>> {
    if let Some(score) = Score::for_name(indexed.name, token) {
        return Some(Match {
            entry: indexed.entry,
            score,
            category: Category::Others,
        });
    }

    let signature = indexed.entry.signature.as_ref()?;
    let mentions = |types: &[String]| types.iter().any(|ty| ty.to_lowercase() == token);

    let category = if mentions(&signature.inputs) {
        Category::InArgs
    } else if mentions(&signature.output) {
        Category::Returned
    } else {
        return None;
    };

    Some(Match {
        entry: indexed.entry,
        score: Score::for_type(indexed.name),
        category,
    })
}

/// Each query token must be contained in a distinct path segment, in order.
fn path_matches(segments: &[String], tokens: &[String]) -> bool {
    let mut remaining = segments.iter();
    tokens
        .iter()
        .all(|token| remaining.any(|segment| segment.contains(token.as_str())))
}
