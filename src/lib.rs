pub mod config;
pub mod corpus;
pub mod error;
pub mod fixture;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use error::{ConfigError, CorpusError, FixtureError, IndexError};
pub use fixture::{ExpectedEntry, Fixture, FixtureReport, Mismatch};
pub use search::{
    Category, Entry, ItemKind, Match, ResultSet, SearchIndex, SearchOptions, search, search_with,
};
pub use state::SearchState;
