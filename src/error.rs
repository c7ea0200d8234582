//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for docsearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the binary and I/O edges.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a corpus entry cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The entry at `position` is malformed (empty name or empty path segment).
    #[error("invalid entry #{position} ({path}): {reason}")]
    InvalidEntry {
        position: usize,
        path: String,
        reason: &'static str,
    },
}

/// Error returned when loading a corpus file fails.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse corpus at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Neither an entry list nor rustdoc JSON.
    #[error("unrecognized corpus format at {}", .path.display())]
    UnknownFormat { path: PathBuf },
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Error returned when a search fixture cannot be read or parsed.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("fixture has no `const QUERY = ...;` declaration")]
    MissingQuery,
    #[error("fixture has no `const EXPECTED = {{ ... }};` declaration")]
    MissingExpected,
    #[error("malformed fixture near `{near}`: {reason}")]
    Syntax { near: String, reason: &'static str },
    #[error("unknown result category '{0}'")]
    UnknownCategory(String),
}

/// Error returned when the configuration file is unreadable or invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
}
