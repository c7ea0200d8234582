//! Query normalization and query syntax parsing.

use super::rustdoc::ItemKind;

/// Separators recognized by path-aware tokenization, longest first.
const PATH_SEPARATORS: &[&str] = &["::", "."];

/// How a raw string is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tokenization {
    /// The whole trimmed string is a single token (substring matching).
    #[default]
    Whole,
    /// Split on `::` and `.` into path segments.
    PathAware,
}

/// Normalizes a raw string into comparable tokens.
///
/// Tokens are trimmed and lowercased; empty tokens are dropped, so an empty or
/// whitespace-only input yields no tokens. Re-normalizing already normalized
/// text is a no-op.
pub fn normalize(raw: &str, mode: Tokenization) -> Vec<String> {
    match mode {
        Tokenization::Whole => normalize_token(raw).into_iter().collect(),
        Tokenization::PathAware => split_path(raw)
            .into_iter()
            .filter_map(normalize_token)
            .collect(),
    }
}

fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn split_path(raw: &str) -> Vec<&str> {
    let mut pieces = vec![raw];
    for separator in PATH_SEPARATORS {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| piece.split(*separator))
            .collect();
    }
    pieces
}

/// Whether a query should be tokenized path-aware.
fn looks_like_path(raw: &str) -> bool {
    PATH_SEPARATORS.iter().any(|separator| raw.contains(separator))
}

/// A query split into its filter, path and name parts.
///
/// Examples:
/// - `from_u` → name="from_u"
/// - `fn:from_u` → kind=Function, name="from_u"
/// - `string::from_u` → path=["string"], name="from_u"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Restrict results to entries accepted by this kind
    pub kind: Option<ItemKind>,
    /// Normalized tokens that must appear, in order, in the entry path
    pub path: Vec<String>,
    /// Normalized token matched against entry names
    pub name: String,
}

impl ParsedQuery {
    /// Parse a raw query. Returns `None` when the query has no tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, rest) = split_kind_filter(raw);

        let mode = if looks_like_path(rest) {
            Tokenization::PathAware
        } else {
            Tokenization::Whole
        };
        let mut tokens = normalize(rest, mode);
        let name = tokens.pop()?;

        Some(Self {
            kind,
            path: tokens,
            name,
        })
    }
}

/// Strip a leading `kind:` filter. A `::` is never a kind separator, and unknown
/// prefixes stay part of the query.
fn split_kind_filter(raw: &str) -> (Option<ItemKind>, &str) {
    if let Some((head, tail)) = raw.split_once(':')
        && !tail.starts_with(':')
        && let Ok(kind) = head.parse::<ItemKind>()
    {
        return (Some(kind), tail);
    }
    (None, raw)
}
