//! Search relevance and ranking algorithms.
//!
//! This module provides the tiered name scoring used by the matcher and the
//! deterministic tie-break ordering applied between equally scored entries.

use serde::Serialize;
use std::cmp::Ordering;

use super::index::Entry;

/// How a query token matched an entry name.
///
/// Variants are declared from weakest to strongest so the derived `Ord` ranks
/// `Exact` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Query appears somewhere inside the name
    Substring,
    /// Name starts with the query
    Prefix,
    /// Name equals the query
    Exact,
}

/// Relevance of a match. Larger compares as better.
///
/// Ordering, most significant first:
/// 1. tier (`Exact > Prefix > Substring`)
/// 2. shorter name
/// 3. earlier position of the query inside the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Score {
    pub tier: MatchTier,
    /// Byte offset of the first occurrence of the query in the normalized name
    pub position: usize,
    /// Length of the normalized name in characters
    pub name_len: usize,
}

impl Score {
    /// Score a normalized name against a normalized query token.
    ///
    /// Returns `None` when the name does not contain the token.
    pub fn for_name(name: &str, token: &str) -> Option<Self> {
        let position = name.find(token)?;
        let tier = if name.len() == token.len() {
            MatchTier::Exact
        } else if position == 0 {
            MatchTier::Prefix
        } else {
            MatchTier::Substring
        };

        Some(Self {
            tier,
            position,
            name_len: name.chars().count(),
        })
    }

    /// Score for an entry matched through its signature rather than its name.
    pub(crate) fn for_type(name: &str) -> Self {
        Self {
            tier: MatchTier::Exact,
            position: 0,
            name_len: name.chars().count(),
        }
    }

    /// Simple numeric view of the tier:
    /// - 100: Exact match
    /// - 50: Name starts with query
    /// - 10: Name contains query
    pub const fn relevance(&self) -> u32 {
        match self.tier {
            MatchTier::Exact => 100,
            MatchTier::Prefix => 50,
            MatchTier::Substring => 10,
        }
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then_with(|| other.name_len.cmp(&self.name_len))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two strings in natural order.
///
/// Runs of ASCII digits are compared by numeric value, everything else
/// character by character, so `i32 < i128` and `str < string`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_digits = take_digits(&mut left);
                let r_digits = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_digits, &r_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// Compare digit strings numerically without parsing (arbitrary length).
/// Equal values with different zero padding fall back to the shorter run first.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Deterministic tie-break between entries with equal scores.
///
/// Paths are compared segment by segment in natural order (a shorter path
/// that is a prefix of a longer one sorts first), then names, then kinds.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    compare_segments(&a.path, &b.path)
        .then_with(|| natural_cmp(&a.name, &b.name))
        .then_with(|| a.kind.cmp(&b.kind))
}

fn compare_segments(a: &[String], b: &[String]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        let ordering = natural_cmp(left, right);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}
