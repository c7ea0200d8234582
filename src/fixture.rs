//! Search fixtures in the `rustdoc-js` format.
//!
//! A fixture pairs a query with the results expected for it:
//!
//! ```text
//! const QUERY = 'from_u';
//!
//! const EXPECTED = {
//!     'others': [
//!         { 'path': 'std::char', 'name': 'from_u32' },
//!         { 'path': 'std::str', 'name': 'from_utf8' },
//!     ],
//! };
//! ```
//!
//! Fixtures are parsed into typed [`ExpectedEntry`] lists keyed by [`Category`],
//! so a misspelled category fails at parse time instead of silently matching nothing.

use crate::error::FixtureError;
use crate::search::{Category, Match, ResultSet};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

static QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"const\s+QUERY\s*=\s*(?:'([^']*)'|"([^"]*)")\s*;"#).expect("valid regex")
});

static EXPECTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"const\s+EXPECTED\s*=\s*\{").expect("valid regex"));

/// `'category': [ ... ]` inside the EXPECTED object.
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:'(\w+)'|"(\w+)"|(\w+))\s*:\s*\[([^\]]*)\]"#).expect("valid regex")
});

/// `{ ... }` record inside a category list.
static RECORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid regex"));

/// `'key': 'value'` pair inside a record.
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:'(\w+)'|"(\w+)"|(\w+))\s*:\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid regex")
});

/// One expected result: the entry's namespace path and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpectedEntry {
    pub path: String,
    pub name: String,
}

impl ExpectedEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    fn matches(&self, found: &Match<'_>) -> bool {
        found.entry.name == self.name && found.entry.path_str() == self.path
    }

    fn from_match(found: &Match<'_>) -> Self {
        Self::new(found.entry.path_str(), found.entry.name.clone())
    }
}

impl fmt::Display for ExpectedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.path, self.name)
    }
}

/// A parsed `(query, expected results)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub query: String,
    pub expected: BTreeMap<Category, Vec<ExpectedEntry>>,
}

impl Fixture {
    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let source = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Parse fixture source text. `//` comments and trailing commas are allowed.
    pub fn parse(source: &str) -> Result<Self, FixtureError> {
        let source = strip_line_comments(source);

        let captures = QUERY_RE
            .captures(&source)
            .ok_or(FixtureError::MissingQuery)?;
        let query = first_group(&captures, &[1, 2]).to_string();

        let start = EXPECTED_RE
            .find(&source)
            .ok_or(FixtureError::MissingExpected)?
            .end();
        let body = balanced_body(&source[start..]).ok_or_else(|| FixtureError::Syntax {
            near: snippet(&source[start..]),
            reason: "unterminated EXPECTED object",
        })?;

        let mut expected = BTreeMap::new();
        for captures in CATEGORY_RE.captures_iter(body) {
            let name = first_group(&captures, &[1, 2, 3]);
            let category = name
                .parse::<Category>()
                .map_err(|()| FixtureError::UnknownCategory(name.to_string()))?;
            let entries = parse_records(first_group(&captures, &[4]))?;
            expected.insert(category, entries);
        }

        tracing::debug!(
            "Parsed fixture for query {:?} ({} categories)",
            query,
            expected.len()
        );

        Ok(Self { query, expected })
    }

    /// Check that every expected entry appears in `results` in the given relative
    /// order. Unlisted results in between are allowed.
    pub fn check(&self, results: &ResultSet<'_>) -> FixtureReport {
        let mut mismatches = Vec::new();

        for (&category, expected) in &self.expected {
            let found = results.category(category);
            let mut next = 0;

            for entry in expected {
                if let Some(offset) = found[next..].iter().position(|m| entry.matches(m)) {
                    next += offset + 1;
                } else if let Some(position) = found.iter().position(|m| entry.matches(m)) {
                    mismatches.push(Mismatch::OutOfOrder {
                        category,
                        entry: entry.clone(),
                        position,
                    });
                } else {
                    mismatches.push(Mismatch::Missing {
                        category,
                        entry: entry.clone(),
                    });
                }
            }
        }

        FixtureReport {
            query: self.query.clone(),
            mismatches,
        }
    }

    /// Check that each expected category equals the results exactly, in order.
    pub fn check_exact(&self, results: &ResultSet<'_>) -> FixtureReport {
        let mut mismatches = Vec::new();

        for (&category, expected) in &self.expected {
            let found = results.category(category);
            for index in 0..expected.len().max(found.len()) {
                let wanted = expected.get(index);
                let got = found.get(index);
                let same = matches!((wanted, got), (Some(w), Some(g)) if w.matches(g));
                if !same {
                    mismatches.push(Mismatch::Position {
                        category,
                        index,
                        expected: wanted.cloned(),
                        found: got.map(ExpectedEntry::from_match),
                    });
                }
            }
        }

        FixtureReport {
            query: self.query.clone(),
            mismatches,
        }
    }
}

/// A single way a result set disagrees with a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The entry is absent from the category.
    Missing {
        category: Category,
        entry: ExpectedEntry,
    },
    /// The entry is present but before an entry expected to precede it.
    OutOfOrder {
        category: Category,
        entry: ExpectedEntry,
        position: usize,
    },
    /// Exact comparison differs at `index`.
    Position {
        category: Category,
        index: usize,
        expected: Option<ExpectedEntry>,
        found: Option<ExpectedEntry>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { category, entry } => {
                write!(f, "[{}] missing `{}`", category, entry)
            }
            Self::OutOfOrder {
                category,
                entry,
                position,
            } => write!(
                f,
                "[{}] `{}` found at position {} but out of order",
                category, entry, position
            ),
            Self::Position {
                category,
                index,
                expected,
                found,
            } => {
                let show = |entry: &Option<ExpectedEntry>| {
                    entry
                        .as_ref()
                        .map_or_else(|| "nothing".to_string(), |e| format!("`{}`", e))
                };
                write!(
                    f,
                    "[{}] position {}: expected {}, found {}",
                    category,
                    index,
                    show(expected),
                    show(found)
                )
            }
        }
    }
}

/// Outcome of checking a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureReport {
    pub query: String,
    pub mismatches: Vec<Mismatch>,
}

impl FixtureReport {
    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            return write!(f, "Fixture for '{}' passed", self.query);
        }
        writeln!(
            f,
            "Fixture for '{}' failed with {} mismatch(es):",
            self.query,
            self.mismatches.len()
        )?;
        for mismatch in &self.mismatches {
            writeln!(f, "• {}", mismatch)?;
        }
        Ok(())
    }
}

fn parse_records(list: &str) -> Result<Vec<ExpectedEntry>, FixtureError> {
    RECORD_RE
        .captures_iter(list)
        .map(|record| {
            let body = first_group(&record, &[1]);
            let mut path = None;
            let mut name = None;

            for field in FIELD_RE.captures_iter(body) {
                let value = first_group(&field, &[4, 5]).to_string();
                match first_group(&field, &[1, 2, 3]) {
                    "path" => path = Some(value),
                    "name" => name = Some(value),
                    _ => {}
                }
            }

            match (path, name) {
                (Some(path), Some(name)) => Ok(ExpectedEntry { path, name }),
                _ => Err(FixtureError::Syntax {
                    near: snippet(body),
                    reason: "record needs both 'path' and 'name'",
                }),
            }
        })
        .collect()
}

/// First participating capture group among `groups`, or "".
fn first_group<'h>(captures: &regex::Captures<'h>, groups: &[usize]) -> &'h str {
    groups
        .iter()
        .find_map(|&group| captures.get(group))
        .map_or("", |m| m.as_str())
}

/// Text up to the `}` closing an already opened `{`.
fn balanced_body(after_open: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut quote = None;

    for (i, c) in after_open.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(&after_open[..i]);
                }
            }
            (None, _) => {}
        }
    }
    None
}

/// Remove `//` comments that are not inside a string literal.
fn strip_line_comments(source: &str) -> String {
    let mut output = String::with_capacity(source.len());

    for line in source.lines() {
        let mut quote = None;
        let mut cut = line.len();
        let mut chars = line.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '\'' | '"') => quote = Some(c),
                (None, '/') if chars.peek().is_some_and(|&(_, next)| next == '/') => {
                    cut = i;
                    break;
                }
                (None, _) => {}
            }
        }

        output.push_str(&line[..cut]);
        output.push('\n');
    }

    output
}

fn snippet(text: &str) -> String {
    text.trim().chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Entry, ItemKind, SearchIndex, search};
    use assert2::{check, let_assert};

    const FROM_U: &str = r"// Copyright header
// spanning lines

const QUERY = 'from_u';

const EXPECTED = {
    'others': [
        { 'path': 'std::char', 'name': 'from_u32' },
        { 'path': 'std::str', 'name': 'from_utf8' }, // trailing comment
    ],
};
";

    #[test]
    fn test_parse_fixture() {
        let fixture = Fixture::parse(FROM_U).unwrap();
        check!(fixture.query == "from_u");
        check!(
            fixture.expected.get(&Category::Others)
                == Some(&vec![
                    ExpectedEntry::new("std::char", "from_u32"),
                    ExpectedEntry::new("std::str", "from_utf8"),
                ])
        );
    }

    #[test]
    fn test_parse_double_quotes_and_bare_keys() {
        let source = r#"const QUERY = "vec";
const EXPECTED = {
    in_args: [{ path: "std::vec::Vec", name: "push" }],
    "returned": [],
};"#;
        let fixture = Fixture::parse(source).unwrap();
        check!(fixture.query == "vec");
        check!(fixture.expected[&Category::InArgs] == [ExpectedEntry::new("std::vec::Vec", "push")]);
        check!(fixture.expected[&Category::Returned].is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let_assert!(Err(FixtureError::MissingQuery) = Fixture::parse("const EXPECTED = {};"));
        let_assert!(Err(FixtureError::MissingExpected) = Fixture::parse("const QUERY = 'x';"));
        let_assert!(
            Err(FixtureError::UnknownCategory(name)) =
                Fixture::parse("const QUERY = 'x'; const EXPECTED = { 'other': [] };")
        );
        check!(name == "other");
        let_assert!(
            Err(FixtureError::Syntax { .. }) =
                Fixture::parse("const QUERY = 'x'; const EXPECTED = { 'others': [{ 'name': 'a' }] };")
        );
        let_assert!(
            Err(FixtureError::Syntax { .. }) =
                Fixture::parse("const QUERY = 'x'; const EXPECTED = { 'others': [")
        );
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        check!(strip_line_comments("a = 'http://x'; // gone") == "a = 'http://x'; \n");
    }

    fn index() -> SearchIndex {
        SearchIndex::build([
            Entry::new(&["std", "char"], "from_u32", ItemKind::Function),
            Entry::new(&["std", "str"], "from_utf8", ItemKind::Function),
            Entry::new(&["std", "str"], "from_utf8_unchecked", ItemKind::Function),
        ])
        .unwrap()
    }

    #[test]
    fn test_check_allows_interleaved_results() {
        let index = index();
        let fixture = Fixture::parse(
            "const QUERY = 'from_u';
             const EXPECTED = { 'others': [
                 { 'path': 'std::char', 'name': 'from_u32' },
                 { 'path': 'std::str', 'name': 'from_utf8_unchecked' },
             ] };",
        )
        .unwrap();

        let results = search(&index, &fixture.query);
        check!(fixture.check(&results).is_success());
        // from_utf8 sits between the two expected entries
        check!(!fixture.check_exact(&results).is_success());
    }

    #[test]
    fn test_check_reports_missing_and_out_of_order() {
        let index = index();
        let fixture = Fixture::parse(
            "const QUERY = 'from_u';
             const EXPECTED = { 'others': [
                 { 'path': 'std::str', 'name': 'from_utf8' },
                 { 'path': 'std::char', 'name': 'from_u32' },
                 { 'path': 'std::boxed::Box', 'name': 'from_unique' },
             ] };",
        )
        .unwrap();

        let report = fixture.check(&search(&index, &fixture.query));
        check!(
            report.mismatches
                == [
                    Mismatch::OutOfOrder {
                        category: Category::Others,
                        entry: ExpectedEntry::new("std::char", "from_u32"),
                        position: 0,
                    },
                    Mismatch::Missing {
                        category: Category::Others,
                        entry: ExpectedEntry::new("std::boxed::Box", "from_unique"),
                    },
                ]
        );
        check!(report.to_string().contains("missing `std::boxed::Box::from_unique`"));
    }

    #[test]
    fn test_check_accepts_repeated_expected_entries() {
        let entry = Entry::new(&["std", "char"], "from_u32", ItemKind::Function);
        let index = SearchIndex::build([entry.clone(), entry]).unwrap();
        let fixture = Fixture::parse(
            "const QUERY = 'from_u32';
             const EXPECTED = { 'others': [
                 { 'path': 'std::char', 'name': 'from_u32' },
                 { 'path': 'std::char', 'name': 'from_u32' },
             ] };",
        )
        .unwrap();

        let results = search(&index, &fixture.query);
        check!(fixture.check(&results).is_success());
        check!(fixture.check_exact(&results).is_success());
    }
}
