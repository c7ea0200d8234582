//! Query engine: turns a raw query string into a categorized, ordered result set.

use super::index::SearchIndex;
use super::matcher::{Category, Match, match_query};
use super::tokenize::ParsedQuery;

/// Options applied after ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum results kept per category (`None` keeps everything)
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub const fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// Categorized, ordered output of a search.
///
/// Each category is sorted by descending score, then natural path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet<'a> {
    pub others: Vec<Match<'a>>,
    pub in_args: Vec<Match<'a>>,
    pub returned: Vec<Match<'a>>,
}

impl<'a> ResultSet<'a> {
    /// Results for a single category.
    pub fn category(&self, category: Category) -> &[Match<'a>] {
        match category {
            Category::Others => &self.others,
            Category::InArgs => &self.in_args,
            Category::Returned => &self.returned,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<Match<'a>> {
        match category {
            Category::Others => &mut self.others,
            Category::InArgs => &mut self.in_args,
            Category::Returned => &mut self.returned,
        }
    }

    /// Non-empty categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Match<'a>])> {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.category(category)))
            .filter(|(_, matches)| !matches.is_empty())
    }

    /// Total number of matches across categories.
    pub fn len(&self) -> usize {
        self.others.len() + self.in_args.len() + self.returned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Searches the index with default options (no truncation).
pub fn search<'a>(index: &'a SearchIndex, raw_query: &str) -> ResultSet<'a> {
    search_with(index, raw_query, &SearchOptions::default())
}

/// Searches the index: normalize → match → group by category → sort → truncate.
///
/// Never fails. A query that normalizes to no tokens yields an empty result set.
pub fn search_with<'a>(
    index: &'a SearchIndex,
    raw_query: &str,
    options: &SearchOptions,
) -> ResultSet<'a> {
    let Some(query) = ParsedQuery::parse(raw_query) else {
        tracing::debug!("Empty query {:?}, returning no results", raw_query);
        return ResultSet::default();
    };

    let mut results = ResultSet::default();
    // `match_query` returns matches already in rank order; grouping keeps it
    for matched in match_query(index, &query) {
        results.category_mut(matched.category).push(matched);
    }

    if let Some(limit) = options.limit {
        for category in Category::ALL {
            results.category_mut(category).truncate(limit);
        }
    }

    tracing::debug!(
        "Query {:?}: {} others, {} in_args, {} returned",
        raw_query,
        results.others.len(),
        results.in_args.len(),
        results.returned.len()
    );

    results
}
