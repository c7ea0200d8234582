//! Name search handler for finding documentation items.

use crate::search::{Category, Match, ResultSet, SearchOptions, search_with};
use crate::state::SearchState;
use ahash::AHashSet;
use rapidfuzz::distance::jaro_winkler;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Minimum jaro-winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search query, e.g. `from_u`, `fn:from_u`, or `string::from_u`
    pub query: String,
    /// Only report this result category
    #[serde(default)]
    pub category: Option<Category>,
    /// Maximum number of results per category (default: 10)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_limit() -> Option<usize> {
    Some(10)
}

/// Execute the search and format the results.
pub async fn handle_search(state: &SearchState, request: SearchRequest) -> Result<String, String> {
    let limit = request
        .limit
        .unwrap_or(10)
        .clamp(1, state.max_results().max(1));
    let key = (request.query.clone(), request.category, limit);

    if let Some(cached) = state.memoized(&key).await {
        tracing::trace!("Serving memoized results for {:?}", request.query);
        return Ok(cached);
    }

    let results = search_with(state.index(), &request.query, &SearchOptions::with_limit(limit));
    let output = if results.is_empty() {
        format_no_results(state, &request.query)
    } else {
        format_search_results(&results, &request.query, request.category)
    };

    state.memoize(key, output.clone()).await;
    Ok(output)
}

/// Format search results into a readable string output.
fn format_search_results(
    results: &ResultSet<'_>,
    query: &str,
    only: Option<Category>,
) -> String {
    let mut output = format!("Search results for '{}':\n", query);

    let groups = results
        .iter()
        .filter(|(category, _)| only.is_none_or(|only| only == *category));

    let mut any = false;
    for (category, matches) in groups {
        any = true;
        let _ = writeln!(output, "\n## {}\n", category);
        for (idx, matched) in matches.iter().enumerate() {
            write_match(&mut output, idx + 1, matched);
        }
    }

    if !any {
        let _ = writeln!(
            output,
            "\nNo results in category '{}'.",
            only.map_or("any", Category::as_str)
        );
    }

    output
}

fn write_match(output: &mut String, position: usize, matched: &Match<'_>) {
    let _ = writeln!(
        output,
        "{}. `{}` ({}) - relevance: {}%",
        position,
        matched.entry.qualified_name(),
        matched.entry.kind,
        matched.score.relevance()
    );
}

fn format_no_results(state: &SearchState, query: &str) -> String {
    let mut msg = format!("No results found for '{}'.\n\n", query);

    let suggestions = suggest_names(state, query);
    if !suggestions.is_empty() {
        msg.push_str("Did you mean:\n");
        for name in suggestions {
            let _ = writeln!(msg, "• `{}`", name);
        }
        msg.push('\n');
    }

    msg.push_str("Search tips:\n");
    msg.push_str("• Try a shorter or more general term\n");
    msg.push_str("• Filter by kind with a prefix, e.g. 'fn:from_u' or 'struct:String'\n");
    msg.push_str("• Narrow by path, e.g. 'string::from_u'\n");
    msg
}

/// Entry names most similar to the query's last path segment.
fn suggest_names(state: &SearchState, query: &str) -> Vec<String> {
    let needle = query
        .rsplit("::")
        .next()
        .unwrap_or(query)
        .trim()
        .to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut seen = AHashSet::new();
    let mut scored: Vec<(f64, &str)> = state
        .index()
        .entries()
        .filter(|entry| seen.insert(entry.name.as_str()))
        .map(|entry| {
            let score =
                jaro_winkler::similarity(needle.chars(), entry.name.to_lowercase().chars());
            (score, entry.name.as_str())
        })
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|(a_score, a_name), (b_score, b_name)| {
        b_score.total_cmp(a_score).then_with(|| a_name.cmp(b_name))
    });
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name.to_string())
        .collect()
}
