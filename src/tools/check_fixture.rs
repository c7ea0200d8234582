//! Runs a `rustdoc-js` style fixture file against the loaded index.

use crate::config::expand_tilde;
use crate::fixture::Fixture;
use crate::search::search;
use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckFixtureRequest {
    /// Path to the fixture file (`const QUERY = ...; const EXPECTED = {...};`)
    pub path: String,
    /// Require each category to equal the expected list exactly (default: ordered subset)
    #[serde(default)]
    pub exact: bool,
}

/// Load the fixture, run its query, and report mismatches.
pub fn handle_check_fixture(
    state: &SearchState,
    request: &CheckFixtureRequest,
) -> Result<String, String> {
    let path = expand_tilde(&request.path);
    let fixture = Fixture::load(Path::new(path.as_ref())).map_err(|e| e.to_string())?;

    let results = search(state.index(), &fixture.query);
    let report = if request.exact {
        fixture.check_exact(&results)
    } else {
        fixture.check(&results)
    };

    if report.is_success() {
        tracing::info!("Fixture {} passed", request.path);
    } else {
        tracing::warn!(
            "Fixture {} failed with {} mismatches",
            request.path,
            report.mismatches.len()
        );
    }

    Ok(report.to_string())
}
