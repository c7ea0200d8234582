//! MCP server exposing the search engine over stdio.

use crate::state::SearchState;
use crate::tools::check_fixture::{CheckFixtureRequest, handle_check_fixture};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation name search
#[derive(Clone)]
pub struct SearchServer {
    /// Shared search state (index, memo)
    state: Arc<SearchState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    pub fn new(state: Arc<SearchState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared SearchState.
    pub fn state(&self) -> &Arc<SearchState> {
        &self.state
    }

    #[tool(
        description = "Search documented Rust items by name. Exact name matches rank first, then prefix matches, then substring matches; shorter names rank higher within a tier. Supports kind filters ('fn:from_u') and path filters ('string::from_u'). Results are grouped into 'others' (name matches), 'in_args' and 'returned' (type appears in the signature).",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Run a rustdoc-js style search fixture (const QUERY / const EXPECTED) against the loaded index and report missing or misordered results.",
        input_schema = inline_schema_for_type::<CheckFixtureRequest>()
    )]
    async fn check_fixture(
        &self,
        Parameters(request): Parameters<CheckFixtureRequest>,
    ) -> std::result::Result<String, String> {
        handle_check_fixture(&self.state, &request)
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch: name search over Rust documentation. \
                 Use search with a partial item name; use check_fixture to validate expected rankings.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
