//! MCP server exposing the search index tools.

use crate::state::DocState;
use crate::tools::{
    FilterCategoryRequest, FindIndexesRequest, InspectPageRequest, ListPagesRequest,
    SearchRequest, SetIndexRequest, handle_filter_category, handle_find_indexes,
    handle_inspect_page, handle_list_pages, handle_search, handle_set_index,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for querying generated documentation search indexes
#[derive(Clone)]
pub struct SearchServer {
    /// Loaded indexes and the active selection
    state: Arc<DocState>,

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
    pub fn new(state: Arc<DocState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub fn doc_state(&self) -> &Arc<DocState> {
        &self.state
    }

    #[tool(
        description = "Load a documentation search index (search_index.js, or the build directory containing it) and make it the default for all other tools. Reports fragment, page and category counts.",
        input_schema = inline_schema_for_type::<SetIndexRequest>()
    )]
    async fn set_index(
        &self,
        Parameters(request): Parameters<SetIndexRequest>,
    ) -> std::result::Result<String, String> {
        handle_set_index(&self.state, request).await
    }

    #[tool(
        description = "Search documentation fragments. By default returns every fragment whose title or text contains the query (case-insensitive) in page order. With ranked=true, scores fragments by TF-IDF over stemmed words and puts title matches first.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "List the pages of the documentation with their paths and fragment counts, followed by how many fragments each category has.",
        input_schema = inline_schema_for_type::<ListPagesRequest>()
    )]
    async fn list_pages(
        &self,
        Parameters(request): Parameters<ListPagesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_pages(&self.state, request).await
    }

    #[tool(
        description = "Show every fragment of one documentation page in order. The page name must match exactly; close matches are suggested otherwise.",
        input_schema = inline_schema_for_type::<InspectPageRequest>()
    )]
    async fn inspect_page(
        &self,
        Parameters(request): Parameters<InspectPageRequest>,
    ) -> std::result::Result<String, String> {
        handle_inspect_page(&self.state, request).await
    }

    #[tool(
        description = "List fragments of one category, such as 'page', 'section' or 'type' (docstrings), in document order.",
        input_schema = inline_schema_for_type::<FilterCategoryRequest>()
    )]
    async fn filter_category(
        &self,
        Parameters(request): Parameters<FilterCategoryRequest>,
    ) -> std::result::Result<String, String> {
        handle_filter_category(&self.state, request).await
    }

    #[tool(
        description = "Find generated search_index.js files below a directory, including git-ignored build output such as docs/build.",
        input_schema = inline_schema_for_type::<FindIndexesRequest>()
    )]
    async fn find_indexes(
        &self,
        Parameters(request): Parameters<FindIndexesRequest>,
    ) -> std::result::Result<String, String> {
        handle_find_indexes(request).await
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsearch-mcp: search the index a static documentation generator builds for its site. \
                 Use find_indexes to locate search_index.js files and set_index to select one, \
                 unless an index was configured at startup. Then use search, list_pages, \
                 inspect_page and filter_category."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so clients render the full input shape without resolving `$ref`s.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    // A root schema always serializes to a JSON object.
    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        _ => Arc::new(JsonObject::new()),
    }
}
