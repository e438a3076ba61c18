//! Command-line interface: MCP serving and one-shot queries.

use crate::config::Config;
use crate::error::Result;
use crate::server::SearchServer;
use crate::state::DocState;
use crate::tools::{
    FilterCategoryRequest, FindIndexesRequest, InspectPageRequest, ListPagesRequest,
    SearchRequest, handle_filter_category, handle_find_indexes, handle_inspect_page,
    handle_list_pages, handle_search,
};
use anyhow::anyhow;
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "docsearch-mcp", version)]
#[command(about = "Query generated documentation search indexes, as an MCP server or from the shell", long_about = None)]
pub struct Cli {
    /// Search index file (overrides the config file and DOCSEARCH_INDEX)
    #[arg(short, long, global = true)]
    pub index: Option<PathBuf>,

    /// Configuration file (default: <config dir>/docsearch-mcp/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip the on-disk cache of parsed indexes
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// Fragments whose title or text contain the query, in page order
    Search {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Fragments ranked by relevance to the query
    Rank {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Every fragment of one page
    Page { name: String },
    /// Fragments of one category (page, section, type, ...)
    Category {
        category: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Pages with fragment counts
    Pages,
    /// Locate search_index.js files below a directory
    Find {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

impl Cli {
    /// Command-line flags take precedence over the file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(index) = &self.index {
            config.index = Some(index.clone());
        }
        if self.no_cache {
            config.cache = false;
        }
    }
}

/// Execute one command against a fully resolved configuration.
pub async fn run(command: Commands, config: Config) -> Result<()> {
    let state = Arc::new(DocState::from_config(&config));
    let index = || {
        config
            .index
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("No search index given. Pass --index or set DOCSEARCH_INDEX."))
    };

    let output = match command {
        Commands::Serve => return serve(state, config.index.clone()).await,
        Commands::Find { path, max_depth } => {
            let request = FindIndexesRequest {
                path: path.to_string_lossy().into_owned(),
                max_depth,
            };
            handle_find_indexes(request).await
        }
        Commands::Search { query, limit } => {
            let request = SearchRequest {
                query,
                limit,
                ranked: Some(false),
                index: Some(index()?),
            };
            handle_search(&state, request).await
        }
        Commands::Rank { query, limit } => {
            let request = SearchRequest {
                query,
                limit,
                ranked: Some(true),
                index: Some(index()?),
            };
            handle_search(&state, request).await
        }
        Commands::Page { name } => {
            let request = InspectPageRequest {
                page: name,
                index: Some(index()?),
            };
            handle_inspect_page(&state, request).await
        }
        Commands::Category { category, limit } => {
            let request = FilterCategoryRequest {
                category,
                limit,
                index: Some(index()?),
            };
            handle_filter_category(&state, request).await
        }
        Commands::Pages => {
            let request = ListPagesRequest {
                index: Some(index()?),
            };
            handle_list_pages(&state, request).await
        }
    };
    print(output)
}

fn print(output: std::result::Result<String, String>) -> Result<()> {
    let text = output.map_err(|message| anyhow!(message))?;
    print!("{}", text);
    Ok(())
}

async fn serve(state: Arc<DocState>, index: Option<PathBuf>) -> Result<()> {
    tracing::info!("Starting docsearch-mcp MCP server");

    if let Some(path) = index
        && let Err(e) = state.select(&path).await
    {
        tracing::warn!("Could not load configured index {}: {:#}", path.display(), e);
    }

    let server = SearchServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
