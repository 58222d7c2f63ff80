//! Built-in tool implementations for toolloop.
//!
//! Tools give the agent the ability to interact with the world:
//! read files, list directories, edit or create files, and fetch web pages.
//! Relative paths resolve against the process working directory.

pub mod edit_file;
pub mod list_files;
pub mod read_file;
pub mod web_fetch;

use std::time::Duration;

use toolloop_config::ToolsConfig;
use toolloop_core::error::Error;
use toolloop_core::tool::ToolRegistry;

pub use edit_file::EditFileTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;
pub use web_fetch::WebFetchTool;

/// Create the tool registry with all built-in tools.
///
/// Registration order is the order tools are advertised to the backend.
pub fn default_registry(config: &ToolsConfig) -> Result<ToolRegistry, Error> {
    let web_fetch = WebFetchTool::new(
        Duration::from_secs(config.fetch_timeout_secs),
        config.max_fetch_bytes,
    )?;

    ToolRegistry::builder()
        .register(ReadFileTool::new())
        .register(ListFilesTool::new())
        .register(EditFileTool::new())
        .register(web_fetch)
        .build()
}
