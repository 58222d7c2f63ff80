//! Directory listing tool: recursive walk returning relative paths.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use toolloop_core::error::ToolError;
use toolloop_core::schema::{FieldType, InputSchema};
use toolloop_core::tool::{Tool, parse_arguments};
use walkdir::WalkDir;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListFilesInput {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Default)]
pub struct ListFilesTool;

impl ListFilesTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories at a given path. If no path is provided, lists files \
         in the current directory. Directories end with a trailing slash."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().optional(
            "path",
            FieldType::String,
            "Optional relative path to list files from. Defaults to current directory if not provided.",
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let input: ListFilesInput = parse_arguments(arguments)?;
        let root = match input.path.as_deref() {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => PathBuf::from("."),
        };

        let entries = tokio::task::spawn_blocking(move || walk(&root))
            .await
            .map_err(|e| ToolError::Io(format!("listing task failed: {e}")))??;

        serde_json::to_string(&entries).map_err(|e| ToolError::Io(e.to_string()))
    }
}

/// Walk `root` depth-first in lexical order, excluding `root` itself.
fn walk(root: &Path) -> Result<Vec<String>, ToolError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ToolError::Io(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| ToolError::Io(e.to_string()))?;

        let mut name = relative.to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            name.push('/');
        }
        entries.push(name);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(raw: &str) -> Vec<String> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn path_is_optional() {
        let schema = ListFilesTool::new().input_schema().to_json();
        assert_eq!(schema["required"], serde_json::json!([]));
        assert!(schema["properties"]["path"].is_object());
    }

    #[tokio::test]
    async fn lists_recursively_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("README.md"), "# hi").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();

        let args = serde_json::json!({ "path": dir.path().to_str().unwrap() }).to_string();
        let out = ListFilesTool::new().execute(&args).await.unwrap();

        assert_eq!(
            listing(&out),
            vec!["README.md", "b.txt", "src/", "src/main.rs"]
        );
    }

    #[tokio::test]
    async fn empty_directory_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let args = serde_json::json!({ "path": dir.path().to_str().unwrap() }).to_string();
        let out = ListFilesTool::new().execute(&args).await.unwrap();
        assert_eq!(out, "[]");
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let args = serde_json::json!({ "path": missing.to_str().unwrap() }).to_string();
        let err = ListFilesTool::new().execute(&args).await.unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }

    #[tokio::test]
    async fn blank_arguments_list_current_directory() {
        let out = ListFilesTool::new().execute("").await.unwrap();
        assert!(listing(&out).iter().any(|p| p == "Cargo.toml"));
    }
}
