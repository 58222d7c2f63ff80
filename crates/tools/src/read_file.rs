//! File read tool: return a file's contents as text.

use async_trait::async_trait;
use serde::Deserialize;
use toolloop_core::error::ToolError;
use toolloop_core::schema::{FieldType, InputSchema};
use toolloop_core::tool::{Tool, parse_arguments};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadFileInput {
    path: String,
}

#[derive(Debug, Default)]
pub struct ReadFileTool;

impl ReadFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a given relative file path. Use this when you want to see \
         what's inside a file. Do not use this with directory names."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().required(
            "path",
            FieldType::String,
            "The relative path of a file in the working directory.",
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let input: ReadFileInput = parse_arguments(arguments)?;

        tokio::fs::read_to_string(&input.path)
            .await
            .map_err(|e| ToolError::Io(format!("{}: {e}", input.path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: &std::path::Path) -> String {
        serde_json::json!({ "path": path.to_str().unwrap() }).to_string()
    }

    #[test]
    fn tool_definition() {
        let tool = ReadFileTool::new();
        assert_eq!(tool.name(), "read_file");
        let schema = tool.input_schema().to_json();
        assert_eq!(schema["required"], serde_json::json!(["path"]));
        assert_eq!(schema["properties"]["path"]["type"], "string");
    }

    #[tokio::test]
    async fn read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        std::fs::write(&file_path, "Hello, world!\nsecond line\n").unwrap();

        let out = ReadFileTool::new().execute(&args(&file_path)).await.unwrap();
        assert_eq!(out, "Hello, world!\nsecond line\n");
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReadFileTool::new()
            .execute(&args(&dir.path().join("nope.txt")))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(ref m) if m.contains("nope.txt")));
    }

    #[tokio::test]
    async fn missing_path_argument_is_invalid() {
        let err = ReadFileTool::new().execute("{}").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }
}
