//! File edit tool: exact string replacement, or file creation.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use toolloop_core::error::ToolError;
use toolloop_core::schema::{FieldType, InputSchema};
use toolloop_core::tool::{Tool, parse_arguments};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditFileInput {
    path: String,
    old_str: String,
    new_str: String,
}

/// Replaces every occurrence of `old_str` with `new_str`.
///
/// With an empty `old_str` and no existing file, creates the file (and any
/// missing parent directories) with `new_str` as its content.
#[derive(Debug, Default)]
pub struct EditFileTool;

impl EditFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Make edits to a text file. Replaces every occurrence of 'old_str' with 'new_str' \
         in the given file. 'old_str' and 'new_str' MUST be different from each other. \
         If the file does not exist and 'old_str' is empty, the file is created with \
         'new_str' as its content."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .required("path", FieldType::String, "The path to the file")
            .required(
                "old_str",
                FieldType::String,
                "Text to search for - must match exactly",
            )
            .required("new_str", FieldType::String, "Text to replace old_str with")
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let input: EditFileInput = parse_arguments(arguments)?;

        if input.path.is_empty() {
            return Err(ToolError::InvalidArgument("path must not be empty".into()));
        }
        if input.old_str == input.new_str {
            return Err(ToolError::InvalidArgument(
                "old_str and new_str must be different".into(),
            ));
        }

        let content = match tokio::fs::read_to_string(&input.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && input.old_str.is_empty() => {
                return create_file(&input.path, &input.new_str).await;
            }
            Err(e) => return Err(ToolError::Io(format!("{}: {e}", input.path))),
        };

        if input.old_str.is_empty() {
            return Err(ToolError::InvalidArgument(
                "old_str must not be empty when editing an existing file".into(),
            ));
        }
        if !content.contains(&input.old_str) {
            return Err(ToolError::NoMatch);
        }

        let replaced = content.replace(&input.old_str, &input.new_str);
        tokio::fs::write(&input.path, replaced)
            .await
            .map_err(|e| ToolError::Io(format!("{}: {e}", input.path)))?;

        debug!(path = %input.path, "File edited");
        Ok("OK".into())
    }
}

async fn create_file(path: &str, content: &str) -> Result<String, ToolError> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::Io(format!("failed to create directory: {e}")))?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::Io(format!("failed to create file: {e}")))?;

    debug!(path, "File created");
    Ok(format!("Successfully created file {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: &Path, old_str: &str, new_str: &str) -> String {
        serde_json::json!({
            "path": path.to_str().unwrap(),
            "old_str": old_str,
            "new_str": new_str,
        })
        .to_string()
    }

    #[test]
    fn all_fields_required() {
        let schema = EditFileTool::new().input_schema().to_json();
        assert_eq!(
            schema["required"],
            serde_json::json!(["path", "old_str", "new_str"])
        );
    }

    #[tokio::test]
    async fn replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "teh cat saw teh dog").unwrap();

        let out = EditFileTool::new()
            .execute(&args(&path, "teh", "the"))
            .await
            .unwrap();
        assert_eq!(out, "OK");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "the cat saw the dog");
    }

    #[tokio::test]
    async fn absent_old_str_is_no_match_and_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "already correct").unwrap();

        let err = EditFileTool::new()
            .execute(&args(&path, "teh", "the"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NoMatch));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "already correct");
    }

    #[tokio::test]
    async fn creates_missing_file_with_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/new.txt");

        let out = EditFileTool::new()
            .execute(&args(&path, "", "fresh content"))
            .await
            .unwrap();
        assert!(out.starts_with("Successfully created file"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh content");
    }

    #[tokio::test]
    async fn identical_strings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x").unwrap();

        let err = EditFileTool::new()
            .execute(&args(&path, "x", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_path_rejected() {
        let err = EditFileTool::new()
            .execute(r#"{"path":"","old_str":"","new_str":"x"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_old_str_on_existing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "keep me").unwrap();

        let err = EditFileTool::new()
            .execute(&args(&path, "", "new"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn missing_file_with_old_str_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditFileTool::new()
            .execute(&args(&dir.path().join("ghost.txt"), "a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }
}
