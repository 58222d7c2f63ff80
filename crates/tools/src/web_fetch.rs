//! Web fetch tool: HTTP GET a URL and return the body as text.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use toolloop_core::error::ToolError;
use toolloop_core::schema::{FieldType, InputSchema};
use toolloop_core::tool::{Tool, parse_arguments};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WebFetchInput {
    url: String,
}

pub struct WebFetchTool {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: usize,
}

impl WebFetchTool {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("toolloop/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolError::Network(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            max_bytes,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ToolError {
        if e.is_timeout() {
            ToolError::Timeout {
                tool_name: "web_fetch".into(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ToolError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch a web page or API endpoint with an HTTP GET and return the response body \
         as text. Only http:// and https:// URLs are supported."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().required("url", FieldType::String, "The url to fetch data from.")
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let input: WebFetchInput = parse_arguments(arguments)?;

        if !input.url.starts_with("http://") && !input.url.starts_with("https://") {
            return Err(ToolError::InvalidArgument(
                "url must start with http:// or https://".into(),
            ));
        }

        let mut response = self
            .client
            .get(&input.url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Network(format!(
                "{} returned non-success status: {status}",
                input.url
            )));
        }

        let mut body = Vec::new();
        let mut truncated = false;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_send_error(e))? {
            let room = self.max_bytes - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        // A cut inside a multi-byte character drops that partial character.
        if truncated {
            let valid = std::str::from_utf8(&body)
                .err()
                .filter(|e| e.error_len().is_none())
                .map(|e| e.valid_up_to());
            if let Some(valid) = valid {
                body.truncate(valid);
            }
        }

        debug!(url = %input.url, bytes = body.len(), truncated, "Fetched URL");

        let mut text = String::from_utf8_lossy(&body).into_owned();
        if truncated {
            text.push_str(&format!("\n[truncated after {} bytes]", self.max_bytes));
        }
        Ok(text)
    }
}
