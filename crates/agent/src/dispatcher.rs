//! Tool dispatcher: turns one tool-call request into one tool result.
//!
//! Lookup, argument checking, execution under a timeout, and conversion of
//! every failure into result text. Nothing here returns an error to the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use toolloop_core::error::ToolError;
use toolloop_core::provider::ToolDefinition;
use toolloop_core::tool::{Tool, ToolRegistry, ToolResult};
use tracing::{info, warn};

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.lookup(name).is_some()
    }

    /// The catalog advertised to the backend, in registration order.
    pub fn catalog(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Dispatch without an external cancellation signal.
    pub async fn dispatch(&self, call_id: &str, tool_name: &str, raw_arguments: &str) -> ToolResult {
        self.dispatch_cancellable(call_id, tool_name, raw_arguments, &CancellationToken::new())
            .await
    }

    /// Dispatch one call. A fired `cancel` yields a "tool call cancelled" result.
    ///
    /// Cancelling drops the handler future. Work it already handed to the
    /// blocking pool (an `edit_file` write, say) still runs to completion, so
    /// a cancelled result does not promise the side effect never happened.
    /// A handler that has finished by the time it is polled always reports
    /// its own result.
    pub async fn dispatch_cancellable(
        &self,
        call_id: &str,
        tool_name: &str,
        raw_arguments: &str,
        cancel: &CancellationToken,
    ) -> ToolResult {
        let start = Instant::now();

        let outcome = if cancel.is_cancelled() {
            Err(ToolError::Cancelled)
        } else {
            match self.registry.lookup(tool_name) {
                None => Err(ToolError::NotFound(tool_name.to_string())),
                Some(tool) => self.run(tool, raw_arguments, cancel).await,
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(output) => {
                info!(tool = tool_name, call_id, ok = true, duration_ms, "Tool dispatched");
                ToolResult::success(call_id, output)
            }
            Err(e) => {
                warn!(
                    tool = tool_name,
                    call_id,
                    ok = false,
                    duration_ms,
                    args_preview = %preview(raw_arguments),
                    error = %e,
                    "Tool dispatched"
                );
                ToolResult::error(call_id, e.to_string())
            }
        }
    }

    async fn run(
        &self,
        tool: &dyn Tool,
        raw_arguments: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ToolError> {
        let raw = if raw_arguments.trim().is_empty() { "{}" } else { raw_arguments };
        let arguments: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| ToolError::InvalidArgument(format!("arguments are not valid JSON: {e}")))?;
        tool.input_schema().validate(&arguments)?;

        tokio::select! {
            biased;
            result = timeout(self.timeout, tool.execute(raw_arguments)) => match result {
                Ok(result) => result,
                Err(_) => Err(ToolError::Timeout {
                    tool_name: tool.name().to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }),
            },
            _ = cancel.cancelled() => Err(ToolError::Cancelled),
        }
    }
}

fn preview(raw: &str) -> String {
    if raw.len() > 200 {
        format!("{}...", raw.chars().take(200).collect::<String>())
    } else {
        raw.to_string()
    }
}
