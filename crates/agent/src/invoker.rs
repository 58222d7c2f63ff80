//! Inference invoker: one cancellable round-trip to the backend.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use toolloop_core::error::ProviderError;
use toolloop_core::message::Conversation;
use toolloop_core::provider::{Completion, Provider, ProviderRequest, ToolDefinition};
use tracing::{debug, warn};

/// Outcome of an inference call that did not fail.
#[derive(Debug, Clone)]
pub enum Invocation {
    Completed(Completion),
    /// The cancellation token fired first; the request was dropped.
    Cancelled,
}

/// Sends the whole conversation plus the tool catalog to the backend.
pub struct InferenceInvoker {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: u32,
}

impl InferenceInvoker {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one inference call.
    ///
    /// Never touches the conversation; the caller appends the result. A
    /// cancelled call therefore leaves no trace in the log.
    pub async fn invoke(
        &self,
        conversation: &Conversation,
        catalog: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<Invocation, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: conversation.messages().to_vec(),
            max_tokens: self.max_tokens,
            tools: catalog.to_vec(),
        };

        debug!(
            conversation_id = %conversation.id(),
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Invoking backend"
        );

        let start = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(conversation_id = %conversation.id(), "Inference cancelled");
                return Ok(Invocation::Cancelled);
            }
            result = self.provider.complete(request) => result,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(completion) => {
                debug!(
                    conversation_id = %conversation.id(),
                    duration_ms,
                    tool_calls = completion.tool_calls.len(),
                    total_tokens = completion.usage.map(|u| u.total_tokens),
                    "Backend responded"
                );
                Ok(Invocation::Completed(completion))
            }
            Err(e) => {
                warn!(conversation_id = %conversation.id(), duration_ms, error = %e, "Backend call failed");
                Err(e)
            }
        }
    }
}
