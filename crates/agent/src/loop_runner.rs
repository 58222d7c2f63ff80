//! The orchestration loop as an explicit state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use toolloop_config::AppConfig;
use toolloop_core::console::{Console, UserInput};
use toolloop_core::error::Result;
use toolloop_core::message::{Conversation, ToolCallRequest};
use toolloop_core::provider::{Provider, ToolDefinition};
use toolloop_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

use crate::dispatcher::ToolDispatcher;
use crate::invoker::{InferenceInvoker, Invocation};

/// Where the loop is between steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next user line.
    AwaitingUserInput,
    /// A backend call is due.
    Inferring,
    /// The latest assistant message requested these calls.
    DispatchingTools(Vec<ToolCallRequest>),
}

/// Why a session ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    EndOfInput,
    Cancelled,
}

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Next(LoopState),
    End(SessionEnd),
}

/// Drives a conversation: reads user input, calls the backend, and runs
/// requested tools until the model answers without tools.
pub struct AgentLoop {
    invoker: InferenceInvoker,
    dispatcher: ToolDispatcher,
    catalog: Vec<ToolDefinition>,
    system_prompt: String,
    assistant_name: String,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(invoker: InferenceInvoker, dispatcher: ToolDispatcher) -> Self {
        let catalog = dispatcher.catalog();
        let defaults = AppConfig::default();
        Self {
            invoker,
            dispatcher,
            catalog,
            system_prompt: defaults.system_prompt,
            assistant_name: defaults.assistant_name,
        }
    }

    /// Build a loop from loaded configuration.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        debug!(
            provider = provider.name(),
            model = %config.model,
            tools = tools.len(),
            "Configuring agent loop"
        );
        let invoker = InferenceInvoker::new(provider, &config.model, config.max_tokens);
        let dispatcher =
            ToolDispatcher::new(tools, Duration::from_secs(config.tools.timeout_secs));
        Self::new(invoker, dispatcher)
            .with_system_prompt(&config.system_prompt)
            .with_assistant_name(&config.assistant_name)
    }

    /// Set the instructions every conversation starts with.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the name used in the session banner.
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn catalog(&self) -> &[ToolDefinition] {
        &self.catalog
    }

    /// A fresh conversation holding only the system prompt.
    pub fn new_conversation(&self) -> Conversation {
        Conversation::new(&self.system_prompt)
    }

    /// Run a session until end of input, cancellation, or a backend failure.
    ///
    /// Only backend and console failures are returned as errors; tool
    /// failures stay inside the conversation for the model to handle.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        input: &mut dyn UserInput,
        console: &mut dyn Console,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd> {
        info!(
            conversation_id = %conversation.id(),
            provider = self.invoker.provider_name(),
            model = self.invoker.model(),
            tools = self.catalog.len(),
            "Session started"
        );

        console.banner(&format!(
            "Chat with {} (use 'ctrl-c' to quit)",
            self.assistant_name
        ))?;

        let mut state = LoopState::AwaitingUserInput;
        loop {
            match self.step(state, conversation, input, console, cancel).await? {
                Transition::Next(next) => state = next,
                Transition::End(end) => {
                    info!(
                        conversation_id = %conversation.id(),
                        messages = conversation.len(),
                        reason = ?end,
                        "Session ended"
                    );
                    return Ok(end);
                }
            }
        }
    }

    /// Advance the state machine by one state.
    pub async fn step(
        &self,
        state: LoopState,
        conversation: &mut Conversation,
        input: &mut dyn UserInput,
        console: &mut dyn Console,
        cancel: &CancellationToken,
    ) -> Result<Transition> {
        match state {
            LoopState::AwaitingUserInput => {
                console.prompt()?;
                let line = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(Transition::End(SessionEnd::Cancelled)),
                    line = input.read_line() => line?,
                };

                match line {
                    None => Ok(Transition::End(SessionEnd::EndOfInput)),
                    Some(text) => {
                        conversation.push_user(text);
                        Ok(Transition::Next(LoopState::Inferring))
                    }
                }
            }

            LoopState::Inferring => {
                let completion = match self
                    .invoker
                    .invoke(conversation, &self.catalog, cancel)
                    .await?
                {
                    Invocation::Completed(completion) => completion,
                    Invocation::Cancelled => return Ok(Transition::End(SessionEnd::Cancelled)),
                };

                let text = completion.visible_text().map(str::to_string);
                let calls = completion.tool_calls.clone();
                conversation.push_assistant(completion.content, completion.tool_calls);

                if let Some(text) = text {
                    console.assistant_text(&text)?;
                }

                if calls.is_empty() {
                    Ok(Transition::Next(LoopState::AwaitingUserInput))
                } else {
                    debug!(
                        conversation_id = %conversation.id(),
                        tool_count = calls.len(),
                        "Dispatching tool calls"
                    );
                    Ok(Transition::Next(LoopState::DispatchingTools(calls)))
                }
            }

            LoopState::DispatchingTools(calls) => {
                for call in &calls {
                    if !cancel.is_cancelled()
                        && self.dispatcher.has_tool(&call.name)
                        && let Err(e) = console.tool_invocation(&call.name, &call.arguments)
                    {
                        warn!(tool = %call.name, error = %e, "Failed to echo tool call");
                    }

                    let result = self
                        .dispatcher
                        .dispatch_cancellable(&call.id, &call.name, &call.arguments, cancel)
                        .await;
                    conversation.push_tool_result(result);
                }

                if cancel.is_cancelled() {
                    Ok(Transition::End(SessionEnd::Cancelled))
                } else {
                    Ok(Transition::Next(LoopState::Inferring))
                }
            }
        }
    }
}
