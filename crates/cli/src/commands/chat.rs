//! `toolloop chat`: interactive or single-message chat mode.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use toolloop_agent::{AgentLoop, SessionEnd};
use toolloop_config::AppConfig;
use toolloop_core::console::ScriptedInput;
use tracing::debug;

use crate::terminal::{TerminalConsole, TerminalInput};

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
    model: Option<String>,
) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(model) = model {
        config.model = model;
        config.validate().context("Invalid --model")?;
    }

    let provider = toolloop_providers::build_from_config(&config).with_context(|| {
        format!(
            "Model backend is not set up (config: {})",
            AppConfig::config_dir().join("config.toml").display()
        )
    })?;
    let tools =
        Arc::new(toolloop_tools::default_registry(&config.tools).context("Failed to build tools")?);
    let agent = AgentLoop::from_config(provider, tools, &config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut conversation = agent.new_conversation();
    let end = match message {
        Some(message) => {
            let mut input = ScriptedInput::new([message]);
            let mut console = TerminalConsole::stdout(&config.assistant_name, false);
            agent
                .run(&mut conversation, &mut input, &mut console, &cancel)
                .await?
        }
        None => {
            let mut input = TerminalInput::new().context("Failed to start the stdin reader")?;
            let mut console = TerminalConsole::stdout(&config.assistant_name, true);
            agent
                .run(&mut conversation, &mut input, &mut console, &cancel)
                .await?
        }
    };

    debug!(
        conversation_id = %conversation.id(),
        messages = conversation.len(),
        "Chat finished"
    );
    if end == SessionEnd::Cancelled {
        eprintln!();
    }
    Ok(())
}
