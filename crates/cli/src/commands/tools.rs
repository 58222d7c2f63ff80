//! `toolloop tools`: print the tool catalog the model receives.

use std::path::Path;

use anyhow::Context;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let registry =
        toolloop_tools::default_registry(&config.tools).context("Failed to build tools")?;

    let catalog = serde_json::to_string_pretty(&registry.definitions())?;
    println!("{catalog}");
    Ok(())
}
