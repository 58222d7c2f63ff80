pub mod chat;
pub mod tools;

use std::path::Path;

use anyhow::Context;
use toolloop_config::AppConfig;

/// Load configuration from an explicit path or the default location.
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    };
    config.context("Failed to load config")
}
