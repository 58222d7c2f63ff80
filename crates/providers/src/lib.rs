//! LLM Provider implementations for toolloop.
//!
//! All providers implement the `toolloop_core::Provider` trait.
//! [`build_from_config`] selects the backend named in configuration.

pub mod factory;
pub mod openai_compat;

pub use factory::{build_from_config, default_base_url};
pub use openai_compat::OpenAiCompatProvider;
