//! User I/O boundary.
//!
//! [`UserInput`] yields one line at a time and signals end of input with
//! `None`. [`Console`] receives everything the session shows the user:
//! assistant replies and tool-invocation echo lines, kept distinct so a
//! terminal can style them differently.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::ConsoleError;

/// A source of user lines.
#[async_trait]
pub trait UserInput: Send {
    /// Read the next line. `Ok(None)` means end of input.
    async fn read_line(&mut self) -> Result<Option<String>, ConsoleError>;
}

/// Where the session writes user-visible output.
pub trait Console: Send {
    /// Greeting shown once at session start.
    fn banner(&mut self, text: &str) -> Result<(), ConsoleError>;

    /// Shown right before waiting for user input.
    fn prompt(&mut self) -> Result<(), ConsoleError>;

    /// Free text from the assistant.
    fn assistant_text(&mut self, text: &str) -> Result<(), ConsoleError>;

    /// Echo of a tool call about to run.
    fn tool_invocation(&mut self, name: &str, arguments: &str) -> Result<(), ConsoleError>;
}

/// Input fed from a fixed list of lines, then end of input.
///
/// Backs single-message mode and tests.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl UserInput for ScriptedInput {
    async fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        Ok(self.lines.pop_front())
    }
}

/// One line of captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    Banner(String),
    Prompt,
    Assistant(String),
    ToolInvocation { name: String, arguments: String },
}

/// A console that keeps everything in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingConsole {
    lines: Vec<TranscriptLine>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    /// Assistant replies only, in order.
    pub fn assistant_texts(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                TranscriptLine::Assistant(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Names of echoed tool calls, in order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                TranscriptLine::ToolInvocation { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn prompt_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, TranscriptLine::Prompt))
            .count()
    }
}

impl Console for RecordingConsole {
    fn banner(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.lines.push(TranscriptLine::Banner(text.to_string()));
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), ConsoleError> {
        self.lines.push(TranscriptLine::Prompt);
        Ok(())
    }

    fn assistant_text(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.lines.push(TranscriptLine::Assistant(text.to_string()));
        Ok(())
    }

    fn tool_invocation(&mut self, name: &str, arguments: &str) -> Result<(), ConsoleError> {
        self.lines.push(TranscriptLine::ToolInvocation {
            name: name.to_string(),
            arguments: arguments.to_string(),
        });
        Ok(())
    }
}
