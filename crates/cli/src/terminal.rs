//! Terminal user I/O: stdin lines in, labelled transcript lines out.

use std::io::{self, BufRead, IsTerminal, Stdout, Write};

use async_trait::async_trait;
use tokio::sync::mpsc;
use toolloop_core::console::{Console, UserInput};
use toolloop_core::error::ConsoleError;

const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Reads user lines from stdin. EOF and exit words end the session.
///
/// Lines are read on a plain OS thread and handed over a channel. A read
/// parked on that thread does not hold the runtime open, so a cancelled
/// session can exit while stdin is still waiting for Enter.
pub struct TerminalInput {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl TerminalInput {
    pub fn new() -> io::Result<Self> {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        std::thread::Builder::new()
            .name("toolloop-stdin".into())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
            })?;
        Ok(Self { lines: rx })
    }
}

#[async_trait]
impl UserInput for TerminalInput {
    async fn read_line(&mut self) -> Result<Option<String>, ConsoleError> {
        match self.lines.recv().await {
            Some(line) => {
                let line = line.map_err(ConsoleError::Read)?;
                Ok(Some(line).filter(|l| !is_exit_command(l)))
            }
            None => Ok(None),
        }
    }
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.trim(), "exit" | "quit" | "/exit" | "/quit" | ":q")
}

/// Writes the transcript with `You:`, assistant and `tool:` labels.
pub struct TerminalConsole<W: Write + Send> {
    out: W,
    assistant_name: String,
    interactive: bool,
    color: bool,
}

impl TerminalConsole<Stdout> {
    /// Console on stdout, coloured when stdout is a terminal.
    pub fn stdout(assistant_name: &str, interactive: bool) -> Self {
        let out = std::io::stdout();
        let color = out.is_terminal();
        Self::with_writer(out, assistant_name, interactive, color)
    }
}

impl<W: Write + Send> TerminalConsole<W> {
    pub fn with_writer(out: W, assistant_name: &str, interactive: bool, color: bool) -> Self {
        Self {
            out,
            assistant_name: assistant_name.to_string(),
            interactive,
            color,
        }
    }

    fn label(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, line: &str, newline: bool) -> Result<(), ConsoleError> {
        if newline {
            writeln!(self.out, "{line}").map_err(ConsoleError::Write)?;
        } else {
            write!(self.out, "{line}").map_err(ConsoleError::Write)?;
        }
        self.out.flush().map_err(ConsoleError::Write)
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Console for TerminalConsole<W> {
    fn banner(&mut self, text: &str) -> Result<(), ConsoleError> {
        if !self.interactive {
            return Ok(());
        }
        self.emit(text, true)
    }

    fn prompt(&mut self) -> Result<(), ConsoleError> {
        if !self.interactive {
            return Ok(());
        }
        let label = self.label(BLUE, "You");
        self.emit(&format!("{label}: "), false)
    }

    fn assistant_text(&mut self, text: &str) -> Result<(), ConsoleError> {
        let label = self.label(YELLOW, &self.assistant_name);
        self.emit(&format!("{label}: {text}"), true)
    }

    fn tool_invocation(&mut self, name: &str, arguments: &str) -> Result<(), ConsoleError> {
        let label = self.label(GREEN, "tool");
        self.emit(&format!("{label}: {name}({arguments})"), true)
    }
}
