//! Line-based console for the live session.
//!
//! Stands in for the tab bar, the buttons and the keyboard listener of a
//! graphical playground. Each line is one command.

use std::str::FromStr;

use anyhow::{bail, Error};

use crate::core::FileName;
use crate::session::{
    EditingSurface, ExportSurface, KeyOutcome, KeyPress, RenderSurface, Session,
};

pub const HELP: &str = "\
Commands:
  tab <file>    switch to index.html, styles.css or script.js
  reset         restore the default files (asks for confirmation)
  export        export the current file
  export-all    export every file
  <chord>       press a key chord, e.g. ctrl+s
  status        show the current file and preview title
  help          show this help
  quit          end the session";

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Tab(FileName),
    Reset,
    Export,
    ExportAll,
    Key(KeyPress),
    Status,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        let command = match word.to_ascii_lowercase().as_str() {
            "tab" | "open" => {
                if rest.is_empty() {
                    bail!("Usage: tab <file>");
                }
                ConsoleCommand::Tab(rest.parse()?)
            }
            "reset" => ConsoleCommand::Reset,
            "export" | "download" => ConsoleCommand::Export,
            "export-all" | "download-all" => ConsoleCommand::ExportAll,
            "status" => ConsoleCommand::Status,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            _ if line.contains('+') => ConsoleCommand::Key(line.parse()?),
            _ => bail!("Unknown command '{}' (type 'help')", line),
        };
        Ok(command)
    }
}

/// Whether the session keeps running after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFlow {
    Continue,
    Quit,
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleReply {
    pub flow: ConsoleFlow,
    pub message: Option<String>,
}

impl ConsoleReply {
    fn say(message: impl Into<String>) -> Self {
        Self {
            flow: ConsoleFlow::Continue,
            message: Some(message.into()),
        }
    }

    fn silent() -> Self {
        Self {
            flow: ConsoleFlow::Continue,
            message: None,
        }
    }
}

/// Console state between lines
#[derive(Debug, Default)]
pub struct Console {
    awaiting_reset_confirmation: bool,
}

impl Console {
    pub fn awaiting_reset_confirmation(&self) -> bool {
        self.awaiting_reset_confirmation
    }

    /// Handle one input line against the session. Never fails: problems are
    /// reported in the reply.
    pub fn handle_line<E, R, X>(&mut self, session: &mut Session<E, R, X>, line: &str) -> ConsoleReply
    where
        E: EditingSurface,
        R: RenderSurface,
        X: ExportSurface,
    {
        if self.awaiting_reset_confirmation {
            self.awaiting_reset_confirmation = false;
            let answer = line.trim().to_ascii_lowercase();
            let confirmed = matches!(answer.as_str(), "y" | "yes");
            return if session.reset(confirmed) {
                ConsoleReply::say("All files restored to their defaults")
            } else {
                ConsoleReply::say("Reset cancelled")
            };
        }

        if line.trim().is_empty() {
            return ConsoleReply::silent();
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => return ConsoleReply::say(format!("{:#}", e)),
        };

        match command {
            ConsoleCommand::Tab(name) => {
                session.select(name);
                ConsoleReply::say(format!("Now editing {}", name))
            }
            ConsoleCommand::Reset => {
                self.awaiting_reset_confirmation = true;
                ConsoleReply::say("Reset all files to their defaults? [y/N]")
            }
            ConsoleCommand::Export => match session.export_current() {
                Ok(()) => ConsoleReply::say(format!("Exported {}", session.current())),
                Err(e) => export_failed(e),
            },
            ConsoleCommand::ExportAll => match session.export_all() {
                Ok(count) => ConsoleReply::say(format!(
                    "Exported {} artifact(s) ({:?})",
                    count,
                    session.exporter_kind()
                )),
                Err(e) => export_failed(e),
            },
            ConsoleCommand::Key(press) => match session.handle_key(&press) {
                Ok(KeyOutcome::Handled { .. }) => {
                    ConsoleReply::say(format!("Exported {}", session.current()))
                }
                Ok(KeyOutcome::Ignored) => ConsoleReply::say(format!(
                    "No binding for that chord (save is {})",
                    session.save_binding()
                )),
                Err(e) => export_failed(e),
            },
            ConsoleCommand::Status => {
                let title = session
                    .last_update()
                    .map(|update| update.metadata.title.as_str())
                    .unwrap_or("-");
                let pending = if session.has_pending_refresh() {
                    ", refresh pending"
                } else {
                    ""
                };
                ConsoleReply::say(format!(
                    "Editing {} | preview \"{}\" | {} refresh(es){}",
                    session.current(),
                    title,
                    session.refresh_count(),
                    pending
                ))
            }
            ConsoleCommand::Help => ConsoleReply::say(HELP),
            ConsoleCommand::Quit => ConsoleReply {
                flow: ConsoleFlow::Quit,
                message: None,
            },
        }
    }
}

fn export_failed(e: Error) -> ConsoleReply {
    log::warn!("Export failed: {:#}", e);
    ConsoleReply::say(format!("Export failed: {:#}", e))
}
