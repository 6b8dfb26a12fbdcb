//! Output rendering for the read-only commands: tables and JSON on stdout.
//!
//! Log lines go to stderr, so anything printed here stays pipeable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::error::CliError;

/// Color only when stdout is a terminal and `NO_COLOR` is unset.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(data).map_err(|e| CliError::Output(e.to_string()))
}

/// `ready` of `total` devices, green when all are ready.
pub fn readiness_summary(ready: usize, total: usize, color: bool) -> String {
    let line = format!("{ready} of {total} devices ready to migrate");
    if !color {
        line
    } else if ready == total {
        line.green().to_string()
    } else {
        line.yellow().to_string()
    }
}

/// Print to stdout, skipping empty output.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
