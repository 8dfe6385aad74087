//! User-facing reporting and confirmation
//!
//! The destroy flow talks to the operator through this narrow sink so the
//! orchestrator can be exercised with a recording fake.

use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Progress reporting and confirmation prompting.
pub trait Ui: Send + Sync {
    /// Announce a step that is about to run.
    fn step(&self, message: &str);

    /// Informational notice, e.g. a skipped step.
    fn note(&self, message: &str);

    /// Ask the operator a question and return their raw response line.
    fn prompt(&self, message: &str) -> String;
}

/// Terminal implementation writing to stdout and reading from stdin.
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for TerminalUi {
    fn step(&self, message: &str) {
        println!("{} {}", "==>".cyan().bold(), message);
    }

    fn note(&self, message: &str) {
        println!("{}", message.dimmed());
    }

    fn prompt(&self, message: &str) -> String {
        print!("{} ", message.yellow());
        let _ = io::stdout().flush();

        let mut response = String::new();
        let _ = io::stdin().lock().read_line(&mut response);
        response
    }
}
