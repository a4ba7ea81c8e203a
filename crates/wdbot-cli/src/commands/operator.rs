//! Terminal operator: y/N prompts and fix previews go to stderr so stdout
//! carries only the run report

use std::io::{self, BufRead, Write};
use wdbot_constraint::Operator;

pub struct TerminalOperator<R = io::StdinLock<'static>, W = io::Stderr> {
    input: R,
    output: W,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stderr(),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

/// Anything other than y/yes declines
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl<R: BufRead, W: Write> Operator for TerminalOperator<R, W> {
    fn confirm(&mut self, prompt: &str) -> wdbot_core::Result<bool> {
        write!(self.output, "{} [y/N] ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // stdin closed
            return Ok(false);
        }
        Ok(is_yes(&answer))
    }

    fn show(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", message) {
            tracing::warn!("failed to print fix preview: {}", e);
        }
    }
}
