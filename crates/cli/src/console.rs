//! Line-oriented terminal I/O.

use std::fmt::Display;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads answers from stdin and writes output to stdout.
///
/// Log output goes to stderr, so stdout carries only what the user asked
/// for.
pub struct Console {
    input: Lines<BufReader<Stdin>>,
    out: io::Stdout,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
            out: io::stdout(),
        }
    }

    /// Write one line of output.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// Write a blank line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Ask for one line of input. `None` means stdin was closed.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        self.input.next_line().await
    }

    /// Ask for a field, showing and keeping `current` when the answer is
    /// blank.
    pub async fn prompt_keep(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let label = if current.is_empty() {
            label.to_owned()
        } else {
            format!("{label} [{current}]")
        };
        Ok(self.prompt(&label).await?.map(|answer| {
            if answer.trim().is_empty() {
                current.to_owned()
            } else {
                answer
            }
        }))
    }
}
