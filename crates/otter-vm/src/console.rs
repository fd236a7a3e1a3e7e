//! Console I/O for `READ` and `WRITE`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use otter_core::RuntimeError;

/// Where the VM sends output and takes input from.
pub trait Console {
    /// Emit one printed value.
    fn write_line(&mut self, text: &str) -> Result<(), RuntimeError>;

    /// Next input line, without its line terminator. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, RuntimeError>;
}

/// Standard I/O implementation using stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, text: &str) -> Result<(), RuntimeError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Scripted input and captured output.
#[derive(Debug, Default, Clone)]
pub struct BufferedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console that will answer `READ`s with `lines` in order.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    /// Everything written so far, one entry per `WRITE`.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }
}

impl Console for BufferedConsole {
    fn write_line(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        Ok(self.input.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_console_replays_input_in_order() {
        let mut console = BufferedConsole::with_input(["1", "two"]);
        console.push_input("3.0");
        assert_eq!(console.read_line().unwrap().as_deref(), Some("1"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("3.0"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn buffered_console_captures_output() {
        let mut console = BufferedConsole::new();
        console.write_line("a").unwrap();
        console.write_line("b").unwrap();
        assert_eq!(console.into_output(), vec!["a", "b"]);
    }
}
