//! Program I/O boundary
//!
//! [`Terminal`] is where `print`, `puts` and `printf` write and where `scanf`
//! reads from. It either forwards to real streams or, like a mock terminal,
//! records everything written so tests and embedding hosts can inspect it.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

enum Output {
    Captured(String),
    Stream(Box<dyn Write>),
}

/// Output sink plus whitespace-tokenized input source
pub struct Terminal {
    output: Output,
    input: Box<dyn BufRead>,
    pending: VecDeque<String>,
}

impl Terminal {
    /// Process standard output and standard input
    pub fn stdio() -> Self {
        Self::with_streams(Box::new(io::stdout()), Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_streams(output: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Terminal {
            output: Output::Stream(output),
            input,
            pending: VecDeque::new(),
        }
    }

    /// Record output in memory; read input from `input`
    pub fn captured(input: impl BufRead + 'static) -> Self {
        Terminal {
            output: Output::Captured(String::new()),
            input: Box::new(input),
            pending: VecDeque::new(),
        }
    }

    /// Write text exactly as given
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        match &mut self.output {
            Output::Captured(buffer) => {
                buffer.push_str(text);
                Ok(())
            }
            Output::Stream(stream) => {
                stream.write_all(text.as_bytes())?;
                stream.flush()
            }
        }
    }

    /// Everything written so far, when capturing
    pub fn captured_output(&self) -> Option<&str> {
        match &self.output {
            Output::Captured(buffer) => Some(buffer),
            Output::Stream(_) => None,
        }
    }

    /// Next whitespace-separated input token, blocking on the source.
    /// `None` means end of input.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    /// Return a token to the front of the input so the next read sees it again
    pub fn unread_token(&mut self, token: String) {
        self.pending.push_front(token);
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::captured(io::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_output() {
        let mut terminal = Terminal::default();
        terminal.write("a").unwrap();
        terminal.write("b\n").unwrap();
        assert_eq!(terminal.captured_output(), Some("ab\n"));
    }

    #[test]
    fn test_tokens_across_lines() {
        let mut terminal = Terminal::captured("12  3.5\n\n  word\n".as_bytes());
        assert_eq!(terminal.next_token().unwrap().as_deref(), Some("12"));
        assert_eq!(terminal.next_token().unwrap().as_deref(), Some("3.5"));
        assert_eq!(terminal.next_token().unwrap().as_deref(), Some("word"));
        assert_eq!(terminal.next_token().unwrap(), None);
    }

    #[test]
    fn test_unread_token_is_read_again() {
        let mut terminal = Terminal::captured("abc 7\n".as_bytes());
        let token = terminal.next_token().unwrap().unwrap();
        terminal.unread_token(token);
        assert_eq!(terminal.next_token().unwrap().as_deref(), Some("abc"));
        assert_eq!(terminal.next_token().unwrap().as_deref(), Some("7"));
    }
}
