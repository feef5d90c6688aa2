//! Console I/O abstraction.
//!
//! Every prompt, diagnostic and menu line goes through [`TerminalIO`], so the
//! readers and the dispatcher can be driven by [`MockTerminal`] in tests
//! without touching the real console.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Abstraction over console I/O for testability.
pub trait TerminalIO: Send + Sync {
    /// Write text to standard output. No newline is appended.
    fn write_out(&self, text: &str) -> io::Result<()>;

    /// Write text to standard error. No newline is appended.
    fn write_err(&self, text: &str) -> io::Result<()>;

    /// Read one raw line from standard input, including its line terminator.
    ///
    /// An empty string means the input stream is closed.
    fn read_line(&self) -> io::Result<String>;
}

/// Real console I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTerminal;

impl TerminalIO for RealTerminal {
    fn write_out(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        err.flush()
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Mock terminal for testing.
///
/// Returns scripted responses in order and records everything written to
/// stdout and stderr. Once the script runs out, reads behave like a closed
/// stream.
#[derive(Debug, Default)]
pub struct MockTerminal {
    responses: Vec<String>,
    /// Index of the next response to return.
    response_index: AtomicUsize,
    out: Mutex<String>,
    err: Mutex<String>,
}

impl Clone for MockTerminal {
    fn clone(&self) -> Self {
        Self {
            responses: self.responses.clone(),
            response_index: AtomicUsize::new(self.response_index.load(Ordering::SeqCst)),
            out: Mutex::new(self.stdout()),
            err: Mutex::new(self.stderr()),
        }
    }
}

impl MockTerminal {
    /// Create a mock terminal that returns a single response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_responses([response.into()])
    }

    /// Create a mock terminal that returns multiple responses in sequence.
    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a mock whose input stream is already closed.
    pub fn eof() -> Self {
        Self::default()
    }

    /// Everything written to stdout so far.
    pub fn stdout(&self) -> String {
        self.out.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Everything written to stderr so far.
    pub fn stderr(&self) -> String {
        self.err.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of lines consumed, counting reads past the end of the script.
    pub fn reads(&self) -> usize {
        self.response_index.load(Ordering::SeqCst)
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.len().saturating_sub(self.reads())
    }
}

impl TerminalIO for MockTerminal {
    fn write_out(&self, text: &str) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdout transcript poisoned"))?;
        out.push_str(text);
        Ok(())
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        let mut err = self
            .err
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stderr transcript poisoned"))?;
        err.push_str(text);
        Ok(())
    }

    fn read_line(&self) -> io::Result<String> {
        let idx = self.response_index.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(idx) {
            // Add newline like real read_line does
            Some(response) => Ok(format!("{}\n", response)),
            None => Ok(String::new()),
        }
    }
}
