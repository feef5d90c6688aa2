//! Retry-bounded typed console reads.
//!
//! Every typed read follows the same protocol: prompt, read one trimmed
//! line, validate it, and either return the value or print a diagnostic and
//! try again. After the configured number of attempts the read fails with
//! [`InputError::ValidationExhausted`]. The diagnostic printed after the
//! final attempt omits the "try again" hint.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::env::ReaderConfig;
use crate::error::{InputError, ValidationKind};
use crate::terminal::{RealTerminal, TerminalIO};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,6}$").expect("email pattern is valid")
});
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("name pattern is valid"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("digit pattern is valid"));

/// Prompt used when the caller supplies an empty one.
const FALLBACK_PROMPT: &str = "Input requested";

/// Why a single line was rejected.
///
/// The hint is only shown while attempts remain.
struct Rejection {
    problem: &'static str,
    hint: String,
}

impl Rejection {
    fn new(problem: &'static str, hint: impl Into<String>) -> Self {
        Self {
            problem,
            hint: hint.into(),
        }
    }

    fn retry(problem: &'static str) -> Self {
        Self::new(problem, "Please try again!")
    }
}

/// Reads validated values from a console.
///
/// # Example
///
/// ```
/// use menuloop_input::{MockTerminal, ValidatedReader};
///
/// let reader = ValidatedReader::with_terminal(MockTerminal::with_responses(["abc", "42"]));
/// let age = reader.integer_between("Age", 0, 130).unwrap();
/// assert_eq!(age, 42);
/// ```
#[derive(Debug)]
pub struct ValidatedReader<T: TerminalIO = RealTerminal> {
    terminal: Arc<T>,
    config: ReaderConfig,
}

impl ValidatedReader<RealTerminal> {
    /// Create a reader over the real console with default configuration.
    pub fn new() -> Self {
        Self::with_terminal(RealTerminal)
    }
}

impl Default for ValidatedReader<RealTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the terminal, so transcripts and script position are common.
impl<T: TerminalIO> Clone for ValidatedReader<T> {
    fn clone(&self) -> Self {
        Self {
            terminal: Arc::clone(&self.terminal),
            config: self.config,
        }
    }
}

impl<T: TerminalIO> ValidatedReader<T> {
    /// Create a reader over a custom terminal.
    pub fn with_terminal(terminal: T) -> Self {
        Self::with_shared_terminal(Arc::new(terminal))
    }

    /// Create a reader over a terminal shared with other components.
    pub fn with_shared_terminal(terminal: Arc<T>) -> Self {
        Self {
            terminal,
            config: ReaderConfig::default(),
        }
    }

    /// Replace the reader configuration.
    pub fn config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// The underlying terminal.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// The number of lines a typed read may consume.
    pub fn attempts(&self) -> u32 {
        self.config.attempts()
    }

    /// Change the attempt budget. Values of zero or below reset to 3.
    pub fn set_attempts(&mut self, attempts: i64) {
        self.config.set_attempts(attempts);
    }

    /// Write a line to standard output.
    pub fn say(&self, text: &str) -> Result<(), InputError> {
        self.terminal.write_out(text)?;
        self.terminal.write_out("\n")?;
        Ok(())
    }

    /// Write a line to standard error.
    pub fn complain(&self, text: &str) -> Result<(), InputError> {
        self.terminal.write_err(text)?;
        self.terminal.write_err("\n")?;
        Ok(())
    }

    /// Prompt for and read one line of text, trimmed.
    ///
    /// The prompt gets `": "` appended when it ends in a letter or digit and
    /// `" "` otherwise. This read never fails validation; it only fails when
    /// the console itself does.
    pub fn read_line(&self, prompt: &str) -> Result<String, InputError> {
        let prompt = match prompt.trim() {
            "" => FALLBACK_PROMPT,
            trimmed => trimmed,
        };
        let separator = match prompt.chars().last() {
            Some(c) if c.is_alphanumeric() => ": ",
            _ => " ",
        };
        self.terminal.write_out(&format!("\n{}{}", prompt, separator))?;

        let line = self.terminal.read_line()?;
        if line.is_empty() {
            return Err(InputError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Prompt and wait for any line, discarding it.
    pub fn pause(&self, prompt: &str) -> Result<(), InputError> {
        self.read_line(prompt).map(|_| ())
    }

    /// Read a line of exactly `length` characters.
    pub fn read_exact_length(&self, prompt: &str, length: usize) -> Result<String, InputError> {
        self.retry(prompt, ValidationKind::TextLength, |line| {
            if line.chars().count() == length {
                Ok(line.to_string())
            } else {
                Err(Rejection::new(
                    "Invalid text length!",
                    format!("Text must have {} character(s)!", length),
                ))
            }
        })
    }

    /// Read a line whose length lies within the given bounds, in either order.
    pub fn read_length_between(
        &self,
        prompt: &str,
        between: usize,
        and: usize,
    ) -> Result<String, InputError> {
        let (lo, hi) = ordered(between, and);
        self.retry(prompt, ValidationKind::TextLength, |line| {
            let len = line.chars().count();
            if (lo..=hi).contains(&len) {
                Ok(line.to_string())
            } else {
                Err(Rejection::new(
                    "Invalid text length!",
                    format!("Text length must be between {} and {}.", lo, hi),
                ))
            }
        })
    }

    /// Read any 32-bit integer.
    pub fn integer(&self, prompt: &str) -> Result<i32, InputError> {
        self.integer_between(prompt, i32::MIN, i32::MAX)
    }

    /// Read an integer within the given inclusive bounds, in either order.
    pub fn integer_between(&self, prompt: &str, between: i32, and: i32) -> Result<i32, InputError> {
        let (lo, hi) = ordered(between, and);
        self.retry(prompt, ValidationKind::Integer, |line| {
            let value: i32 = line
                .parse()
                .map_err(|_| Rejection::retry("That's not an integer."))?;
            if (lo..=hi).contains(&value) {
                Ok(value)
            } else {
                Err(Rejection::new(
                    "Integer out of range.",
                    format!("Please enter an integer between {} and {}.", lo, hi),
                ))
            }
        })
    }

    /// Read any finite number.
    pub fn real(&self, prompt: &str) -> Result<f64, InputError> {
        self.real_between(prompt, f64::MIN, f64::MAX)
    }

    /// Read a number within the given inclusive bounds, in either order.
    ///
    /// `NaN` never lies within any range and is rejected as out of range.
    pub fn real_between(&self, prompt: &str, between: f64, and: f64) -> Result<f64, InputError> {
        let (lo, hi) = ordered(between, and);
        self.retry(prompt, ValidationKind::Real, |line| {
            let value: f64 = line
                .parse()
                .map_err(|_| Rejection::retry("That's not a number."))?;
            if (lo..=hi).contains(&value) {
                Ok(value)
            } else {
                Err(Rejection::new(
                    "Number out of range.",
                    format!("Please enter a number between {} and {}.", lo, hi),
                ))
            }
        })
    }

    /// Read a boolean.
    ///
    /// `true`, `t`, `y` and `yes` map to `true`; `false`, `f`, `n` and `no`
    /// map to `false`. Matching is case-insensitive.
    pub fn boolean(&self, prompt: &str) -> Result<bool, InputError> {
        self.retry(prompt, ValidationKind::Boolean, |line| {
            match line.to_uppercase().as_str() {
                "TRUE" | "T" | "Y" | "YES" => Ok(true),
                "FALSE" | "F" | "N" | "NO" => Ok(false),
                _ => Err(Rejection::retry("Not a valid boolean.")),
            }
        })
    }

    /// Read an email address. The result is lowercased.
    pub fn email(&self, prompt: &str) -> Result<String, InputError> {
        self.retry(prompt, ValidationKind::Email, |line| {
            let email = line.to_lowercase();
            if EMAIL.is_match(&email) {
                Ok(email)
            } else {
                Err(Rejection::retry("Invalid email format."))
            }
        })
    }

    /// Read a name made only of the letters A-Z in any case.
    ///
    /// The result is capitalized: first letter upper case, the rest lower.
    pub fn name(&self, prompt: &str) -> Result<String, InputError> {
        self.retry(prompt, ValidationKind::Name, |line| {
            if NAME.is_match(line) {
                Ok(capitalize(line))
            } else {
                Err(Rejection::retry("Invalid name format."))
            }
        })
    }

    /// Read a string of digits of any length.
    pub fn digits(&self, prompt: &str) -> Result<String, InputError> {
        self.retry(prompt, ValidationKind::Digits, |line| {
            if DIGITS.is_match(line) {
                Ok(line.to_string())
            } else {
                Err(Rejection::retry("Invalid number format."))
            }
        })
    }

    /// Read a string of exactly `length` digits.
    ///
    /// Fails immediately with [`InputError::InvalidLength`] if `length` is 0.
    pub fn digits_exact(&self, prompt: &str, length: usize) -> Result<String, InputError> {
        if length < 1 {
            return Err(InputError::InvalidLength(
                "length must be greater than zero".to_string(),
            ));
        }
        self.retry(prompt, ValidationKind::Digits, |line| {
            if !DIGITS.is_match(line) {
                Err(Rejection::retry("Invalid number format."))
            } else if line.len() != length {
                Err(Rejection::new(
                    "Invalid number length.",
                    format!("Please enter a number with {} digit(s)!", length),
                ))
            } else {
                Ok(line.to_string())
            }
        })
    }

    /// Read a string of digits whose length lies within the given bounds.
    ///
    /// Bounds may be given in either order; both must be at least 1.
    pub fn digits_between(
        &self,
        prompt: &str,
        between: usize,
        and: usize,
    ) -> Result<String, InputError> {
        let (lo, hi) = ordered(between, and);
        if lo < 1 {
            return Err(InputError::InvalidLength(
                "length boundaries must be greater than zero".to_string(),
            ));
        }
        self.retry(prompt, ValidationKind::Digits, |line| {
            if !DIGITS.is_match(line) {
                Err(Rejection::retry("Invalid number format."))
            } else if !(lo..=hi).contains(&line.len()) {
                Err(Rejection::new(
                    "Invalid number length.",
                    format!("Digits must be between {} and {}.", lo, hi),
                ))
            } else {
                Ok(line.to_string())
            }
        })
    }

    /// Read a line that matches `pattern` in full.
    ///
    /// Fails with [`InputError::BadPattern`] before prompting if the pattern
    /// does not compile.
    pub fn matching(&self, prompt: &str, pattern: &str) -> Result<String, InputError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            InputError::BadPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        self.retry(prompt, ValidationKind::Pattern, |line| {
            if regex.is_match(line) {
                Ok(line.to_string())
            } else {
                Err(Rejection::retry("Invalid string format."))
            }
        })
    }

    fn retry<V>(
        &self,
        prompt: &str,
        kind: ValidationKind,
        mut validate: impl FnMut(&str) -> Result<V, Rejection>,
    ) -> Result<V, InputError> {
        let attempts = self.attempts();
        for remaining in (0..attempts).rev() {
            let line = self.read_line(prompt)?;
            match validate(&line) {
                Ok(value) => return Ok(value),
                Err(rejection) if remaining > 0 => {
                    self.complain(&format!("{} {}", rejection.problem, rejection.hint))?
                }
                Err(rejection) => self.complain(rejection.problem)?,
            }
        }
        log::warn!("{} read exhausted after {} attempt(s)", kind, attempts);
        Err(InputError::exhausted(kind))
    }
}

fn ordered<N: PartialOrd>(a: N, b: N) -> (N, N) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
