//! Environment abstraction and reader configuration.
//!
//! The attempt budget is process-wide configuration in spirit, but it lives
//! in an explicit [`ReaderConfig`] so each session can own its own copy.

/// Environment variable holding the attempt budget.
pub const ATTEMPTS_VAR: &str = "MENULOOP_ATTEMPTS";

/// Attempts allowed when nothing else is configured.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Abstraction over environment variables.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value.
    fn var(&self, name: &str) -> Option<String>;
}

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: std::collections::HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Settings shared by every typed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    attempts: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

impl ReaderConfig {
    /// Create a configuration with the given attempt budget.
    ///
    /// Values of zero or below reset to [`DEFAULT_ATTEMPTS`].
    pub fn new(attempts: i64) -> Self {
        Self {
            attempts: normalize_attempts(attempts),
        }
    }

    /// Load the configuration from the environment.
    ///
    /// Reads [`ATTEMPTS_VAR`]; missing or unparseable values fall back to
    /// the default.
    pub fn from_env(env: &impl EnvReader) -> Self {
        match env.var(ATTEMPTS_VAR) {
            None => Self::default(),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) => Self::new(n),
                Err(_) => {
                    log::warn!("ignoring {}={:?}: not an integer", ATTEMPTS_VAR, raw);
                    Self::default()
                }
            },
        }
    }

    /// The number of lines a typed read may consume before failing.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Change the attempt budget. Values of zero or below reset to 3.
    pub fn set_attempts(&mut self, attempts: i64) {
        self.attempts = normalize_attempts(attempts);
    }
}

fn normalize_attempts(attempts: i64) -> u32 {
    if attempts > 0 {
        u32::try_from(attempts).unwrap_or(u32::MAX)
    } else {
        DEFAULT_ATTEMPTS
    }
}
