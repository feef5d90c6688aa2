//! Per-session dispatcher state.
//!
//! One [`Session`] holds everything the dispatcher remembers between
//! renders and between `run` calls: the sticky default prompt, the last
//! captured runtime fault, the exit finalizer and the optional fault
//! journal. It is owned by a `MenuDispatcher` and survives every run on it.

use std::fmt;
use std::path::PathBuf;

use menuloop_input::EnvReader;

use crate::fault::CapturedError;
use crate::hooks::Finalize;
use crate::journal::FaultJournal;

/// Environment variable overriding the default menu prompt.
pub const PROMPT_VAR: &str = "MENULOOP_PROMPT";

/// Environment variable naming the fault journal file.
pub const FAULT_LOG_VAR: &str = "MENULOOP_FAULT_LOG";

/// Prompt shown above the menu when no override is given.
pub const DEFAULT_PROMPT: &str = "Please select a menu option...";

/// Session settings loadable from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Replacement for [`DEFAULT_PROMPT`].
    pub default_prompt: Option<String>,
    /// Where to journal captured faults.
    pub fault_log: Option<PathBuf>,
}

impl SessionConfig {
    /// Read [`PROMPT_VAR`] and [`FAULT_LOG_VAR`]. Blank values are ignored.
    pub fn from_env(env: &impl EnvReader) -> Self {
        let non_blank = |name: &str| env.var(name).filter(|v| !v.trim().is_empty());
        Self {
            default_prompt: non_blank(PROMPT_VAR),
            fault_log: non_blank(FAULT_LOG_VAR).map(PathBuf::from),
        }
    }
}

/// Dispatcher state shared by every run on one dispatcher.
pub struct Session {
    default_prompt: String,
    last_error: Option<CapturedError>,
    finalizer: Option<Box<dyn Finalize>>,
    journal: Option<FaultJournal>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            default_prompt: DEFAULT_PROMPT.to_string(),
            last_error: None,
            finalizer: None,
            journal: None,
        }
    }
}

impl Session {
    /// A fresh session with the default prompt and no pending error.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session initialised from `config`.
    pub fn from_config(config: SessionConfig) -> Self {
        let mut session = Self::new();
        if let Some(prompt) = config.default_prompt {
            session.set_default_prompt(prompt);
        }
        session.journal = config.fault_log.map(FaultJournal::new);
        session
    }

    /// The prompt shown when a run has no override.
    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    /// Change the sticky default prompt.
    ///
    /// The value is stored as given; a blank prompt renders as a blank line.
    pub fn set_default_prompt(&mut self, prompt: impl Into<String>) {
        self.default_prompt = prompt.into();
    }

    /// The last runtime fault, if one is pending.
    pub fn last_error(&self) -> Option<&CapturedError> {
        self.last_error.as_ref()
    }

    /// Forget any pending fault.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record_error(&mut self, error: CapturedError) {
        if let Some(journal) = &self.journal {
            if let Err(err) = journal.append(&error) {
                log::warn!(
                    "could not write fault journal {}: {}",
                    journal.path().display(),
                    err
                );
            }
        }
        self.last_error = Some(error);
    }

    /// Register the hook run on `X`, replacing any previous one.
    pub fn set_finalizer(&mut self, finalizer: impl Finalize + 'static) {
        self.finalizer = Some(Box::new(finalizer));
    }

    /// Whether a finalizer is registered.
    pub fn has_finalizer(&self) -> bool {
        self.finalizer.is_some()
    }

    /// Run and drop the finalizer, if any.
    pub(crate) fn finalize(&mut self) {
        if let Some(mut finalizer) = self.finalizer.take() {
            finalizer.finalize();
        }
    }

    /// The fault journal, if configured.
    pub fn journal(&self) -> Option<&FaultJournal> {
        self.journal.as_ref()
    }

    /// Set or remove the fault journal.
    pub fn set_journal(&mut self, journal: Option<FaultJournal>) {
        self.journal = journal;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("default_prompt", &self.default_prompt)
            .field("last_error", &self.last_error)
            .field("finalizer", &self.finalizer.is_some())
            .field("journal", &self.journal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Fault;
    use menuloop_input::{MockEnv, RealEnv};
    use serial_test::serial;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn defaults() {
        let session = Session::new();
        assert_eq!(session.default_prompt(), DEFAULT_PROMPT);
        assert!(session.last_error().is_none());
        assert!(!session.has_finalizer());
        assert!(session.journal().is_none());
    }

    #[test]
    fn prompt_is_stored_as_given() {
        let mut session = Session::new();
        session.set_default_prompt("Main menu");
        assert_eq!(session.default_prompt(), "Main menu");
        session.set_default_prompt("");
        assert_eq!(session.default_prompt(), "");
    }

    #[test]
    fn finalizer_runs_once() {
        let count = Rc::new(Cell::new(0));
        let mut session = Session::new();
        let c = Rc::clone(&count);
        session.set_finalizer(move || c.set(c.get() + 1));
        session.finalize();
        session.finalize();
        assert_eq!(count.get(), 1);
        assert!(!session.has_finalizer());
    }

    #[test]
    fn recorded_errors_are_pending_until_cleared() {
        let mut session = Session::new();
        let fault = Fault::msg("boom");
        session.record_error(CapturedError::capture(&fault, "A", "Add"));
        assert_eq!(session.last_error().map(|e| e.message.as_str()), Some("boom"));
        session.clear_error();
        assert!(session.last_error().is_none());
    }

    #[test]
    fn config_from_env() {
        let env = MockEnv::new()
            .with_var(PROMPT_VAR, "Contacts")
            .with_var(FAULT_LOG_VAR, "/tmp/faults.jsonl");
        let session = Session::from_config(SessionConfig::from_env(&env));
        assert_eq!(session.default_prompt(), "Contacts");
        assert_eq!(
            session.journal().map(|j| j.path().to_path_buf()),
            Some(PathBuf::from("/tmp/faults.jsonl"))
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let env = MockEnv::new().with_var(PROMPT_VAR, "  ").with_var(FAULT_LOG_VAR, "");
        assert_eq!(SessionConfig::from_env(&env), SessionConfig::default());
    }

    #[test]
    #[serial]
    fn config_from_real_env() {
        std::env::set_var(PROMPT_VAR, "Real prompt");
        let config = SessionConfig::from_env(&RealEnv);
        std::env::remove_var(PROMPT_VAR);
        assert_eq!(config.default_prompt.as_deref(), Some("Real prompt"));
    }
}
