//! The menu loop.
//!
//! Each cycle renders the menu, reads a selection and dispatches it:
//!
//! ```text
//! Rendering -> AwaitingSelection -> Dispatching -> (Rendering | return)
//! ```
//!
//! Selection tokens are upper-cased and checked in a fixed order: `R` and
//! `X` first, then `ERR` while a fault is pending, then the item codes in
//! menu order. Item codes are never checked against the reserved tokens, so
//! an item coded `R` is simply unreachable.
//!
//! Operation faults stop at the dispatcher. Lookup failures and
//! `BadArgument` faults are reported and dropped; runtime faults (including
//! panics) are reported, journaled and kept in the session for `ERR`.

use std::process;

use menuloop_input::{EnvReader, RealEnv, RealTerminal, ReaderConfig, TerminalIO, ValidatedReader};

use crate::error::MenuError;
use crate::fault::{CapturedError, Fault, FaultKind};
use crate::item::Menu;
use crate::session::{Session, SessionConfig};

const SELECTION_PROMPT: &str = "Enter your selection";

/// What happens when the user selects `X`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Run the finalizer, say goodbye and exit the process with status 0.
    #[default]
    Terminate,
    /// Run the finalizer, say goodbye and return [`Flow::Exited`].
    Report,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The user selected `R`.
    Returned,
    /// The user selected `X` under [`ExitPolicy::Report`].
    Exited,
    /// A one-shot run dispatched an item.
    Dispatched,
}

/// Result of a one-shot run that hands back the operation's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<V> {
    /// The operation returned a value.
    Completed(V),
    /// The operation failed at runtime; the fault is also pending in the session.
    Faulted(CapturedError),
    /// The operation could not be invoked, or reported a wiring mistake.
    Rejected(FaultKind),
    /// The user selected `R`.
    Returned,
    /// The user selected `X` under [`ExitPolicy::Report`].
    Exited,
}

impl<V> Outcome<V> {
    /// Returns true if the operation returned a value.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Returns true if an item was dispatched, whatever the result.
    pub fn is_dispatched(&self) -> bool {
        matches!(
            self,
            Outcome::Completed(_) | Outcome::Faulted(_) | Outcome::Rejected(_)
        )
    }

    /// The operation's value, if it completed.
    pub fn value(self) -> Option<V> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    fn flow(&self) -> Flow {
        match self {
            Outcome::Returned => Flow::Returned,
            Outcome::Exited => Flow::Exited,
            _ => Flow::Dispatched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Continuous,
    Once,
}

enum Selection {
    Item(usize),
    Return,
    Exit,
}

/// Renders menus, reads selections and invokes operations.
///
/// # Example
///
/// ```
/// use menuloop_dispatch::{ExitPolicy, Flow, Menu, MenuDispatcher, MenuItem};
/// use menuloop_input::MockTerminal;
///
/// let mut added = 0;
/// let mut menu: Menu = Menu::new().item(MenuItem::new("a", "Add", || added += 1));
///
/// let terminal = MockTerminal::with_responses(["a", "", "r"]);
/// let mut dispatcher = MenuDispatcher::with_terminal(terminal).exit_policy(ExitPolicy::Report);
/// assert_eq!(dispatcher.run(&mut menu).unwrap(), Flow::Returned);
/// drop(menu);
/// assert_eq!(added, 1);
/// ```
#[derive(Debug)]
pub struct MenuDispatcher<T: TerminalIO = RealTerminal> {
    reader: ValidatedReader<T>,
    session: Session,
    exit_policy: ExitPolicy,
}

impl MenuDispatcher<RealTerminal> {
    /// A dispatcher on the process console with default settings.
    pub fn new() -> Self {
        Self::with_reader(ValidatedReader::new())
    }

    /// A dispatcher on the process console configured from the environment.
    pub fn from_env() -> Self {
        Self::configured(&RealEnv)
    }

    /// A dispatcher on the process console configured from `env`.
    pub fn configured(env: &impl EnvReader) -> Self {
        let reader = ValidatedReader::new().config(ReaderConfig::from_env(env));
        Self::with_reader(reader).with_session(Session::from_config(SessionConfig::from_env(env)))
    }
}

impl Default for MenuDispatcher<RealTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TerminalIO> MenuDispatcher<T> {
    /// A dispatcher talking to `terminal`.
    pub fn with_terminal(terminal: T) -> Self {
        Self::with_reader(ValidatedReader::with_terminal(terminal))
    }

    /// A dispatcher reading through `reader`.
    ///
    /// Clones of the reader share its terminal, so operations can prompt
    /// through the same console as the menu.
    pub fn with_reader(reader: ValidatedReader<T>) -> Self {
        Self {
            reader,
            session: Session::new(),
            exit_policy: ExitPolicy::default(),
        }
    }

    /// Replace the session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Set what `X` does.
    pub fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session state, for changing the prompt or finalizer between runs.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The reader used for selections.
    pub fn reader(&self) -> &ValidatedReader<T> {
        &self.reader
    }

    /// Mutable reader, for changing the attempt budget.
    pub fn reader_mut(&mut self) -> &mut ValidatedReader<T> {
        &mut self.reader
    }

    /// Show the menu until the user selects `R` or `X`.
    pub fn run<V>(&mut self, menu: &mut Menu<'_, V>) -> Result<Flow, MenuError> {
        self.run_with_prompt("", menu)
    }

    /// Like [`run`](Self::run), showing `prompt` instead of the session default.
    ///
    /// The override applies to this run only.
    pub fn run_with_prompt<V>(
        &mut self,
        prompt: &str,
        menu: &mut Menu<'_, V>,
    ) -> Result<Flow, MenuError> {
        self.cycle(Mode::Continuous, prompt, menu).map(|outcome| outcome.flow())
    }

    /// Show the menu until one item has been dispatched, or `R`/`X`.
    pub fn run_once<V>(&mut self, menu: &mut Menu<'_, V>) -> Result<Flow, MenuError> {
        self.run_once_with_prompt("", menu)
    }

    /// Like [`run_once`](Self::run_once) with a one-time prompt override.
    pub fn run_once_with_prompt<V>(
        &mut self,
        prompt: &str,
        menu: &mut Menu<'_, V>,
    ) -> Result<Flow, MenuError> {
        self.cycle(Mode::Once, prompt, menu).map(|outcome| outcome.flow())
    }

    /// Dispatch one item and hand back what its operation produced.
    pub fn run_once_and_return<V>(
        &mut self,
        menu: &mut Menu<'_, V>,
    ) -> Result<Outcome<V>, MenuError> {
        self.run_once_and_return_with_prompt("", menu)
    }

    /// Like [`run_once_and_return`](Self::run_once_and_return) with a
    /// one-time prompt override.
    pub fn run_once_and_return_with_prompt<V>(
        &mut self,
        prompt: &str,
        menu: &mut Menu<'_, V>,
    ) -> Result<Outcome<V>, MenuError> {
        self.cycle(Mode::Once, prompt, menu)
    }

    fn cycle<V>(
        &mut self,
        mode: Mode,
        prompt: &str,
        menu: &mut Menu<'_, V>,
    ) -> Result<Outcome<V>, MenuError> {
        loop {
            let index = match self.select(prompt, menu)? {
                Selection::Item(index) => index,
                Selection::Return => return Ok(Outcome::Returned),
                Selection::Exit => return Ok(Outcome::Exited),
            };
            let description = menu.items()[index].description().to_string();
            let outcome = self.dispatch(menu, index)?;
            match mode {
                Mode::Once => return Ok(outcome),
                Mode::Continuous => self
                    .reader
                    .pause(&format!("{} completed!\nPress ENTER to continue...", description))?,
            }
        }
    }

    fn render<V>(&self, prompt: &str, menu: &Menu<'_, V>) -> Result<(), MenuError> {
        let prompt = if prompt.trim().is_empty() {
            self.session.default_prompt()
        } else {
            prompt
        };
        self.reader.say(&format!("\n{}", prompt))?;
        for item in menu.items() {
            self.reader
                .say(&format!("{}:\t{}", item.code(), item.description()))?;
        }
        if self.session.last_error().is_some() {
            self.reader.say("ERR:\tView Error Details")?;
        }
        self.reader.say("\nR:\tReturn")?;
        self.reader.say("X:\tExit")?;
        Ok(())
    }

    fn select<V>(&mut self, prompt: &str, menu: &Menu<'_, V>) -> Result<Selection, MenuError> {
        'render: loop {
            self.render(prompt, menu)?;
            loop {
                let option = self.reader.read_line(SELECTION_PROMPT)?.to_uppercase();
                match option.as_str() {
                    "R" => {
                        self.reader.say("")?;
                        log::info!("menu returned to caller");
                        return Ok(Selection::Return);
                    }
                    "X" => return self.exit(),
                    "ERR" if self.session.last_error().is_some() => {
                        self.show_error()?;
                        continue 'render;
                    }
                    _ => {}
                }
                match menu.position(&option) {
                    Some(index) => {
                        log::debug!("selected {}", option);
                        return Ok(Selection::Item(index));
                    }
                    None => {
                        log::debug!("no menu item for {:?}", option);
                        self.reader.complain("No such menu!")?;
                    }
                }
            }
        }
    }

    fn show_error(&self) -> Result<(), MenuError> {
        if let Some(error) = self.session.last_error() {
            self.reader.say("\n*****Error Details*****")?;
            self.reader.say(&error.detail())?;
            self.reader.say("")?;
        }
        Ok(())
    }

    fn exit(&mut self) -> Result<Selection, MenuError> {
        self.session.finalize();
        self.reader.say("\nGoodbye!\n")?;
        log::info!("menu exit requested");
        match self.exit_policy {
            ExitPolicy::Terminate => process::exit(0),
            ExitPolicy::Report => Ok(Selection::Exit),
        }
    }

    fn dispatch<V>(
        &mut self,
        menu: &mut Menu<'_, V>,
        index: usize,
    ) -> Result<Outcome<V>, MenuError> {
        let item = &menu.items()[index];
        let code = item.code().to_string();
        let description = item.description().to_string();

        self.reader.say(&format!("\n*****{}*****", description))?;
        self.session.clear_error();
        log::debug!("dispatching {} ({})", code, description);

        match menu.invoke(index) {
            Ok(value) => Ok(Outcome::Completed(value)),
            Err(fault) => self.report(&fault, &code, &description),
        }
    }

    fn report<V>(
        &mut self,
        fault: &Fault,
        code: &str,
        description: &str,
    ) -> Result<Outcome<V>, MenuError> {
        if fault.kind().is_retained() {
            self.reader.complain("An error has occurred!")?;
            self.reader.complain(&fault.to_string())?;
            let captured = CapturedError::capture(fault, code, description);
            log::error!("{} failed: {}", code, captured);
            self.session.record_error(captured.clone());
            return Ok(Outcome::Faulted(captured));
        }
        let diagnostic = match fault.kind() {
            FaultKind::NotFound => "Operation does not exist!",
            FaultKind::Inaccessible => "Operation is inaccessible!",
            _ => "Error: Check operation arguments and/or receiver!",
        };
        self.reader.complain(diagnostic)?;
        log::debug!("{} rejected: {}", code, fault);
        Ok(Outcome::Rejected(fault.kind()))
    }
}
