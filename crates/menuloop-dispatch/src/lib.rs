//! Text-menu dispatch for interactive console applications.
//!
//! A [`Menu`] is a list of [`MenuItem`]s, each binding a short code and a
//! description to a zero-argument operation. A [`MenuDispatcher`] renders
//! the menu, reads a selection through a `menuloop_input::ValidatedReader`,
//! invokes the matching operation and loops until the user returns (`R`) or
//! exits (`X`).
//!
//! # Quick Start
//!
//! ```no_run
//! use menuloop_dispatch::{Fault, Menu, MenuDispatcher, MenuItem};
//!
//! fn list() {
//!     println!("(no contacts)");
//! }
//!
//! fn import() -> Result<(), Fault> {
//!     let text = std::fs::read_to_string("contacts.csv")?;
//!     println!("{} lines", text.lines().count());
//!     Ok(())
//! }
//!
//! let mut menu: Menu = Menu::new()
//!     .item(MenuItem::new("l", "List contacts", list))
//!     .item(MenuItem::new("i", "Import contacts", import));
//!
//! let mut dispatcher = MenuDispatcher::from_env();
//! dispatcher.session_mut().set_finalizer(|| println!("bye"));
//! dispatcher.run(&mut menu)?;
//! # Ok::<(), menuloop_dispatch::MenuError>(())
//! ```
//!
//! # Menu Protocol
//!
//! ```text
//! Please select a menu option...
//! L:      List contacts
//! I:      Import contacts
//! ERR:    View Error Details      <- only while a fault is pending
//!
//! R:      Return
//! X:      Exit
//!
//! Enter your selection:
//! ```
//!
//! Selections are case-insensitive. `R` returns to the caller, `X` runs the
//! session finalizer and exits, `ERR` shows the pending fault in full. Any
//! other token selects the first item with that code.
//!
//! # Faults
//!
//! Operations return `Result<T, Fault>`, `anyhow::Result<T>` or `()`. Any
//! `std::error::Error` converts into a [`Fault`] with `?`. Runtime faults and
//! panics are reported, kept in the [`Session`] for `ERR`, and appended to
//! the [`FaultJournal`] when one is configured. They never escape `run`;
//! only console failures do, as [`MenuError`].
//!
//! # Configuration
//!
//! [`MenuDispatcher::from_env`] reads `MENULOOP_ATTEMPTS`,
//! `MENULOOP_PROMPT` and `MENULOOP_FAULT_LOG`.

mod dispatcher;
mod error;
mod fault;
mod hooks;
mod item;
mod journal;
mod session;
mod unwind;

pub use dispatcher::{ExitPolicy, Flow, MenuDispatcher, Outcome};
pub use error::MenuError;
pub use fault::{CapturedError, Fault, FaultKind};
pub use hooks::Finalize;
pub use item::{IntoOperationResult, Menu, MenuItem, Operation, OperationTable};
pub use journal::FaultJournal;
pub use session::{Session, SessionConfig, DEFAULT_PROMPT, FAULT_LOG_VAR, PROMPT_VAR};
