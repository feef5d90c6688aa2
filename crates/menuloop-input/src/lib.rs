//! Validated, retry-bounded console input.
//!
//! `menuloop-input` reads typed values from an interactive console: integers,
//! numbers, booleans, emails, names, digit strings, length-constrained text
//! and pattern-matched text. Every read is wrapped in the same bounded retry
//! loop, and selection prompts are layered on top.
//!
//! # Quick Start
//!
//! ```no_run
//! use menuloop_input::{Selector, ValidatedReader};
//!
//! let reader = ValidatedReader::new();
//! let age = reader.integer_between("How old are you", 0, 130)?;
//! let email = reader.email("Email address")?;
//! let size = Selector::new(&reader).choose_one("Pick a size", ["S", "M", "L"])?;
//! # Ok::<(), menuloop_input::InputError>(())
//! ```
//!
//! # Retry Protocol
//!
//! ```text
//! attempt 1: prompt → line → invalid → "That's not an integer. Please try again!"
//! attempt 2: prompt → line → invalid → "That's not an integer. Please try again!"
//! attempt 3: prompt → line → invalid → "That's not an integer."
//!            └── Err(InputError::ValidationExhausted { kind: Integer })
//! ```
//!
//! The number of attempts comes from [`ReaderConfig`] (default 3).
//!
//! # Testing
//!
//! All console traffic goes through [`TerminalIO`]; tests script input with
//! [`MockTerminal`] and inspect what was written:
//!
//! ```
//! use menuloop_input::{MockTerminal, ValidatedReader};
//!
//! let reader = ValidatedReader::with_terminal(MockTerminal::with_response("yes"));
//! assert!(reader.boolean("Continue?").unwrap());
//! assert_eq!(reader.terminal().stdout(), "\nContinue? ");
//! ```

pub mod env;
mod error;
mod reader;
mod select;
mod terminal;

pub use env::{EnvReader, MockEnv, RealEnv, ReaderConfig};
pub use error::{InputError, ValidationKind};
pub use reader::ValidatedReader;
pub use select::Selector;
pub use terminal::{MockTerminal, RealTerminal, TerminalIO};
