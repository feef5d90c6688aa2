//! Operation faults and the captured form kept for later inspection.
//!
//! Operations report failure by returning a [`Fault`]. The dispatcher sorts
//! faults by [`FaultKind`]:
//!
//! | Kind | Raised by | Handling |
//! |------|-----------|----------|
//! | `NotFound` | operation table lookup | reported, discarded |
//! | `Inaccessible` | operation table lookup | reported, discarded |
//! | `BadArgument` | the operation | reported, discarded |
//! | `Runtime` | the operation (error or panic) | reported, retained as [`CapturedError`] |

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::unwind::PanicSite;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Classification of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// No operation is registered under the item's name.
    NotFound,
    /// The operation exists but has been revoked.
    Inaccessible,
    /// The operation was wired up wrongly for this invocation.
    BadArgument,
    /// The operation itself failed.
    Runtime,
}

impl FaultKind {
    /// Whether faults of this kind are kept for the `ERR` command.
    pub fn is_retained(&self) -> bool {
        matches!(self, Self::Runtime)
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "operation not found"),
            Self::Inaccessible => write!(f, "operation inaccessible"),
            Self::BadArgument => write!(f, "bad invocation arguments"),
            Self::Runtime => write!(f, "runtime fault"),
        }
    }
}

/// The error type returned by menu operations.
///
/// Any `std::error::Error` converts into a `Fault` with `?`, recording the
/// error's type name as the fault category:
///
/// ```
/// use menuloop_dispatch::Fault;
///
/// fn parse_quantity(text: &str) -> Result<u32, Fault> {
///     Ok(text.parse::<u32>()?)
/// }
///
/// let fault = parse_quantity("many").unwrap_err();
/// assert_eq!(fault.category(), "ParseIntError");
/// ```
///
/// Like `anyhow::Error`, `Fault` deliberately does not implement
/// `std::error::Error` itself, which is what allows the blanket conversion.
pub struct Fault {
    kind: FaultKind,
    category: String,
    message: String,
    cause: Option<BoxedError>,
    location: Option<String>,
    backtrace: Backtrace,
}

impl Fault {
    /// A runtime fault with a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Runtime, "Fault", message)
    }

    /// A dispatcher-level fault signalling a wiring mistake.
    ///
    /// Reported to the console but not retained for `ERR`.
    pub fn bad_argument(message: impl Into<String>) -> Self {
        Self::new(FaultKind::BadArgument, "BadArgument", message)
    }

    /// A runtime fault wrapping an `anyhow::Error`, keeping its context chain.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        Self {
            kind: FaultKind::Runtime,
            category: "Error".to_string(),
            message: err.to_string(),
            cause: Some(err.into()),
            location: None,
            backtrace: Backtrace::capture(),
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        Self::new(
            FaultKind::NotFound,
            "NotFound",
            format!("no operation named '{}'", name),
        )
    }

    pub(crate) fn inaccessible(name: &str) -> Self {
        Self::new(
            FaultKind::Inaccessible,
            "Inaccessible",
            format!("operation '{}' has been revoked", name),
        )
    }

    /// A runtime fault built from a caught panic payload.
    ///
    /// The site, when the panic hook recorded one, supplies the location
    /// and the backtrace taken before unwinding.
    pub(crate) fn panic(payload: Box<dyn Any + Send>, site: Option<PanicSite>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "operation panicked".to_string()
        };
        let mut fault = Self::new(FaultKind::Runtime, "panic", message);
        if let Some(site) = site {
            fault.location = site.location;
            fault.backtrace = site.backtrace;
        }
        fault
    }

    fn new(kind: FaultKind, category: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.to_string(),
            message: message.into(),
            cause: None,
            location: None,
            backtrace: Backtrace::capture(),
        }
    }

    /// The fault classification.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Short name of the fault's origin, usually the error type name.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The fault message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the underlying causes, outermost first.
    ///
    /// The wrapped error itself is not repeated; its message is
    /// [`message`](Self::message).
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut next = self.cause.as_deref().and_then(|err| err.source());
        while let Some(err) = next {
            causes.push(err.to_string());
            next = err.source();
        }
        causes
    }

    /// Source location of a caught panic.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The backtrace captured when the fault was created, or at the panic
    /// site for caught panics.
    ///
    /// Empty unless backtraces are enabled via `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE`.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self {
            kind: FaultKind::Runtime,
            category: short_type_name::<E>(),
            message: err.to_string(),
            cause: Some(Box::new(err)),
            location: None,
            backtrace: Backtrace::capture(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("kind", &self.kind)
            .field("category", &self.category)
            .field("message", &self.message)
            .field("causes", &self.causes())
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A runtime fault retained by the session for the `ERR` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedError {
    /// Always [`FaultKind::Runtime`] for faults retained by the dispatcher.
    pub kind: FaultKind,
    /// Short name of the fault's origin.
    pub category: String,
    /// The fault message.
    pub message: String,
    /// Underlying cause messages, outermost first.
    pub causes: Vec<String>,
    /// Code of the menu item whose operation failed.
    pub code: String,
    /// Description of the menu item whose operation failed.
    pub description: String,
    /// Where a panicking operation panicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the fault was captured.
    pub at: DateTime<Utc>,
    /// Rendered backtrace, when one was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
}

impl CapturedError {
    /// Capture a fault raised by the item with the given code and description.
    pub fn capture(fault: &Fault, code: &str, description: &str) -> Self {
        let backtrace = match fault.backtrace().status() {
            BacktraceStatus::Captured => Some(fault.backtrace().to_string()),
            _ => None,
        };
        Self {
            kind: fault.kind(),
            category: fault.category().to_string(),
            message: fault.message().to_string(),
            causes: fault.causes(),
            code: code.to_string(),
            description: description.to_string(),
            location: fault.location().map(str::to_string),
            at: Utc::now(),
            backtrace,
        }
    }

    /// Full diagnostic text, as shown by the `ERR` command.
    pub fn detail(&self) -> String {
        let mut out = format!(
            "{}: {}\n  in {} ({}) at {}",
            self.category,
            self.message,
            self.code,
            self.description,
            self.at.to_rfc3339()
        );
        if let Some(location) = &self.location {
            out.push_str("\n  panicked at ");
            out.push_str(location);
        }
        for cause in &self.causes {
            out.push_str("\ncaused by: ");
            out.push_str(cause);
        }
        if let Some(backtrace) = &self.backtrace {
            out.push_str("\nstack backtrace:\n");
            out.push_str(backtrace);
        }
        out
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    #[derive(Debug, thiserror::Error)]
    #[error("could not save")]
    struct SaveFailed(#[source] DiskFull);

    #[test]
    fn from_error_records_type_name() {
        let fault = Fault::from(DiskFull);
        assert_eq!(fault.kind(), FaultKind::Runtime);
        assert_eq!(fault.category(), "DiskFull");
        assert_eq!(fault.message(), "disk full");
        assert_eq!(fault.to_string(), "DiskFull: disk full");
    }

    #[test]
    fn causes_skip_the_wrapped_error() {
        let fault = Fault::from(SaveFailed(DiskFull));
        assert_eq!(fault.message(), "could not save");
        assert_eq!(fault.causes(), vec!["disk full".to_string()]);
    }

    #[test]
    fn anyhow_context_becomes_causes() {
        let err = anyhow::Error::new(DiskFull).context("saving contacts");
        let fault = Fault::from_anyhow(err);
        assert_eq!(fault.category(), "Error");
        assert_eq!(fault.message(), "saving contacts");
        assert_eq!(fault.causes(), vec!["disk full".to_string()]);
    }

    #[test]
    fn panic_payloads() {
        let fault = Fault::panic(Box::new("boom"), None);
        assert_eq!(fault.to_string(), "panic: boom");
        assert_eq!(fault.location(), None);
        let fault = Fault::panic(Box::new(String::from("bang")), None);
        assert_eq!(fault.message(), "bang");
        let fault = Fault::panic(Box::new(42), None);
        assert_eq!(fault.message(), "operation panicked");
    }

    #[test]
    fn panic_site_shows_in_detail() {
        let site = PanicSite {
            location: Some("src/ops.rs:12:5".to_string()),
            backtrace: Backtrace::disabled(),
        };
        let fault = Fault::panic(Box::new("boom"), Some(site));
        assert_eq!(fault.location(), Some("src/ops.rs:12:5"));
        let captured = CapturedError::capture(&fault, "P", "Panic");
        assert_eq!(captured.location.as_deref(), Some("src/ops.rs:12:5"));
        assert!(captured.detail().contains("\n  panicked at src/ops.rs:12:5"));
    }

    #[test]
    fn only_runtime_is_retained() {
        assert!(FaultKind::Runtime.is_retained());
        assert!(!FaultKind::NotFound.is_retained());
        assert!(!FaultKind::Inaccessible.is_retained());
        assert!(!Fault::bad_argument("x").kind().is_retained());
    }

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name::<std::num::ParseIntError>(), "ParseIntError");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }

    #[test]
    fn captured_detail_lists_causes() {
        let fault = Fault::from(SaveFailed(DiskFull));
        let captured = CapturedError::capture(&fault, "S", "Save");
        let detail = captured.detail();
        assert!(detail.starts_with("SaveFailed: could not save\n  in S (Save) at "));
        assert!(detail.contains("\ncaused by: disk full"));
        assert_eq!(captured.to_string(), "SaveFailed: could not save");
    }
}
