//! Error types for console input.

use std::fmt;
use std::io;

/// The kind of validation a typed read performs.
///
/// Carried by [`InputError::ValidationExhausted`] so callers can tell which
/// read ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Line length, exact or ranged.
    TextLength,
    /// Signed integer, optionally bounded.
    Integer,
    /// Floating point number, optionally bounded.
    Real,
    /// Yes/no style boolean.
    Boolean,
    /// Email address.
    Email,
    /// Letters-only name.
    Name,
    /// Digits-only string, optionally length-constrained.
    Digits,
    /// Arbitrary regular expression.
    Pattern,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextLength => write!(f, "text length"),
            Self::Integer => write!(f, "integer"),
            Self::Real => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Email => write!(f, "email"),
            Self::Name => write!(f, "name"),
            Self::Digits => write!(f, "digit string"),
            Self::Pattern => write!(f, "pattern"),
        }
    }
}

/// Errors that can occur while reading console input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Every allowed attempt produced an invalid line.
    #[error("Invalid {kind} input: attempts exhausted.")]
    ValidationExhausted { kind: ValidationKind },

    /// The caller supplied a malformed regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A selection was requested from an empty set of choices.
    #[error("No choices available to select from.")]
    EmptyChoices,

    /// A length constraint was not usable.
    #[error("Invalid length constraint: {0}")]
    InvalidLength(String),

    /// The input stream was closed.
    #[error("Input stream closed.")]
    Closed,

    /// Reading or writing the console failed.
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl InputError {
    /// Create an exhaustion error for the given kind.
    pub fn exhausted(kind: ValidationKind) -> Self {
        Self::ValidationExhausted { kind }
    }

    /// The validation kind, if this is an exhaustion error.
    pub fn kind(&self) -> Option<ValidationKind> {
        match self {
            Self::ValidationExhausted { kind } => Some(*kind),
            _ => None,
        }
    }
}
