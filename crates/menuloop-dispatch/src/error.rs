use menuloop_input::InputError;
use thiserror::Error;

/// Errors that end a menu loop abnormally.
///
/// Operation faults never surface here; they are reported on the console
/// and, for runtime faults, retained in the session.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Reading the selection failed, usually because input closed.
    #[error(transparent)]
    Input(#[from] InputError),
}

impl MenuError {
    /// Whether the loop ended because input was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Input(InputError::Closed))
    }
}
