use thiserror::Error;

/// Errors raised by canvas operations that touch the outside world
/// (encoding, fonts, files).
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Invalid font data: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when an operation is not allowed in the current
/// interaction state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// A text reply arrived but no prompt is outstanding
    #[error("No text prompt is outstanding (state: {state})")]
    NotAwaitingText { state: &'static str },

    /// The operation would interfere with an unfinished interaction
    #[error("Cannot {action} while {state}")]
    Busy {
        action: &'static str,
        state: &'static str,
    },

    /// Attempted to move between incompatible states
    #[error("Cannot transition from {from} to {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },
}

pub type CanvasResult<T> = Result<T, CanvasError>;
