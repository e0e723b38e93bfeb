//! Pipeline error taxonomy
//!
//! Every failure leaves pipeline state untouched and is surfaced
//! synchronously: as the `Err` of the triggering call and, until read with
//! [`Context::get_error`](crate::Context::get_error), in the context's error
//! channel.

use thiserror::Error;

use crate::render::matrix::MatrixMode;

/// Pipeline errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlError {
    /// Operation issued in a state that does not allow it (bracketing errors)
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// Argument outside its accepted range
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Push on a full matrix or name stack
    #[error("{0} stack overflow")]
    StackOverflow(StackKind),

    /// Pop on an empty matrix or name stack
    #[error("{0} stack underflow")]
    StackUnderflow(StackKind),

    /// Light index outside the light table
    #[error("light index {0} out of range")]
    InvalidLight(usize),

    /// Call of a display list that was never defined
    #[error("display list {0} is not defined")]
    UnknownList(u32),

    /// The render host refused a viewport resize
    #[error("viewport resize to {width}x{height} failed: {reason}")]
    ViewportResize {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Host-provided reason
        reason: String,
    },
}

/// Which bounded stack an overflow or underflow refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// One of the matrix stacks
    Matrix(MatrixMode),
    /// The selection name stack
    Name,
}

impl std::fmt::Display for StackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matrix(mode) => write!(f, "{mode:?} matrix"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Result type for pipeline calls
pub type GlResult<T> = Result<T, GlError>;
