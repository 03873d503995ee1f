//! Errors reported by the editing core.
//!
//! The core never logs to the user or retries. Every failure is returned to
//! the immediate caller (the input layer), which decides whether to drop the
//! keystroke or surface a message. Structural misuse (deleting the last line,
//! unbalanced iteration) is ruled out by the API and has no variant here.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Result alias used throughout `cs-frame`.
pub type Result<T> = std::result::Result<T, FrameError>;

#[derive(Debug, Error)]
pub enum FrameError {
    /// Input bytes are not valid UTF-8. `offset` is the byte index of the
    /// first byte that could not be decoded.
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// A single-character insert was handed zero or several codepoints.
    #[error("expected exactly one codepoint, got {len} bytes")]
    NotOneCodepoint { len: usize },

    /// Line text never contains NUL.
    #[error("NUL is not allowed in line text")]
    EmbeddedNul,

    /// Growing a line (or the line chain) failed. Nothing was modified.
    #[error("out of memory while growing the text buffer")]
    Alloc(#[from] TryReserveError),

    /// The per-line character budget must be at least one.
    #[error("invalid characters-per-line budget: {0}")]
    InvalidBudget(usize),

    #[error(transparent)]
    Io(#[from] io::Error),
}
