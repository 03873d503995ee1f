//! # cs-frame — Editable text core for candlestick
//!
//! A document is a [`Frame`]: an ordered chain of fixed-budget display
//! [`Line`]s that word-wraps as you type and unwraps as you delete, and that
//! serializes back to plain text with only the user's own line breaks.
//!
//! - **[`line`]** — `Line`, one display row: UTF-8 text, codepoint count,
//!   and a `Soft`/`Hard` line end
//! - **[`chain`]** — `Chain<T>`, a never-empty doubly linked sequence in an
//!   arena, with no text knowledge
//! - **[`frame`]** — `Frame`, the wrap/unwrap algorithm, iteration, and
//!   serialization
//! - **[`config`]** — the per-line character budget
//! - **[`utf8`]** — codepoint validation at the input boundary
//! - **[`error`]** — `FrameError`
//!
//! The core is single-threaded and synchronous. It never blocks, and it never
//! talks to the user: errors are returned, diagnostics go to the `log`
//! facade.

pub mod chain;
pub mod config;
pub mod error;
pub mod frame;
pub mod line;
pub mod utf8;

pub use config::{DEFAULT_CHARS_PER_LINE, FrameConfig, TAB_WIDTH};
pub use error::{FrameError, Result};
pub use frame::Frame;
pub use line::{Line, LineEnd};
