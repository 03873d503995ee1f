//! One display row of text.
//!
//! A `Line` is an append-only-at-the-end UTF-8 buffer plus two pieces of
//! bookkeeping the frame needs for wrapping:
//!
//! - **`char_count`** — codepoints, not bytes. The per-line budget is a
//!   character budget, so `"中文"` (6 bytes) counts as 2.
//! - **`end`** — how the row terminates: [`LineEnd::Hard`] when the user
//!   pressed Enter, [`LineEnd::Soft`] otherwise.
//!
//! Text only ever changes at the end of the line: one codepoint pushed,
//! one codepoint popped, or a whole fragment moved in or out by the frame's
//! wrap logic. Growth uses `try_reserve`, so an allocation failure leaves
//! the line exactly as it was.

use std::fmt;

use crate::error::{FrameError, Result};
use crate::utf8;

/// How a line terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnd {
    /// Not yet terminated, or terminated by automatic wrapping.
    #[default]
    Soft,
    /// Terminated by the user (Enter). Never merged automatically.
    Hard,
}

/// One display row: UTF-8 text, its codepoint count, and its line end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
    char_count: usize,
    end: LineEnd,
    /// A soft wrap removed the space that separated this line from the next
    /// one. Serialization writes it back; unwrapping re-inserts it.
    elided_space: bool,
}

impl Line {
    /// An empty, soft-terminated line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            char_count: 0,
            end: LineEnd::Soft,
            elided_space: false,
        }
    }

    /// A line seeded with `text`.
    ///
    /// # Errors
    ///
    /// See [`insert_str`](Self::insert_str).
    pub fn from_text(text: &str) -> Result<Self> {
        let mut line = Self::new();
        line.insert_str(text)?;
        Ok(line)
    }

    // -- Accessors ----------------------------------------------------------

    /// The line's text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Raw byte content, `byte_len()` bytes long.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &[u8] {
        self.text.as_bytes()
    }

    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Number of codepoints on the line.
    #[inline]
    #[must_use]
    pub const fn char_count(&self) -> usize {
        self.char_count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> LineEnd {
        self.end
    }

    #[inline]
    #[must_use]
    pub const fn is_hard(&self) -> bool {
        matches!(self.end, LineEnd::Hard)
    }

    /// `true` if a soft wrap swallowed the space after this line.
    #[inline]
    #[must_use]
    pub const fn elided_space(&self) -> bool {
        self.elided_space
    }

    pub(crate) fn set_end(&mut self, end: LineEnd) {
        self.end = end;
        if end == LineEnd::Hard {
            self.elided_space = false;
        }
    }

    pub(crate) fn clear_elided_space(&mut self) {
        self.elided_space = false;
    }

    // -- Editing ------------------------------------------------------------

    /// Append one codepoint given as raw UTF-8 bytes (1–4 bytes).
    ///
    /// # Errors
    ///
    /// Rejects malformed input ([`FrameError::InvalidUtf8`],
    /// [`FrameError::NotOneCodepoint`]), NUL, and allocation failure. The
    /// line is unchanged on error.
    pub fn insert_char(&mut self, bytes: &[u8]) -> Result<()> {
        let ch = utf8::decode_one(bytes)?;
        self.push(ch)
    }

    /// Append one codepoint.
    ///
    /// # Errors
    ///
    /// [`FrameError::EmbeddedNul`] for `'\0'`, [`FrameError::Alloc`] if the
    /// buffer cannot grow. The line is unchanged on error.
    pub fn push(&mut self, ch: char) -> Result<()> {
        if ch == '\0' {
            return Err(FrameError::EmbeddedNul);
        }
        self.text.try_reserve(ch.len_utf8())?;
        self.text.push(ch);
        self.char_count += 1;
        Ok(())
    }

    /// Append every codepoint of `text`, in order.
    ///
    /// All-or-nothing: the NUL check and the allocation happen before any
    /// byte is appended.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn insert_str(&mut self, text: &str) -> Result<()> {
        if text.contains('\0') {
            return Err(FrameError::EmbeddedNul);
        }
        self.text.try_reserve(text.len())?;
        for ch in text.chars() {
            self.text.push(ch);
            self.char_count += 1;
        }
        Ok(())
    }

    /// Remove the last codepoint and return it. `None` on an empty line.
    ///
    /// Walks back over continuation bytes (`10xxxxxx`) to the byte that
    /// starts the final codepoint and truncates there, so a multi-byte
    /// character always goes as a whole.
    pub fn delete_last_char(&mut self) -> Option<char> {
        let bytes = self.text.as_bytes();
        let mut cut = bytes.len().checked_sub(1)?;
        while cut > 0 && utf8::is_continuation(bytes[cut]) {
            cut -= 1;
        }
        let removed = self.text[cut..].chars().next();
        self.text.truncate(cut);
        self.char_count -= 1;
        removed
    }

    // -- Wrap support -------------------------------------------------------

    /// Byte index of the last space that can act as a wrap point.
    ///
    /// A space in the first column does not count: breaking there would
    /// leave an empty line behind.
    pub(crate) fn wrap_point(&self) -> Option<usize> {
        self.text.bytes().rposition(|b| b == b' ').filter(|&i| i > 0)
    }

    /// Text after the wrap point at byte `at`.
    pub(crate) fn fragment_after(&self, at: usize) -> &str {
        &self.text[at + 1..]
    }

    /// Cut the line at the space at byte `at`: the space and everything
    /// after it are dropped, and the line remembers the elided space.
    pub(crate) fn break_at(&mut self, at: usize) {
        debug_assert_eq!(self.text.as_bytes()[at], b' ');
        let dropped = self.text[at..].chars().count();
        self.text.truncate(at);
        self.char_count -= dropped;
        self.elided_space = true;
    }

    /// Make room for `additional` more bytes.
    ///
    /// # Errors
    ///
    /// [`FrameError::Alloc`]; the line is unchanged on error.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        self.text.try_reserve(additional)?;
        Ok(())
    }

    /// Append `next` onto this line, restoring the elided space between them
    /// if there was one. Takes over `next`'s line end. Reserve first with
    /// [`try_reserve`](Self::try_reserve) to keep this from allocating.
    pub(crate) fn absorb(&mut self, next: Self) {
        let gap = usize::from(self.elided_space);
        if self.elided_space {
            self.text.push(' ');
        }
        self.text.push_str(&next.text);
        self.char_count += next.char_count + gap;
        self.end = next.end;
        self.elided_space = next.elided_space;
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
