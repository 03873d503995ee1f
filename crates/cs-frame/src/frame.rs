//! Frame — the document as a chain of word-wrapped lines.
//!
//! A `Frame` owns every [`Line`] of the document in display order and edits
//! only the last one (the *current* line). Typing past the character budget
//! wraps the trailing partial word onto a new line; deleting it back
//! unwraps. Line ends record which boundaries the user made (Enter →
//! [`LineEnd::Hard`]) and which the wrapper made ([`LineEnd::Soft`]), so
//! [`Frame::write`] can reproduce the user's text with only the user's line
//! breaks.
//!
//! # Wrapping
//!
//! When the current line holds exactly `chars_per_line` codepoints:
//!
//! - a **space** is appended anyway (one trailing space over budget) and a
//!   new empty line begins;
//! - any **other character** triggers a soft wrap: the text after the last
//!   space moves to a new line and the space itself is dropped. With no
//!   usable space the full line stays as it is and the character starts the
//!   new line.
//!
//! # Unwrapping
//!
//! After every deletion, if the current line is down to a single word (no
//! space past its first column) and it fits back onto a soft-ended
//! predecessor, the two lines are joined again, restoring the dropped space.
//! Multi-word lines never merge back, even when they would fit.
//!
//! # Serialization
//!
//! Each line's bytes are written verbatim. A hard end writes `\n`; a soft end
//! writes `' '` only when a wrap dropped a space there. Replaying the output
//! through [`Frame::read_from`] with the same budget rebuilds the same lines.

use std::io::{BufWriter, Read, Write};
use std::iter::{FusedIterator, Skip};

use log::{debug, trace};

use crate::chain::{self, Chain, NodeId};
use crate::config::{FrameConfig, TAB_WIDTH};
use crate::error::{FrameError, Result};
use crate::line::{Line, LineEnd};
use crate::utf8;

/// The editable document: an ordered, never-empty chain of lines.
#[derive(Debug, Clone)]
pub struct Frame {
    lines: Chain<Line>,
    /// Always the chain's tail.
    current: NodeId,
    line_count: usize,
    config: FrameConfig,
    /// 1-based distance back from the current line where
    /// [`visible_lines`](Self::visible_lines) starts.
    window_start: usize,
}

impl Frame {
    // -- Construction -------------------------------------------------------

    /// An empty frame with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// An empty frame: one empty soft line.
    #[must_use]
    pub fn with_config(config: FrameConfig) -> Self {
        let lines = Chain::new(Line::new());
        Self {
            current: lines.tail(),
            lines,
            line_count: 1,
            config,
            window_start: 1,
        }
    }

    /// Build a frame by replaying a byte stream through the editing
    /// pipeline: `\n` ends a line, every other codepoint is typed.
    ///
    /// # Errors
    ///
    /// [`FrameError::Io`] if reading fails, [`FrameError::InvalidUtf8`]
    /// (with the offending byte offset) if the stream is not UTF-8, and
    /// [`FrameError::EmbeddedNul`] if it contains NUL.
    pub fn read_from<R: Read>(mut source: R, config: FrameConfig) -> Result<Self> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let text = std::str::from_utf8(&bytes).map_err(|e| FrameError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;

        let mut frame = Self::with_config(config);
        frame.insert_str(text)?;
        debug!(
            "read {} bytes into {} lines (budget {})",
            bytes.len(),
            frame.line_count,
            config.chars_per_line()
        );
        Ok(frame)
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn config(&self) -> FrameConfig {
        self.config
    }

    #[inline]
    #[must_use]
    pub const fn chars_per_line(&self) -> usize {
        self.config.chars_per_line()
    }

    /// Number of lines. Never zero.
    #[inline]
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    /// The line being edited (always the last one).
    #[must_use]
    pub fn current(&self) -> &Line {
        self.line(self.current)
    }

    /// Codepoints across all lines, not counting line ends.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.lines().map(Line::char_count).sum()
    }

    // -- Editing ------------------------------------------------------------

    /// Type one codepoint given as raw UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Malformed input is rejected before it reaches the frame
    /// ([`FrameError::InvalidUtf8`], [`FrameError::NotOneCodepoint`]);
    /// otherwise see [`insert`](Self::insert).
    pub fn insert_char(&mut self, bytes: &[u8]) -> Result<()> {
        let ch = utf8::decode_one(bytes)?;
        self.insert(ch)
    }

    /// Type one character, wrapping if the current line is full.
    ///
    /// `'\n'` is treated as [`insert_newline`](Self::insert_newline).
    ///
    /// # Errors
    ///
    /// [`FrameError::EmbeddedNul`] for `'\0'`, [`FrameError::Alloc`] if a
    /// buffer cannot grow. The frame is unchanged on error.
    pub fn insert(&mut self, ch: char) -> Result<()> {
        match ch {
            '\n' => return self.insert_newline(),
            '\0' => return Err(FrameError::EmbeddedNul),
            _ => {}
        }

        if self.current().char_count() < self.chars_per_line() {
            return self.current_mut().push(ch);
        }

        // A full line is a wrap point whatever comes next.
        self.current_mut().set_end(LineEnd::Soft);
        if ch == ' ' {
            self.lines.try_reserve(1)?;
            self.current_mut().push(' ')?;
            self.add_line()
        } else {
            self.soft_wrap(ch)
        }
    }

    /// Type every character of `text` in order. Stops at the first error;
    /// characters before it stay typed.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_str(&mut self, text: &str) -> Result<()> {
        text.chars().try_for_each(|ch| self.insert(ch))
    }

    /// End the current line with a hard break and start a new one.
    ///
    /// # Errors
    ///
    /// [`FrameError::Alloc`]; the frame is unchanged on error.
    pub fn insert_newline(&mut self) -> Result<()> {
        self.lines.try_reserve(1)?;
        self.current_mut().set_end(LineEnd::Hard);
        self.add_line()
    }

    /// Type [`TAB_WIDTH`] spaces, one at a time, so a tab wraps exactly like
    /// the same run of spaces would.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_tab(&mut self) -> Result<()> {
        (0..TAB_WIDTH).try_for_each(|_| self.insert(' '))
    }

    /// Delete the character before the cursor.
    ///
    /// On a non-empty line this removes the last codepoint and then tries to
    /// undo the soft wrap that created the line. On an empty line it removes
    /// the line itself (and the break before it); the first line is never
    /// removed.
    pub fn delete_char(&mut self) {
        if self.current_mut().delete_last_char().is_some() {
            self.undo_soft_wrap();
        } else {
            self.delete_line();
        }
    }

    // -- Iteration ----------------------------------------------------------

    /// All lines, first to last.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            inner: self.lines.iter(),
        }
    }

    /// Set how far back from the current line [`visible_lines`] begins.
    /// 1 means "start at the current line"; smaller values clamp to 1.
    ///
    /// [`visible_lines`]: Self::visible_lines
    pub fn set_window_start(&mut self, start: usize) {
        self.window_start = start.max(1);
    }

    #[inline]
    #[must_use]
    pub const fn window_start(&self) -> usize {
        self.window_start
    }

    /// Lines from the window start backward to the first line.
    #[must_use]
    pub fn visible_lines(&self) -> VisibleLines<'_> {
        self.lines_back_from(self.window_start)
    }

    /// Lines backward to the first line, skipping `start - 1` lines at the
    /// end. `start` is 1-based; 0 behaves like 1.
    #[must_use]
    pub fn lines_back_from(&self, start: usize) -> VisibleLines<'_> {
        VisibleLines {
            inner: self
                .lines
                .iter_back_from(self.current)
                .skip(start.saturating_sub(1)),
        }
    }

    // -- Serialization ------------------------------------------------------

    /// Write the document to `sink`: line bytes verbatim, `\n` after hard
    /// ends, `' '` where a soft wrap dropped a space.
    ///
    /// # Errors
    ///
    /// [`FrameError::Io`] from the sink.
    pub fn write<W: Write>(&self, sink: W) -> Result<()> {
        let mut out = BufWriter::new(sink);
        let mut lines = self.lines().peekable();
        while let Some(line) = lines.next() {
            out.write_all(line.text())?;
            match line.end() {
                LineEnd::Hard => out.write_all(b"\n")?,
                LineEnd::Soft if line.elided_space() && lines.peek().is_some() => {
                    out.write_all(b" ")?;
                }
                LineEnd::Soft => {}
            }
        }
        out.flush()?;
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    fn line(&self, id: NodeId) -> &Line {
        match self.lines.get(id) {
            Some(line) => line,
            None => unreachable!("frame holds a stale line id"),
        }
    }

    fn current_mut(&mut self) -> &mut Line {
        match self.lines.get_mut(self.current) {
            Some(line) => line,
            None => unreachable!("current line is always live"),
        }
    }

    /// Append `line` after the current one and make it current. Callers
    /// reserve chain capacity first when they need the step to be atomic.
    fn push_line(&mut self, line: Line) -> Result<()> {
        self.current = self.lines.append(self.current, line)?;
        self.line_count += 1;
        Ok(())
    }

    fn add_line(&mut self) -> Result<()> {
        self.push_line(Line::new())
    }

    /// Wrap the full current line and type `ch` on the new one.
    ///
    /// Everything is allocated before the full line is touched.
    fn soft_wrap(&mut self, ch: char) -> Result<()> {
        let full = self.current();
        let split = full.wrap_point();
        let mut next = Line::from_text(split.map_or("", |at| full.fragment_after(at)))?;
        next.push(ch)?;
        self.lines.try_reserve(1)?;

        if let Some(at) = split {
            self.current_mut().break_at(at);
        }
        trace!(
            "soft wrap at line {}: carried {:?}",
            self.line_count,
            next.as_str()
        );
        self.push_line(next)
    }

    /// Join the current line back onto its predecessor if the boundary is a
    /// soft wrap, the current line is a single word, and it fits.
    fn undo_soft_wrap(&mut self) {
        let Some(prev_id) = self.lines.prev(self.current) else {
            return;
        };
        let prev = self.line(prev_id);
        let cur = self.current();
        if prev.is_hard() || cur.wrap_point().is_some() {
            return;
        }

        let gap = usize::from(prev.elided_space());
        if prev.char_count() + gap + cur.char_count() > self.chars_per_line() {
            return;
        }
        let needed = cur.byte_len() + gap;

        let reserved = self.lines.get_mut(prev_id).map(|prev| prev.try_reserve(needed));
        if let Some(Err(err)) = reserved {
            debug!("soft wrap kept: {err}");
            return;
        }
        let Some(line) = self.lines.remove(self.current) else {
            return;
        };
        self.current = prev_id;
        self.line_count -= 1;
        self.current_mut().absorb(line);
        trace!("soft wrap undone, {} lines", self.line_count);
    }

    /// Remove the empty current line together with the break before it.
    fn delete_line(&mut self) {
        let Some(prev_id) = self.lines.prev(self.current) else {
            return;
        };
        if self.lines.remove(self.current).is_none() {
            return;
        }
        self.current = prev_id;
        self.line_count -= 1;

        let budget = self.chars_per_line();
        let line = self.current_mut();
        line.set_end(LineEnd::Soft);
        line.clear_elided_space();
        // The over-budget trailing space and the break after it were typed
        // as one space.
        if line.char_count() > budget && line.as_str().ends_with(' ') {
            line.delete_last_char();
        }
        trace!("line removed, {} lines", self.line_count);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// First-to-last iterator over a frame's lines. See [`Frame::lines`].
#[derive(Debug)]
pub struct Lines<'a> {
    inner: chain::Iter<'a, Line>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        self.inner.next()
    }
}

impl FusedIterator for Lines<'_> {}

/// Last-to-first iterator bounded by the window start. See
/// [`Frame::visible_lines`].
#[derive(Debug)]
pub struct VisibleLines<'a> {
    inner: Skip<chain::IterBack<'a, Line>>,
}

impl<'a> Iterator for VisibleLines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        self.inner.next()
    }
}

impl FusedIterator for VisibleLines<'_> {}
