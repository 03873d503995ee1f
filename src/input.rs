// SPDX-License-Identifier: MIT
//
// Keystroke parser.
//
// Turns raw input bytes into key events for the application delegate:
//
// - Printable characters, including multi-byte UTF-8
// - Backspace (0x08 and 0x7F), Tab, Enter (line feed)
// - Ctrl+letter (0x01..=0x1A), used for the save / open / quit combos
// - Arrow keys (`ESC [ A`, `ESC [ B`, and the `ESC O` forms)
// - Alt+key (ESC followed by a printable character)
// - A lone ESC, resolved by `flush`
//
// Carriage returns are dropped: only the line feed ends a line, so
// `\r\n` input produces one Enter.
//
// # Design
//
// The parser keeps a small byte buffer because a UTF-8 character or an
// escape sequence can straddle two reads. Feed bytes with
// [`Parser::advance`] and collect the returned events. When the input
// stops, [`Parser::flush`] settles whatever is left.
//
// Malformed UTF-8 never reaches the frame: every multi-byte sequence is
// validated with `cs_frame::utf8::decode_one`, and a byte that cannot
// start a valid character is skipped.

use bitflags::bitflags;
use log::warn;

use cs_frame::utf8;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// `Ctrl+<ch>`.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::with(KeyCode::Char(ch), Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
}

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const ALT  = 0b0000_0010;
        const CTRL = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental keystroke parser.
///
/// Feed bytes via [`advance`](Parser::advance). Incomplete sequences stay
/// buffered until more bytes arrive or [`flush`](Parser::flush) is called.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes and return every key event that can be parsed.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        events
    }

    /// Are there buffered bytes waiting for more input?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Settle buffered bytes at end of input.
    ///
    /// A lone ESC becomes an Escape key (and whatever follows it is parsed
    /// again); a truncated UTF-8 sequence is dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        while let Some(&first) = self.buf.first() {
            if first == 0x1B {
                events.push(KeyEvent::new(KeyCode::Escape));
                self.buf.remove(0);
                let rest = std::mem::take(&mut self.buf);
                events.extend(self.advance(&rest));
            } else {
                warn!("dropping {} bytes of incomplete input", self.buf.len());
                self.buf.clear();
            }
        }
        events
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one key from the front of the buffer.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Need more bytes.
    Incomplete,
    /// Nothing usable here; skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Parsed::Key(KeyEvent::new(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::new(KeyCode::Tab), 1),
        0x0A => Parsed::Key(KeyEvent::new(KeyCode::Enter), 1),
        // Carriage return and NUL carry nothing for a writer.
        0x00 | 0x0D => Parsed::Skip(1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Key(KeyEvent::ctrl(char::from(b + b'a' - 1)), 1)
        }
        0x1C..=0x1F => Parsed::Skip(1),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::new(KeyCode::Char(char::from(b))), 1),
        _ => parse_utf8(buf),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    let Some(&second) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match second {
        b'[' | b'O' => parse_arrow(buf),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent::with(KeyCode::Char(char::from(b)), Modifiers::ALT),
            2,
        ),
        // Unknown byte after ESC: emit the Escape and parse the rest.
        _ => Parsed::Key(KeyEvent::new(KeyCode::Escape), 1),
    }
}

/// `ESC [ A` / `ESC O A` style sequences. Other CSI sequences are consumed
/// up to their final byte and ignored.
fn parse_arrow(buf: &[u8]) -> Parsed {
    let params_end = buf[2..]
        .iter()
        .position(|b| (0x40..=0x7E).contains(b))
        .map(|i| i + 2);
    let Some(end) = params_end else {
        return Parsed::Incomplete;
    };

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        _ => return Parsed::Skip(end + 1),
    };
    Parsed::Key(KeyEvent::new(code), end + 1)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8::sequence_len(buf[0]);
    if expected == 0 {
        warn!("skipping invalid UTF-8 lead byte {:#04x}", buf[0]);
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        // Bail out early if what we have already can't be a prefix.
        if buf[1..].iter().all(|&b| utf8::is_continuation(b)) {
            return Parsed::Incomplete;
        }
        warn!("skipping truncated UTF-8 sequence");
        return Parsed::Skip(1);
    }

    match utf8::decode_one(&buf[..expected]) {
        Ok(ch) => Parsed::Key(KeyEvent::new(KeyCode::Char(ch)), expected),
        Err(err) => {
            warn!("skipping malformed input: {err}");
            Parsed::Skip(1)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
