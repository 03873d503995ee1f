// SPDX-License-Identifier: MIT
//
// Application delegate.
//
// Routes key events to whatever the app is doing right now:
//
//   Typing   keys edit the frame; Up/Down scroll back through it
//   Saving   keys edit a file name; Enter saves, Escape cancels
//   Opening  keys pick a document; Enter opens it, Escape cancels
//
// Ctrl+S saves (asking for a name the first time), Ctrl+O opens the
// picker, Ctrl+Q quits from anywhere. The frame never sees a key it would
// reject: when an edit fails the error is logged and the key is dropped,
// and typing carries on.

use log::{debug, error, info, warn};

use cs_frame::{Frame, FrameConfig, Line};

use crate::documents::{self, Documents};
use crate::input::{KeyCode, KeyEvent, Modifiers};
use crate::screen;

/// Longest file name accepted in the save prompt, in characters.
pub const MAX_FILE_CHARS: usize = 60;

/// What the caller should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Which screen is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Typing,
    Saving,
    Opening,
}

#[derive(Debug)]
enum State {
    Typing,
    /// The name typed so far.
    Saving(Line),
    /// Listed documents and the selected index.
    Opening { names: Vec<String>, selected: usize },
}

/// The writing app: one frame, its file name, and the current screen.
#[derive(Debug)]
pub struct App {
    frame: Frame,
    config: FrameConfig,
    documents: Documents,
    filename: Option<String>,
    state: State,
}

impl App {
    #[must_use]
    pub fn new(config: FrameConfig, documents: Documents) -> Self {
        Self {
            frame: Frame::with_config(config),
            config,
            documents,
            filename: None,
            state: State::Typing,
        }
    }

    #[inline]
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Document name used by Ctrl+S, once known.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self.state {
            State::Typing => Mode::Typing,
            State::Saving(_) => Mode::Saving,
            State::Opening { .. } => Mode::Opening,
        }
    }

    /// Handle one key.
    pub fn on_key(&mut self, key: &KeyEvent) -> Action {
        if key.modifiers.contains(Modifiers::CTRL) {
            return self.on_command(key);
        }
        match self.state {
            State::Typing => self.on_typing_key(key),
            State::Saving(_) => self.on_saving_key(key),
            State::Opening { .. } => self.on_opening_key(key),
        }
        Action::Continue
    }

    /// Draw the current screen, showing at most `rows` lines of text.
    #[must_use]
    pub fn render(&self, rows: usize) -> String {
        match &self.state {
            State::Typing => screen::render(&self.frame, rows),
            State::Saving(name) => screen::render_save_prompt(name.as_str()),
            State::Opening { names, selected } => screen::render_open_list(names, *selected),
        }
    }

    // ─── Commands ───────────────────────────────────────────────────────

    fn on_command(&mut self, key: &KeyEvent) -> Action {
        let KeyCode::Char(ch) = key.code else {
            warn!("ignoring {key:?}");
            return Action::Continue;
        };
        match ch {
            'q' => {
                info!("quit requested");
                return Action::Quit;
            }
            's' if self.mode() == Mode::Typing => match self.filename.clone() {
                Some(name) => self.save(&name),
                None => self.state = State::Saving(Line::new()),
            },
            'o' if self.mode() == Mode::Typing => self.start_opening(),
            's' | 'o' => debug!("ctrl+{ch} ignored outside typing"),
            _ => warn!("invalid command ctrl+{ch}"),
        }
        Action::Continue
    }

    fn save(&mut self, name: &str) {
        match self.documents.save(name, &self.frame) {
            Ok(_) => self.filename = Some(name.to_owned()),
            Err(err) => error!("save failed: {err:#}"),
        }
    }

    fn start_opening(&mut self) {
        match self.documents.list() {
            Ok(names) => self.state = State::Opening { names, selected: 0 },
            Err(err) => error!("cannot list documents: {err:#}"),
        }
    }

    // ─── Typing ─────────────────────────────────────────────────────────

    fn on_typing_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Up => {
                let start = (self.frame.window_start() + 1).min(self.frame.line_count());
                self.frame.set_window_start(start);
                return;
            }
            KeyCode::Down => {
                let start = self.frame.window_start().saturating_sub(1);
                self.frame.set_window_start(start);
                return;
            }
            _ => self.frame.set_window_start(1),
        }

        if key.modifiers.contains(Modifiers::ALT) {
            warn!("ignoring {key:?}");
            return;
        }
        let result = match key.code {
            KeyCode::Char(ch) => self.frame.insert(ch),
            KeyCode::Tab => self.frame.insert_tab(),
            KeyCode::Enter => self.frame.insert_newline(),
            KeyCode::Backspace => {
                self.frame.delete_char();
                Ok(())
            }
            KeyCode::Escape | KeyCode::Up | KeyCode::Down => Ok(()),
        };
        if let Err(err) = result {
            warn!("dropped {key:?}: {err}");
        }
    }

    // ─── Saving ─────────────────────────────────────────────────────────

    fn on_saving_key(&mut self, key: &KeyEvent) {
        let State::Saving(name) = &mut self.state else {
            return;
        };
        match key.code {
            KeyCode::Escape => self.state = State::Typing,
            KeyCode::Backspace => {
                name.delete_last_char();
            }
            KeyCode::Enter if !name.is_empty() => {
                let name = documents::with_extension(name.as_str());
                self.state = State::Typing;
                self.save(&name);
            }
            KeyCode::Char(ch) if key.modifiers.is_empty() => {
                if name.char_count() >= MAX_FILE_CHARS {
                    warn!("file name is limited to {MAX_FILE_CHARS} characters");
                } else if matches!(ch, '/' | '\\') {
                    warn!("file names cannot contain {ch:?}");
                } else if let Err(err) = name.push(ch) {
                    warn!("dropped {ch:?} from file name: {err}");
                }
            }
            _ => {}
        }
    }

    // ─── Opening ────────────────────────────────────────────────────────

    fn on_opening_key(&mut self, key: &KeyEvent) {
        let State::Opening { names, selected } = &mut self.state else {
            return;
        };
        match key.code {
            KeyCode::Escape => self.state = State::Typing,
            KeyCode::Up => *selected = selected.saturating_sub(1),
            KeyCode::Down => *selected = (*selected + 1).min(names.len().saturating_sub(1)),
            KeyCode::Enter => {
                let Some(name) = names.get(*selected).cloned() else {
                    return;
                };
                match self.documents.open(&name, self.config) {
                    Ok(frame) => {
                        self.frame = frame;
                        self.filename = Some(name);
                        self.state = State::Typing;
                    }
                    Err(err) => error!("open failed: {err:#}"),
                }
            }
            _ => {}
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn app(budget: usize) -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        let docs = Documents::new(tmp.path().join("documents"));
        let app = App::new(FrameConfig::new(budget).unwrap(), docs);
        (tmp, app)
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn feed(app: &mut App, keys: &[KeyEvent]) -> Action {
        let mut last = Action::Continue;
        for k in keys {
            last = app.on_key(k);
        }
        last
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            let k = if c == '\n' { key(KeyCode::Enter) } else { press(c) };
            app.on_key(&k);
        }
    }

    fn written(app: &App) -> String {
        let mut out = Vec::new();
        app.frame().write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── Typing ──────────────────────────────────────────────────────────

    #[test]
    fn typing_edits_the_frame() {
        let (_tmp, mut a) = app(10);
        type_str(&mut a, "hello world\nbye");
        feed(&mut a, &[key(KeyCode::Backspace), key(KeyCode::Tab)]);
        assert_eq!(written(&a), "hello world\nby    ");
        assert_eq!(a.mode(), Mode::Typing);
    }

    #[test]
    fn escape_while_typing_does_nothing() {
        let (_tmp, mut a) = app(10);
        type_str(&mut a, "abc");
        feed(&mut a, &[key(KeyCode::Escape)]);
        assert_eq!(written(&a), "abc");
    }

    #[test]
    fn alt_keys_are_dropped() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::with(KeyCode::Char('x'), Modifiers::ALT)]);
        assert_eq!(written(&a), "");
    }

    #[test]
    fn arrows_scroll_and_other_keys_reset() {
        let (_tmp, mut a) = app(10);
        type_str(&mut a, "a\nb\nc");
        feed(&mut a, &[key(KeyCode::Up), key(KeyCode::Up), key(KeyCode::Up)]);
        // Clamped to the line count.
        assert_eq!(a.frame().window_start(), 3);
        feed(&mut a, &[key(KeyCode::Down)]);
        assert_eq!(a.frame().window_start(), 2);
        feed(&mut a, &[key(KeyCode::Down), key(KeyCode::Down)]);
        assert_eq!(a.frame().window_start(), 1);

        feed(&mut a, &[key(KeyCode::Up), press('d')]);
        assert_eq!(a.frame().window_start(), 1);
        assert_eq!(written(&a), "a\nb\ncd");
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let (_tmp, mut a) = app(10);
        assert_eq!(feed(&mut a, &[KeyEvent::ctrl('q')]), Action::Quit);
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        assert_eq!(a.mode(), Mode::Saving);
        assert_eq!(feed(&mut a, &[KeyEvent::ctrl('q')]), Action::Quit);
    }

    #[test]
    fn unknown_command_is_ignored() {
        let (_tmp, mut a) = app(10);
        assert_eq!(feed(&mut a, &[KeyEvent::ctrl('f')]), Action::Continue);
        assert_eq!(a.mode(), Mode::Typing);
    }

    // ── Saving ──────────────────────────────────────────────────────────

    #[test]
    fn save_as_appends_extension_and_writes() {
        let (tmp, mut a) = app(10);
        type_str(&mut a, "hello world");
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        assert_eq!(a.mode(), Mode::Saving);

        type_str(&mut a, "drafz");
        feed(&mut a, &[key(KeyCode::Backspace), press('t'), key(KeyCode::Tab)]);
        assert!(a.render(5).contains("draft_"));
        feed(&mut a, &[key(KeyCode::Enter)]);

        assert_eq!(a.mode(), Mode::Typing);
        assert_eq!(a.filename(), Some("draft.txt"));
        let saved = fs::read_to_string(tmp.path().join("documents/draft.txt")).unwrap();
        assert_eq!(saved, "hello world");
    }

    #[test]
    fn second_save_reuses_the_name() {
        let (tmp, mut a) = app(10);
        type_str(&mut a, "one");
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        type_str(&mut a, "n");
        feed(&mut a, &[key(KeyCode::Enter)]);

        type_str(&mut a, " two");
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        assert_eq!(a.mode(), Mode::Typing);
        let saved = fs::read_to_string(tmp.path().join("documents/n.txt")).unwrap();
        assert_eq!(saved, "one two");
    }

    #[test]
    fn empty_name_does_not_save() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::ctrl('s'), key(KeyCode::Enter)]);
        assert_eq!(a.mode(), Mode::Saving);
        assert_eq!(a.filename(), None);
    }

    #[test]
    fn escape_cancels_save() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::ctrl('s'), press('x'), key(KeyCode::Escape)]);
        assert_eq!(a.mode(), Mode::Typing);
        assert_eq!(a.filename(), None);
        // The typed name went to the prompt, not the frame.
        assert_eq!(written(&a), "");
    }

    #[test]
    fn file_name_is_capped() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        type_str(&mut a, &"n".repeat(MAX_FILE_CHARS + 5));
        let State::Saving(name) = &a.state else {
            panic!("expected save prompt");
        };
        assert_eq!(name.char_count(), MAX_FILE_CHARS);
    }

    #[test]
    fn path_separators_are_refused() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::ctrl('s')]);
        type_str(&mut a, "../x");
        let State::Saving(name) = &a.state else {
            panic!("expected save prompt");
        };
        assert_eq!(name.as_str(), "..x");
    }

    // ── Opening ─────────────────────────────────────────────────────────

    #[test]
    fn open_replaces_frame_with_selected_document() {
        let (tmp, mut a) = app(10);
        let dir = tmp.path().join("documents");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a2.txt"), "second").unwrap();
        fs::write(dir.join("a10.txt"), "tenth doc\nhere").unwrap();

        type_str(&mut a, "scratch");
        feed(&mut a, &[KeyEvent::ctrl('o')]);
        assert_eq!(a.mode(), Mode::Opening);
        assert!(a.render(5).contains("> a2.txt"));

        feed(
            &mut a,
            &[key(KeyCode::Down), key(KeyCode::Down), key(KeyCode::Enter)],
        );
        assert_eq!(a.mode(), Mode::Typing);
        assert_eq!(a.filename(), Some("a10.txt"));
        assert_eq!(written(&a), "tenth doc\nhere");
        assert_eq!(a.frame().chars_per_line(), 10);
    }

    #[test]
    fn escape_cancels_open() {
        let (_tmp, mut a) = app(10);
        type_str(&mut a, "keep");
        feed(
            &mut a,
            &[KeyEvent::ctrl('o'), key(KeyCode::Enter), key(KeyCode::Escape)],
        );
        assert_eq!(a.mode(), Mode::Typing);
        assert_eq!(written(&a), "keep");
    }

    #[test]
    fn unreadable_document_keeps_picker_open() {
        let (tmp, mut a) = app(10);
        let dir = tmp.path().join("documents");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bad.txt"), [0xFF, 0xFE]).unwrap();

        type_str(&mut a, "keep");
        feed(&mut a, &[KeyEvent::ctrl('o'), key(KeyCode::Enter)]);
        assert_eq!(a.mode(), Mode::Opening);
        assert_eq!(written(&a), "keep");
    }

    #[test]
    fn save_and_open_ignored_outside_typing() {
        let (_tmp, mut a) = app(10);
        feed(&mut a, &[KeyEvent::ctrl('s'), KeyEvent::ctrl('o')]);
        assert_eq!(a.mode(), Mode::Saving);
    }
}
