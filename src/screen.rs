// SPDX-License-Identifier: MIT
//
// Text screen.
//
// A plain-text stand-in for a renderer. The typing screen shows the frame
// the way a page view would: the lines ending at the window start, oldest
// at the top, inside a box as wide as the line budget. The frame is only
// touched through `line_count`, `visible_lines` and `Line::as_str`, and
// only the rows that fit are pulled from the backward iterator.
//
// The save and open prompts are drawn here too, so the app can render
// whichever state it is in.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthChar;

use cs_frame::Frame;

// ─── Typing screen ──────────────────────────────────────────────────────────

/// Render up to `rows` lines of `frame`, ending at its window start.
#[must_use]
pub fn render(frame: &Frame, rows: usize) -> String {
    let mut shown: Vec<&str> = frame
        .visible_lines()
        .take(rows)
        .map(|line| line.as_str())
        .collect();
    shown.reverse();

    let title = format!(
        " line {} of {} ",
        frame.line_count().saturating_sub(frame.window_start() - 1),
        frame.line_count()
    );
    boxed(&title, &shown, frame.chars_per_line())
}

// ─── Prompts ────────────────────────────────────────────────────────────────

/// The "save as" prompt with the name typed so far.
#[must_use]
pub fn render_save_prompt(name: &str) -> String {
    let body = format!("{name}_");
    boxed(" save as (.txt) ", &[body.as_str()], 0)
}

/// The document picker, `>` marking the selected entry.
#[must_use]
pub fn render_open_list(names: &[String], selected: usize) -> String {
    let rows: Vec<String> = if names.is_empty() {
        vec![String::from("  (no documents)")]
    } else {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let marker = if i == selected { '>' } else { ' ' };
                format!("{marker} {name}")
            })
            .collect()
    };
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    boxed(" open ", &rows, 0)
}

// ─── Box drawing ────────────────────────────────────────────────────────────

/// Display columns taken by `text`. Control and zero-width characters
/// take none.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Draw `rows` inside a box at least `min_width` columns wide. Rows
/// wider than that (double-width text, an overflowing space) widen the
/// whole box instead of being cut.
fn boxed(title: &str, rows: &[&str], min_width: usize) -> String {
    let width = rows
        .iter()
        .map(|row| display_width(row))
        .chain([min_width, display_width(title)])
        .max()
        .unwrap_or(min_width);

    let mut out = String::new();
    let fill = width - display_width(title);
    let _ = writeln!(out, "┌{title}{}┐", "─".repeat(fill));
    for row in rows {
        let pad = width - display_width(row);
        let _ = writeln!(out, "│{row}{}│", " ".repeat(pad));
    }
    let _ = writeln!(out, "└{}┘", "─".repeat(width));
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use cs_frame::FrameConfig;

    use super::*;

    fn frame(budget: usize, text: &str) -> Frame {
        let mut f = Frame::with_config(FrameConfig::new(budget).unwrap());
        f.insert_str(text).unwrap();
        f
    }

    /// Rows between the borders, without the box sides and padding.
    fn body(screen: &str) -> Vec<&str> {
        let lines: Vec<&str> = screen.lines().collect();
        lines[1..lines.len() - 1]
            .iter()
            .map(|l| l.trim_start_matches('│').trim_end_matches('│').trim_end())
            .collect()
    }

    fn is_rectangular(screen: &str) -> bool {
        let mut widths = screen.lines().map(display_width);
        let first = widths.next();
        widths.all(|w| Some(w) == first)
    }

    #[test]
    fn shows_lines_oldest_first() {
        let f = frame(20, "one\ntwo\nthree");
        let screen = render(&f, 10);
        assert_eq!(body(&screen), ["one", "two", "three"]);
        assert!(is_rectangular(&screen));
        // Budget plus the two sides.
        assert_eq!(display_width(screen.lines().next().unwrap()), 22);
    }

    #[test]
    fn rows_limit_keeps_the_newest() {
        let f = frame(20, "one\ntwo\nthree");
        assert_eq!(body(&render(&f, 2)), ["two", "three"]);
    }

    #[test]
    fn window_start_scrolls_back() {
        let mut f = frame(20, "one\ntwo\nthree");
        f.set_window_start(2);
        let screen = render(&f, 1);
        assert_eq!(body(&screen), ["two"]);
        assert!(screen.starts_with("┌ line 2 of 3 "));
    }

    #[test]
    fn wrapped_text_renders_by_line() {
        let f = frame(10, "hello world");
        assert_eq!(body(&render(&f, 5)), ["hello", "world"]);
    }

    #[test]
    fn wide_characters_pad_by_columns() {
        let f = frame(20, "中文 ok");
        let screen = render(&f, 1);
        assert_eq!(body(&screen), ["中文 ok"]);
        assert!(is_rectangular(&screen));
    }

    #[test]
    fn overlong_row_widens_the_box() {
        let screen = boxed("", &["中文字"], 4);
        assert_eq!(screen, "┌──────┐\n│中文字│\n└──────┘\n");
    }

    #[test]
    fn save_prompt_shows_cursor() {
        let screen = render_save_prompt("essay");
        assert_eq!(body(&screen), ["essay_"]);
        assert!(is_rectangular(&screen));
    }

    #[test]
    fn open_list_marks_selection() {
        let names = vec![String::from("a.txt"), String::from("b.txt")];
        let screen = render_open_list(&names, 1);
        assert_eq!(body(&screen), ["  a.txt", "> b.txt"]);
    }

    #[test]
    fn open_list_empty() {
        let screen = render_open_list(&[], 0);
        assert_eq!(body(&screen), ["  (no documents)"]);
    }
}
