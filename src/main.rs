// SPDX-License-Identifier: MIT
//
// candlestick: a minimalist writing app.
//
// Type and the text wraps at the line budget; delete and it unwraps.
// Ctrl+S saves a plain `.txt` document, Ctrl+O opens one, Ctrl+Q quits.
// Without a terminal front end the keystrokes come from stdin, so the app
// can be driven by a pipe or a script:
//
//   candlestick type --print < keys.txt
//   candlestick reflow notes.txt -o notes.txt
//   candlestick show notes.txt --rows 10
//   candlestick list

mod app;
mod cli;
mod documents;
mod input;
mod natural;
mod screen;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{debug, info};

use cs_frame::{Frame, FrameConfig};

use crate::app::{Action, App};
use crate::cli::{CliOptions, Command};
use crate::documents::Documents;
use crate::input::Parser;

fn main() -> ExitCode {
    let opts = match CliOptions::parse() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("candlestick: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::new()
        .filter_level(opts.log_level())
        .parse_default_env()
        .init();

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("candlestick: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(opts: CliOptions) -> Result<()> {
    debug!("{opts:?}");
    let documents = Documents::new(opts.docs);

    match opts.command {
        Command::Type { print, screen } => {
            let mut app = App::new(opts.config, documents);
            let stdin = io::stdin();
            let action = feed_keystrokes(&mut app, stdin.lock())?;
            info!(
                "typing ended ({action:?}): {} lines, {} chars, document {:?}",
                app.frame().line_count(),
                app.frame().char_count(),
                app.filename()
            );

            let mut out = io::stdout().lock();
            if let Some(rows) = screen {
                out.write_all(app.render(rows).as_bytes())?;
            }
            if print {
                app.frame().write(&mut out)?;
            }
            out.flush()?;
        }
        Command::Reflow { input, output } => {
            let frame = read_frame(&input, opts.config)?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    frame
                        .write(file)
                        .with_context(|| format!("writing {}", path.display()))?;
                }
                None => frame.write(io::stdout().lock())?,
            }
        }
        Command::Show { input, rows, from } => {
            let mut frame = read_frame(&input, opts.config)?;
            frame.set_window_start(from);
            print!("{}", screen::render(&frame, rows));
        }
        Command::List => {
            info!("listing {}", documents.dir().display());
            let mut out = BufWriter::new(io::stdout().lock());
            for name in documents.list()? {
                writeln!(out, "{name}")?;
            }
            out.flush()?;
        }
    }
    Ok(())
}

/// Read `source` to the end (or until the app asks to quit), handing each
/// parsed key to `app`.
fn feed_keystrokes<R: Read>(app: &mut App, mut source: R) -> Result<Action> {
    let mut parser = Parser::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("reading keystrokes"),
        };
        for key in parser.advance(&buf[..n]) {
            if app.on_key(&key) == Action::Quit {
                return Ok(Action::Quit);
            }
        }
    }

    if parser.has_pending() {
        debug!("input ended mid-sequence, flushing");
    }
    for key in parser.flush() {
        if app.on_key(&key) == Action::Quit {
            return Ok(Action::Quit);
        }
    }
    Ok(Action::Continue)
}

fn read_frame(path: &Path, config: FrameConfig) -> Result<Frame> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Frame::read_from(BufReader::new(file), config)
        .with_context(|| format!("reading {}", path.display()))
}
