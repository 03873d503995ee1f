// SPDX-License-Identifier: MIT
//
// Command line.
//
// clap parses into `RawCli`; `CliOptions` is the checked form the rest of
// the binary uses. The line budget and documents folder can also come
// from the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use cs_frame::{DEFAULT_CHARS_PER_LINE, FrameConfig};

use crate::documents::DEFAULT_DIR;

/// Rows drawn by `show` and `type --screen` when no count is given.
pub const DEFAULT_ROWS: usize = 20;

#[derive(Debug)]
pub struct CliOptions {
    pub config: FrameConfig,
    pub docs: PathBuf,
    pub verbosity: u8,
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Feed stdin to the app as keystrokes.
    Type {
        print: bool,
        screen: Option<usize>,
    },
    /// Read a text file through the frame and write it back out.
    Reflow {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// Draw a window of a text file.
    Show {
        input: PathBuf,
        rows: usize,
        from: usize,
    },
    /// List the documents folder.
    List,
}

impl CliOptions {
    /// Parse the process arguments.
    ///
    /// # Errors
    ///
    /// Fails if the options do not make sense together.
    pub fn parse() -> Result<Self> {
        RawCli::parse().try_into()
    }

    /// Parse from an explicit argument list.
    #[cfg(test)]
    pub fn try_parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        RawCli::try_parse_from(args)?.try_into()
    }

    /// Log level picked by the `-v` count: warnings by default, then
    /// info, debug, trace.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "candlestick", version, about, long_about = None)]
struct RawCli {
    /// Characters per line
    #[arg(
        short,
        long,
        value_name = "N",
        env = "CANDLESTICK_WIDTH",
        default_value_t = DEFAULT_CHARS_PER_LINE
    )]
    width: usize,

    /// Documents folder
    #[arg(long, value_name = "DIR", env = "CANDLESTICK_DOCS", default_value = DEFAULT_DIR)]
    docs: PathBuf,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Option<RawCommand>,
}

#[derive(Subcommand, Debug)]
enum RawCommand {
    /// Type: read keystrokes from stdin (the default)
    Type {
        /// Print the document to stdout when input ends
        #[arg(long)]
        print: bool,

        /// Draw the final screen with this many rows
        #[arg(long, value_name = "ROWS", num_args = 0..=1, default_missing_value = "20")]
        screen: Option<usize>,
    },
    /// Re-read a text file through the frame and write it out again
    Reflow {
        /// Text file to read
        input: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Draw part of a text file as it would be shown while typing
    Show {
        /// Text file to read
        input: PathBuf,

        /// Rows to draw
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: usize,

        /// Start this many lines back from the end (1 = last line)
        #[arg(long, default_value_t = 1)]
        from: usize,
    },
    /// List documents in natural order
    List,
}

impl TryFrom<RawCli> for CliOptions {
    type Error = anyhow::Error;

    fn try_from(raw: RawCli) -> Result<Self> {
        let config = FrameConfig::new(raw.width).context("invalid --width")?;

        let command = match raw.command {
            None => Command::Type {
                print: false,
                screen: None,
            },
            Some(RawCommand::Type { print, screen }) => Command::Type { print, screen },
            Some(RawCommand::Reflow { input, output }) => Command::Reflow { input, output },
            Some(RawCommand::Show { input, rows, from }) => {
                anyhow::ensure!(from >= 1, "--from counts from 1");
                Command::Show { input, rows, from }
            }
            Some(RawCommand::List) => Command::List,
        };

        Ok(Self {
            config,
            docs: raw.docs,
            verbosity: raw.verbosity,
            command,
        })
    }
}
