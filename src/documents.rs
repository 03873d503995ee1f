// SPDX-License-Identifier: MIT
//
// Documents folder.
//
// Every document is a plain `.txt` file directly inside one folder. The
// folder is created on demand, the listing holds regular files only and
// is sorted naturally, and reading or writing a document goes through the
// frame's own `read_from` / `write`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use cs_frame::{Frame, FrameConfig};

use crate::natural;

/// Extension every document carries.
pub const EXTENSION: &str = ".txt";

/// Default documents folder, relative to the working directory.
pub const DEFAULT_DIR: &str = "./documents/";

/// Handle on the documents folder.
#[derive(Debug, Clone)]
pub struct Documents {
    dir: PathBuf,
}

impl Documents {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the document `name`.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Create the folder if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be created.
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating documents folder {}", self.dir.display()))?;
            info!("created documents folder {}", self.dir.display());
        }
        Ok(())
    }

    /// Names of the `.txt` documents, in natural order.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be created or read.
    pub fn list(&self) -> Result<Vec<String>> {
        self.ensure_dir()?;
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("reading documents folder {}", self.dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.context("reading documents folder entry")?;
            let Ok(name) = entry.file_name().into_string() else {
                debug!("skipping non-UTF-8 name {:?}", entry.file_name());
                continue;
            };
            if !is_document_name(&name) {
                continue;
            }
            // `metadata` follows symlinks, so a link to a text file counts.
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => names.push(name),
                Ok(_) => {}
                Err(err) => debug!("skipping {name}: {err}"),
            }
        }

        natural::sort(&mut names);
        debug!("{} documents in {}", names.len(), self.dir.display());
        Ok(names)
    }

    /// Write `frame` to the document `name`, replacing any previous
    /// contents. Returns the path written.
    ///
    /// # Errors
    ///
    /// Fails if the folder or the file cannot be written.
    pub fn save(&self, name: &str, frame: &Frame) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.path_of(name);
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        frame
            .write(file)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(
            "saved {} ({} lines, {} chars)",
            path.display(),
            frame.line_count(),
            frame.char_count()
        );
        Ok(path)
    }

    /// Read the document `name` into a fresh frame with `config`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or does not hold valid text.
    pub fn open(&self, name: &str, config: FrameConfig) -> Result<Frame> {
        let path = self.path_of(name);
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let frame = Frame::read_from(file, config)
            .with_context(|| format!("reading {}", path.display()))?;
        info!("opened {} ({} lines)", path.display(), frame.line_count());
        Ok(frame)
    }
}

impl Default for Documents {
    fn default() -> Self {
        Self::new(DEFAULT_DIR)
    }
}

/// A listable document name: something before a `.txt` suffix.
#[must_use]
pub fn is_document_name(name: &str) -> bool {
    name.len() > EXTENSION.len() && name.ends_with(EXTENSION)
}

/// `name` with the document extension, unless it already has it.
#[must_use]
pub fn with_extension(name: &str) -> String {
    if is_document_name(name) {
        name.to_owned()
    } else {
        format!("{name}{EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn docs() -> (TempDir, Documents) {
        let tmp = TempDir::new().unwrap();
        let docs = Documents::new(tmp.path().join("documents"));
        (tmp, docs)
    }

    #[test]
    fn list_creates_missing_folder() {
        let (_tmp, docs) = docs();
        assert!(!docs.dir().exists());
        assert!(docs.list().unwrap().is_empty());
        assert!(docs.dir().is_dir());
    }

    #[test]
    fn list_filters_and_sorts_naturally() {
        let (_tmp, docs) = docs();
        docs.ensure_dir().unwrap();
        for name in ["day10.txt", "day2.txt", "notes.md", ".txt", "day1.txt"] {
            fs::write(docs.path_of(name), "x").unwrap();
        }
        fs::create_dir(docs.path_of("folder.txt")).unwrap();

        assert_eq!(docs.list().unwrap(), ["day1.txt", "day2.txt", "day10.txt"]);
    }

    #[test]
    fn save_then_open_keeps_text() {
        let (_tmp, docs) = docs();
        let config = FrameConfig::new(10).unwrap();
        let mut frame = Frame::with_config(config);
        frame.insert_str("hello world, again\nbye").unwrap();

        let path = docs.save("story.txt", &frame).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello world, again\nbye");

        let reopened = docs.open("story.txt", config).unwrap();
        let texts: Vec<&str> = reopened.lines().map(|l| l.as_str()).collect();
        let original: Vec<&str> = frame.lines().map(|l| l.as_str()).collect();
        assert_eq!(texts, original);
    }

    #[test]
    fn save_overwrites() {
        let (_tmp, docs) = docs();
        let mut frame = Frame::new();
        frame.insert_str("first draft").unwrap();
        docs.save("a.txt", &frame).unwrap();

        let mut frame = Frame::new();
        frame.insert_str("second").unwrap();
        let path = docs.save("a.txt", &frame).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn open_missing_file_fails() {
        let (_tmp, docs) = docs();
        let err = docs.open("nope.txt", FrameConfig::default()).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn open_rejects_invalid_utf8() {
        let (_tmp, docs) = docs();
        docs.ensure_dir().unwrap();
        fs::write(docs.path_of("bad.txt"), [b'o', b'k', 0xFF]).unwrap();
        assert!(docs.open("bad.txt", FrameConfig::default()).is_err());
    }

    #[test]
    fn extension_helpers() {
        assert!(is_document_name("a.txt"));
        assert!(!is_document_name(".txt"));
        assert!(!is_document_name("a.md"));
        assert_eq!(with_extension("essay"), "essay.txt");
        assert_eq!(with_extension("essay.txt"), "essay.txt");
    }
}
