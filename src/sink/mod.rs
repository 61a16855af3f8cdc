//! Output sinks
//!
//! Every artifact write goes through a [`Sink`], so the generation pipeline
//! can run against memory in tests and a real output tree in production.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use walkdir::WalkDir;

/// Destination for generated artifacts.
pub trait Sink {
    /// Create a directory and any missing parents.
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Write a file, replacing any previous content.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively copy a directory tree.
    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        (**self).ensure_dir(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write_file(path, contents)
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).copy_tree(from, to)
    }
}

/// Sink writing straight to the filesystem.
#[derive(Debug, Default)]
pub struct DiskSink;

impl Sink for DiskSink {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()> {
        for entry in WalkDir::new(from).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(walk_io_error)?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            let dest = to.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &dest)?;
            }
        }
        Ok(())
    }
}

fn walk_io_error(err: walkdir::Error) -> io::Error {
    let msg = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, msg))
}

/// In-memory sink that records writes instead of performing them.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    copies: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every written file, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Content of one written file, decoded as UTF-8.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Every directory requested through `ensure_dir`, sorted.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Recorded `copy_tree` requests, in call order.
    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sink for MemorySink {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        self.dirs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }
}
