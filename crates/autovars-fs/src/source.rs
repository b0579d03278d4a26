//! Directory listing and file reading capability
//!
//! The resolution engine never touches `std::fs` directly. It reads through a
//! [`FileSource`], so the same code runs against the real filesystem
//! ([`OsFileSource`]) or a fixed in-memory tree ([`MemoryFileSource`]).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use crate::{Error, NormalizedPath, Result, io};

/// Read access to a directory tree.
pub trait FileSource {
    /// Names of the regular files directly inside `dir`.
    ///
    /// Returns `Ok(None)` when `dir` does not exist or is not a directory.
    /// The order of the returned names is unspecified.
    fn list_files(&self, dir: &NormalizedPath) -> Result<Option<Vec<String>>>;

    /// Read a whole file as UTF-8 text.
    fn read_text(&self, path: &NormalizedPath) -> Result<String>;
}

impl<T: FileSource + ?Sized> FileSource for &T {
    fn list_files(&self, dir: &NormalizedPath) -> Result<Option<Vec<String>>> {
        (**self).list_files(dir)
    }

    fn read_text(&self, path: &NormalizedPath) -> Result<String> {
        (**self).read_text(path)
    }
}

/// [`FileSource`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSource;

impl OsFileSource {
    pub fn new() -> Self {
        Self
    }
}

impl FileSource for OsFileSource {
    fn list_files(&self, dir: &NormalizedPath) -> Result<Option<Vec<String>>> {
        let native = dir.to_native();
        if !native.is_dir() {
            return Ok(None);
        }

        let entries = match fs::read_dir(&native) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&native, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            // Follows symlinks, so a link to a regular file counts as a file
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::debug!(?raw, dir = %dir, "Skipping non UTF-8 file name");
                }
            }
        }
        Ok(Some(names))
    }

    fn read_text(&self, path: &NormalizedPath) -> Result<String> {
        io::read_text(path)
    }
}

/// [`FileSource`] over a fixed in-memory tree.
///
/// Adding a file implicitly creates every ancestor directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSource {
    files: BTreeMap<NormalizedPath, String>,
    dirs: BTreeSet<NormalizedPath>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_file`](Self::add_file).
    pub fn with_file(
        mut self,
        path: impl Into<NormalizedPath>,
        content: impl Into<String>,
    ) -> Self {
        self.add_file(path, content);
        self
    }

    /// Builder form of [`add_dir`](Self::add_dir).
    pub fn with_dir(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.add_dir(path);
        self
    }

    /// Insert or replace a file.
    pub fn add_file(&mut self, path: impl Into<NormalizedPath>, content: impl Into<String>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, content.into());
    }

    /// Create a directory and its ancestors.
    pub fn add_dir(&mut self, path: impl Into<NormalizedPath>) {
        let mut current = Some(path.into());
        while let Some(dir) = current {
            current = dir.parent();
            if !self.dirs.insert(dir) {
                break;
            }
        }
    }
}

impl FileSource for MemoryFileSource {
    fn list_files(&self, dir: &NormalizedPath) -> Result<Option<Vec<String>>> {
        if !self.dirs.contains(dir) {
            return Ok(None);
        }
        let names = self
            .files
            .keys()
            .filter(|path| path.parent().as_ref() == Some(dir))
            .filter_map(|path| path.file_name().map(str::to_string))
            .collect();
        Ok(Some(names))
    }

    fn read_text(&self, path: &NormalizedPath) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                path: path.to_native(),
            })
    }
}
