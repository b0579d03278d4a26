//! Blocking file reads with path-carrying errors

use std::fs;
use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound { path: native_path },
        _ => Error::io(&native_path, e),
    })
}

/// Resolve `path` to an absolute, symlink-free [`NormalizedPath`].
///
/// Uses `dunce` so Windows paths do not come back in `\\?\` form.
pub fn canonicalize(path: &Path) -> Result<NormalizedPath> {
    dunce::canonicalize(path)
        .map(NormalizedPath::new)
        .map_err(|e| Error::io(path, e))
}
