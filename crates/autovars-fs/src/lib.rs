//! Filesystem abstraction for autovars
//!
//! Provides normalized path handling, the well-known inventory path names and
//! the [`FileSource`] capability the resolution engine reads through.

pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod source;

pub use constants::{InventoryPath, VARS_EXTENSIONS, is_inventory_file_name, is_vars_extension};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use source::{FileSource, MemoryFileSource, OsFileSource};
