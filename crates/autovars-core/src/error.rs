//! Error types for autovars-core

use std::path::PathBuf;

/// Result type for autovars-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an inventory resolution run.
///
/// Non-fatal conditions (no files found, boundary never reached, skipped
/// declarations) are reported as [`Diagnostic`](crate::Diagnostic) values
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The topology document or a variable file is not a mapping at the top level
    #[error("Malformed document {path}: {message}")]
    MalformedDocument { path: PathBuf, message: String },

    /// A candidate file exists but could not be read or decoded
    #[error("Failed to load {path}: {message}")]
    UnreadableFile { path: PathBuf, message: String },

    /// Resolution finished without a single host in the registry
    #[error("No hosts found in inventory to inject vars into")]
    EmptyResult,

    /// A mapping key that cannot be used as a variable or group name
    #[error("Invalid key in {path}: {key} is not a scalar")]
    InvalidKey { path: PathBuf, key: String },

    /// The document names a different inventory plugin
    #[error("{path} is configured for plugin '{found}', not 'autovars'")]
    PluginMismatch { path: PathBuf, found: String },

    /// The path is not an `inventory.yaml` / `inventory.yml` file
    #[error("Not an autovars inventory file: {path}")]
    UnsupportedInventoryFile { path: PathBuf },

    /// The inventory registry rejected an operation
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Filesystem error from autovars-fs
    #[error(transparent)]
    Fs(#[from] autovars_fs::Error),
}

impl Error {
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }
}
