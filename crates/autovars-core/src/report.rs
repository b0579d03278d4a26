//! Non-fatal diagnostics and the run report

use autovars_fs::NormalizedPath;
use serde::Serialize;
use std::fmt;

use crate::resolver::{LevelScan, MergedVariableSet};
use crate::selector::{AllowList, SkipReason};
use crate::topology::{InventorySettings, ScopeTokens};
use crate::walker::PathChain;

/// A condition worth reporting that does not stop resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The whole walk loaded no variable file
    NoFilesFound,
    /// The walk stopped without meeting the boundary directory
    NoBoundaryMatch {
        boundary: String,
        stopped_at: NormalizedPath,
    },
    /// A level of the chain has no `group_vars` directory
    MissingGroupVars { directory: NormalizedPath },
    /// A file in `group_vars` was not selected
    SkippedFile {
        path: NormalizedPath,
        reason: SkipReason,
    },
    /// A top-level or child group declaration was not a mapping
    SkippedGroup { name: String, reason: String },
    /// A field inside a group declaration was ignored
    IgnoredField {
        group: String,
        field: String,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFilesFound => write!(f, "no group_vars/*.yml|*.yaml files loaded"),
            Self::NoBoundaryMatch {
                boundary,
                stopped_at,
            } => write!(f, "boundary '{boundary}' not reached, stopped at {stopped_at}"),
            Self::MissingGroupVars { directory } => write!(f, "no group_vars in {directory}"),
            Self::SkippedFile { path, reason } => write!(f, "skipped {path}: {reason}"),
            Self::SkippedGroup { name, reason } => write!(f, "skipped group '{name}': {reason}"),
            Self::IgnoredField {
                group,
                field,
                reason,
            } => write!(f, "ignored '{field}' in group '{group}': {reason}"),
        }
    }
}

/// Everything a resolution run decided, for display and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub inventory: NormalizedPath,
    pub settings: InventorySettings,
    pub tokens: ScopeTokens,
    pub allowed: AllowList,
    pub chain: PathChain,
    /// Farthest level first, the order files were applied in
    pub levels: Vec<LevelScan>,
    pub merged: MergedVariableSet,
    /// Number of hosts whose inline variables were flushed last
    pub host_overrides: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl InventoryReport {
    /// Files loaded, in load order.
    pub fn loaded_files(&self) -> &[NormalizedPath] {
        &self.merged.sources
    }
}
