//! Upward directory chain discovery
//!
//! Computes which directories contribute `group_vars`, starting at the
//! inventory document's directory and climbing toward the filesystem root.
//! The walk is a pure computation over [`NormalizedPath`]; whether a level
//! actually holds a `group_vars` directory is decided later, per level.

use autovars_fs::NormalizedPath;
use serde::Serialize;

/// One directory in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryLevel {
    pub path: NormalizedPath,
    /// 0 for the farthest ancestor, increasing toward the start directory
    pub rank: usize,
}

/// Why the walk stopped climbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last level is the boundary directory itself
    Boundary,
    /// Climbing further would leave the project root
    RootLimit,
    /// The last level is the filesystem root
    FilesystemRoot,
}

/// The ordered directory levels produced by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathChain {
    /// Nearest-first
    levels: Vec<DirectoryLevel>,
    stop: StopReason,
}

impl PathChain {
    /// Levels from the start directory upward.
    pub fn nearest_first(&self) -> &[DirectoryLevel] {
        &self.levels
    }

    /// Levels from the farthest ancestor down to the start directory.
    ///
    /// This is the application order: nearer directories override farther
    /// ones.
    pub fn farthest_first(&self) -> impl Iterator<Item = &DirectoryLevel> {
        self.levels.iter().rev()
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }

    pub fn reached_boundary(&self) -> bool {
        self.stop == StopReason::Boundary
    }

    /// The last directory visited.
    pub fn top(&self) -> &NormalizedPath {
        // A walk always emits its start directory
        &self.levels[self.levels.len() - 1].path
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Walk from `start_dir` toward the filesystem root.
///
/// Each directory is emitted before the stop conditions are checked, so the
/// start directory is always part of the chain and a boundary directory is
/// scanned inclusively. Climbing stops when:
///
/// - the current directory's name equals `boundary_name`, or
/// - the parent would not be within `root_limit`, or
/// - the current directory is the filesystem root.
///
/// Every step strictly shortens the path, so the walk terminates and never
/// revisits a directory.
pub fn walk(
    start_dir: &NormalizedPath,
    boundary_name: &str,
    root_limit: &NormalizedPath,
) -> PathChain {
    let mut visited = Vec::new();
    let mut current = start_dir.clone();

    let stop = loop {
        tracing::debug!(dir = %current, "Adding directory to vars chain");
        visited.push(current.clone());

        if current.file_name() == Some(boundary_name) {
            break StopReason::Boundary;
        }
        let Some(parent) = current.parent() else {
            break StopReason::FilesystemRoot;
        };
        if !parent.is_within(root_limit) {
            tracing::debug!(root = %root_limit, "Reached outside project root, stopping");
            break StopReason::RootLimit;
        }
        current = parent;
    };

    let count = visited.len();
    let levels = visited
        .into_iter()
        .enumerate()
        .map(|(idx, path)| DirectoryLevel {
            path,
            rank: count - 1 - idx,
        })
        .collect();

    PathChain { levels, stop }
}
