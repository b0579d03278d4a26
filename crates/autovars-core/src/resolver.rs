//! Variable resolution across the directory chain
//!
//! [`VariableResolver::resolve`] walks the chain farthest level first and,
//! within each level, loads the ranked `group_vars` candidates lowest
//! precedence first, folding every file into one accumulator with
//! [`deep_merge`]. [`apply`] is the second phase of the
//! two-phase protocol: merged path variables go onto the target group, then
//! the pending host variables are flushed so they always win.

use autovars_fs::{FileSource, InventoryPath, NormalizedPath};
use serde::Serialize;

use crate::document::load_variable_file;
use crate::hierarchy::PendingHostVars;
use crate::merge::deep_merge;
use crate::registry::{ALL_GROUP, InventorySink};
use crate::report::Diagnostic;
use crate::selector::{AllowList, CandidateFile, CandidateFileSelector, SkippedFile};
use crate::value::VariableMap;
use crate::walker::{DirectoryLevel, PathChain, walk};
use crate::{Error, Result};

/// Engine options that do not come from the inventory document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverOptions {
    /// Directory name that bounds the upward walk (inclusive)
    pub boundary_name: String,
    /// Subdirectory scanned at every level
    pub group_vars_dir: String,
    /// Group that receives the merged path variables
    pub target_group: String,
    /// The walk never climbs out of this directory
    pub project_root: NormalizedPath,
}

impl ResolverOptions {
    pub fn new(project_root: impl Into<NormalizedPath>) -> Self {
        Self {
            boundary_name: InventoryPath::InventoriesDir.as_str().to_string(),
            group_vars_dir: InventoryPath::GroupVarsDir.as_str().to_string(),
            target_group: ALL_GROUP.to_string(),
            project_root: project_root.into(),
        }
    }

    pub fn with_boundary_name(mut self, name: impl Into<String>) -> Self {
        self.boundary_name = name.into();
        self
    }

    pub fn with_group_vars_dir(mut self, name: impl Into<String>) -> Self {
        self.group_vars_dir = name.into();
        self
    }

    pub fn with_target_group(mut self, name: impl Into<String>) -> Self {
        self.target_group = name.into();
        self
    }
}

/// Inputs of one resolution.
#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    pub start_dir: &'a NormalizedPath,
    pub boundary_name: &'a str,
    pub root_limit: &'a NormalizedPath,
    pub group_vars_dir: &'a str,
    pub allowed: &'a AllowList,
    pub project_token: Option<&'a str>,
    pub env_token: Option<&'a str>,
}

/// The folded path-level variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedVariableSet {
    pub vars: VariableMap,
    /// Files folded in, in load order
    pub sources: Vec<NormalizedPath>,
}

impl MergedVariableSet {
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// What one level of the chain contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelScan {
    pub level: DirectoryLevel,
    pub group_vars: NormalizedPath,
    /// `false` when the level has no `group_vars` directory
    pub present: bool,
    /// Loaded files, in load order
    pub loaded: Vec<CandidateFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Result of [`VariableResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub chain: PathChain,
    /// Farthest level first
    pub levels: Vec<LevelScan>,
    pub merged: MergedVariableSet,
    pub diagnostics: Vec<Diagnostic>,
}

/// Folds `group_vars` files found along a directory chain.
#[derive(Debug, Clone)]
pub struct VariableResolver<F> {
    source: F,
}

impl<F: FileSource> VariableResolver<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    /// Walk, select and merge.
    ///
    /// Finding no file at all is not an error: the merged set is empty and
    /// [`Diagnostic::NoFilesFound`] is recorded.
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> Result<Resolution> {
        let chain = walk(request.start_dir, request.boundary_name, request.root_limit);
        let selector =
            CandidateFileSelector::new(request.allowed, request.project_token, request.env_token);

        let mut diagnostics = Vec::new();
        if !chain.reached_boundary() {
            tracing::info!(
                boundary = request.boundary_name,
                stopped_at = %chain.top(),
                "Boundary directory not found, walk stopped early"
            );
            diagnostics.push(Diagnostic::NoBoundaryMatch {
                boundary: request.boundary_name.to_string(),
                stopped_at: chain.top().clone(),
            });
        }

        let mut merged = MergedVariableSet::default();
        let mut levels = Vec::with_capacity(chain.len());

        for level in chain.farthest_first() {
            let group_vars = level.path.join(request.group_vars_dir);
            tracing::debug!(dir = %group_vars, "Scanning");

            let listing = selector.select(&self.source, &group_vars)?;
            let present = listing.is_some();
            if !present {
                diagnostics.push(Diagnostic::MissingGroupVars {
                    directory: level.path.clone(),
                });
            }
            let selection = listing.unwrap_or_default();

            for candidate in &selection.candidates {
                tracing::debug!(file = %candidate.path, "Loading vars");
                let vars = load_variable_file(&self.source, &candidate.path)?;
                deep_merge(&mut merged.vars, vars);
                merged.sources.push(candidate.path.clone());
            }
            for skipped in &selection.skipped {
                diagnostics.push(Diagnostic::SkippedFile {
                    path: skipped.path.clone(),
                    reason: skipped.reason,
                });
            }

            levels.push(LevelScan {
                level: level.clone(),
                group_vars,
                present,
                loaded: selection.candidates,
                skipped: selection.skipped,
            });
        }

        if merged.sources.is_empty() {
            tracing::info!("No group_vars/*.yml|*.yaml files loaded");
            diagnostics.push(Diagnostic::NoFilesFound);
        }

        Ok(Resolution {
            chain,
            levels,
            merged,
            diagnostics,
        })
    }
}

/// Apply merged path variables, then pending host variables.
///
/// The merged set lands on `target_scope` (created if needed) before
/// any host variable is written, so a host-level declaration always has
/// the final word. Fails with [`Error::EmptyResult`] when the registry
/// holds no host afterwards.
pub fn apply<S: InventorySink + ?Sized>(
    sink: &mut S,
    merged: &MergedVariableSet,
    pending: PendingHostVars,
    target_scope: &str,
) -> Result<()> {
    sink.add_group(target_scope)?;
    for (key, value) in &merged.vars {
        sink.set_variable(target_scope, key, value.clone())?;
    }

    for (host, vars) in pending {
        for (key, value) in vars {
            sink.set_variable(&host, &key, value)?;
        }
    }

    if sink.host_count() == 0 {
        return Err(Error::EmptyResult);
    }
    Ok(())
}
