//! End-to-end inventory parsing
//!
//! [`AutovarsPlugin::parse`] reads an `inventory.yaml`, resolves the
//! `group_vars` chain above it and writes the result into an
//! [`InventorySink`]. All file reading happens before the sink is touched,
//! so an unreadable or malformed file fails the run with the registry still
//! untouched.

use autovars_fs::{FileSource, NormalizedPath, OsFileSource, is_inventory_file_name};

use crate::document::load_document;
use crate::hierarchy::HierarchyBuilder;
use crate::registry::InventorySink;
use crate::report::InventoryReport;
use crate::resolver::{ResolveRequest, ResolverOptions, VariableResolver, apply};
use crate::selector::AllowList;
use crate::topology::{PLUGIN_NAME, ScopeTokens, Topology};
use crate::{Error, Result};

/// Whether `path` names a file this plugin parses.
pub fn verify_file(path: &NormalizedPath) -> bool {
    path.file_name().is_some_and(is_inventory_file_name)
}

/// Parses inventory documents and their `group_vars` chains.
#[derive(Debug, Clone)]
pub struct AutovarsPlugin<F> {
    resolver: VariableResolver<F>,
    options: ResolverOptions,
}

impl AutovarsPlugin<OsFileSource> {
    /// Plugin reading the host filesystem, bounded by `project_root`.
    pub fn with_project_root(project_root: impl Into<NormalizedPath>) -> Self {
        Self::new(OsFileSource::new(), ResolverOptions::new(project_root))
    }
}

impl<F: FileSource> AutovarsPlugin<F> {
    pub fn new(source: F, options: ResolverOptions) -> Self {
        Self {
            resolver: VariableResolver::new(source),
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Parse `inventory_path` into `sink`.
    ///
    /// On error the sink may hold part of the graph and must be discarded.
    pub fn parse<S: InventorySink + ?Sized>(
        &self,
        inventory_path: &NormalizedPath,
        sink: &mut S,
    ) -> Result<InventoryReport> {
        if !verify_file(inventory_path) {
            return Err(Error::UnsupportedInventoryFile {
                path: inventory_path.to_native(),
            });
        }

        let mut diagnostics = Vec::new();
        let document = load_document(self.resolver.source(), inventory_path)?;
        let topology = Topology::from_document(document, inventory_path, &mut diagnostics)?;
        let settings = topology.settings.clone();

        if let Some(plugin) = settings.plugin.as_deref()
            && plugin != PLUGIN_NAME
        {
            return Err(Error::PluginMismatch {
                path: inventory_path.to_native(),
                found: plugin.to_string(),
            });
        }

        let tokens = ScopeTokens::resolve(inventory_path, &self.options.boundary_name, &settings);
        let allowed = AllowList::new(&settings.allowed_group_files)
            .with_token(tokens.project.as_deref())
            .with_token(tokens.environment.as_deref());

        tracing::debug!(project = ?tokens.project, "Project name");
        tracing::debug!(env = ?tokens.environment, "Env name");
        tracing::debug!(
            allowed = ?allowed.iter().collect::<Vec<_>>(),
            "Allowed group_var base names"
        );

        let start_dir = inventory_path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."));
        let resolution = self.resolver.resolve(&ResolveRequest {
            start_dir: &start_dir,
            boundary_name: &self.options.boundary_name,
            root_limit: &self.options.project_root,
            group_vars_dir: &self.options.group_vars_dir,
            allowed: &allowed,
            project_token: tokens.project.as_deref(),
            env_token: tokens.environment.as_deref(),
        })?;

        // Phase 1: graph and group vars, host vars held back
        let pending = HierarchyBuilder::new(sink).build(&topology)?;
        let host_overrides = pending.len();

        // Phase 2: path vars onto the target group, then host vars
        apply(sink, &resolution.merged, pending, &self.options.target_group)?;

        diagnostics.extend(resolution.diagnostics);
        Ok(InventoryReport {
            inventory: inventory_path.clone(),
            settings,
            tokens,
            allowed,
            chain: resolution.chain,
            levels: resolution.levels,
            merged: resolution.merged,
            host_overrides,
            diagnostics,
        })
    }
}
