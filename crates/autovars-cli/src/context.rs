//! Run context
//!
//! Turns the shared CLI options into a configured plugin and runs it
//! against one inventory document.

use std::path::Path;

use autovars_core::{AutovarsPlugin, InMemoryInventory, InventoryReport, ResolverOptions};
use autovars_fs::{FileSource, NormalizedPath, OsFileSource};

use crate::cli::ResolverArgs;
use crate::error::{CliError, Result};

/// A parsed inventory and the report of how it was resolved.
#[derive(Debug)]
pub struct Loaded {
    pub registry: InMemoryInventory,
    pub report: InventoryReport,
}

/// Plugin configured from the command line.
pub struct RunContext<F> {
    cwd: NormalizedPath,
    plugin: AutovarsPlugin<F>,
}

impl RunContext<OsFileSource> {
    /// Resolve options against the process working directory.
    pub fn from_args(args: &ResolverArgs, cwd: &Path) -> Result<Self> {
        let cwd = autovars_fs::io::canonicalize(cwd)?;
        let project_root = match &args.project_root {
            Some(root) => autovars_fs::io::canonicalize(&cwd.to_native().join(root))?,
            None => cwd.clone(),
        };
        tracing::debug!(root = %project_root, "Project root");
        Ok(Self::new(OsFileSource::new(), cwd, options(args, project_root)))
    }

    /// Locate an inventory on disk.
    ///
    /// The containing directory is canonicalized so the upward walk sees the
    /// same spelling as the project root.
    pub fn locate(&self, inventory: &Path) -> Result<NormalizedPath> {
        let path = self.resolve_path(inventory);
        let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
            return Err(CliError::user(format!(
                "{} does not name a file",
                inventory.display()
            )));
        };
        let dir = autovars_fs::io::canonicalize(&dir.to_native())?;
        Ok(dir.join(name))
    }
}

impl<F: FileSource> RunContext<F> {
    pub fn new(source: F, cwd: NormalizedPath, options: ResolverOptions) -> Self {
        Self {
            cwd,
            plugin: AutovarsPlugin::new(source, options),
        }
    }

    /// `inventory` made absolute against the working directory.
    pub fn resolve_path(&self, inventory: &Path) -> NormalizedPath {
        if inventory.is_absolute() {
            NormalizedPath::new(inventory)
        } else {
            self.cwd.join(&inventory.to_string_lossy())
        }
    }

    /// Parse the inventory at `path`.
    pub fn load(&self, path: &NormalizedPath) -> Result<Loaded> {
        if !autovars_core::verify_file(path) {
            return Err(CliError::user(format!(
                "{path} is not an inventory.yaml or inventory.yml file"
            )));
        }

        let mut registry = InMemoryInventory::new();
        let report = self.plugin.parse(path, &mut registry)?;
        for diagnostic in &report.diagnostics {
            tracing::debug!(%diagnostic, "Diagnostic");
        }
        Ok(Loaded { registry, report })
    }
}

fn options(args: &ResolverArgs, project_root: NormalizedPath) -> ResolverOptions {
    ResolverOptions::new(project_root)
        .with_boundary_name(&args.boundary)
        .with_group_vars_dir(&args.group_vars_dir)
        .with_target_group(&args.target_group)
}
