//! Inventory variable resolution engine
//!
//! Resolves per-host variables for an inventory made of two inputs:
//!
//! - an `inventory.yaml` topology document declaring groups, hosts,
//!   child groups and inline variables
//! - `group_vars/*.yaml` files discovered by walking upward from the
//!   document's directory to an `inventories` boundary directory
//!
//! # Pipeline
//!
//! ```text
//!   inventory.yaml ──> Topology ──> HierarchyBuilder ──┐ (graph + pending host vars)
//!                                                     ├──> apply ──> InventorySink
//!   start dir ──> walk ──> CandidateFileSelector ──> deep_merge ┘ (merged path vars)
//! ```
//!
//! Path variables land on the target group before pending host variables are
//! flushed, so a host-level declaration always wins.
//!
//! # Example
//!
//! ```ignore
//! use autovars_core::{AutovarsPlugin, InMemoryInventory};
//! use autovars_fs::NormalizedPath;
//!
//! let plugin = AutovarsPlugin::with_project_root("/srv/project");
//! let mut inventory = InMemoryInventory::new();
//! let report = plugin.parse(
//!     &NormalizedPath::new("/srv/project/inventories/acme/shop/prod/inventory.yaml"),
//!     &mut inventory,
//! )?;
//! println!("loaded {} files", report.loaded_files().len());
//! ```

pub mod document;
pub mod error;
pub mod hierarchy;
pub mod merge;
pub mod plugin;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod topology;
pub mod value;
pub mod walker;

pub use error::{Error, Result};
pub use hierarchy::{HierarchyBuilder, PendingHostVars};
pub use merge::{deep_merge, merged};
pub use plugin::{AutovarsPlugin, verify_file};
pub use registry::{ALL_GROUP, Group, Host, InMemoryInventory, InventorySink, UNGROUPED_GROUP};
pub use report::{Diagnostic, InventoryReport};
pub use resolver::{
    LevelScan, MergedVariableSet, Resolution, ResolveRequest, ResolverOptions, VariableResolver,
    apply,
};
pub use selector::{
    AllowList, CandidateFile, CandidateFileSelector, DEFAULT_GROUP_FILES, RankKey, RankTier,
    Selection, SkipReason, SkippedFile,
};
pub use topology::{HostEntry, InventorySettings, ScopeTokens, Topology, TopologyNode};
pub use value::{Scalar, Value, VariableMap};
pub use walker::{DirectoryLevel, PathChain, StopReason, walk};
