//! Constants and enums for inventory filesystem paths.

use std::path::Path;

/// Extensions (compared case-insensitively) a variable file may carry.
pub const VARS_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Well-known inventory path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryPath {
    /// The `group_vars` directory scanned at every level of the chain
    GroupVarsDir,
    /// The `inventories` directory that bounds the upward walk
    InventoriesDir,
    /// `inventory.yaml`, the topology document
    InventoryYaml,
    /// `inventory.yml`, the alternate spelling of the topology document
    InventoryYml,
}

impl InventoryPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupVarsDir => "group_vars",
            Self::InventoriesDir => "inventories",
            Self::InventoryYaml => "inventory.yaml",
            Self::InventoryYml => "inventory.yml",
        }
    }
}

impl AsRef<Path> for InventoryPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for InventoryPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for InventoryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `file_name` names a topology document this plugin accepts.
pub fn is_inventory_file_name(file_name: &str) -> bool {
    file_name == InventoryPath::InventoryYaml.as_str()
        || file_name == InventoryPath::InventoryYml.as_str()
}

/// Whether `extension` (without the dot) is a variable file extension.
pub fn is_vars_extension(extension: &str) -> bool {
    VARS_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}
