//! Topology document model
//!
//! The inventory document is a mapping whose top-level keys name groups,
//! except for a few reserved settings keys:
//!
//! ```yaml
//! plugin: autovars
//! allowed_group_files: [all, main, shared]
//! project_name: webshop      # optional override
//!
//! webservers:
//!   hosts:
//!     web1: { http_port: 8080 }
//!     web2:
//!   children:
//!     canary:
//!       hosts:
//!         web3:
//!   vars:
//!     tier: frontend
//! ```

use autovars_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::document::yaml_kind;
use crate::report::Diagnostic;
use crate::selector::DEFAULT_GROUP_FILES;
use crate::value::{VariableMap, key_to_string, mapping_from_yaml};
use crate::{Error, Result};

/// Name the `plugin` key must carry when present.
pub const PLUGIN_NAME: &str = "autovars";

/// Top-level keys that configure the plugin instead of declaring groups.
pub const RESERVED_KEYS: [&str; 3] = ["plugin", "allowed_group_files", "project_name"];

fn default_group_files() -> Vec<String> {
    DEFAULT_GROUP_FILES.iter().map(|s| s.to_string()).collect()
}

/// Plugin settings read from the reserved keys of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default)]
    pub plugin: Option<String>,

    /// Base names (without extension) loadable from `group_vars`
    #[serde(default = "default_group_files")]
    pub allowed_group_files: Vec<String>,

    /// Overrides the project token inferred from the path
    #[serde(default)]
    pub project_name: Option<String>,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            plugin: None,
            allowed_group_files: default_group_files(),
            project_name: None,
        }
    }
}

/// A host declared under a group.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub name: String,
    /// Inline host-scoped variables, if the declaration carried a mapping
    pub vars: Option<VariableMap>,
}

/// One group declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyNode {
    pub name: String,
    /// Hosts in declaration order
    pub hosts: Vec<HostEntry>,
    /// Child groups in declaration order
    pub children: Vec<TopologyNode>,
    pub vars: VariableMap,
}

/// A parsed inventory document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    pub settings: InventorySettings,
    /// Top-level groups in declaration order
    pub groups: Vec<TopologyNode>,
}

impl Topology {
    /// Split a raw document into settings and group declarations.
    ///
    /// Group declarations that are not mappings are skipped and reported
    /// through `diagnostics`, including null declarations.
    pub fn from_document(
        document: serde_yaml::Mapping,
        path: &NormalizedPath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self> {
        let mut settings_map = serde_yaml::Mapping::new();
        let mut groups = Vec::new();

        for (key, value) in document {
            let name = group_key(key, path)?;
            if RESERVED_KEYS.contains(&name.as_str()) {
                settings_map.insert(serde_yaml::Value::String(name), value);
                continue;
            }
            if let Some(node) = parse_group(name, value, path, diagnostics)? {
                groups.push(node);
            }
        }

        let settings: InventorySettings =
            serde_yaml::from_value(serde_yaml::Value::Mapping(settings_map)).map_err(|e| {
                Error::MalformedDocument {
                    path: path.to_native(),
                    message: format!("invalid plugin settings: {e}"),
                }
            })?;

        Ok(Self { settings, groups })
    }
}

fn group_key(key: serde_yaml::Value, path: &NormalizedPath) -> Result<String> {
    key_to_string(key).map_err(|e| Error::InvalidKey {
        path: path.to_native(),
        key: e.0,
    })
}

fn parse_vars(value: serde_yaml::Value, path: &NormalizedPath) -> Result<VariableMap> {
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            mapping_from_yaml(mapping).map_err(|e| Error::InvalidKey {
                path: path.to_native(),
                key: e.0,
            })
        }
        _ => Ok(VariableMap::new()),
    }
}

fn parse_group(
    name: String,
    value: serde_yaml::Value,
    path: &NormalizedPath,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<TopologyNode>> {
    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Tagged(tagged) => {
            return parse_group(name, tagged.value, path, diagnostics);
        }
        other => {
            let reason = format!("expected a mapping, got {}", yaml_kind(&other));
            tracing::warn!(group = %name, %reason, "Skipping group declaration");
            diagnostics.push(Diagnostic::SkippedGroup { name, reason });
            return Ok(None);
        }
    };

    let mut node = TopologyNode {
        name,
        ..TopologyNode::default()
    };

    for (key, field) in mapping {
        let field_name = group_key(key, path)?;
        match (field_name.as_str(), field) {
            (_, serde_yaml::Value::Null) => {}
            ("hosts", serde_yaml::Value::Mapping(hosts)) => {
                for (host, host_data) in hosts {
                    let host = group_key(host, path)?;
                    let vars = match host_data {
                        serde_yaml::Value::Mapping(_) => Some(parse_vars(host_data, path)?),
                        _ => None,
                    };
                    node.hosts.push(HostEntry { name: host, vars });
                }
            }
            ("children", serde_yaml::Value::Mapping(children)) => {
                for (child, child_data) in children {
                    let child = group_key(child, path)?;
                    if let Some(child_node) = parse_group(child, child_data, path, diagnostics)? {
                        node.children.push(child_node);
                    }
                }
            }
            ("vars", vars @ serde_yaml::Value::Mapping(_)) => {
                node.vars = parse_vars(vars, path)?;
            }
            (field @ ("hosts" | "children" | "vars"), other) => {
                let reason = format!("expected a mapping, got {}", yaml_kind(&other));
                ignore_field(&node.name, field, reason, diagnostics);
            }
            (field, _) => {
                ignore_field(&node.name, field, "unexpected key".to_string(), diagnostics);
            }
        }
    }

    Ok(Some(node))
}

fn ignore_field(group: &str, field: &str, reason: String, diagnostics: &mut Vec<Diagnostic>) {
    tracing::warn!(group, field, %reason, "Ignoring group field");
    diagnostics.push(Diagnostic::IgnoredField {
        group: group.to_string(),
        field: field.to_string(),
        reason,
    });
}

/// Project and environment identifiers of an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeTokens {
    pub project: Option<String>,
    pub environment: Option<String>,
}

impl ScopeTokens {
    /// Infer tokens from the inventory file location.
    ///
    /// Expects `<boundary>/<org>/<project>/<env>/inventory.yaml`: the project
    /// is the second directory below the nearest `boundary_name` component,
    /// the environment the third. Only directory components count, never the
    /// file name itself.
    pub fn infer(inventory_path: &NormalizedPath, boundary_name: &str) -> Self {
        let Some(dir) = inventory_path.parent() else {
            return Self::default();
        };
        let parts: Vec<&str> = dir.components().collect();
        let Some(idx) = parts.iter().rposition(|p| *p == boundary_name) else {
            return Self::default();
        };
        Self {
            project: parts.get(idx + 2).map(|s| s.to_string()),
            environment: parts.get(idx + 3).map(|s| s.to_string()),
        }
    }

    /// Inferred tokens with the configured `project_name` taking precedence.
    pub fn resolve(
        inventory_path: &NormalizedPath,
        boundary_name: &str,
        settings: &InventorySettings,
    ) -> Self {
        let mut tokens = Self::infer(inventory_path, boundary_name);
        if let Some(project) = settings.project_name.as_deref().filter(|p| !p.is_empty()) {
            tokens.project = Some(project.to_string());
        }
        tokens
    }
}
