//! Inventory registry seam
//!
//! Resolution writes its results through [`InventorySink`], the four
//! operations an inventory store exposes. [`InMemoryInventory`] is the
//! bundled implementation used by the CLI and the tests.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::merge::deep_merge;
use crate::value::{Value, VariableMap};
use crate::{Error, Result};

/// Group every host implicitly belongs to.
pub const ALL_GROUP: &str = "all";

/// Group for hosts registered with no other group.
pub const UNGROUPED_GROUP: &str = "ungrouped";

/// Destination of a resolution run.
pub trait InventorySink {
    /// Register a group; registering an existing group is a no-op.
    fn add_group(&mut self, name: &str) -> Result<()>;

    /// Register `host` as a member of `group`.
    fn add_host(&mut self, host: &str, group: &str) -> Result<()>;

    /// Make `child` a child group of `parent`.
    fn add_child(&mut self, parent: &str, child: &str) -> Result<()>;

    /// Set `key` on a group or host scope, replacing any previous value.
    fn set_variable(&mut self, scope: &str, key: &str, value: Value) -> Result<()>;

    /// Number of registered hosts.
    fn host_count(&self) -> usize;
}

/// A group in an [`InMemoryInventory`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Group {
    pub name: String,
    /// Direct member hosts in registration order
    pub hosts: Vec<String>,
    /// Child groups in registration order
    pub children: Vec<String>,
    pub parents: BTreeSet<String>,
    pub vars: VariableMap,
}

/// A host in an [`InMemoryInventory`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Host {
    pub name: String,
    /// Groups the host was registered under
    pub groups: BTreeSet<String>,
    pub vars: VariableMap,
}

/// In-memory group/host graph.
///
/// Starts with `all` and `ungrouped` (a child of `all`). Groups without a
/// registered parent are top-level, that is, implicit children of `all`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InMemoryInventory {
    groups: BTreeMap<String, Group>,
    hosts: BTreeMap<String, Host>,
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInventory {
    pub fn new() -> Self {
        let mut inventory = Self {
            groups: BTreeMap::new(),
            hosts: BTreeMap::new(),
        };
        inventory.insert_group(ALL_GROUP);
        inventory.insert_group(UNGROUPED_GROUP);
        inventory.link(ALL_GROUP, UNGROUPED_GROUP);
        inventory
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }

    /// Groups sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Hosts sorted by name.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    /// Groups with no parent other than `all`, in name order.
    pub fn top_level_groups(&self) -> Vec<&str> {
        self.groups
            .values()
            .filter(|g| g.name != ALL_GROUP && g.parents.iter().all(|p| p == ALL_GROUP))
            .map(|g| g.name.as_str())
            .collect()
    }

    /// Hosts with no group other than `all`.
    pub fn ungrouped_hosts(&self) -> Vec<&str> {
        self.hosts
            .values()
            .filter(|h| h.groups.iter().all(|g| g == ALL_GROUP || g == UNGROUPED_GROUP))
            .map(|h| h.name.as_str())
            .collect()
    }

    /// Child groups as listed: `all` adopts every top-level group.
    pub fn child_groups(&self, group: &str) -> Vec<&str> {
        match (group, self.groups.get(group)) {
            (ALL_GROUP, _) => self.top_level_groups(),
            (_, Some(entry)) => entry.children.iter().map(String::as_str).collect(),
            (_, None) => Vec::new(),
        }
    }

    /// Member hosts as listed: `ungrouped` adopts every host with no other
    /// group.
    pub fn member_hosts(&self, group: &str) -> Vec<&str> {
        match (group, self.groups.get(group)) {
            (UNGROUPED_GROUP, _) => self.ungrouped_hosts(),
            (_, Some(entry)) => entry.hosts.iter().map(String::as_str).collect(),
            (_, None) => Vec::new(),
        }
    }

    /// Effective variables of a host.
    ///
    /// Folds, lowest precedence first: `all`, then every group the host
    /// belongs to directly or through ancestry ordered by (depth, name),
    /// then the host's own variables.
    pub fn host_vars(&self, host: &str) -> Option<VariableMap> {
        let entry = self.hosts.get(host)?;

        let mut related = BTreeSet::new();
        let mut stack: Vec<&str> = entry.groups.iter().map(String::as_str).collect();
        while let Some(name) = stack.pop() {
            if related.insert(name)
                && let Some(group) = self.groups.get(name)
            {
                stack.extend(group.parents.iter().map(String::as_str));
            }
        }
        related.insert(ALL_GROUP);

        let mut depths = BTreeMap::new();
        let mut ordered: Vec<(usize, &str)> = related
            .into_iter()
            .map(|name| (self.depth(name, &mut depths), name))
            .collect();
        ordered.sort();

        let mut vars = VariableMap::new();
        for (_, name) in ordered {
            if let Some(group) = self.groups.get(name) {
                deep_merge(&mut vars, group.vars.clone());
            }
        }
        deep_merge(&mut vars, entry.vars.clone());
        Some(vars)
    }

    /// Distance from `all`; top-level groups have depth 1.
    fn depth<'a>(&'a self, name: &'a str, memo: &mut BTreeMap<&'a str, usize>) -> usize {
        if name == ALL_GROUP {
            return 0;
        }
        if let Some(depth) = memo.get(name) {
            return *depth;
        }
        let depth = match self.groups.get(name) {
            Some(group) => {
                1 + group
                    .parents
                    .iter()
                    .map(|p| self.depth(p, memo))
                    .max()
                    .unwrap_or(0)
            }
            None => 1,
        };
        memo.insert(name, depth);
        depth
    }

    /// Render the graph in the `--list` JSON shape.
    pub fn to_listing(&self) -> serde_json::Value {
        let mut listing = serde_json::Map::new();

        let hostvars: serde_json::Map<String, serde_json::Value> = self
            .hosts
            .keys()
            .filter_map(|name| {
                let vars = self.host_vars(name)?;
                Some((name.clone(), to_json(&vars)))
            })
            .collect();
        listing.insert(
            "_meta".to_string(),
            serde_json::json!({ "hostvars": hostvars }),
        );

        for group in self.groups.values() {
            let mut entry = serde_json::Map::new();

            let hosts = self.member_hosts(&group.name);
            let children = self.child_groups(&group.name);

            if !hosts.is_empty() {
                entry.insert("hosts".to_string(), serde_json::json!(hosts));
            }
            if !children.is_empty() {
                entry.insert("children".to_string(), serde_json::json!(children));
            }
            if !group.vars.is_empty() {
                entry.insert("vars".to_string(), to_json(&group.vars));
            }
            listing.insert(group.name.clone(), serde_json::Value::Object(entry));
        }

        serde_json::Value::Object(listing)
    }

    fn insert_group(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_insert_with(|| Group {
            name: name.to_string(),
            ..Group::default()
        })
    }

    fn link(&mut self, parent: &str, child: &str) {
        if let Some(p) = self.groups.get_mut(parent)
            && !p.children.iter().any(|c| c == child)
        {
            p.children.push(child.to_string());
        }
        if let Some(c) = self.groups.get_mut(child) {
            c.parents.insert(parent.to_string());
        }
    }

    /// Whether `target` is reachable from `from` through child links.
    fn reaches(&self, from: &str, target: &str) -> bool {
        let mut seen = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(name) = stack.pop() {
            if name == target {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(group) = self.groups.get(name) {
                stack.extend(group.children.iter().map(String::as_str));
            }
        }
        false
    }
}

fn to_json(vars: &VariableMap) -> serde_json::Value {
    // Serializing a string-keyed map of plain data cannot fail
    serde_json::to_value(vars).unwrap_or(serde_json::Value::Null)
}

impl InventorySink for InMemoryInventory {
    fn add_group(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::registry("group name must not be empty"));
        }
        self.insert_group(name);
        Ok(())
    }

    fn add_host(&mut self, host: &str, group: &str) -> Result<()> {
        if host.is_empty() {
            return Err(Error::registry("host name must not be empty"));
        }
        let Some(entry) = self.groups.get_mut(group) else {
            return Err(Error::registry(format!(
                "cannot add host '{host}' to unknown group '{group}'"
            )));
        };
        if !entry.hosts.iter().any(|h| h == host) {
            entry.hosts.push(host.to_string());
        }

        let record = self.hosts.entry(host.to_string()).or_insert_with(|| Host {
            name: host.to_string(),
            ..Host::default()
        });
        record.groups.insert(group.to_string());
        Ok(())
    }

    fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
        for name in [parent, child] {
            if !self.groups.contains_key(name) {
                return Err(Error::registry(format!("unknown group '{name}'")));
            }
        }
        if child == ALL_GROUP {
            return Err(Error::registry(format!(
                "'{ALL_GROUP}' cannot be a child of '{parent}'"
            )));
        }
        if parent == child || self.reaches(child, parent) {
            return Err(Error::registry(format!(
                "adding '{child}' as a child of '{parent}' would create a cycle"
            )));
        }
        self.link(parent, child);
        Ok(())
    }

    fn set_variable(&mut self, scope: &str, key: &str, value: Value) -> Result<()> {
        if let Some(group) = self.groups.get_mut(scope) {
            group.vars.insert(key.to_string(), value);
            return Ok(());
        }
        if let Some(host) = self.hosts.get_mut(scope) {
            host.vars.insert(key.to_string(), value);
            return Ok(());
        }
        Err(Error::registry(format!(
            "cannot set '{key}' on unknown group or host '{scope}'"
        )))
    }

    fn host_count(&self) -> usize {
        self.hosts.len()
    }
}
