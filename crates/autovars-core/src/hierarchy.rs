//! Group/host graph construction
//!
//! First phase of the two-phase protocol: the topology is written into the
//! registry immediately (groups, membership, parent/child links and group
//! variables), while host variables are only collected. They are flushed by
//! [`apply`](crate::apply) after every
//! broader-scope variable, which is what lets host declarations win.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::Result;
use crate::merge::deep_merge;
use crate::registry::InventorySink;
use crate::topology::{Topology, TopologyNode};
use crate::value::VariableMap;

/// Host variables waiting to be applied.
///
/// A host declared under several groups accumulates its inline variables
/// with [`deep_merge`], the later declaration winning on conflicts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PendingHostVars {
    hosts: BTreeMap<String, VariableMap>,
}

impl PendingHostVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `vars` into whatever is already pending for `host`.
    pub fn merge(&mut self, host: &str, vars: VariableMap) {
        let pending = self.hosts.entry(host.to_string()).or_default();
        deep_merge(pending, vars);
    }

    pub fn get(&self, host: &str) -> Option<&VariableMap> {
        self.hosts.get(host)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableMap)> {
        self.hosts.iter().map(|(host, vars)| (host.as_str(), vars))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl IntoIterator for PendingHostVars {
    type Item = (String, VariableMap);
    type IntoIter = std::collections::btree_map::IntoIter<String, VariableMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.into_iter()
    }
}

/// Writes a [`Topology`] into an [`InventorySink`].
pub struct HierarchyBuilder<'s, S: InventorySink + ?Sized> {
    sink: &'s mut S,
    pending: PendingHostVars,
}

impl<'s, S: InventorySink + ?Sized> HierarchyBuilder<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            pending: PendingHostVars::new(),
        }
    }

    /// Register every declared group and host, returning the host variables
    /// that still have to be applied.
    pub fn build(mut self, topology: &Topology) -> Result<PendingHostVars> {
        for group in &topology.groups {
            self.visit(group)?;
        }
        Ok(self.pending)
    }

    fn visit(&mut self, node: &TopologyNode) -> Result<()> {
        self.sink.add_group(&node.name)?;

        for host in &node.hosts {
            self.sink.add_host(&host.name, &node.name)?;
            if let Some(vars) = &host.vars {
                self.pending.merge(&host.name, vars.clone());
            }
        }

        for child in &node.children {
            self.visit(child)?;
            self.sink.add_child(&node.name, &child.name)?;
        }

        // Group variables are not deferred
        for (key, value) in &node.vars {
            self.sink.set_variable(&node.name, key, value.clone())?;
        }

        tracing::debug!(
            group = %node.name,
            hosts = node.hosts.len(),
            children = node.children.len(),
            "Registered group"
        );
        Ok(())
    }
}
