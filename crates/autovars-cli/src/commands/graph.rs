//! Graph command: the group tree

use autovars_core::{ALL_GROUP, InMemoryInventory};

use crate::context::Loaded;
use crate::error::Result;

/// Run the graph command
pub fn run_graph(loaded: &Loaded) -> Result<()> {
    print!("{}", render_graph(&loaded.registry));
    Ok(())
}

/// Render the tree below `all`, groups prefixed with `@`, children and
/// hosts sorted by name.
pub fn render_graph(registry: &InMemoryInventory) -> String {
    let mut out = String::new();
    draw_group(registry, ALL_GROUP, 0, &mut out);
    out
}

fn draw_group(registry: &InMemoryInventory, group: &str, depth: usize, out: &mut String) {
    out.push_str(&prefix(depth));
    out.push('@');
    out.push_str(group);
    out.push_str(":\n");

    let mut children = registry.child_groups(group);
    children.sort_unstable();
    for child in children {
        draw_group(registry, child, depth + 1, out);
    }

    let mut hosts = registry.member_hosts(group);
    hosts.sort_unstable();
    for host in hosts {
        out.push_str(&prefix(depth + 1));
        out.push_str(host);
        out.push('\n');
    }
}

fn prefix(depth: usize) -> String {
    if depth == 0 {
        return String::new();
    }
    format!("{}--", "  |".repeat(depth))
}
