//! Canned inventory layouts.
//!
//! [`webshop_staging`] builds the tree most suites share:
//!
//! ```text
//! <root>/
//!   group_vars/all.yaml                      above the boundary, never loaded
//!   inventories/
//!     group_vars/all.yaml
//!     acme/
//!       group_vars/main.yaml
//!       webshop/
//!         group_vars/webshop.yaml
//!         group_vars/other.yaml              not allowed
//!         group_vars/notes.txt               not yaml
//!         staging/
//!           group_vars/all.yml
//!           group_vars/staging.yaml
//!           inventory.yaml
//! ```

use autovars_fs::NormalizedPath;

use crate::TestTree;

/// Directory of the staging inventory, relative to the tree root.
pub const STAGING_DIR: &str = "inventories/acme/webshop/staging";

pub const STAGING_INVENTORY: &str = "\
plugin: autovars
web:
  hosts:
    web1:
      port: 9090
    web2:
  vars:
    tier: frontend
db:
  hosts:
    db1:
";

/// Lay out the shared webshop tree and return the inventory path.
pub fn webshop_staging(tree: &TestTree) -> NormalizedPath {
    tree.write_group_vars(".", "all.yaml", "leak: true\n");
    tree.write_group_vars(
        "inventories",
        "all.yaml",
        "region: eu\nport: 1\nntp:\n  servers: [pool.ntp.org]\n  enabled: true\n",
    );
    tree.write_group_vars(
        "inventories/acme",
        "main.yaml",
        "owner: acme\nntp:\n  servers: [ntp.acme.internal]\n",
    );
    tree.write_group_vars(
        "inventories/acme/webshop",
        "webshop.yaml",
        "app: webshop\nreplicas: 2\n",
    );
    tree.write_group_vars("inventories/acme/webshop", "other.yaml", "should_not: load\n");
    tree.write_group_vars("inventories/acme/webshop", "notes.txt", "not yaml\n");
    tree.write_group_vars(STAGING_DIR, "all.yml", "replicas: 1\n");
    tree.write_group_vars(STAGING_DIR, "staging.yaml", "debug: true\nport: 8080\n");
    tree.write_inventory(STAGING_DIR, STAGING_INVENTORY)
}
