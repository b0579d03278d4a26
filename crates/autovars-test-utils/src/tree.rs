//! [`TestTree`] builder for inventory test scenarios.

use autovars_fs::NormalizedPath;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for laying out inventories
/// and `group_vars` files.
///
/// The root is canonicalized so upward walks compare against the same
/// spelling the OS reports (macOS puts temp dirs behind a `/var` symlink).
///
/// # Example
///
/// ```rust,no_run
/// use autovars_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_group_vars("inventories", "all.yaml", "region: eu\n");
/// let inventory = tree.write_inventory("inventories/acme/shop/prod", "web:\n  hosts:\n    w1:\n");
/// tree.assert_file_exists("inventories/group_vars/all.yaml");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary project root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = autovars_fs::io::canonicalize(temp_dir.path())
            .unwrap()
            .to_native();
        Self { temp_dir, root }
    }

    /// Root path of the temporary project.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root as a [`NormalizedPath`], ready to use as a walk limit.
    pub fn project_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.root)
    }

    /// Absolute native path of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Absolute normalized path of `rel`.
    pub fn normalized(&self, rel: &str) -> NormalizedPath {
        self.project_root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let full_path = self.path(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Create the directory `rel` and its parents.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let full_path = self.path(rel);
        fs::create_dir_all(&full_path).unwrap();
        full_path
    }

    /// Write `<dir>/inventory.yaml` and return its normalized path.
    pub fn write_inventory(&self, dir: &str, content: &str) -> NormalizedPath {
        let rel = format!("{dir}/inventory.yaml");
        NormalizedPath::new(self.write(&rel, content))
    }

    /// Write `<dir>/group_vars/<file_name>`.
    pub fn write_group_vars(&self, dir: &str, file_name: &str, content: &str) -> PathBuf {
        self.write(&format!("{dir}/group_vars/{file_name}"), content)
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
