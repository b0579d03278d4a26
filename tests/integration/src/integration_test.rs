//! End-to-end resolution against the checked-in fixture project
//!
//! `test-fixtures/projects/shop` holds a full inventories tree with
//! `group_vars` at several depths. The fixture is only ever read.

use autovars_core::{
    AutovarsPlugin, Diagnostic, Error, InMemoryInventory, InventoryReport, InventorySink,
    SkipReason, Value,
};
use autovars_fs::{NormalizedPath, OsFileSource};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn project_root() -> NormalizedPath {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/projects/shop");
    autovars_fs::io::canonicalize(&path).unwrap()
}

fn plugin() -> AutovarsPlugin<OsFileSource> {
    AutovarsPlugin::with_project_root(project_root())
}

fn parse(rel: &str) -> Result<(InMemoryInventory, InventoryReport), Error> {
    let mut registry = InMemoryInventory::new();
    let report = plugin().parse(&project_root().join(rel), &mut registry)?;
    Ok((registry, report))
}

fn relative(report: &InventoryReport) -> Vec<String> {
    let root = project_root();
    report
        .loaded_files()
        .iter()
        .map(|p| p.as_str()[root.as_str().len() + 1..].to_string())
        .collect()
}

mod production {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVENTORY: &str = "inventories/acme/webshop/production/inventory.yaml";

    #[test]
    fn loads_the_expected_files_in_order() {
        let (_, report) = parse(INVENTORY).unwrap();

        assert_eq!(
            relative(&report),
            vec![
                "inventories/group_vars/all.yaml",
                "inventories/acme/group_vars/main.yaml",
                "inventories/acme/webshop/group_vars/webshop.yaml",
                "inventories/acme/webshop/production/group_vars/production.yml",
            ]
        );
        assert!(report.chain.reached_boundary());
    }

    #[test]
    fn skips_unlisted_and_foreign_files() {
        let (_, report) = parse(INVENTORY).unwrap();
        let skipped: Vec<(String, SkipReason)> = report
            .diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::SkippedFile { path, reason } => {
                    Some((path.file_name()?.to_string(), *reason))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            skipped,
            vec![
                ("README.md".to_string(), SkipReason::NotYaml),
                ("billing.yaml".to_string(), SkipReason::NotAllowed),
            ]
        );
    }

    #[test]
    fn merged_path_vars_land_on_all() {
        let (registry, _) = parse(INVENTORY).unwrap();
        let all = &registry.group("all").unwrap().vars;

        assert_eq!(all["region"], Value::from("eu-west"));
        assert_eq!(all["log_level"], Value::from("warn"));
        assert_eq!(all["replicas"], Value::from(6_i64));
        assert_eq!(all["app_name"], Value::from("webshop"));
        assert_eq!(all["owner"], Value::from("acme"));
        assert!(!all.contains_key("leaked"));

        let ntp = all["ntp"].as_mapping().unwrap();
        assert_eq!(ntp["enabled"], Value::from(true));
        assert_eq!(ntp["servers"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn effective_host_vars() {
        let (registry, _) = parse(INVENTORY).unwrap();

        let web1 = registry.host_vars("web-01").unwrap();
        assert_eq!(web1["log_level"], Value::from("warn"));
        assert_eq!(web1["http_port"], Value::from(8080_i64));

        let web2 = registry.host_vars("web-02").unwrap();
        assert_eq!(web2["log_level"], Value::from("debug"));

        let web3 = registry.host_vars("web-03").unwrap();
        assert_eq!(web3["replicas"], Value::from(1_i64));
        assert_eq!(web3["http_port"], Value::from(8080_i64));

        let db1 = registry.host_vars("db-01").unwrap();
        assert!(db1["http_port"].is_null());
        assert_eq!(db1["replicas"], Value::from(6_i64));

        assert_eq!(registry.host_count(), 4);
    }

    #[test]
    fn canary_nests_under_webservers() {
        let (registry, _) = parse(INVENTORY).unwrap();
        let listing = registry.to_listing();

        assert_eq!(listing["webservers"]["children"], serde_json::json!(["canary"]));
        assert_eq!(
            listing["all"]["children"],
            serde_json::json!(["databases", "ungrouped", "webservers"])
        );
    }

    #[test]
    fn repeated_runs_agree() {
        let (first, first_report) = parse(INVENTORY).unwrap();
        let (second, second_report) = parse(INVENTORY).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
    }
}

mod staging {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVENTORY: &str = "inventories/acme/webshop/staging/inventory.yml";

    #[test]
    fn project_name_override_switches_files() {
        let (registry, report) = parse(INVENTORY).unwrap();

        assert_eq!(report.tokens.project.as_deref(), Some("billing"));
        assert_eq!(report.tokens.environment.as_deref(), Some("staging"));
        assert_eq!(
            report.allowed.iter().collect::<Vec<_>>(),
            vec!["all", "billing", "main", "shared", "staging"]
        );

        let all = &registry.group("all").unwrap().vars;
        assert_eq!(all["app_name"], Value::from("billing"));
        assert_eq!(all["shared_flag"], Value::from(true));
        assert!(!all.contains_key("replicas"));
    }

    #[test]
    fn hosts_under_all_are_ungrouped() {
        let (registry, _) = parse(INVENTORY).unwrap();
        assert_eq!(registry.ungrouped_hosts(), vec!["stage-01"]);
        assert_eq!(registry.host_vars("stage-01").unwrap()["region"], Value::from("eu-west"));
    }
}

#[test]
fn inventory_without_hosts_is_fatal() {
    let err = parse("inventories/acme/empty/dev/inventory.yaml").unwrap_err();
    assert!(matches!(err, Error::EmptyResult), "got {err:?}");
}
