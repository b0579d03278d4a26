//! Resolution and two-phase application

use autovars_core::{
    AllowList, AutovarsPlugin, Diagnostic, Error, HierarchyBuilder, InMemoryInventory,
    InventorySink, MergedVariableSet, PendingHostVars, ResolveRequest, ResolverOptions, Topology,
    Value, VariableResolver, apply,
};
use autovars_fs::{MemoryFileSource, NormalizedPath};
use pretty_assertions::assert_eq;

const INVENTORY: &str = "/p/inventories/acme/shop/prod/inventory.yaml";

fn plugin(source: MemoryFileSource) -> AutovarsPlugin<MemoryFileSource> {
    AutovarsPlugin::new(source, ResolverOptions::new("/p"))
}

fn parse(source: MemoryFileSource) -> Result<InMemoryInventory, Error> {
    let mut inventory = InMemoryInventory::new();
    plugin(source).parse(&NormalizedPath::new(INVENTORY), &mut inventory)?;
    Ok(inventory)
}

mod application_order {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn host_declaration_beats_every_path_level() {
        let source = MemoryFileSource::new()
            .with_file("/p/inventories/group_vars/all.yaml", "key: 1\n")
            .with_file("/p/inventories/acme/shop/prod/group_vars/all.yaml", "key: 1\n")
            .with_file(
                INVENTORY,
                "web:\n  hosts:\n    w1:\n      key: 2\n    w2:\n",
            );

        let inventory = parse(source).unwrap();

        assert_eq!(inventory.host_vars("w1").unwrap()["key"], Value::from(2_i64));
        assert_eq!(inventory.host_vars("w2").unwrap()["key"], Value::from(1_i64));
    }

    #[test]
    fn path_vars_override_document_all_vars_per_key() {
        let source = MemoryFileSource::new()
            .with_file("/p/inventories/group_vars/all.yaml", "a: from_path\n")
            .with_file(
                INVENTORY,
                "all:\n  vars:\n    a: from_doc\n    b: from_doc\n  hosts:\n    h1:\n",
            );

        let inventory = parse(source).unwrap();
        let all = &inventory.group("all").unwrap().vars;

        assert_eq!(all["a"], Value::from("from_path"));
        assert_eq!(all["b"], Value::from("from_doc"));
    }

    #[test]
    fn apply_writes_target_before_hosts() {
        let mut inventory = InMemoryInventory::new();
        inventory.add_group("web").unwrap();
        inventory.add_host("w1", "web").unwrap();

        let mut merged = MergedVariableSet::default();
        merged.vars.insert("key".to_string(), Value::from("path"));
        let mut pending = PendingHostVars::new();
        pending.merge(
            "w1",
            [("key".to_string(), Value::from("host"))].into_iter().collect(),
        );

        apply(&mut inventory, &merged, pending, "all").unwrap();

        assert_eq!(inventory.group("all").unwrap().vars["key"], Value::from("path"));
        assert_eq!(inventory.host("w1").unwrap().vars["key"], Value::from("host"));
    }

    #[test]
    fn apply_creates_custom_target_group() {
        let mut inventory = InMemoryInventory::new();
        inventory.add_group("web").unwrap();
        inventory.add_host("w1", "web").unwrap();

        let mut merged = MergedVariableSet::default();
        merged.vars.insert("k".to_string(), Value::from(true));
        apply(&mut inventory, &merged, PendingHostVars::new(), "discovered").unwrap();

        assert_eq!(inventory.group("discovered").unwrap().vars["k"], Value::from(true));
    }
}

mod empty_results {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn document_without_hosts_fails_even_with_files() {
        let source = MemoryFileSource::new()
            .with_file("/p/inventories/group_vars/all.yaml", "region: eu\n")
            .with_file(INVENTORY, "plugin: autovars\n");

        let err = parse(source).unwrap_err();
        assert!(matches!(err, Error::EmptyResult), "got {err:?}");
    }

    #[test]
    fn groups_without_hosts_fail() {
        let source = MemoryFileSource::new()
            .with_file(INVENTORY, "web:\n  vars:\n    a: 1\ndb:\n");

        assert!(matches!(parse(source), Err(Error::EmptyResult)));
    }

    #[test]
    fn apply_on_empty_registry_fails() {
        let mut inventory = InMemoryInventory::new();
        let err = apply(
            &mut inventory,
            &MergedVariableSet::default(),
            PendingHostVars::new(),
            "all",
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }

    #[test]
    fn no_files_is_reported_not_fatal() {
        let source = MemoryFileSource::new().with_file(INVENTORY, "web:\n  hosts:\n    w1:\n");
        let mut inventory = InMemoryInventory::new();

        let report = plugin(source)
            .parse(&NormalizedPath::new(INVENTORY), &mut inventory)
            .unwrap();

        assert!(report.merged.is_empty());
        assert!(report.diagnostics.contains(&Diagnostic::NoFilesFound));
        assert_eq!(inventory.host_count(), 1);
    }
}

#[test]
fn repeated_runs_produce_identical_registries() {
    let source = MemoryFileSource::new()
        .with_file("/p/inventories/group_vars/all.yaml", "region: eu\nntp: {a: 1}\n")
        .with_file("/p/inventories/acme/group_vars/main.yaml", "ntp: {b: 2}\n")
        .with_file("/p/inventories/acme/shop/group_vars/shop.yaml", "app: shop\n")
        .with_file(
            INVENTORY,
            "web:\n  hosts:\n    w1: {port: 80}\n  children:\n    canary:\n      hosts:\n        w2:\n",
        );
    let plugin = plugin(source);
    let path = NormalizedPath::new(INVENTORY);

    let mut first = InMemoryInventory::new();
    let first_report = plugin.parse(&path, &mut first).unwrap();
    let mut second = InMemoryInventory::new();
    let second_report = plugin.parse(&path, &mut second).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
    assert_eq!(first.to_listing(), second.to_listing());
}

#[test]
fn reapplying_into_same_registry_is_stable() {
    let source = MemoryFileSource::new()
        .with_file("/p/inventories/group_vars/all.yaml", "region: eu\n")
        .with_file(INVENTORY, "web:\n  hosts:\n    w1: {port: 80}\n");
    let plugin = plugin(source);
    let path = NormalizedPath::new(INVENTORY);

    let mut inventory = InMemoryInventory::new();
    plugin.parse(&path, &mut inventory).unwrap();
    let once = inventory.clone();
    plugin.parse(&path, &mut inventory).unwrap();

    assert_eq!(inventory, once);
}

#[test]
fn resolver_and_builder_compose_by_hand() {
    let source = MemoryFileSource::new()
        .with_file("/p/inventories/group_vars/all.yaml", "port: 1\n")
        .with_file("/p/inventories/dev/group_vars/all.yaml", "port: 2\n");
    let allowed = AllowList::default();
    let start = NormalizedPath::new("/p/inventories/dev");
    let root = NormalizedPath::new("/p");

    let resolution = VariableResolver::new(&source)
        .resolve(&ResolveRequest {
            start_dir: &start,
            boundary_name: "inventories",
            root_limit: &root,
            group_vars_dir: "group_vars",
            allowed: &allowed,
            project_token: None,
            env_token: None,
        })
        .unwrap();
    assert_eq!(resolution.merged.vars["port"], Value::from(2_i64));

    let document: serde_yaml::Mapping =
        serde_yaml::from_str("db:\n  hosts:\n    d1: {port: 3}\n").unwrap();
    let topology = Topology::from_document(
        document,
        &NormalizedPath::new("/p/inventories/dev/inventory.yaml"),
        &mut Vec::new(),
    )
    .unwrap();

    let mut inventory = InMemoryInventory::new();
    let pending = HierarchyBuilder::new(&mut inventory).build(&topology).unwrap();
    apply(&mut inventory, &resolution.merged, pending, "all").unwrap();

    assert_eq!(inventory.host_vars("d1").unwrap()["port"], Value::from(3_i64));
    assert_eq!(inventory.group("all").unwrap().vars["port"], Value::from(2_i64));
}
