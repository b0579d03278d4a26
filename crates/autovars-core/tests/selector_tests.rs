//! Candidate file filtering and ranking

use autovars_core::{AllowList, CandidateFileSelector, RankTier, SkipReason};
use autovars_fs::{MemoryFileSource, NormalizedPath};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn dir() -> NormalizedPath {
    NormalizedPath::new("/inv/group_vars")
}

fn load_order(selector: &CandidateFileSelector<'_>, names: &[&str]) -> Vec<String> {
    selector
        .select_from_names(&dir(), names)
        .candidates
        .into_iter()
        .filter_map(|c| c.path.file_name().map(str::to_string))
        .collect()
}

#[rstest]
#[case(&["all.yaml", "main.yaml", "proj1.yaml", "staging.yaml"])]
#[case(&["staging.yaml", "proj1.yaml", "main.yaml", "all.yaml"])]
#[case(&["proj1.yaml", "all.yaml", "staging.yaml", "main.yaml"])]
fn tiers_order_regardless_of_listing(#[case] listing: &[&str]) {
    let allowed = AllowList::new(["all", "main", "proj1", "staging"]);
    let selector = CandidateFileSelector::new(&allowed, Some("proj1"), Some("staging"));

    assert_eq!(
        load_order(&selector, listing),
        vec!["all.yaml", "main.yaml", "proj1.yaml", "staging.yaml"]
    );
}

#[test]
fn other_allowed_names_load_last_alphabetically() {
    let allowed = AllowList::new(["zeta", "alpha", "Beta"]);
    let selector = CandidateFileSelector::new(&allowed, None, None);

    assert_eq!(
        load_order(&selector, &["zeta.yaml", "beta.yml", "all.yaml", "alpha.yaml"]),
        vec!["all.yaml", "alpha.yaml", "beta.yml", "zeta.yaml"]
    );
}

#[rstest]
#[case("ALL.YAML", RankTier::All)]
#[case("Main.yml", RankTier::Main)]
#[case("Shop.yaml", RankTier::Project)]
#[case("PROD.yml", RankTier::Environment)]
fn matching_is_case_insensitive(#[case] file_name: &str, #[case] tier: RankTier) {
    let allowed = AllowList::new(["shop", "prod"]);
    let selector = CandidateFileSelector::new(&allowed, Some("shop"), Some("Prod"));

    let selection = selector.select_from_names(&dir(), [file_name]);
    assert_eq!(selection.candidates.len(), 1, "{file_name} was not selected");
    assert_eq!(selection.candidates[0].rank.tier, tier);
}

#[test]
fn yaml_and_yml_of_same_base_both_load() {
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, None, None);

    assert_eq!(
        load_order(&selector, &["all.yml", "all.yaml"]),
        vec!["all.yaml", "all.yml"]
    );
}

#[test]
fn unlisted_and_non_yaml_files_are_skipped() {
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, None, None);

    let names = ["all.yaml", "secrets.yaml", "README.md", ".yaml", "main"];
    let selection = selector.select_from_names(&dir(), names);

    assert_eq!(selection.candidates.len(), 1);
    let reasons: Vec<(&str, SkipReason)> = selection
        .skipped
        .iter()
        .map(|s| (s.path.as_str(), s.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("/inv/group_vars/.yaml", SkipReason::NotYaml),
            ("/inv/group_vars/README.md", SkipReason::NotYaml),
            ("/inv/group_vars/main", SkipReason::NotYaml),
            ("/inv/group_vars/secrets.yaml", SkipReason::NotAllowed),
        ]
    );
}

#[test]
fn tokens_are_not_allowed_unless_listed() {
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, Some("shop"), Some("prod"));
    assert_eq!(load_order(&selector, &["shop.yaml", "prod.yaml"]), Vec::<String>::new());

    let widened = AllowList::default()
        .with_token(Some("shop"))
        .with_token(Some("prod"));
    let selector = CandidateFileSelector::new(&widened, Some("shop"), Some("prod"));
    assert_eq!(
        load_order(&selector, &["prod.yaml", "shop.yaml"]),
        vec!["shop.yaml", "prod.yaml"]
    );
}

#[test]
fn empty_tokens_count_as_absent() {
    let allowed = AllowList::new(["x"]);
    let selector = CandidateFileSelector::new(&allowed, Some(""), Some(""));
    let selection = selector.select_from_names(&dir(), ["x.yaml"]);
    assert_eq!(selection.candidates[0].rank.tier, RankTier::Other);
}

#[test]
fn allow_list_always_has_defaults() {
    let allowed = AllowList::new(["shared"]);
    assert!(allowed.contains("all"));
    assert!(allowed.contains("MAIN"));
    assert_eq!(allowed.iter().collect::<Vec<_>>(), vec!["all", "main", "shared"]);
}

#[test]
fn select_reads_through_file_source() {
    let source = MemoryFileSource::new()
        .with_file("/inv/group_vars/main.yaml", "a: 1")
        .with_file("/inv/group_vars/all.yaml", "a: 0")
        .with_file("/inv/group_vars/nested/all.yaml", "a: 2");
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, None, None);

    let selection = selector.select(&source, &dir()).unwrap().unwrap();
    let paths: Vec<&str> = selection.candidates.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec!["/inv/group_vars/all.yaml", "/inv/group_vars/main.yaml"]);
}

#[test]
fn missing_directory_is_not_a_selection() {
    let source = MemoryFileSource::new();
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, None, None);

    assert_eq!(selector.select(&source, &dir()).unwrap(), None);
}

#[test]
fn empty_directory_selects_nothing() {
    let source = MemoryFileSource::new().with_file("/inv/group_vars/notes.txt", "x");
    let allowed = AllowList::default();
    let selector = CandidateFileSelector::new(&allowed, None, None);

    let selection = selector.select(&source, &dir()).unwrap().unwrap();
    assert!(selection.candidates.is_empty());
    assert_eq!(selection.skipped.len(), 1);
}

proptest! {
    #[test]
    fn order_is_independent_of_listing(
        mut names in prop::collection::vec("[a-c]{1,2}\\.(yaml|yml|txt)", 0..10),
        seed in any::<u64>(),
    ) {
        names.sort();
        names.dedup();
        let allowed = AllowList::new(["a", "b", "c", "ab", "ba"]);
        let selector = CandidateFileSelector::new(&allowed, Some("b"), Some("a"));

        let sorted = selector.select_from_names(&dir(), &names);
        let rotation = (seed as usize) % names.len().max(1);
        names.rotate_left(rotation);
        names.reverse();
        let shuffled = selector.select_from_names(&dir(), &names);

        prop_assert_eq!(sorted, shuffled);
    }
}
