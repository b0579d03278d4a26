//! Candidate variable file selection and ranking
//!
//! Within one `group_vars` directory only YAML files whose base name is on
//! the allow-list are loaded, in a fixed precedence order:
//!
//! | tier | base name |
//! |------|-----------|
//! | 0 | `all` |
//! | 1 | `main` |
//! | 2 | the project token |
//! | 3 | the environment token |
//! | 4 | anything else, alphabetical |
//!
//! Lower tiers load first and are overridden by higher ones. Ties are broken
//! by name, never by directory iteration order.

use autovars_fs::{FileSource, NormalizedPath, is_vars_extension};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::Result;

/// Base names every allow-list contains.
pub const DEFAULT_GROUP_FILES: [&str; 2] = ["all", "main"];

/// Case-insensitive set of loadable base names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    /// Build an allow-list from configured names.
    ///
    /// `all` and `main` are always included.
    pub fn new<I, S>(configured: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            names: DEFAULT_GROUP_FILES.iter().map(|n| n.to_string()).collect(),
        };
        for name in configured {
            list.insert(name.as_ref());
        }
        list
    }

    /// Add a name; empty names are ignored.
    pub fn insert(&mut self, name: &str) {
        if !name.is_empty() {
            self.names.insert(name.to_lowercase());
        }
    }

    /// Add an optional identifying token.
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            self.insert(token);
        }
        self
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.names.contains(&base_name.to_lowercase())
    }

    /// Lower-cased names, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

/// Precedence bucket within one directory, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    All,
    Main,
    Project,
    Environment,
    Other,
}

/// Sort key for a candidate file within one directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RankKey {
    pub tier: RankTier,
    /// Lower-cased base name
    pub base: String,
    /// Exact file name, the final tie-breaker (`all.yaml` before `all.yml`)
    pub file_name: String,
}

/// A variable file eligible for loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub path: NormalizedPath,
    pub rank: RankKey,
}

/// Why a file in a `group_vars` directory was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotYaml,
    NotAllowed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotYaml => write!(f, "not a .yaml/.yml file"),
            Self::NotAllowed => write!(f, "not in allowed list"),
        }
    }
}

/// A file that was listed but not selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: NormalizedPath,
    pub reason: SkipReason,
}

/// Selected and skipped files of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Lowest precedence first
    pub candidates: Vec<CandidateFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Filters and ranks the files of a `group_vars` directory.
#[derive(Debug, Clone)]
pub struct CandidateFileSelector<'a> {
    allowed: &'a AllowList,
    project: Option<String>,
    environment: Option<String>,
}

impl<'a> CandidateFileSelector<'a> {
    /// Empty tokens are treated as absent.
    pub fn new(
        allowed: &'a AllowList,
        project_token: Option<&str>,
        env_token: Option<&str>,
    ) -> Self {
        let normalize = |token: Option<&str>| {
            token
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase)
        };
        Self {
            allowed,
            project: normalize(project_token),
            environment: normalize(env_token),
        }
    }

    /// Rank a base name (extension already stripped).
    pub fn rank(&self, base_name: &str, file_name: &str) -> RankKey {
        let base = base_name.to_lowercase();
        let tier = match base.as_str() {
            "all" => RankTier::All,
            "main" => RankTier::Main,
            b if self.project.as_deref() == Some(b) => RankTier::Project,
            b if self.environment.as_deref() == Some(b) => RankTier::Environment,
            _ => RankTier::Other,
        };
        RankKey {
            tier,
            base,
            file_name: file_name.to_string(),
        }
    }

    /// List `directory` through `source` and select its candidates.
    ///
    /// Returns `None` when the directory does not exist.
    pub fn select<F: FileSource + ?Sized>(
        &self,
        source: &F,
        directory: &NormalizedPath,
    ) -> Result<Option<Selection>> {
        Ok(source
            .list_files(directory)?
            .map(|names| self.select_from_names(directory, names)))
    }

    /// Select candidates from an already listed set of file names.
    pub fn select_from_names<I, S>(&self, directory: &NormalizedPath, names: I) -> Selection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Selection::default();

        for name in names {
            let name = name.as_ref();
            let path = directory.join(name);

            let Some(base) = yaml_base_name(name) else {
                selection.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::NotYaml,
                });
                continue;
            };
            if !self.allowed.contains(base) {
                tracing::debug!(file = name, "Skipping file, not in allowed list");
                selection.skipped.push(SkippedFile {
                    path,
                    reason: SkipReason::NotAllowed,
                });
                continue;
            }

            let rank = self.rank(base, name);
            selection.candidates.push(CandidateFile { path, rank });
        }

        selection.candidates.sort_by(|a, b| a.rank.cmp(&b.rank));
        selection.skipped.sort_by(|a, b| a.path.cmp(&b.path));
        selection
    }
}

/// Base name of a `.yaml`/`.yml` file, or `None` for any other file.
fn yaml_base_name(file_name: &str) -> Option<&str> {
    let idx = file_name.rfind('.')?;
    if idx == 0 || !is_vars_extension(&file_name[idx + 1..]) {
        return None;
    }
    Some(&file_name[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_base_name_requires_extension() {
        assert_eq!(yaml_base_name("all.yaml"), Some("all"));
        assert_eq!(yaml_base_name("Main.YML"), Some("Main"));
        assert_eq!(yaml_base_name("all.json"), None);
        assert_eq!(yaml_base_name("all"), None);
        assert_eq!(yaml_base_name(".yaml"), None);
    }

    #[test]
    fn allow_list_always_has_defaults() {
        let list = AllowList::new(["Project1"]);
        assert!(list.contains("ALL"));
        assert!(list.contains("main"));
        assert!(list.contains("project1"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["all", "main", "project1"]);
    }

    #[test]
    fn project_token_outranks_environment_when_equal() {
        let list = AllowList::new(["same"]);
        let selector = CandidateFileSelector::new(&list, Some("same"), Some("same"));
        assert_eq!(selector.rank("same", "same.yaml").tier, RankTier::Project);
    }
}
