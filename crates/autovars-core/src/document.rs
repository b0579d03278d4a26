//! YAML parse boundary
//!
//! Reads the topology document and variable files through a
//! [`FileSource`] and checks their top-level shape. Read and decode failures
//! become [`Error::UnreadableFile`]; a document that decodes to something
//! other than a mapping is [`Error::MalformedDocument`].

use autovars_fs::{FileSource, NormalizedPath};

use crate::value::{VariableMap, mapping_from_yaml};
use crate::{Error, Result};

/// Load the topology document as a raw, order-preserving YAML mapping.
///
/// An empty document is an empty mapping.
pub fn load_document<F: FileSource + ?Sized>(
    source: &F,
    path: &NormalizedPath,
) -> Result<serde_yaml::Mapping> {
    let text = read(source, path)?;
    parse_mapping(&text, path)
}

/// Load a variable file into a [`VariableMap`].
pub fn load_variable_file<F: FileSource + ?Sized>(
    source: &F,
    path: &NormalizedPath,
) -> Result<VariableMap> {
    let text = read(source, path)?;
    parse_variable_map(&text, path)
}

/// Parse variable file content; `path` is used for error messages only.
pub fn parse_variable_map(text: &str, path: &NormalizedPath) -> Result<VariableMap> {
    let mapping = parse_mapping(text, path)?;
    mapping_from_yaml(mapping).map_err(|e| Error::InvalidKey {
        path: path.to_native(),
        key: e.0,
    })
}

fn read<F: FileSource + ?Sized>(source: &F, path: &NormalizedPath) -> Result<String> {
    source.read_text(path).map_err(|e| Error::UnreadableFile {
        path: path.to_native(),
        message: e.to_string(),
    })
}

fn parse_mapping(text: &str, path: &NormalizedPath) -> Result<serde_yaml::Mapping> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| Error::UnreadableFile {
            path: path.to_native(),
            message: e.to_string(),
        })?;

    match value {
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::MalformedDocument {
            path: path.to_native(),
            message: format!("expected a mapping at the top level, got {}", yaml_kind(&other)),
        }),
    }
}

/// Short name of a raw YAML value kind, for messages.
pub(crate) fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "bool",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autovars_fs::MemoryFileSource;

    fn path() -> NormalizedPath {
        NormalizedPath::new("/inv/group_vars/all.yaml")
    }

    #[test]
    fn empty_file_is_empty_map() {
        assert!(parse_variable_map("", &path()).unwrap().is_empty());
        assert!(parse_variable_map("# only a comment\n", &path()).unwrap().is_empty());
    }

    #[test]
    fn sequence_top_level_is_malformed() {
        let err = parse_variable_map("- a\n- b\n", &path()).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }), "got {err:?}");
        assert!(err.to_string().contains("all.yaml"));
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn scalar_top_level_is_malformed() {
        let err = parse_variable_map("just text", &path()).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn invalid_yaml_is_unreadable() {
        let err = parse_variable_map("a: [unclosed", &path()).unwrap_err();
        assert!(matches!(err, Error::UnreadableFile { .. }), "got {err:?}");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let source = MemoryFileSource::new();
        let err = load_variable_file(&source, &path()).unwrap_err();
        assert!(matches!(err, Error::UnreadableFile { .. }));
    }

    #[test]
    fn document_keeps_declaration_order() {
        let source = MemoryFileSource::new()
            .with_file("/inv/inventory.yaml", "zeta: {}\nalpha: {}\nmid: {}\n");
        let doc = load_document(&source, &NormalizedPath::new("/inv/inventory.yaml")).unwrap();
        let keys: Vec<&str> = doc.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
