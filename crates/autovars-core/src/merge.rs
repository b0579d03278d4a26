//! Deep merge of variable maps
//!
//! Nested mappings merge key by key; every other kind of value, sequences
//! included, is replaced wholesale by the later source. The operation is
//! total and order-sensitive: callers fold sources lowest precedence first.

use crate::value::{Value, VariableMap};

/// Merge `source` into `destination`, `source` winning on conflicts.
///
/// Keys present only in `destination` are left untouched. When both sides
/// hold a mapping under the same key the two mappings are merged
/// recursively; otherwise the source value replaces the destination value,
/// whatever its kind.
pub fn deep_merge(destination: &mut VariableMap, source: VariableMap) {
    for (key, incoming) in source {
        if let Value::Mapping(nested) = incoming {
            if let Some(Value::Mapping(existing)) = destination.get_mut(&key) {
                deep_merge(existing, nested);
                continue;
            }
            destination.insert(key, Value::Mapping(nested));
        } else {
            destination.insert(key, incoming);
        }
    }
}

/// Return `destination` with `source` merged into it.
pub fn merged(mut destination: VariableMap, source: VariableMap) -> VariableMap {
    deep_merge(&mut destination, source);
    destination
}
