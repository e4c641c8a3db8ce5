//! Layer merge logic
//!
//! Merges option trees key by key:
//! - Keys present in one layer only: kept
//! - Keys present in both: overlay wins
//! - Lists: REPLACE (no concatenation)

use flagtree_core::{ConfigTree, TreeError};

/// Merge two trees; the overlay wins on every shared key.
///
/// The result is rebuilt from the flat maps and carries no cached encoding.
pub fn merge_trees(base: &ConfigTree, overlay: &ConfigTree) -> Result<ConfigTree, TreeError> {
    let mut merged = base.to_generic_map();
    for (key, value) in overlay.to_generic_map() {
        merged.insert(key, value);
    }
    ConfigTree::from_map(merged)
}

/// Merge trees in order (first is base, last has highest precedence).
///
/// A single layer is returned unchanged, so a lone decoded document still
/// encodes to its original bytes.
pub fn merge_layers(layers: Vec<ConfigTree>) -> Result<ConfigTree, TreeError> {
    let mut layers = layers.into_iter();
    let Some(first) = layers.next() else {
        return Ok(ConfigTree::new());
    };
    layers.try_fold(first, |merged, layer| merge_trees(&merged, &layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagtree_core::{GenericValue, OptionValue};
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_tree(GenericValue::from(value)).unwrap()
    }

    #[test]
    fn test_overlay_wins() {
        let base = tree(json!({"log-level": "info"}));
        let overlay = tree(json!({"log-level": "debug"}));
        let merged = merge_trees(&base, &overlay).unwrap();
        assert_eq!(merged.get("log-level"), Some(&OptionValue::from("debug")));
    }

    #[test]
    fn test_disjoint_keys_kept() {
        let base = tree(json!({"es": {"server-urls": "http://es:9200"}}));
        let overlay = tree(json!({"es": {"username": "elastic"}}));
        let merged = merge_trees(&base, &overlay).unwrap();

        assert_eq!(merged.len(), 2);
        assert!(merged.get("es.server-urls").is_some());
        assert!(merged.get("es.username").is_some());
    }

    #[test]
    fn test_list_replaced() {
        let base = tree(json!({"tags": ["a", "b", "c"]}));
        let overlay = tree(json!({"tags": ["x"]}));
        let merged = merge_trees(&base, &overlay).unwrap();
        assert_eq!(
            merged.get("tags"),
            Some(&OptionValue::List(vec!["x".to_string()]))
        );
    }

    #[test]
    fn test_merge_drops_cache() {
        let base = ConfigTree::decode(br#"{"a": "1"}"#).unwrap();
        let overlay = ConfigTree::decode(br#"{"b": "2"}"#).unwrap();
        let merged = merge_trees(&base, &overlay).unwrap();

        assert!(merged.cached_encoding().is_none());
        assert_eq!(merged.encode().unwrap(), br#"{"a":"1","b":"2"}"#.to_vec());
    }

    #[test]
    fn test_merge_layers_precedence() {
        let defaults = tree(json!({"log-level": "info", "memory": {"max-traces": "1000"}}));
        let host = tree(json!({"log-level": "warn"}));
        let cli = tree(json!({"memory": {"max-traces": "50"}}));

        let merged = merge_layers(vec![defaults, host, cli]).unwrap();

        assert_eq!(merged.get("log-level"), Some(&OptionValue::from("warn")));
        assert_eq!(merged.get("memory.max-traces"), Some(&OptionValue::from("50")));
    }

    #[test]
    fn test_merge_layers_single_keeps_cache() {
        let bytes = br#"{"a" : 1}"#;
        let merged = merge_layers(vec![ConfigTree::decode(bytes).unwrap()]).unwrap();
        assert_eq!(merged.encode().unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_merge_layers_empty() {
        let merged = merge_layers(Vec::new()).unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.encode().unwrap(), b"{}".to_vec());
    }
}
