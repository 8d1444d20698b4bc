//! Sparse marker trees: sensitivity and unknown-value overlays
//!
//! Terraform reports `before_sensitive`, `after_sensitive` and `after_unknown`
//! as trees shaped like the resource value but with boolean leaves. A `true`
//! on an inner node marks the whole subtree. Missing keys mean "not marked".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::path::{PathSegment, parse_path};

/// A sensitivity or unknown-value overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerTree {
    Flag(bool),
    List(Vec<MarkerTree>),
    Map(BTreeMap<String, MarkerTree>),
}

impl Default for MarkerTree {
    fn default() -> Self {
        MarkerTree::Flag(false)
    }
}

impl MarkerTree {
    /// Build a marker tree from raw plan JSON
    ///
    /// Anything that is not a boolean, array or object (null, numbers,
    /// strings) degrades to an unset flag.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => MarkerTree::Flag(*flag),
            Value::Array(items) => MarkerTree::List(items.iter().map(Self::from_value).collect()),
            Value::Object(map) => MarkerTree::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_value(value)))
                    .collect(),
            ),
            _ => MarkerTree::Flag(false),
        }
    }

    fn is_true(&self) -> bool {
        matches!(self, MarkerTree::Flag(true))
    }

    fn child(&self, segment: &PathSegment) -> Option<&MarkerTree> {
        match self {
            MarkerTree::List(items) => segment.as_index().and_then(|index| items.get(index)),
            MarkerTree::Map(map) => map.get(&*segment.as_key()),
            MarkerTree::Flag(_) => None,
        }
    }

    /// Whether the property at `segments` is marked
    pub fn is_marked_at(&self, segments: &[PathSegment]) -> bool {
        let mut node = self;

        for segment in segments {
            if node.is_true() {
                return true;
            }

            match node.child(segment) {
                Some(next) => node = next,
                None => return false,
            }
        }

        match node {
            MarkerTree::Flag(flag) => *flag,
            MarkerTree::List(items) => items.iter().any(MarkerTree::is_true),
            MarkerTree::Map(_) => false,
        }
    }

    /// Whether any node anywhere in the tree is `true`
    pub fn any_marked(&self) -> bool {
        match self {
            MarkerTree::Flag(flag) => *flag,
            MarkerTree::List(items) => items.iter().any(MarkerTree::any_marked),
            MarkerTree::Map(map) => map.values().any(MarkerTree::any_marked),
        }
    }

    /// Whether the property at `segments`, or anything below it, is marked
    pub fn contains_marked_at(&self, segments: &[PathSegment]) -> bool {
        let mut node = self;

        for segment in segments {
            if node.is_true() {
                return true;
            }

            match node.child(segment) {
                Some(next) => node = next,
                None => return false,
            }
        }

        node.any_marked()
    }
}

/// Whether `path` is marked in an optional overlay; absence is never marked
pub fn is_marked(map: Option<&MarkerTree>, path: &str) -> bool {
    match map {
        Some(tree) => tree.is_marked_at(&parse_path(path)),
        None => false,
    }
}

/// Whether `path` is sensitive according to a sensitivity overlay
pub fn is_sensitive(map: Option<&MarkerTree>, path: &str) -> bool {
    is_marked(map, path)
}

/// Whether the value at `path` is only known after apply
pub fn is_unknown(map: Option<&MarkerTree>, path: &str) -> bool {
    is_marked(map, path)
}

/// Whether printing the value at `path` would reveal a sensitive value
///
/// Unlike [`is_sensitive`], an object counts when any of its members is
/// sensitive, since its printed form carries them.
pub fn contains_sensitive(map: Option<&MarkerTree>, path: &str) -> bool {
    map.is_some_and(|tree| tree.contains_marked_at(&parse_path(path)))
}

/// Before/after sensitivity of one property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropertySensitivity {
    pub before_sensitive: bool,
    pub after_sensitive: bool,
}

impl PropertySensitivity {
    /// Check both overlays for the same property path
    pub fn resolve(before: Option<&MarkerTree>, after: Option<&MarkerTree>, path: &str) -> Self {
        Self {
            before_sensitive: is_sensitive(before, path),
            after_sensitive: is_sensitive(after, path),
        }
    }

    /// Like [`resolve`](Self::resolve), but also set when a member of the
    /// property is sensitive; use this to decide whether to mask a value
    pub fn resolve_masking(
        before: Option<&MarkerTree>,
        after: Option<&MarkerTree>,
        path: &str,
    ) -> Self {
        Self {
            before_sensitive: contains_sensitive(before, path),
            after_sensitive: contains_sensitive(after, path),
        }
    }

    pub fn any(&self) -> bool {
        self.before_sensitive || self.after_sensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> MarkerTree {
        MarkerTree::from_value(&value)
    }

    #[test]
    fn test_flag_on_key() {
        let map = tree(json!({"a": true}));
        assert!(is_sensitive(Some(&map), "a"));
        assert!(!is_sensitive(Some(&map), "b"));
    }

    #[test]
    fn test_array_elements_and_any_element_rule() {
        let map = tree(json!({"a": [true, true, false]}));
        assert!(!is_sensitive(Some(&map), "a[2]"));
        assert!(is_sensitive(Some(&map), "a[0]"));
        assert!(is_sensitive(Some(&map), "a.1"));
        assert!(is_sensitive(Some(&map), "a"));
    }

    #[test]
    fn test_absent_map_is_never_sensitive() {
        assert!(!is_sensitive(None, "a"));
        assert!(!is_unknown(None, ""));
    }

    #[test]
    fn test_subtree_flag_short_circuits() {
        let map = tree(json!({"settings": true}));
        assert!(is_sensitive(Some(&map), "settings.admin.password"));
        assert!(is_sensitive(Some(&map), "settings[3].x"));

        let whole = tree(json!(true));
        assert!(is_sensitive(Some(&whole), "anything.at.all"));
        assert!(is_sensitive(Some(&whole), ""));
    }

    #[test]
    fn test_type_mismatch_is_false() {
        let map = tree(json!({"a": {"b": true}, "list": [true]}));
        assert!(!is_sensitive(Some(&map), "a[0]"));
        assert!(!is_sensitive(Some(&map), "list.name"));
        assert!(!is_sensitive(Some(&map), "a.c"));
    }

    #[test]
    fn test_object_leaf_is_not_marked() {
        let map = tree(json!({"tags": {"Name": false}}));
        assert!(!is_sensitive(Some(&map), "tags"));
        assert!(!is_sensitive(Some(&map), ""));
    }

    #[test]
    fn test_non_boolean_scalars_degrade_to_unset() {
        let map = tree(json!({"a": "yes", "b": 1, "c": null}));
        assert!(!is_sensitive(Some(&map), "a"));
        assert!(!is_sensitive(Some(&map), "b"));
        assert!(!is_sensitive(Some(&map), "c"));
    }

    #[test]
    fn test_unknown_uses_same_walk() {
        let unknown = tree(json!({"id": true, "rules": [{"arn": true}, {}]}));
        assert!(is_unknown(Some(&unknown), "id"));
        assert!(is_unknown(Some(&unknown), "rules[0].arn"));
        assert!(!is_unknown(Some(&unknown), "rules[1].arn"));
        // Array elements that are objects do not count for the any-element rule
        assert!(!is_unknown(Some(&unknown), "rules"));
    }

    #[test]
    fn test_property_sensitivity_resolves_both_sides() {
        let before = tree(json!({}));
        let after = tree(json!({"password": true}));

        let sensitivity = PropertySensitivity::resolve(Some(&before), Some(&after), "password");
        assert!(!sensitivity.before_sensitive);
        assert!(sensitivity.after_sensitive);
        assert!(sensitivity.any());
    }

    #[test]
    fn test_any_marked() {
        assert!(tree(json!({"a": [false, {"b": true}]})).any_marked());
        assert!(!tree(json!({"a": [false, {}]})).any_marked());
    }

    #[test]
    fn test_contains_sensitive_covers_members() {
        let map = tree(json!({"settings": {"password": true, "port": false}, "rules": [{"key": true}]}));

        assert!(!is_sensitive(Some(&map), "settings"));
        assert!(contains_sensitive(Some(&map), "settings"));
        assert!(contains_sensitive(Some(&map), "settings.password"));
        assert!(!contains_sensitive(Some(&map), "settings.port"));
        assert!(contains_sensitive(Some(&map), "rules"));
        assert!(contains_sensitive(Some(&map), "rules[0]"));
        assert!(contains_sensitive(Some(&map), ""));
        assert!(!contains_sensitive(Some(&map), "tags"));
        assert!(!contains_sensitive(None, "settings"));

        let whole = tree(json!({"settings": true}));
        assert!(contains_sensitive(Some(&whole), "settings.port"));
    }

    #[test]
    fn test_masking_sensitivity_for_parent_path() {
        let before = tree(json!({}));
        let after = tree(json!({"settings": {"password": true}}));

        let exact = PropertySensitivity::resolve(Some(&before), Some(&after), "settings");
        let masking = PropertySensitivity::resolve_masking(Some(&before), Some(&after), "settings");

        assert!(!exact.any());
        assert!(!masking.before_sensitive);
        assert!(masking.after_sensitive);
    }
}
