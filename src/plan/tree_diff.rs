//! Recursive property diff over before/after (and optional current) values
//!
//! The walk emits one [`PropertyDifference`] per object key or array index
//! at every level it descends into. It only descends into a nested property
//! when that property differs, so unchanged subtrees cost one comparison.
//!
//! Two-way diffs compare `before` against `after`. Three-way diffs add a
//! `current` lane (the drift snapshot) and flag `has_drift` wherever
//! `current` differs from `before`.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use super::equal::deep_equal;
use super::path::join_path;

/// One property-level difference inside a resource value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDifference {
    /// Object key or `[index]` at this level
    pub key: String,

    /// Full property path, e.g. `network_rules[0].default_action`
    pub path: String,

    pub before: Option<Value>,

    /// Observed value; only set by three-way diffs
    pub current: Option<Value>,

    pub after: Option<Value>,

    /// `before` and `after` differ
    pub changed: bool,

    /// `before` and `current` differ; `None` for two-way diffs
    pub has_drift: Option<bool>,

    /// Any side is an object or array
    pub is_nested: bool,

    /// Nesting level, 0 for top-level properties
    pub depth: usize,

    /// Keys from the top level down to this entry, inclusive
    #[serde(skip)]
    pub lineage: Vec<String>,
}

impl PropertyDifference {
    pub fn drifted(&self) -> bool {
        self.has_drift.unwrap_or(false)
    }

    /// Structural ancestry; a key containing `.` is still a single level
    pub fn is_descendant_of(&self, ancestor: &PropertyDifference) -> bool {
        self.lineage.len() > ancestor.lineage.len() && self.lineage.starts_with(&ancestor.lineage)
    }
}

#[derive(Clone, Copy)]
struct Lanes<'a> {
    before: Option<&'a Value>,
    /// Outer `None`: no drift lane at all
    current: Option<Option<&'a Value>>,
    after: Option<&'a Value>,
}

impl<'a> Lanes<'a> {
    fn sides(&self) -> impl Iterator<Item = &'a Value> + '_ {
        [self.before, self.current.flatten(), self.after]
            .into_iter()
            .flatten()
    }

    fn child(&self, pick: impl Fn(&'a Value) -> Option<&'a Value>) -> Lanes<'a> {
        Lanes {
            before: self.before.and_then(&pick),
            current: self.current.map(|current| current.and_then(&pick)),
            after: self.after.and_then(&pick),
        }
    }
}

fn is_decomposable(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn array_len(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

fn array_item(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        _ => None,
    }
}

fn object_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

fn walk(
    lanes: Lanes<'_>,
    parent: &[String],
    parent_path: &str,
    depth: usize,
    out: &mut Vec<PropertyDifference>,
) {
    if lanes.sides().any(Value::is_array) {
        let max_len = array_len(lanes.before)
            .max(array_len(lanes.current.flatten()))
            .max(array_len(lanes.after));

        for index in 0..max_len {
            let key = format!("[{}]", index);
            let child = lanes.child(|value| array_item(value, index));
            emit(child, key, parent, parent_path, depth, out);
        }
    } else if lanes.sides().any(Value::is_object) {
        let mut keys = BTreeSet::new();
        for side in lanes.sides() {
            if let Value::Object(map) = side {
                keys.extend(map.keys().map(String::as_str));
            }
        }

        for key in keys {
            let child = lanes.child(|value| object_field(value, key));
            emit(child, key.to_string(), parent, parent_path, depth, out);
        }
    }
}

fn emit(
    lanes: Lanes<'_>,
    key: String,
    parent: &[String],
    parent_path: &str,
    depth: usize,
    out: &mut Vec<PropertyDifference>,
) {
    let path = join_path(parent_path, &key);
    let mut lineage = parent.to_vec();
    lineage.push(key.clone());
    let changed = !deep_equal(lanes.before, lanes.after);
    let has_drift = lanes
        .current
        .map(|current| !deep_equal(lanes.before, current));
    let is_nested = lanes.sides().any(is_decomposable);

    out.push(PropertyDifference {
        key,
        path: path.clone(),
        before: lanes.before.cloned(),
        current: lanes.current.flatten().cloned(),
        after: lanes.after.cloned(),
        changed,
        has_drift,
        is_nested,
        depth,
        lineage: lineage.clone(),
    });

    if is_nested && (changed || has_drift.unwrap_or(false)) {
        walk(lanes, &lineage, &path, depth + 1, out);
    }
}

fn run(lanes: Lanes<'_>, prefix: &str) -> Vec<PropertyDifference> {
    let mut out = Vec::new();
    walk(lanes, &[], prefix, 0, &mut out);
    out.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path)));
    out
}

/// Two-way diff of `before` against `after`
///
/// Scalar roots produce no entries; only decomposable values are diffed.
pub fn diff(before: Option<&Value>, after: Option<&Value>) -> Vec<PropertyDifference> {
    diff_under("", before, after)
}

/// Two-way diff with every path rooted at `prefix`
pub fn diff_under(
    prefix: &str,
    before: Option<&Value>,
    after: Option<&Value>,
) -> Vec<PropertyDifference> {
    run(
        Lanes {
            before,
            current: None,
            after,
        },
        prefix,
    )
}

/// Three-way diff adding the observed `current` value as a drift lane
pub fn diff_with_drift(
    before: Option<&Value>,
    current: Option<&Value>,
    after: Option<&Value>,
) -> Vec<PropertyDifference> {
    diff_with_drift_under("", before, current, after)
}

/// Three-way diff with every path rooted at `prefix`
pub fn diff_with_drift_under(
    prefix: &str,
    before: Option<&Value>,
    current: Option<&Value>,
    after: Option<&Value>,
) -> Vec<PropertyDifference> {
    run(
        Lanes {
            before,
            current: Some(current),
            after,
        },
        prefix,
    )
}

fn flagged_only<'a>(
    differences: &'a [PropertyDifference],
    flag: impl Fn(&PropertyDifference) -> bool,
) -> Vec<&'a PropertyDifference> {
    differences
        .iter()
        .filter(|entry| flag(entry))
        .filter(|entry| {
            !entry.is_nested
                || !differences.iter().any(|other| {
                    !other.is_nested && flag(other) && other.is_descendant_of(entry)
                })
        })
        .collect()
}

/// Changed entries, minus nested parents already covered by a changed leaf
pub fn changed_only(differences: &[PropertyDifference]) -> Vec<&PropertyDifference> {
    flagged_only(differences, |entry| entry.changed)
}

/// Drifted entries, minus nested parents already covered by a drifted leaf
pub fn drifted_only(differences: &[PropertyDifference]) -> Vec<&PropertyDifference> {
    flagged_only(differences, PropertyDifference::drifted)
}

/// Whether a structural property view applies, rather than a line diff
pub fn should_show_object_diff(before: Option<&Value>, after: Option<&Value>) -> bool {
    let decomposable = before.is_some_and(is_decomposable) || after.is_some_and(is_decomposable);
    decomposable && !diff(before, after).is_empty()
}

/// Three-way variant of [`should_show_object_diff`]
pub fn should_show_object_diff_with_drift(
    before: Option<&Value>,
    current: Option<&Value>,
    after: Option<&Value>,
) -> bool {
    let decomposable = [before, current, after]
        .into_iter()
        .flatten()
        .any(is_decomposable);
    decomposable && !diff_with_drift(before, current, after).is_empty()
}
