//! Replacement-forcing property lookup

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::trace;

use super::path::normalize_path;

/// Canonical set of property paths whose change forces replacement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacePaths {
    paths: BTreeSet<String>,
}

impl ReplacePaths {
    /// Build from segment lists, e.g. `[["network_rules", 0, "default_action"]]`
    pub fn new<I, S>(segment_lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let paths = segment_lists
            .into_iter()
            .map(|segments| {
                let joined = segments
                    .into_iter()
                    .map(|segment| segment.as_ref().to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                normalize_path(&joined)
            })
            .filter(|path| !path.is_empty())
            .collect();

        Self { paths }
    }

    /// Build from the raw `replace_paths` field of a plan change
    ///
    /// String and integer segments are accepted. Entries of any other shape
    /// are skipped rather than rejected.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Array(lists)) = value else {
            return Self::default();
        };

        let mut segment_lists = Vec::with_capacity(lists.len());

        for list in lists {
            let Value::Array(segments) = list else {
                trace!("skipping malformed replace path {}", list);
                continue;
            };

            let converted: Option<Vec<String>> = segments
                .iter()
                .map(|segment| match segment {
                    Value::String(key) => Some(key.clone()),
                    Value::Number(index) => Some(index.to_string()),
                    _ => None,
                })
                .collect();

            match converted {
                Some(segments) => segment_lists.push(segments),
                None => trace!("skipping malformed replace path {}", list),
            }
        }

        Self::new(segment_lists)
    }

    /// Whether a change at `property_path` forces replacement
    ///
    /// Bracket and dot index spellings are equivalent.
    pub fn is_force_replacement(&self, property_path: &str) -> bool {
        if self.paths.is_empty() {
            return false;
        }

        self.paths.contains(&normalize_path(property_path))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Canonical dot-joined paths, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}
