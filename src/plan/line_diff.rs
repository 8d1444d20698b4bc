//! Line-oriented diff for values that have no property structure
//!
//! Used when a resource's before/after are scalars (or otherwise yield no
//! property differences): both sides are pretty-printed as JSON and compared
//! line by line using a longest-common-subsequence table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single line in a line diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineChange {
    Same(String),
    Removed(String),
    Added(String),
}

impl LineChange {
    pub fn symbol(&self) -> &'static str {
        match self {
            LineChange::Same(_) => " ",
            LineChange::Removed(_) => "-",
            LineChange::Added(_) => "+",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            LineChange::Same(text) | LineChange::Removed(text) | LineChange::Added(text) => text,
        }
    }
}

/// LCS line diff of two texts
pub fn line_diff(old: &str, new: &str) -> Vec<LineChange> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let (n, m) = (old_lines.len(), new_lines.len());

    // lcs[i][j] = length of the LCS of old_lines[i..] and new_lines[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old_lines[i] == new_lines[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut changes = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);

    while i < n && j < m {
        if old_lines[i] == new_lines[j] {
            changes.push(LineChange::Same(old_lines[i].to_string()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            changes.push(LineChange::Removed(old_lines[i].to_string()));
            i += 1;
        } else {
            changes.push(LineChange::Added(new_lines[j].to_string()));
            j += 1;
        }
    }

    changes.extend(old_lines[i..].iter().map(|line| LineChange::Removed(line.to_string())));
    changes.extend(new_lines[j..].iter().map(|line| LineChange::Added(line.to_string())));
    changes
}

fn pretty(value: Option<&Value>) -> String {
    value
        .and_then(|value| serde_json::to_string_pretty(value).ok())
        .unwrap_or_default()
}

/// Line diff of the pretty-printed JSON text of two values
pub fn json_line_diff(before: Option<&Value>, after: Option<&Value>) -> Vec<LineChange> {
    line_diff(&pretty(before), &pretty(after))
}
