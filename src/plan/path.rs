//! Property path addressing
//!
//! A property path addresses a value inside a resource's `before`/`after`
//! tree, e.g. `network_rules[0].default_action`. Dot (`a.0.b`) and bracket
//! (`a[0].b`) index notation parse to the same segments.

use std::borrow::Cow;
use std::fmt;

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl PathSegment {
    /// Index this segment addresses when walking an array
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(key) => parse_index(key),
        }
    }

    /// Key this segment addresses when walking an object
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Key(key) => Cow::Borrowed(key),
            PathSegment::Index(index) => Cow::Owned(index.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Parse a canonical array index: ASCII digits without a leading zero
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if token.len() > 1 && token.starts_with('0') {
        return None;
    }

    token.parse().ok()
}

/// Strip one pair of matching surrounding quotes
pub(crate) fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &token[1..token.len() - 1];
        }
    }
    token
}

fn flush(buffer: &mut String, segments: &mut Vec<PathSegment>) {
    if buffer.is_empty() {
        return;
    }

    let token = std::mem::take(buffer);
    match parse_index(&token) {
        Some(index) => segments.push(PathSegment::Index(index)),
        None => segments.push(PathSegment::Key(token)),
    }
}

/// Parse a dotted/bracketed path into segments
///
/// Empty input yields no segments (the root value). Consecutive separators
/// collapse, so `a..b` and `a.[0]` are the same as `a.b` and `a[0]`.
/// Quoted bracket keys (`tags["Name"]`) are always object keys.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut buffer, &mut segments),
            '[' => {
                flush(&mut buffer, &mut segments);

                let mut inner = String::new();
                let mut closed = false;
                let mut quote: Option<char> = None;

                for c in chars.by_ref() {
                    match (c, quote) {
                        (']', None) => {
                            closed = true;
                            break;
                        }
                        ('"' | '\'', None) => quote = Some(c),
                        (c, Some(q)) if c == q => quote = None,
                        _ => {}
                    }
                    inner.push(c);
                }

                if !closed {
                    // Unterminated bracket: keep the text as a plain key
                    buffer.push('[');
                    buffer.push_str(&inner);
                    flush(&mut buffer, &mut segments);
                    continue;
                }

                let trimmed = inner.trim();
                let unquoted = strip_quotes(trimmed);
                if unquoted.len() != trimmed.len() {
                    segments.push(PathSegment::Key(unquoted.to_string()));
                } else if !trimmed.is_empty() {
                    match parse_index(trimmed) {
                        Some(index) => segments.push(PathSegment::Index(index)),
                        None => segments.push(PathSegment::Key(trimmed.to_string())),
                    }
                }
            }
            _ => buffer.push(c),
        }
    }

    flush(&mut buffer, &mut segments);
    segments
}

/// Append a child key to a parent path
///
/// Bracketed children (`[3]`) attach without a dot.
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else if segment.starts_with('[') {
        format!("{}{}", prefix, segment)
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Dot-joined form of a segment list, e.g. `network_rules.0.default_action`
pub fn canonical_path(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Canonical dot form of any accepted path spelling
pub fn normalize_path(path: &str) -> String {
    canonical_path(&parse_path(path))
}
