//! Resource address parsing
//!
//! Addresses look like `module.net.module.sub.aws_subnet.x["a"]`: leading
//! `module.<name>` pairs, then `[data.]<type>.<name>`, then an optional
//! count index or for_each key in brackets.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::path::strip_quotes;

/// Module address used for resources outside any module
pub const ROOT_MODULE: &str = "root";

lazy_static! {
    static ref TRAILING_KEY: Regex =
        Regex::new(r#"^(?P<base>.+?)\[(?P<token>"[^"]*"|[^\[\]]+)\]$"#).expect("Invalid trailing key regex");
    static ref COUNT_INDEX: Regex = Regex::new(r"^\d+$").expect("Invalid count index regex");
}

/// Split an address on dots that are not inside brackets or quotes
pub fn split_address(address: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in address.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            '.' if !in_quotes && depth == 0 => {
                parts.push(&address[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(&address[start..]);
    parts
}

/// Number of leading parts that make up the module prefix
fn module_prefix_len(parts: &[&str]) -> usize {
    let mut consumed = 0;
    // A trailing "module.x" pair with nothing after it is not a module prefix
    while consumed + 2 < parts.len() && parts[consumed] == "module" {
        consumed += 2;
    }
    consumed
}

/// Module address of a resource, e.g. `module.net`, or [`ROOT_MODULE`]
pub fn module_address(address: &str) -> String {
    let parts = split_address(address);
    let consumed = module_prefix_len(&parts);

    if consumed == 0 {
        ROOT_MODULE.to_string()
    } else {
        parts[..consumed].join(".")
    }
}

/// The address with its module prefix removed, e.g. `aws_subnet.x[0]`
pub fn resource_part(address: &str) -> String {
    let parts = split_address(address);
    let consumed = module_prefix_len(&parts);
    parts[consumed..].join(".")
}

/// How a resource is multiplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IteratorKind {
    Count,
    ForEach,
}

impl IteratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            IteratorKind::Count => "count",
            IteratorKind::ForEach => "for_each",
        }
    }
}

/// A count index or for_each key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum IteratorKey {
    Count(u64),
    ForEach(String),
}

impl IteratorKey {
    pub fn kind(&self) -> IteratorKind {
        match self {
            IteratorKey::Count(_) => IteratorKind::Count,
            IteratorKey::ForEach(_) => IteratorKind::ForEach,
        }
    }
}

impl Ord for IteratorKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IteratorKey::Count(a), IteratorKey::Count(b)) => a.cmp(b),
            (IteratorKey::ForEach(a), IteratorKey::ForEach(b)) => a.cmp(b),
            (IteratorKey::Count(_), IteratorKey::ForEach(_)) => Ordering::Less,
            (IteratorKey::ForEach(_), IteratorKey::Count(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for IteratorKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for IteratorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IteratorKey::Count(index) => write!(f, "{}", index),
            IteratorKey::ForEach(key) => write!(f, "{}", key),
        }
    }
}

/// Iteration info of one resource instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIterator {
    /// Address with the trailing bracket removed
    pub base_address: String,
    pub key: IteratorKey,
}

impl ResourceIterator {
    pub fn kind(&self) -> IteratorKind {
        self.key.kind()
    }
}

/// Parse a trailing `[<token>]` off the resource part of an address
pub fn iterator_of(address: &str) -> Option<ResourceIterator> {
    let resource = resource_part(address);
    let caps = TRAILING_KEY.captures(&resource)?;
    let token = caps.name("token")?.as_str();

    // Strip exactly the bracketed suffix from the full address
    let base_address = address[..address.len() - token.len() - 2].to_string();

    let key = if COUNT_INDEX.is_match(token) {
        match token.parse() {
            Ok(index) => IteratorKey::Count(index),
            Err(_) => IteratorKey::ForEach(token.to_string()),
        }
    } else {
        IteratorKey::ForEach(strip_quotes(token).to_string())
    };

    Some(ResourceIterator { base_address, key })
}
