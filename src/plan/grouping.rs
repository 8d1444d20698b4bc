//! Hierarchical views over the flat resource list
//!
//! Three independent groupings, all derived from addresses (and, for the
//! construct tree, external path metadata):
//!
//! - by module address, then by resource type
//! - by resource type, with count/for_each instances folded into iterator groups
//! - by construct path, as a single n-ary tree

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use super::address::{IteratorKey, IteratorKind, ROOT_MODULE, iterator_of, module_address};
use super::types::{ActionClass, ResourceChange, ResourceSummary};

/// The grouping-relevant facts about one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedResource {
    pub address: String,
    pub resource_type: String,
    pub name: String,
    pub class: ActionClass,
}

impl GroupedResource {
    pub fn from_change(resource: &ResourceChange) -> Self {
        Self {
            address: resource.address.clone(),
            resource_type: resource.resource_type.clone(),
            name: resource.name.clone(),
            class: resource.change.class(),
        }
    }
}

/// One instance inside an iterator group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IteratorMember {
    pub key: IteratorKey,
    pub resource: GroupedResource,
}

/// Instances of one counted or for_each resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IteratorGroup {
    /// Address without the index, e.g. `module.net.aws_subnet.x`
    pub base_address: String,
    pub kind: IteratorKind,
    /// Sorted numerically for count, lexicographically for for_each
    pub members: Vec<IteratorMember>,
}

/// Resources of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceTypeGroup {
    pub resource_type: String,
    /// Resources without an index
    pub resources: Vec<GroupedResource>,
    pub iterator_groups: Vec<IteratorGroup>,
}

impl ResourceTypeGroup {
    pub fn total(&self) -> usize {
        self.resources.len()
            + self
                .iterator_groups
                .iter()
                .map(|group| group.members.len())
                .sum::<usize>()
    }

    /// Every resource in the group, plain ones first
    pub fn all_resources(&self) -> impl Iterator<Item = &GroupedResource> {
        self.resources.iter().chain(
            self.iterator_groups
                .iter()
                .flat_map(|group| group.members.iter().map(|member| &member.resource)),
        )
    }
}

/// Resources of one module address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleGroup {
    /// `module.a.module.b`, or `root`
    pub module_address: String,
    pub resource_types: Vec<ResourceTypeGroup>,
}

impl ModuleGroup {
    pub fn total(&self) -> usize {
        self.resource_types.iter().map(ResourceTypeGroup::total).sum()
    }

    pub fn summary(&self) -> ResourceSummary {
        self.resource_types
            .iter()
            .flat_map(ResourceTypeGroup::all_resources)
            .map(|resource| resource.class)
            .collect()
    }
}

/// Bucket resources by type, in type order
pub fn resources_by_type(resources: &[GroupedResource]) -> BTreeMap<String, Vec<GroupedResource>> {
    let mut by_type: BTreeMap<String, Vec<GroupedResource>> = BTreeMap::new();
    for resource in resources {
        by_type
            .entry(resource.resource_type.clone())
            .or_default()
            .push(resource.clone());
    }
    by_type
}

/// Group resources by type, folding indexed instances into iterator groups
pub fn group_by_type(resources: &[GroupedResource]) -> Vec<ResourceTypeGroup> {
    resources_by_type(resources)
        .into_iter()
        .map(|(resource_type, members)| {
            let mut plain = Vec::new();
            let mut iterated: BTreeMap<String, Vec<IteratorMember>> = BTreeMap::new();

            for resource in members {
                match iterator_of(&resource.address) {
                    Some(iterator) => iterated
                        .entry(iterator.base_address)
                        .or_default()
                        .push(IteratorMember {
                            key: iterator.key,
                            resource,
                        }),
                    None => plain.push(resource),
                }
            }

            let iterator_groups = iterated
                .into_iter()
                .map(|(base_address, mut members)| {
                    members.sort_by(|a, b| a.key.cmp(&b.key));
                    let kind = members
                        .first()
                        .map(|member| member.key.kind())
                        .unwrap_or(IteratorKind::Count);
                    IteratorGroup {
                        base_address,
                        kind,
                        members,
                    }
                })
                .collect();

            ResourceTypeGroup {
                resource_type,
                resources: plain,
                iterator_groups,
            }
        })
        .collect()
}

/// Group resources by module address, `root` first
pub fn group_by_module(resources: &[GroupedResource]) -> Vec<ModuleGroup> {
    let mut by_module: BTreeMap<String, Vec<GroupedResource>> = BTreeMap::new();
    for resource in resources {
        by_module
            .entry(module_address(&resource.address))
            .or_default()
            .push(resource.clone());
    }

    let mut groups: Vec<ModuleGroup> = by_module
        .into_iter()
        .map(|(module_address, members)| ModuleGroup {
            module_address,
            resource_types: group_by_type(&members),
        })
        .collect();

    groups.sort_by_key(|group| group.module_address != ROOT_MODULE);
    groups
}

/// Construct paths per resource, from a `type -> name -> {"//": {metadata: {path}}}` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructMetadata {
    paths: BTreeMap<(String, String), String>,
}

impl ConstructMetadata {
    /// Read construct paths; entries without a string path are skipped
    pub fn from_value(value: &Value) -> Self {
        let mut paths = BTreeMap::new();

        let Some(types) = value.as_object() else {
            return Self::default();
        };

        for (resource_type, names) in types {
            let Some(names) = names.as_object() else {
                continue;
            };

            for (name, entry) in names {
                let path = entry
                    .get("//")
                    .and_then(|meta| meta.get("metadata"))
                    .and_then(|meta| meta.get("path"))
                    .and_then(Value::as_str);

                match path {
                    Some(path) => {
                        paths.insert((resource_type.clone(), name.clone()), path.to_string());
                    }
                    None => trace!("no construct path for {}.{}", resource_type, name),
                }
            }
        }

        Self { paths }
    }

    pub fn insert(&mut self, resource_type: &str, name: &str, path: &str) {
        self.paths
            .insert((resource_type.to_string(), name.to_string()), path.to_string());
    }

    pub fn path_of(&self, resource_type: &str, name: &str) -> Option<&str> {
        self.paths
            .get(&(resource_type.to_string(), name.to_string()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A node of the construct tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructNode {
    pub name: String,
    /// `/`-joined construct path below the stack, empty for a synthetic root
    pub path: String,
    /// Resources owned directly by this construct
    pub resources: Vec<GroupedResource>,
    pub children: Vec<ConstructNode>,
    /// Resources in this subtree
    pub total: usize,
}

#[derive(Default)]
struct NodeBuilder {
    children: BTreeMap<String, NodeBuilder>,
    resources: Vec<GroupedResource>,
}

impl NodeBuilder {
    fn insert(&mut self, constructs: &[&str], resource: GroupedResource) {
        match constructs.split_first() {
            Some((head, rest)) => self
                .children
                .entry(head.to_string())
                .or_default()
                .insert(rest, resource),
            None => self.resources.push(resource),
        }
    }

    fn build(self, name: String, path: String) -> ConstructNode {
        let children: Vec<ConstructNode> = self
            .children
            .into_iter()
            .map(|(child_name, child)| {
                let child_path = if path.is_empty() {
                    child_name.clone()
                } else {
                    format!("{}/{}", path, child_name)
                };
                child.build(child_name, child_path)
            })
            .collect();

        let total = self.resources.len() + children.iter().map(|child| child.total).sum::<usize>();

        ConstructNode {
            name,
            path,
            resources: self.resources,
            children,
            total,
        }
    }
}

/// Build the construct tree; `None` when no metadata was supplied
///
/// The first path segment (the stack) is skipped. Every remaining segment is
/// a construct, and the resource belongs to the one named by the last segment,
/// so `stack/storage/logs` puts the resource under `storage/logs`. Resources
/// without a path, or with only a stack segment, sit at the top level. The
/// result is a single tree: the lone top-level construct when it is the only
/// thing at that level, otherwise a synthetic `root` holding everything.
pub fn build_construct_tree(
    resources: &[GroupedResource],
    metadata: &ConstructMetadata,
) -> Option<ConstructNode> {
    if metadata.is_empty() {
        return None;
    }

    let mut top = NodeBuilder::default();

    for resource in resources {
        let segments: Vec<&str> = metadata
            .path_of(&resource.resource_type, &resource.name)
            .map(|path| path.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        top.insert(segments.get(1..).unwrap_or_default(), resource.clone());
    }

    if top.resources.is_empty() && top.children.len() == 1 {
        if let Some((name, only)) = top.children.pop_first() {
            return Some(only.build(name.clone(), name));
        }
    }

    Some(top.build(ROOT_MODULE.to_string(), String::new()))
}
