//! The plan read-model
//!
//! [`PlanModel`] owns one loaded plan. Classification and grouping happen
//! eagerly on load; property diffs are computed on first request per
//! resource and memoized until the next plan is loaded.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, trace};

use super::equal::deep_equal;
use super::grouping::{
    ConstructMetadata, ConstructNode, GroupedResource, ModuleGroup, ResourceTypeGroup,
    build_construct_tree, group_by_module, group_by_type, resources_by_type,
};
use super::line_diff::json_line_diff;
use super::markers::{MarkerTree, PropertySensitivity, is_sensitive, is_unknown};
use super::parser::PlanParser;
use super::path::parse_path;
use super::replace::ReplacePaths;
use super::tree_diff::{
    PropertyDifference, changed_only, diff, diff_with_drift, drifted_only,
    should_show_object_diff, should_show_object_diff_with_drift,
};
use super::types::{
    ActionClass, AttributeChange, AttributeChangeType, Plan, PlanView, ResourceChange,
    ResourceDrift, ResourceSummary, ResourceView,
};
use crate::error::PlanResult;

/// Which side of a change a sensitivity query is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// Memoized diffs keyed by `(address, with_drift)`
#[derive(Debug, Default)]
pub struct DiffCache {
    entries: Mutex<HashMap<(String, bool), Arc<Vec<PropertyDifference>>>>,
}

impl DiffCache {
    fn get_or_compute(
        &self,
        address: &str,
        with_drift: bool,
        compute: impl FnOnce() -> Vec<PropertyDifference>,
    ) -> Arc<Vec<PropertyDifference>> {
        let key = (address.to_string(), with_drift);
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(hit) = entries.get(&key) {
            trace!("diff cache hit for {} (drift: {})", address, with_drift);
            return Arc::clone(hit);
        }

        trace!("diff cache miss for {} (drift: {})", address, with_drift);
        let computed = Arc::new(compute());
        entries.insert(key, Arc::clone(&computed));
        computed
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A resource with its overlays decoded once at load time
#[derive(Debug)]
struct IndexedResource {
    resource: ResourceChange,
    class: ActionClass,
    before_sensitive: Option<MarkerTree>,
    after_sensitive: Option<MarkerTree>,
    after_unknown: Option<MarkerTree>,
    replace_paths: ReplacePaths,
}

impl IndexedResource {
    fn new(resource: ResourceChange) -> Self {
        let change = &resource.change;
        let before_sensitive = change.before_sensitive.as_ref().map(MarkerTree::from_value);
        let after_sensitive = change.after_sensitive.as_ref().map(MarkerTree::from_value);
        let after_unknown = change.after_unknown.as_ref().map(MarkerTree::from_value);
        let replace_paths = ReplacePaths::from_value(change.replace_paths.as_ref());
        let class = change.class();

        Self {
            class,
            before_sensitive,
            after_sensitive,
            after_unknown,
            replace_paths,
            resource,
        }
    }
}

/// Read-model over one loaded plan
#[derive(Debug, Default)]
pub struct PlanModel {
    plan: Plan,
    resources: Vec<IndexedResource>,
    by_address: HashMap<String, usize>,
    drift_by_address: HashMap<String, usize>,
    grouped: Vec<GroupedResource>,
    summary: ResourceSummary,
    module_groups: Vec<ModuleGroup>,
    cache: DiffCache,
}

impl PlanModel {
    /// Build a model over a parsed plan
    pub fn new(plan: Plan) -> Self {
        let mut model = Self::default();
        model.load(plan);
        model
    }

    /// Parse plan JSON text and build a model over it
    pub fn from_json(content: &str) -> PlanResult<Self> {
        Ok(Self::new(PlanParser::new().parse(content)?))
    }

    /// Replace the loaded plan, dropping every cached result
    pub fn load(&mut self, mut plan: Plan) {
        self.cache.clear();

        let changes = std::mem::take(&mut plan.resource_changes);
        self.resources = changes.into_iter().map(IndexedResource::new).collect();

        self.by_address = self
            .resources
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.resource.address.clone(), index))
            .collect();

        self.drift_by_address = plan
            .resource_drift
            .iter()
            .enumerate()
            .map(|(index, drift)| (drift.address.clone(), index))
            .collect();

        self.grouped = self
            .resources
            .iter()
            .map(|entry| GroupedResource::from_change(&entry.resource))
            .collect();
        self.summary = self.grouped.iter().map(|resource| resource.class).collect();
        self.module_groups = group_by_module(&self.grouped);
        self.plan = plan;

        debug!(
            "plan model loaded: {} resources in {} modules, {} with drift",
            self.resources.len(),
            self.module_groups.len(),
            self.drift_by_address.len()
        );
    }

    /// Plan metadata; `resource_changes` lives in the model's own index
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    fn entry(&self, address: &str) -> Option<&IndexedResource> {
        self.by_address
            .get(address)
            .map(|&index| &self.resources[index])
    }

    pub fn resource(&self, address: &str) -> Option<&ResourceChange> {
        self.entry(address).map(|entry| &entry.resource)
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceChange> {
        self.resources.iter().map(|entry| &entry.resource)
    }

    pub fn drift(&self, address: &str) -> Option<&ResourceDrift> {
        self.drift_by_address
            .get(address)
            .map(|&index| &self.plan.resource_drift[index])
    }

    pub fn class_of(&self, address: &str) -> Option<ActionClass> {
        self.entry(address).map(|entry| entry.class)
    }

    /// Counts by action class over all resources
    pub fn summary(&self) -> &ResourceSummary {
        &self.summary
    }

    /// Counts by action class over output changes
    pub fn output_summary(&self) -> ResourceSummary {
        self.plan
            .output_changes
            .values()
            .map(|change| change.class())
            .collect()
    }

    pub fn resources_by_type(&self) -> BTreeMap<String, Vec<GroupedResource>> {
        resources_by_type(&self.grouped)
    }

    pub fn module_groups(&self) -> &[ModuleGroup] {
        &self.module_groups
    }

    /// Plan-wide type groups with count/for_each iterator groups
    pub fn resource_type_groups(&self) -> Vec<ResourceTypeGroup> {
        group_by_type(&self.grouped)
    }

    pub fn construct_tree(&self, metadata: &ConstructMetadata) -> Option<ConstructNode> {
        build_construct_tree(&self.grouped, metadata)
    }

    /// Observed value: the drift snapshot, or `before` when there is none
    pub fn current_value(&self, address: &str) -> Option<&Value> {
        let entry = self.entry(address)?;
        match self.drift(address) {
            Some(drift) => drift.change.after.as_ref(),
            None => entry.resource.change.before.as_ref(),
        }
    }

    /// Whether the observed value differs from the recorded `before`
    pub fn has_drift(&self, address: &str) -> bool {
        match self.entry(address) {
            Some(entry) if self.drift(address).is_some() => {
                !deep_equal(entry.resource.change.before.as_ref(), self.current_value(address))
            }
            _ => false,
        }
    }

    /// Property differences of one resource; `None` for unknown addresses
    pub fn diff(&self, address: &str, with_drift: bool) -> Option<Arc<Vec<PropertyDifference>>> {
        let entry = self.entry(address)?;
        let change = &entry.resource.change;

        Some(self.cache.get_or_compute(address, with_drift, || {
            if with_drift {
                diff_with_drift(
                    change.before.as_ref(),
                    self.current_value(address),
                    change.after.as_ref(),
                )
            } else {
                diff(change.before.as_ref(), change.after.as_ref())
            }
        }))
    }

    /// Changed (and, with drift, drifted) differences without redundant parents
    pub fn changed_properties(&self, address: &str, with_drift: bool) -> Vec<PropertyDifference> {
        let Some(differences) = self.diff(address, with_drift) else {
            return Vec::new();
        };

        let mut selected: HashSet<&str> = changed_only(&differences)
            .into_iter()
            .map(|entry| entry.path.as_str())
            .collect();

        if with_drift {
            selected.extend(drifted_only(&differences).into_iter().map(|entry| entry.path.as_str()));
        }

        differences
            .iter()
            .filter(|entry| selected.contains(entry.path.as_str()))
            .cloned()
            .collect()
    }

    pub fn cached_diff_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_sensitive(&self, address: &str, path: &str, side: Side) -> bool {
        self.entry(address).is_some_and(|entry| match side {
            Side::Before => is_sensitive(entry.before_sensitive.as_ref(), path),
            Side::After => is_sensitive(entry.after_sensitive.as_ref(), path),
        })
    }

    pub fn property_sensitivity(&self, address: &str, path: &str) -> PropertySensitivity {
        self.entry(address)
            .map(|entry| {
                PropertySensitivity::resolve(
                    entry.before_sensitive.as_ref(),
                    entry.after_sensitive.as_ref(),
                    path,
                )
            })
            .unwrap_or_default()
    }

    /// Whether the printed before/after value of `path` must be masked;
    /// an object is masked when any of its members is sensitive
    pub fn masking_sensitivity(&self, address: &str, path: &str) -> PropertySensitivity {
        self.entry(address)
            .map(|entry| {
                PropertySensitivity::resolve_masking(
                    entry.before_sensitive.as_ref(),
                    entry.after_sensitive.as_ref(),
                    path,
                )
            })
            .unwrap_or_default()
    }

    pub fn is_unknown(&self, address: &str, path: &str) -> bool {
        self.entry(address)
            .is_some_and(|entry| is_unknown(entry.after_unknown.as_ref(), path))
    }

    pub fn is_force_replacement(&self, address: &str, path: &str) -> bool {
        self.entry(address)
            .is_some_and(|entry| entry.replace_paths.is_force_replacement(path))
    }

    /// Flatten one resource into a displayable view
    ///
    /// With `include_unchanged`, properties that neither changed nor drifted
    /// are added as [`AttributeChangeType::Unchanged`] entries.
    pub fn resource_view(
        &self,
        address: &str,
        with_drift: bool,
        include_unchanged: bool,
    ) -> Option<ResourceView> {
        let entry = self.entry(address)?;
        let change = &entry.resource.change;
        let (before, after) = (change.before.as_ref(), change.after.as_ref());

        let mut view = ResourceView::new(address, &entry.resource.resource_type, entry.class);
        view.with_drift = with_drift;

        let structural = if with_drift {
            should_show_object_diff_with_drift(before, self.current_value(address), after)
        } else {
            should_show_object_diff(before, after)
        };

        if !structural {
            if !deep_equal(before, after) {
                view.line_diff = json_line_diff(before, after);
            }
            return Some(view);
        }

        let mut differences = self.changed_properties(address, with_drift);
        if include_unchanged {
            // The walk never descends into these, so they carry no children
            if let Some(all) = self.diff(address, with_drift) {
                differences.extend(
                    all.iter()
                        .filter(|difference| !difference.changed && !difference.drifted())
                        .cloned(),
                );
            }
        }

        for difference in &differences {
            view.add_attribute(self.attribute_change(entry, difference, with_drift));
        }

        self.add_unknown_attributes(entry, &mut view);
        view.attributes
            .sort_by_cached_key(|attr| (parse_path(&attr.name).len(), attr.name.clone()));

        Some(view)
    }

    fn attribute_change(
        &self,
        entry: &IndexedResource,
        difference: &PropertyDifference,
        with_drift: bool,
    ) -> AttributeChange {
        let path = difference.path.as_str();
        let computed = is_unknown(entry.after_unknown.as_ref(), path);

        let change_type = match (
            difference.changed || computed,
            difference.before.is_some(),
            difference.after.is_some() || computed,
        ) {
            (false, _, _) => AttributeChangeType::Unchanged,
            (true, false, true) => AttributeChangeType::Added,
            (true, true, false) => AttributeChangeType::Removed,
            _ => AttributeChangeType::Modified,
        };

        let mut attr = AttributeChange::new(path, change_type)
            .with_sensitive(self.masking_sensitivity(&entry.resource.address, path).any())
            .with_computed(computed)
            .with_forces_replacement(entry.replace_paths.is_force_replacement(path))
            .with_drifted(difference.drifted());

        attr.old_value = compact(difference.before.as_ref());
        attr.new_value = compact(difference.after.as_ref());
        if with_drift {
            attr.current_value = compact(difference.current.as_ref());
        }
        attr
    }

    /// Top-level properties only known after apply are absent from `after`,
    /// so the tree diff never sees them
    fn add_unknown_attributes(&self, entry: &IndexedResource, view: &mut ResourceView) {
        let Some(MarkerTree::Map(unknown)) = &entry.after_unknown else {
            return;
        };

        let before = entry.resource.change.before.as_ref();
        let after = entry.resource.change.after.as_ref();

        for (key, marker) in unknown {
            if !matches!(marker, MarkerTree::Flag(true)) {
                continue;
            }

            if view.attributes.iter().any(|attr| attr.name == *key) {
                continue;
            }

            let previous = before.and_then(|value| value.get(key));
            let known_after = after.and_then(|value| value.get(key));
            if known_after.is_some_and(|value| !value.is_null()) {
                continue;
            }

            let change_type = if previous.is_some_and(|value| !value.is_null()) {
                AttributeChangeType::Modified
            } else {
                AttributeChangeType::Added
            };

            let mut attr = AttributeChange::new(key, change_type)
                .with_computed(true)
                .with_sensitive(self.masking_sensitivity(&entry.resource.address, key).any())
                .with_forces_replacement(entry.replace_paths.is_force_replacement(key));
            attr.old_value = compact(previous);
            view.add_attribute(attr);
        }
    }

    /// Every resource flattened for display, in module group order
    ///
    /// No-op resources are left out unless `include_unchanged` is set or
    /// (with drift) their observed state drifted.
    pub fn plan_view(&self, with_drift: bool, include_unchanged: bool) -> PlanView {
        let resources = self
            .module_groups
            .iter()
            .flat_map(|group| group.resource_types.iter())
            .flat_map(ResourceTypeGroup::all_resources)
            .filter(|resource| {
                include_unchanged
                    || resource.class != ActionClass::NoOp
                    || (with_drift && self.has_drift(&resource.address))
            })
            .filter_map(|resource| {
                self.resource_view(&resource.address, with_drift, include_unchanged)
            })
            .collect();

        PlanView {
            summary: self.summary.clone(),
            resources,
        }
    }
}

fn compact(value: Option<&Value>) -> Option<String> {
    value.and_then(|value| serde_json::to_string(value).ok())
}
