//! Data types for Terraform/OpenTofu JSON plans
//!
//! The plan structs deserialize the machine-readable plan format verbatim
//! (`resource_changes`, `resource_drift`, `change.actions`, ...). The display
//! types at the bottom of the module are the flattened form that renderers
//! consume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::line_diff::LineChange;

/// A single planned action as reported in `change.actions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
    Replace,
    /// Any action string this crate does not know about
    #[serde(other)]
    Unknown,
}

/// Classification of a resource's action set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionClass {
    /// Resource will be created
    Create,
    /// Resource will be updated in-place
    Update,
    /// Resource will be destroyed and recreated
    Replace,
    /// Resource will be destroyed
    Delete,
    /// Data source read
    Read,
    /// No changes
    NoOp,
}

impl ActionClass {
    /// Classify an action list
    ///
    /// Replace wins whenever both delete and create are present (in either
    /// order) or an explicit replace is listed. Lists with no recognised
    /// action, including `["no-op"]` and `[]`, classify as no-op.
    pub fn classify(actions: &[Action]) -> Self {
        let has = |action: Action| actions.contains(&action);

        if has(Action::Replace) || (has(Action::Delete) && has(Action::Create)) {
            ActionClass::Replace
        } else if has(Action::Create) {
            ActionClass::Create
        } else if has(Action::Update) {
            ActionClass::Update
        } else if has(Action::Delete) {
            ActionClass::Delete
        } else if has(Action::Read) {
            ActionClass::Read
        } else {
            ActionClass::NoOp
        }
    }

    /// Whether this class counts as a change to infrastructure
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            ActionClass::Create | ActionClass::Update | ActionClass::Replace | ActionClass::Delete
        )
    }

    /// Get the symbol used to represent this class
    pub fn symbol(&self) -> &'static str {
        match self {
            ActionClass::Create => "+",
            ActionClass::Update => "~",
            ActionClass::Replace => "±",
            ActionClass::Delete => "-",
            ActionClass::Read => "≤",
            ActionClass::NoOp => " ",
        }
    }

    /// Get the label for this class
    pub fn label(&self) -> &'static str {
        match self {
            ActionClass::Create => "will be created",
            ActionClass::Update => "will be updated",
            ActionClass::Replace => "must be replaced",
            ActionClass::Delete => "will be destroyed",
            ActionClass::Read => "will be read",
            ActionClass::NoOp => "no changes",
        }
    }

    /// Short lowercase name, also used as a CSS class
    pub fn name(&self) -> &'static str {
        match self {
            ActionClass::Create => "create",
            ActionClass::Update => "update",
            ActionClass::Replace => "replace",
            ActionClass::Delete => "delete",
            ActionClass::Read => "read",
            ActionClass::NoOp => "no-op",
        }
    }

    /// Get RGB color tuple for this class
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ActionClass::Create => (152, 225, 152),  // Pastel mint green
            ActionClass::Update => (255, 230, 160),  // Pastel cream/yellow
            ActionClass::Replace => (181, 174, 254), // Pastel lavender
            ActionClass::Delete => (255, 160, 160),  // Pastel coral
            ActionClass::Read => (160, 200, 255),    // Pastel sky blue
            ActionClass::NoOp => (160, 160, 160),    // Grey
        }
    }
}

/// The `change` record of a resource or output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub actions: Vec<Action>,

    #[serde(default)]
    pub before: Option<Value>,

    #[serde(default)]
    pub after: Option<Value>,

    /// Kept raw so a malformed overlay degrades instead of failing ingestion
    #[serde(default)]
    pub before_sensitive: Option<Value>,

    #[serde(default)]
    pub after_sensitive: Option<Value>,

    #[serde(default)]
    pub after_unknown: Option<Value>,

    #[serde(default)]
    pub replace_paths: Option<Value>,
}

impl Change {
    pub fn class(&self) -> ActionClass {
        ActionClass::classify(&self.actions)
    }
}

/// One entry of `resource_changes` (or `resource_drift`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Full resource address (e.g., "module.vpc.aws_subnet.main[0]")
    pub address: String,

    /// Module address as reported by the plan, if any
    #[serde(default)]
    pub module_address: Option<String>,

    /// "managed" or "data"
    #[serde(default)]
    pub mode: Option<String>,

    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type", default)]
    pub resource_type: String,

    /// Resource name (e.g., "example")
    #[serde(default)]
    pub name: String,

    /// count index or for_each key
    #[serde(default)]
    pub index: Option<Value>,

    #[serde(default)]
    pub provider_name: Option<String>,

    #[serde(default)]
    pub change: Change,
}

/// Drift entries share the resource change shape
pub type ResourceDrift = ResourceChange;

/// An input variable value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub value: Option<Value>,
}

/// The root plan document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub format_version: Option<String>,

    #[serde(default)]
    pub terraform_version: Option<String>,

    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,

    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,

    #[serde(default)]
    pub resource_drift: Vec<ResourceDrift>,

    #[serde(default)]
    pub output_changes: BTreeMap<String, Change>,
}

/// Summary counts over a set of classified changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Number of resources in the plan
    pub total: usize,

    /// Number of resources to add
    pub to_add: usize,

    /// Number of resources to change
    pub to_change: usize,

    /// Number of resources to destroy
    pub to_destroy: usize,

    /// Number of resources to replace
    pub to_replace: usize,

    /// Number of data sources to read
    pub to_read: usize,

    /// Number of unchanged resources
    pub unchanged: usize,
}

impl ResourceSummary {
    /// Count one classified entry
    pub fn record(&mut self, class: ActionClass) {
        self.total += 1;
        match class {
            ActionClass::Create => self.to_add += 1,
            ActionClass::Update => self.to_change += 1,
            ActionClass::Delete => self.to_destroy += 1,
            ActionClass::Replace => self.to_replace += 1,
            ActionClass::Read => self.to_read += 1,
            ActionClass::NoOp => self.unchanged += 1,
        }
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Get total number of changes
    pub fn total_changes(&self) -> usize {
        self.to_add + self.to_change + self.to_destroy + self.to_replace
    }
}

impl FromIterator<ActionClass> for ResourceSummary {
    fn from_iter<I: IntoIterator<Item = ActionClass>>(classes: I) -> Self {
        let mut summary = Self::default();
        for class in classes {
            summary.record(class);
        }
        summary
    }
}

/// Type of attribute change within a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeChangeType {
    /// Attribute will be added
    Added,
    /// Attribute will be removed
    Removed,
    /// Attribute value will be modified
    Modified,
    /// Attribute is unchanged (for context, or drift-only)
    Unchanged,
}

impl AttributeChangeType {
    /// Get the symbol for this attribute change type
    pub fn symbol(&self) -> &'static str {
        match self {
            AttributeChangeType::Added => "+",
            AttributeChangeType::Removed => "-",
            AttributeChangeType::Modified => "~",
            AttributeChangeType::Unchanged => " ",
        }
    }

    /// CSS class used by the HTML renderer
    pub fn css_class(&self) -> &'static str {
        match self {
            AttributeChangeType::Added => "add",
            AttributeChangeType::Removed => "remove",
            AttributeChangeType::Modified => "modify",
            AttributeChangeType::Unchanged => "unchanged",
        }
    }
}

/// A single displayable attribute change within a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Property path (e.g., "ami", "network_rules[0].default_action")
    pub name: String,

    /// Type of change for this attribute
    pub change_type: AttributeChangeType,

    /// Old value as compact JSON (None when absent)
    pub old_value: Option<String>,

    /// New value as compact JSON (None when absent)
    pub new_value: Option<String>,

    /// Observed value from the drift snapshot
    pub current_value: Option<String>,

    /// Whether this attribute is marked as sensitive on either side
    pub sensitive: bool,

    /// Whether value is known only after apply
    pub computed: bool,

    /// Whether this attribute forces resource replacement
    pub forces_replacement: bool,

    /// Whether the observed value differs from the recorded one
    pub drifted: bool,
}

impl AttributeChange {
    /// Create a new attribute change
    pub fn new(name: &str, change_type: AttributeChangeType) -> Self {
        Self {
            name: name.to_string(),
            change_type,
            old_value: None,
            new_value: None,
            current_value: None,
            sensitive: false,
            computed: false,
            forces_replacement: false,
            drifted: false,
        }
    }

    /// Set the old value
    pub fn with_old_value(mut self, value: &str) -> Self {
        self.old_value = Some(value.to_string());
        self
    }

    /// Set the new value
    pub fn with_new_value(mut self, value: &str) -> Self {
        self.new_value = Some(value.to_string());
        self
    }

    /// Set the observed value
    pub fn with_current_value(mut self, value: &str) -> Self {
        self.current_value = Some(value.to_string());
        self
    }

    /// Mark as sensitive
    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Mark as computed
    pub fn with_computed(mut self, computed: bool) -> Self {
        self.computed = computed;
        self
    }

    /// Mark as forcing replacement
    pub fn with_forces_replacement(mut self, forces: bool) -> Self {
        self.forces_replacement = forces;
        self
    }

    /// Mark as drifted
    pub fn with_drifted(mut self, drifted: bool) -> Self {
        self.drifted = drifted;
        self
    }
}

/// A resource flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub address: String,

    pub resource_type: String,

    /// Module address, or "root"
    pub module_address: String,

    pub class: ActionClass,

    /// Property-level changes, parents before children
    pub attributes: Vec<AttributeChange>,

    /// Text diff used when the value has no property structure
    pub line_diff: Vec<LineChange>,

    /// Whether this view compares against the drift snapshot
    pub with_drift: bool,
}

impl ResourceView {
    pub fn new(address: &str, resource_type: &str, class: ActionClass) -> Self {
        Self {
            address: address.to_string(),
            resource_type: resource_type.to_string(),
            module_address: super::address::module_address(address),
            class,
            attributes: Vec::new(),
            line_diff: Vec::new(),
            with_drift: false,
        }
    }

    pub fn add_attribute(&mut self, attr: AttributeChange) {
        self.attributes.push(attr);
    }

    /// Paths of attributes that force replacement
    pub fn forces_replacement(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|attr| attr.forces_replacement)
            .map(|attr| attr.name.as_str())
            .collect()
    }
}

/// A whole plan flattened for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanView {
    pub summary: ResourceSummary,

    pub resources: Vec<ResourceView>,
}

/// Options for diff rendering
#[derive(Debug, Clone)]
pub struct DiffRenderOptions {
    /// Show unchanged attributes and no-op resources
    pub show_unchanged: bool,

    /// Use compact output (no extra spacing)
    pub compact_mode: bool,

    /// Use side-by-side view (ASCII only)
    pub side_by_side: bool,

    /// Maximum width for values before truncation
    pub max_value_width: usize,

    /// Show sensitive values (normally hidden)
    pub show_sensitive: bool,

    /// Terminal width for formatting
    pub terminal_width: usize,
}

impl Default for DiffRenderOptions {
    fn default() -> Self {
        Self {
            show_unchanged: false,
            compact_mode: false,
            side_by_side: false,
            max_value_width: 60,
            show_sensitive: false,
            terminal_width: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actions(names: &[&str]) -> Vec<Action> {
        serde_json::from_value(json!(names)).unwrap()
    }

    #[test]
    fn test_action_strings() {
        assert_eq!(
            actions(&["no-op", "create", "read", "update", "delete", "replace", "forget"]),
            vec![
                Action::NoOp,
                Action::Create,
                Action::Read,
                Action::Update,
                Action::Delete,
                Action::Replace,
                Action::Unknown,
            ]
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(ActionClass::classify(&actions(&["delete", "create"])), ActionClass::Replace);
        assert_eq!(ActionClass::classify(&actions(&["create", "delete"])), ActionClass::Replace);
        assert_eq!(ActionClass::classify(&actions(&["replace"])), ActionClass::Replace);
        assert_eq!(ActionClass::classify(&actions(&["create"])), ActionClass::Create);
        assert_eq!(ActionClass::classify(&actions(&["update"])), ActionClass::Update);
        assert_eq!(ActionClass::classify(&actions(&["delete"])), ActionClass::Delete);
        assert_eq!(ActionClass::classify(&actions(&["read"])), ActionClass::Read);
        assert_eq!(ActionClass::classify(&actions(&["no-op"])), ActionClass::NoOp);
        assert_eq!(ActionClass::classify(&[]), ActionClass::NoOp);
    }

    #[test]
    fn test_action_class_symbol() {
        assert_eq!(ActionClass::Create.symbol(), "+");
        assert_eq!(ActionClass::Update.symbol(), "~");
        assert_eq!(ActionClass::Delete.symbol(), "-");
        assert_eq!(ActionClass::Replace.symbol(), "±");
    }

    #[test]
    fn test_summary_counts_replace_once() {
        let summary: ResourceSummary = [
            ActionClass::classify(&actions(&["delete", "create"])),
            ActionClass::classify(&actions(&["no-op"])),
            ActionClass::classify(&actions(&["read"])),
        ]
        .into_iter()
        .collect();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.to_replace, 1);
        assert_eq!(summary.to_add, 0);
        assert_eq!(summary.to_destroy, 0);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.to_read, 1);
        assert_eq!(summary.total_changes(), 1);
    }

    #[test]
    fn test_no_op_contributes_nothing() {
        let summary: ResourceSummary = std::iter::repeat_n(ActionClass::NoOp, 3).collect();
        assert!(!summary.has_changes());
        assert_eq!(summary.unchanged, 3);
    }

    #[test]
    fn test_attribute_change_builder() {
        let attr = AttributeChange::new("ami", AttributeChangeType::Modified)
            .with_old_value("\"ami-old\"")
            .with_new_value("\"ami-new\"")
            .with_forces_replacement(true);

        assert_eq!(attr.name, "ami");
        assert_eq!(attr.old_value, Some("\"ami-old\"".to_string()));
        assert!(attr.forces_replacement);
        assert!(!attr.drifted);
    }

    #[test]
    fn test_resource_change_deserializes_plan_fields() {
        let resource: ResourceChange = serde_json::from_value(json!({
            "address": "aws_instance.web",
            "type": "aws_instance",
            "name": "web",
            "provider_name": "registry.terraform.io/hashicorp/aws",
            "change": {
                "actions": ["update"],
                "before": {"ami": "a"},
                "after": {"ami": "b"},
                "after_unknown": {},
                "before_sensitive": false,
                "after_sensitive": {},
                "replace_paths": [["ami"]]
            }
        }))
        .unwrap();

        assert_eq!(resource.resource_type, "aws_instance");
        assert_eq!(resource.change.class(), ActionClass::Update);
        assert_eq!(resource.change.before_sensitive, Some(json!(false)));
        assert!(resource.module_address.is_none());
    }

    #[test]
    fn test_resource_view_module() {
        let view = ResourceView::new("module.vpc.aws_subnet.main", "aws_subnet", ActionClass::Update);
        assert_eq!(view.module_address, "module.vpc");
    }

    #[test]
    fn test_plan_view_reads_back_line_diff() {
        let mut view = ResourceView::new("terraform_data.v", "terraform_data", ActionClass::Update);
        view.line_diff = vec![
            LineChange::Removed("\"old\"".to_string()),
            LineChange::Added("\"new\"".to_string()),
        ];
        let plan = PlanView {
            summary: std::iter::once(ActionClass::Update).collect(),
            resources: vec![view],
        };

        let json = serde_json::to_string(&plan).unwrap();
        let parsed: PlanView = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, plan);
        assert_eq!(parsed.resources[0].line_diff[1], LineChange::Added("\"new\"".to_string()));
    }
}
