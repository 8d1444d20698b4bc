//! Plan comparison and sensitivity engine
//!
//! This module ingests machine-readable OpenTofu/Terraform plans and answers
//! questions about them: what changed in each resource (optionally against
//! the drift snapshot), which properties are sensitive, unknown until apply
//! or force a replacement, and how resources group by module, type, iterator
//! or construct path.
//!
//! # Features
//!
//! - **Parsing**: Validate and decode plan JSON into typed records
//! - **Tree diff**: Two- and three-way property diffs with drift detection
//! - **Markers**: Sensitivity and unknown-value overlays, replace paths
//! - **Grouping**: Summaries by module, resource type, iterator and construct
//! - **Rendering**: ASCII and HTML output of the flattened plan view
//!
//! # Example
//!
//! ```ignore
//! use planscope::plan::{AsciiRenderer, DiffRenderOptions, DiffRenderer, PlanModel};
//!
//! let model = PlanModel::from_json(&plan_json)?;
//! let view = model.plan_view(false, false);
//!
//! let renderer = AsciiRenderer::new();
//! println!("{}", renderer.render(&view, &DiffRenderOptions::default()));
//! ```

pub mod address;
pub mod equal;
pub mod grouping;
pub mod line_diff;
pub mod markers;
pub mod model;
pub mod parser;
pub mod path;
pub mod renderer;
pub mod replace;
pub mod tree_diff;
pub mod types;

pub use address::{IteratorKey, IteratorKind, ROOT_MODULE, ResourceIterator, iterator_of, module_address};
pub use equal::deep_equal;
pub use grouping::{
    ConstructMetadata, ConstructNode, GroupedResource, IteratorGroup, ModuleGroup,
    ResourceTypeGroup, build_construct_tree,
};
pub use line_diff::LineChange;
pub use markers::{MarkerTree, PropertySensitivity, contains_sensitive, is_sensitive, is_unknown};
pub use model::{PlanModel, Side};
pub use parser::PlanParser;
pub use path::{PathSegment, normalize_path, parse_path};
pub use renderer::{AsciiRenderer, DiffRenderer, HtmlRenderer};
pub use replace::ReplacePaths;
pub use tree_diff::{PropertyDifference, changed_only, drifted_only, should_show_object_diff};
pub use types::{
    Action, ActionClass, AttributeChange, AttributeChangeType, Change, DiffRenderOptions, Plan,
    PlanView, ResourceChange, ResourceDrift, ResourceSummary, ResourceView,
};
