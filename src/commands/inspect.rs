use std::path::Path;

use anyhow::{Context, Result};
use planscope::output;
use planscope::plan::{normalize_path, parse_path};

use super::compact_value;

pub struct InspectCommand;

impl InspectCommand {
    /// Execute the inspect command for one property of one resource
    pub fn execute(plan_path: &Path, address: &str, property: &str) -> Result<()> {
        let model = super::load_model(plan_path)?;

        let class = model
            .class_of(address)
            .with_context(|| format!("Resource '{}' not found in plan", address))?;

        let path = normalize_path(property);
        let sensitivity = model.property_sensitivity(address, &path);

        let drifted = model
            .diff(address, true)
            .is_some_and(|differences| {
                differences
                    .iter()
                    .any(|entry| entry.path == path && entry.drifted())
            });

        output::section(address);
        output::key_value("Action", class.label());
        output::key_value("Property", &path);
        output::key_value("Segments", &parse_path(&path).len().to_string());
        output::blank();

        output::flag("Sensitive before", sensitivity.before_sensitive);
        output::flag("Sensitive after", sensitivity.after_sensitive);
        output::flag("Known after apply", model.is_unknown(address, &path));
        output::flag("Forces replacement", model.is_force_replacement(address, &path));
        output::flag("Drifted", drifted);

        if let Some(resource) = model.resource(address) {
            let masking = model.masking_sensitivity(address, &path);
            let before = shown(resource.change.before.as_ref(), &path, masking.before_sensitive);
            let after = shown(resource.change.after.as_ref(), &path, masking.after_sensitive);

            output::blank();
            output::key_value("Before", &before);
            output::key_value("After", &after);
        }

        Ok(())
    }
}

/// Printable value at `path`, masked when it is or contains a sensitive value
fn shown(value: Option<&serde_json::Value>, path: &str, hidden: bool) -> String {
    if hidden {
        "(sensitive)".to_string()
    } else {
        compact_value(lookup(value, path))
    }
}

/// Follow a property path into a value
fn lookup<'a>(value: Option<&'a serde_json::Value>, path: &str) -> Option<&'a serde_json::Value> {
    parse_path(path)
        .iter()
        .try_fold(value?, |current, segment| match segment.as_index() {
            Some(index) if current.is_array() => current.get(index),
            _ => current.get(&*segment.as_key()),
        })
}
