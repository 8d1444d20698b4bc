use std::path::Path;

use anyhow::{Context, Result};
use planscope::output;
use planscope::plan::{ActionClass, PlanModel, PropertyDifference};

use super::compact_value;

pub struct DiffCommand;

impl DiffCommand {
    /// Execute the diff command for one resource
    pub fn execute(
        plan_path: &Path,
        address: &str,
        drift: bool,
        all: bool,
        show_sensitive: bool,
    ) -> Result<()> {
        let model = super::load_model(plan_path)?;

        let class = model
            .class_of(address)
            .with_context(|| format!("Resource '{}' not found in plan", address))?;

        let entries: Vec<PropertyDifference> = if all {
            model
                .diff(address, drift)
                .map(|differences| differences.to_vec())
                .unwrap_or_default()
        } else {
            model.changed_properties(address, drift)
        };

        output::section(&format!("{} ({})", address, class.label()));

        if drift && !model.has_drift(address) {
            output::dimmed("  No drift recorded for this resource.");
        }

        if entries.is_empty() {
            output::info("No property changes.");
            return Ok(());
        }

        for entry in &entries {
            let line = Self::describe(&model, address, entry, show_sensitive);
            let (symbol, color) = Self::marker(entry);
            output::change_line(entry.depth + 1, symbol, &line, color);
        }

        Ok(())
    }

    fn marker(entry: &PropertyDifference) -> (&'static str, (u8, u8, u8)) {
        match (&entry.before, &entry.after) {
            _ if !entry.changed && entry.drifted() => ("!", ActionClass::Replace.color()),
            _ if !entry.changed => (" ", ActionClass::NoOp.color()),
            (None, Some(_)) => ("+", ActionClass::Create.color()),
            (Some(_), None) => ("-", ActionClass::Delete.color()),
            _ => ("~", ActionClass::Update.color()),
        }
    }

    fn describe(
        model: &PlanModel,
        address: &str,
        entry: &PropertyDifference,
        show_sensitive: bool,
    ) -> String {
        let sensitivity = model.masking_sensitivity(address, &entry.path);
        let hide_before = sensitivity.before_sensitive && !show_sensitive;
        let hide_after = sensitivity.after_sensitive && !show_sensitive;

        let before = if hide_before {
            "(sensitive)".to_string()
        } else {
            compact_value(entry.before.as_ref())
        };

        let unknown = model.is_unknown(address, &entry.path)
            && entry.after.as_ref().is_none_or(|value| value.is_null());
        let after = if unknown {
            "(known after apply)".to_string()
        } else if hide_after {
            "(sensitive)".to_string()
        } else {
            compact_value(entry.after.as_ref())
        };

        let mut line = if entry.changed {
            format!("{}: {} -> {}", entry.path, before, after)
        } else {
            format!("{}: {}", entry.path, after)
        };

        if entry.drifted() {
            let current = if hide_before {
                "(sensitive)".to_string()
            } else {
                compact_value(entry.current.as_ref())
            };
            line.push_str(&format!(" (observed: {})", current));
        }

        if model.is_force_replacement(address, &entry.path) {
            line.push_str(" # forces replacement");
        }

        if entry.drifted() {
            line.push_str(" # drifted");
        }

        line
    }
}
