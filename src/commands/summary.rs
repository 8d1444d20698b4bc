use std::path::Path;

use anyhow::Result;
use planscope::output;
use planscope::plan::{ActionClass, PlanModel, ResourceSummary};

pub struct SummaryCommand;

impl SummaryCommand {
    /// Execute the summary command
    pub fn execute(plan_path: &Path) -> Result<()> {
        let model = super::load_model(plan_path)?;
        let plan = model.plan();

        output::section("Plan Summary");

        if let Some(version) = &plan.terraform_version {
            output::key_value("Terraform version", version);
        }
        if let Some(version) = &plan.format_version {
            output::key_value("Format version", version);
        }
        output::key_value("Resources", &model.summary().total.to_string());
        output::blank();

        let summary = model.summary();
        if summary.has_changes() || summary.to_read > 0 {
            Self::print_counts(summary);
        } else {
            output::info("No changes. Infrastructure matches the configuration.");
        }

        let outputs = model.output_summary();
        if outputs.total > 0 {
            output::subsection("Outputs");
            if outputs.has_changes() {
                Self::print_counts(&outputs);
            } else {
                output::dimmed("  No output changes.");
            }
        }

        Self::print_modules(&model);

        let drifted = model
            .resources()
            .filter(|resource| model.has_drift(&resource.address))
            .count();
        if drifted > 0 {
            output::blank();
            output::warning(&format!(
                "{} resource(s) changed outside of Terraform since the last apply",
                drifted
            ));
        }

        Ok(())
    }

    fn print_counts(summary: &ResourceSummary) {
        output::count("to add", summary.to_add, ActionClass::Create.color());
        output::count("to change", summary.to_change, ActionClass::Update.color());
        output::count("to replace", summary.to_replace, ActionClass::Replace.color());
        output::count("to destroy", summary.to_destroy, ActionClass::Delete.color());
        output::count("to read", summary.to_read, ActionClass::Read.color());
    }

    fn print_modules(model: &PlanModel) {
        let groups = model.module_groups();
        if groups.len() < 2 {
            return;
        }

        output::subsection("Modules");
        output::table_header(&["Module", "Resources", "Changes"]);
        for group in groups {
            let total = group.total().to_string();
            let changes = group.summary().total_changes().to_string();
            output::table_row(&[group.module_address.as_str(), total.as_str(), changes.as_str()]);
        }
    }
}
