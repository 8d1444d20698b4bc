use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use planscope::output;
use planscope::plan::{ConstructNode, GroupedResource, PlanParser, ResourceTypeGroup};

/// How the groups command partitions resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Module,
    Type,
    Construct,
}

pub struct GroupsCommand;

impl GroupsCommand {
    /// Execute the groups command
    pub fn execute(plan_path: &Path, by: GroupBy, metadata: Option<&Path>) -> Result<()> {
        let model = super::load_model(plan_path)?;

        if model.summary().total == 0 {
            output::info("Plan contains no resource changes.");
            return Ok(());
        }

        match by {
            GroupBy::Module => {
                output::section("Resources by module");
                for group in model.module_groups() {
                    output::subsection(&format!("{} ({})", group.module_address, group.total()));
                    for type_group in &group.resource_types {
                        Self::print_type_group(type_group);
                    }
                }
            }
            GroupBy::Type => {
                output::section("Resources by type");
                for type_group in model.resource_type_groups() {
                    Self::print_type_group(&type_group);
                }
            }
            GroupBy::Construct => {
                let path = metadata.context("--metadata is required when grouping by construct")?;
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read construct metadata {}", path.display()))?;
                let metadata = PlanParser::new()
                    .parse_construct_metadata(&content)
                    .with_context(|| format!("Failed to load construct metadata {}", path.display()))?;

                match model.construct_tree(&metadata) {
                    Some(tree) => {
                        output::section("Resources by construct");
                        Self::print_construct(&tree, 0);
                    }
                    None => output::warning("Construct metadata has no resource paths."),
                }
            }
        }

        Ok(())
    }

    fn print_type_group(group: &ResourceTypeGroup) {
        output::list_item(0, &format!("{} ({})", group.resource_type, group.total()));

        for resource in &group.resources {
            Self::print_resource(2, resource, &resource.address);
        }

        for iterator in &group.iterator_groups {
            output::list_item(
                1,
                &format!(
                    "{} [{}] ({})",
                    iterator.base_address,
                    iterator.kind.name(),
                    iterator.members.len()
                ),
            );
            for member in &iterator.members {
                Self::print_resource(3, &member.resource, &member.key.to_string());
            }
        }
    }

    fn print_construct(node: &ConstructNode, depth: usize) {
        output::list_item(depth, &format!("{} ({})", node.name, node.total));

        for resource in &node.resources {
            Self::print_resource(depth + 2, resource, &resource.address);
        }

        for child in &node.children {
            Self::print_construct(child, depth + 1);
        }
    }

    fn print_resource(indent: usize, resource: &GroupedResource, label: &str) {
        output::change_line(indent, resource.class.symbol(), label, resource.class.color());
    }
}
