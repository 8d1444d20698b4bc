pub mod diff;
pub mod groups;
pub mod inspect;
pub mod show;
pub mod summary;

pub use diff::DiffCommand;
pub use groups::{GroupBy, GroupsCommand};
pub use inspect::InspectCommand;
pub use show::{OutputFormat, ShowCommand, ShowOptions};
pub use summary::SummaryCommand;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use planscope::PlanModel;
use serde_json::Value;
use tracing::debug;

/// Read a plan file (or stdin for `-`) and ingest it
pub fn load_model(path: &Path) -> Result<PlanModel> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read plan from stdin")?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?
    };

    debug!("read {} bytes of plan JSON", content.len());

    let model = PlanModel::from_json(&content)
        .with_context(|| format!("Failed to load plan {}", path.display()))?;

    Ok(model)
}

/// Compact JSON for display, `null` when absent
pub fn compact_value(value: Option<&Value>) -> String {
    match value {
        Some(value) => serde_json::to_string(value).unwrap_or_else(|_| value.to_string()),
        None => "null".to_string(),
    }
}
