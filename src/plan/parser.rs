//! Plan ingestion for OpenTofu/Terraform JSON plans
//!
//! This module turns the output of `tofu show -json <planfile>` (or the
//! Terraform equivalent) into a [`Plan`]. It is the only place that rejects
//! input: once a plan is ingested every query over it is total.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::grouping::ConstructMetadata;
use super::types::Plan;
use crate::error::{PlanError, PlanResult};

/// Parser for machine-readable plan documents
#[derive(Debug, Default)]
pub struct PlanParser;

impl PlanParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse plan JSON text
    pub fn parse(&self, content: &str) -> PlanResult<Plan> {
        let value: Value = serde_json::from_str(content)?;
        self.parse_value(value)
    }

    /// Parse an already-decoded JSON document
    pub fn parse_value(&self, value: Value) -> PlanResult<Plan> {
        let mut root = match value {
            Value::Object(root) => root,
            other => {
                return Err(PlanError::InvalidInput(format!(
                    "plan must be a JSON object, got {}",
                    json_type(&other)
                )));
            }
        };

        // Explicit nulls mean "none" for the collection fields
        for field in ["variables", "resource_changes", "resource_drift", "output_changes"] {
            if root.get(field).is_some_and(Value::is_null) {
                root.remove(field);
            }
        }

        for field in ["resource_changes", "resource_drift"] {
            if let Some(entries) = root.get(field) {
                self.check_entries(field, entries)?;
            }
        }

        let mut plan: Plan = serde_json::from_value(Value::Object(root))
            .map_err(|err| PlanError::InvalidInput(err.to_string()))?;

        self.dedup_drift(&mut plan);

        debug!(
            "loaded plan: {} resource changes, {} drift entries, {} output changes",
            plan.resource_changes.len(),
            plan.resource_drift.len(),
            plan.output_changes.len()
        );

        Ok(plan)
    }

    /// Parse a construct metadata document
    pub fn parse_construct_metadata(&self, content: &str) -> PlanResult<ConstructMetadata> {
        let value: Value = serde_json::from_str(content)?;

        if !value.is_object() {
            return Err(PlanError::InvalidInput(format!(
                "construct metadata must be a JSON object, got {}",
                json_type(&value)
            )));
        }

        Ok(ConstructMetadata::from_value(&value))
    }

    /// Reject entry lists that are not arrays of objects with an address
    fn check_entries(&self, field: &str, entries: &Value) -> PlanResult<()> {
        let Value::Array(entries) = entries else {
            return Err(PlanError::InvalidInput(format!(
                "'{}' must be an array, got {}",
                field,
                json_type(entries)
            )));
        };

        for (index, entry) in entries.iter().enumerate() {
            let address = entry.get("address").and_then(Value::as_str);
            if address.is_none() {
                return Err(PlanError::InvalidInput(format!(
                    "'{}[{}]' has no string 'address'",
                    field, index
                )));
            }
        }

        Ok(())
    }

    /// Keep the first drift entry per address
    fn dedup_drift(&self, plan: &mut Plan) {
        let mut seen = HashSet::new();
        plan.resource_drift.retain(|drift| {
            let first = seen.insert(drift.address.clone());
            if !first {
                warn!("ignoring duplicate drift entry for {}", drift.address);
            }
            first
        });
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
