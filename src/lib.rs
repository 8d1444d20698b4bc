//! Planscope: structural diff, grouping and sensitivity views over
//! OpenTofu/Terraform JSON plans.

pub mod config;
pub mod error;
pub mod output;
pub mod plan;

pub use config::RenderConfig;
pub use error::{PlanError, PlanResult};
pub use plan::PlanModel;
