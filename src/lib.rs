//! Structured parsing of OpenTofu/Terraform plan output

pub mod plan;
pub mod traits;

pub use plan::{
    AttributeChange, PlanParseError, PlanParser, PlanSummary, ResourceChange, UpdateType, Value,
};
