//! Plan output parsing module
//!
//! This module turns the text output of OpenTofu/Terraform `plan` into a
//! tree of resource and attribute changes, and projects that tree into the
//! values before and after the change.
//!
//! # Features
//!
//! - **Parsing**: Resources, nested maps and arrays, heredocs and
//!   `jsonencode(...)` bodies, with colored or plain input
//! - **Addresses**: Module path, type, name and `count`/`for_each` index
//! - **Projections**: Before/after values with composable filters for
//!   sensitive, computed and unchanged attributes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tfplan::plan::{PlanParser, ignore_sensitive};
//!
//! let resources = PlanParser::new().parse_path(Path::new("plan.stdout"))?;
//! for resource in &resources {
//!     println!("{} {}", resource.address, resource.after(&[&ignore_sensitive]));
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

mod address;
mod attribute;
mod block;
mod error;
mod line;
mod parser;
mod projection;
mod types;

pub use address::{ResourceAddress, ResourceComment};
pub use error::{PlanParseError, Result};
pub use line::strip_ansi;
pub use parser::PlanParser;
pub use projection::{
    Filter, computed_only, ignore_computed, ignore_no_op, ignore_sensitive, sensitive_only,
};
pub use types::{
    ArrayChange, AttributeChange, COMPUTED_VALUE, HeredocChange, JsonEncodeChange, MapChange,
    PlanSummary, ResourceChange, ResourceIndex, SENSITIVE_VALUE, SENSITIVE_VALUE_SHORT,
    ScalarChange, UpdateType, Value,
};
