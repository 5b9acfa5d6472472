//! Plan output parser for OpenTofu/Terraform
//!
//! This module drives the parse of the text output from `tofu plan` or
//! `terraform plan`: it locates the changes section and parses one
//! resource body per resource comment until the plan summary.

use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use super::address::ResourceComment;
use super::block::{LineCursor, parse_map_body};
use super::error::{PlanParseError, Result};
use super::line::{Line, LineKind};
use super::types::ResourceChange;
use crate::traits::{FileSystem, RealFileSystem};

/// Banner printed when the plan is empty (legacy wording)
pub const NO_CHANGES_LEGACY: &str = "No changes. Infrastructure is up-to-date.";

/// Banner printed when the plan is empty
pub const NO_CHANGES: &str = "No changes. Your infrastructure matches the configuration.";

/// Ending of the banner that opens the changes section, shared by
/// "Terraform will ..." and "OpenTofu will ..."
pub const CHANGES_START: &str = "will perform the following actions:";

/// Marker of a failed plan
pub const ERROR_MARKER: &str = "Error: ";

/// Parser for OpenTofu/Terraform plan output
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanParser;

impl PlanParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse plan output into its resource changes, in source order
    ///
    /// Output without changes, or of a failed plan, yields no resources.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Vec<ResourceChange>> {
        let mut cursor = LineCursor::new(reader);
        let mut resources = Vec::new();
        let mut in_changes = false;

        while let Some(text) = cursor.next_line()? {
            if text.is_empty() {
                continue;
            }

            if !in_changes {
                if text.contains(NO_CHANGES_LEGACY) || text.contains(NO_CHANGES) {
                    debug!(line_number = cursor.line_number(), "plan has no changes");
                    return Ok(resources);
                }
                if text.contains(ERROR_MARKER) {
                    debug!(
                        line_number = cursor.line_number(),
                        line = %text,
                        "plan reported an error"
                    );
                    return Ok(resources);
                }
                if text.contains(CHANGES_START) {
                    debug!(line_number = cursor.line_number(), "changes section starts");
                    in_changes = true;
                }
                continue;
            }

            match Line::new(&text).kind() {
                LineKind::ResourceComment => {
                    let resource = self.parse_resource(&mut cursor, &text)?;
                    debug!(
                        address = %resource.address,
                        update_type = %resource.update_type,
                        attributes = resource.attributes.len(),
                        "parsed resource"
                    );
                    resources.push(resource);
                }
                LineKind::PlanSummary => {
                    debug!(
                        line_number = cursor.line_number(),
                        resources = resources.len(),
                        "plan summary reached"
                    );
                    return Ok(resources);
                }
                _ => {}
            }
        }

        Err(PlanParseError::UnexpectedEndOfInput { context: "plan" })
    }

    /// Parse plan output held in memory
    pub fn parse_str(&self, output: &str) -> Result<Vec<ResourceChange>> {
        self.parse(output.as_bytes())
    }

    /// Parse the plan output saved at `path`
    pub fn parse_path(&self, path: &Path) -> anyhow::Result<Vec<ResourceChange>> {
        self.parse_path_with(&RealFileSystem, path)
    }

    /// Parse the plan output saved at `path`, opened through `fs`
    pub fn parse_path_with(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
    ) -> anyhow::Result<Vec<ResourceChange>> {
        let reader = fs.open(path)?;
        self.parse(reader)
            .with_context(|| format!("Failed to parse plan output: {:?}", path))
    }

    fn parse_resource<R: BufRead>(
        &self,
        cursor: &mut LineCursor<R>,
        comment: &str,
    ) -> Result<ResourceChange> {
        let comment = ResourceComment::parse(comment).map_err(|e| cursor.locate(e))?;
        let attributes = parse_map_body(cursor, "resource")?;
        Ok(comment.into_resource(attributes))
    }
}
