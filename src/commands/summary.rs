use super::input::load_resources;
use crate::output;
use anyhow::Result;
use tfplan::PlanSummary;

pub struct SummaryCommand;

impl SummaryCommand {
    /// Execute the summary command: list changed resources and their counts
    pub fn execute(path: &str) -> Result<()> {
        let resources = load_resources(path)?;
        let summary = PlanSummary::from_resources(&resources);

        output::section("Plan Summary");

        for resource in &resources {
            output::resource_line(resource);
        }

        if !resources.is_empty() {
            println!();
        }
        output::summary(&summary);

        Ok(())
    }
}
