use super::input::{load_resources, print_json};
use anyhow::Result;

pub struct ResourcesCommand;

impl ResourcesCommand {
    /// Execute the resources command: print the full change tree as JSON
    pub fn execute(path: &str, pretty: bool) -> Result<()> {
        let resources = load_resources(path)?;
        print_json(&resources, pretty)
    }
}
