use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tfplan::{PlanParser, ResourceChange};
use tracing::debug;

/// Path argument that selects standard input
pub const STDIN_PATH: &str = "-";

/// Parse the plan output at `path`, or from standard input for `-`
pub fn load_resources(path: &str) -> Result<Vec<ResourceChange>> {
    let parser = PlanParser::new();

    let resources = if path == STDIN_PATH {
        let stdin = std::io::stdin();
        parser
            .parse(stdin.lock())
            .context("Failed to parse plan output from standard input")?
    } else {
        parser.parse_path(Path::new(path))?
    };

    debug!(path, resources = resources.len(), "plan loaded");
    Ok(resources)
}

/// Print a value as JSON on standard output
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;

    println!("{}", json);
    Ok(())
}
