use super::input::{load_resources, print_json};
use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value};
use tfplan::ResourceChange;
use tfplan::plan::{Filter, computed_only, ignore_computed, ignore_no_op, ignore_sensitive};

/// Which side of the change to project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionSide {
    Before,
    After,
}

/// Attribute filters selectable on the command line
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FilterOptions {
    /// Leave out attributes holding sensitive values
    #[arg(long)]
    pub ignore_sensitive: bool,

    /// Leave out attributes whose values are known only after apply
    #[arg(long)]
    pub ignore_computed: bool,

    /// Leave out unchanged attributes
    #[arg(long)]
    pub ignore_no_op: bool,

    /// Keep only attributes whose values are known only after apply
    #[arg(long, conflicts_with = "ignore_computed")]
    pub computed_only: bool,
}

impl FilterOptions {
    pub fn filters(&self) -> Vec<Filter<'static>> {
        let mut filters: Vec<Filter<'static>> = Vec::new();
        if self.ignore_sensitive {
            filters.push(&ignore_sensitive);
        }
        if self.ignore_computed {
            filters.push(&ignore_computed);
        }
        if self.ignore_no_op {
            filters.push(&ignore_no_op);
        }
        if self.computed_only {
            filters.push(&computed_only);
        }
        filters
    }
}

pub struct ProjectCommand;

impl ProjectCommand {
    /// Execute the before/after command: print each resource's projection
    /// keyed by address
    pub fn execute(
        path: &str,
        side: ProjectionSide,
        options: &FilterOptions,
        pretty: bool,
    ) -> Result<()> {
        let resources = load_resources(path)?;
        let projections = Self::project(&resources, side, options);
        print_json(&projections, pretty)
    }

    fn project(
        resources: &[ResourceChange],
        side: ProjectionSide,
        options: &FilterOptions,
    ) -> Value {
        let filters = options.filters();

        let mut projections = Map::new();
        for resource in resources {
            let value = match side {
                ProjectionSide::Before => resource.before(&filters),
                ProjectionSide::After => resource.after(&filters),
            };
            projections.insert(resource.address.clone(), value);
        }

        Value::Object(projections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tfplan::PlanParser;

    const PLAN: &str = r#"
Terraform will perform the following actions:

  # aws_db_instance.main will be updated in-place
  ~ resource "aws_db_instance" "main" {
        engine   = "postgres"
      ~ port     = 5432 -> 5433
      ~ password = (sensitive value)
      + endpoint = (known after apply)
    }

Plan: 0 to add, 1 to change, 0 to destroy.
"#;

    fn resources() -> Vec<ResourceChange> {
        PlanParser::new().parse_str(PLAN).unwrap()
    }

    #[test]
    fn test_no_filters() {
        let options = FilterOptions::default();
        assert!(options.filters().is_empty());

        let before = ProjectCommand::project(&resources(), ProjectionSide::Before, &options);
        assert_eq!(
            before,
            json!({
                "aws_db_instance.main": {
                    "engine": "postgres",
                    "port": 5432,
                    "password": "(sensitive value)"
                }
            })
        );
    }

    #[test]
    fn test_filter_flags() {
        let options = FilterOptions {
            ignore_sensitive: true,
            ignore_no_op: true,
            ..Default::default()
        };
        assert_eq!(options.filters().len(), 2);

        let after = ProjectCommand::project(&resources(), ProjectionSide::After, &options);
        assert_eq!(
            after,
            json!({
                "aws_db_instance.main": {
                    "port": 5433,
                    "endpoint": "(known after apply)"
                }
            })
        );

        let options = FilterOptions {
            computed_only: true,
            ..Default::default()
        };
        let after = ProjectCommand::project(&resources(), ProjectionSide::After, &options);
        assert_eq!(
            after,
            json!({"aws_db_instance.main": {"endpoint": "(known after apply)"}})
        );
    }
}
