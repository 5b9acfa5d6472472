pub mod input;
pub mod project;
pub mod resources;
pub mod summary;

pub use project::{FilterOptions, ProjectCommand, ProjectionSide};
pub use resources::ResourcesCommand;
pub use summary::SummaryCommand;
