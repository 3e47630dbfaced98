pub mod json;
pub mod node;
pub mod reducer;
pub mod story;
pub mod types;

pub use json::scenario_to_json;
pub use node::{NodeId, ScenarioTree, StepTree};
pub use reducer::{ReportBuilder, extract_reports};
pub use story::{UserStory, slugify};
pub use types::{ReportError, ReportResult};
