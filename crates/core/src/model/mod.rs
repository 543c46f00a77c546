mod ids;
mod plan;
mod progress;

pub use ids::{MonthId, ParseKeyError, ProgressKey};
pub use plan::{Month, Plan, PlanDocument, PlanError};
pub use progress::Progress;
