#![forbid(unsafe_code)]

//! Chapter-count accounting for a yearly Bible reading plan.
//!
//! - [`passage`] turns free-text references into chapter counts.
//! - [`model`] holds the read-only [`Plan`](model::Plan) and the mutable
//!   [`Progress`](model::Progress) mapping.
//! - [`stats`] aggregates read/total chapters per month and overall.

pub mod model;
pub mod passage;
pub mod stats;

pub use passage::{Passage, PassageClause, count_chapters};
pub use stats::{ProgressWeighting, ReadingStats, global_stats, month_overview, month_stats};
