//! # Resources
//!
//! Per-resource orchestration around the generic handler: derived fields,
//! parent checks, cascades and the average-cost hook.

pub mod aggregate;
pub mod bootcamps;
pub mod courses;

pub use aggregate::{AverageCost, AVERAGE_COST_FIELD};
pub use bootcamps::{BootcampService, EARTH_RADIUS_MILES};
pub use courses::CourseService;
