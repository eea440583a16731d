pub mod statistics;
pub mod student;

pub use statistics::{ApiMessage, CourseCount, HealthStatus, LevelCount, ServiceInfo, Statistics};
pub use student::{Student, StudentCreate, StudentFilters, StudentUpdate};
