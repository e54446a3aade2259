pub mod carry_over;
pub mod config;
pub mod day_schedule;
pub mod employee;
pub mod error;
pub mod pin;
pub mod schedule;
pub mod shift;

pub use carry_over::CarryOverState;
pub use config::{collect_config_issues, Config};
pub use day_schedule::DaySchedule;
pub use employee::{Employee, VacationPeriod};
pub use error::{ConfigError, ScheduleError};
pub use pin::PinnedAssignment;
pub use schedule::{Schedule, ScheduleMetadata};
pub use shift::{ScheduleKind, ShiftType, Site};
