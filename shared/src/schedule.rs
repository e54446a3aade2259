use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::carry_over::CarryOverState;
use crate::config::Config;
use crate::day_schedule::DaySchedule;

/// Aggregate counters and the next-month carry-over snapshot attached to a
/// completed [`Schedule`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScheduleMetadata {
    pub total_mornings: u32,
    pub total_evenings: u32,
    pub total_nights: u32,
    pub holidays_count: usize,
    pub production_working_days: u32,
    pub working_days_per_employee: HashMap<String, u32>,
    pub carry_over: Vec<CarryOverState>,
}

/// The immutable result of a successful `generate_schedule` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub config: Config,
    pub days: Vec<DaySchedule>,
    pub metadata: ScheduleMetadata,
    /// Non-fatal warnings raised while stabilizing the schedule (e.g. a
    /// target-adjustment deficit that could not be fully closed).
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Schedule {
    pub fn day_for(&self, date: chrono::NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }
}
