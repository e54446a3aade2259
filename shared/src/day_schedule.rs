use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shift::ShiftType;

/// One calendar day's assignment, partitioned into six name lists. Every
/// employee appears on exactly one list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_holiday: bool,
    #[serde(default)]
    pub morning: Vec<String>,
    #[serde(default)]
    pub evening: Vec<String>,
    #[serde(default)]
    pub night: Vec<String>,
    #[serde(default)]
    pub workday: Vec<String>,
    #[serde(default)]
    pub day_off: Vec<String>,
    #[serde(default)]
    pub vacation: Vec<String>,
}

impl DaySchedule {
    pub fn new(date: NaiveDate, is_holiday: bool) -> Self {
        Self {
            date,
            is_holiday,
            morning: Vec::new(),
            evening: Vec::new(),
            night: Vec::new(),
            workday: Vec::new(),
            day_off: Vec::new(),
            vacation: Vec::new(),
        }
    }

    /// The list an employee's assigned `shift` belongs to.
    pub fn list_for(&mut self, shift: ShiftType) -> &mut Vec<String> {
        match shift {
            ShiftType::Morning => &mut self.morning,
            ShiftType::Evening => &mut self.evening,
            ShiftType::Night => &mut self.night,
            ShiftType::Workday => &mut self.workday,
            ShiftType::DayOff => &mut self.day_off,
            ShiftType::Vacation => &mut self.vacation,
        }
    }

    /// Read-only counterpart of [`DaySchedule::list_for`], used by post-passes
    /// that need to inspect a shift's roster without holding a mutable borrow.
    pub fn list_for_ref(&self, shift: ShiftType) -> &Vec<String> {
        match shift {
            ShiftType::Morning => &self.morning,
            ShiftType::Evening => &self.evening,
            ShiftType::Night => &self.night,
            ShiftType::Workday => &self.workday,
            ShiftType::DayOff => &self.day_off,
            ShiftType::Vacation => &self.vacation,
        }
    }

    pub fn push(&mut self, name: String, shift: ShiftType) {
        self.list_for(shift).push(name);
    }

    pub fn all_assigned(&self) -> impl Iterator<Item = &str> {
        self.morning
            .iter()
            .chain(self.evening.iter())
            .chain(self.night.iter())
            .chain(self.workday.iter())
            .map(String::as_str)
    }

    pub fn is_working(&self, name: &str) -> bool {
        self.morning.iter().any(|n| n == name)
            || self.evening.iter().any(|n| n == name)
            || self.night.iter().any(|n| n == name)
            || self.workday.iter().any(|n| n == name)
    }

    pub fn is_resting(&self, name: &str) -> bool {
        self.day_off.iter().any(|n| n == name) || self.vacation.iter().any(|n| n == name)
    }

    /// All three mandatory shifts are covered.
    pub fn is_covered(&self) -> bool {
        !self.morning.is_empty() && !self.evening.is_empty() && !self.night.is_empty()
    }
}
