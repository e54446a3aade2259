use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shift::ShiftType;

/// A fixed `(date, employee, shift)` triple. Honored unconditionally by the
/// day builder and never touched by the post-passes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedAssignment {
    pub date: NaiveDate,
    pub employee_name: String,
    pub shift: ShiftType,
}

impl PinnedAssignment {
    pub fn new(date: NaiveDate, employee_name: String, shift: ShiftType) -> Result<Self, ConfigError> {
        if shift == ShiftType::Vacation {
            return Err(ConfigError::PinIsVacation);
        }
        Ok(Self {
            date,
            employee_name,
            shift,
        })
    }
}
