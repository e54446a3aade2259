use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::shift::{ScheduleKind, ShiftType, Site};

/// A closed `[start, end]` vacation interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VacationPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VacationPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if end < start {
            return Err(ConfigError::VacationInverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub site: Site,
    pub schedule_kind: ScheduleKind,
    #[serde(default = "default_true")]
    pub on_duty: bool,
    #[serde(default)]
    pub morning_only: bool,
    #[serde(default)]
    pub evening_only: bool,
    #[serde(default)]
    pub team_lead: bool,
    #[serde(default)]
    pub vacations: Vec<VacationPeriod>,
    #[serde(default)]
    pub unavailable_dates: HashSet<NaiveDate>,
    #[serde(default)]
    pub preferred_shift: Option<ShiftType>,
    #[serde(default = "default_workload_pct")]
    pub workload_pct: u32,
    #[serde(default)]
    pub days_off_weekly: HashSet<u8>,
    #[serde(default)]
    pub max_morning_shifts: Option<u32>,
    #[serde(default)]
    pub max_evening_shifts: Option<u32>,
    #[serde(default)]
    pub max_night_shifts: Option<u32>,
    #[serde(default)]
    pub max_consecutive_working: Option<u32>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub role: String,
}

fn default_true() -> bool {
    true
}

fn default_workload_pct() -> u32 {
    100
}

impl Employee {
    /// Validate the cross-field invariants pydantic's `validate_flags`
    /// enforced on the original model.
    pub fn validate_flags(&self) -> Result<(), ConfigError> {
        let err = |reason: &str| ConfigError::InvalidEmployee {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.team_lead && self.on_duty {
            return Err(err("team_lead cannot also be on_duty"));
        }
        if self.morning_only && self.evening_only {
            return Err(err("cannot set both morning_only and evening_only"));
        }
        if !(1..=100).contains(&self.workload_pct) {
            return Err(err("workload_pct must be in 1..=100"));
        }
        if matches!(
            self.preferred_shift,
            Some(ShiftType::Vacation) | Some(ShiftType::DayOff)
        ) {
            return Err(err("preferred_shift cannot be VACATION or DAY_OFF"));
        }
        if matches!(self.max_consecutive_working, Some(v) if v < 1) {
            return Err(err("max_consecutive_working must be >= 1"));
        }
        for d in &self.days_off_weekly {
            if *d > 6 {
                return Err(err("days_off_weekly contains a day outside 0..=6"));
            }
        }
        Ok(())
    }

    pub fn is_on_vacation(&self, day: NaiveDate) -> bool {
        self.vacations.iter().any(|v| v.contains(day))
    }

    /// Unavailable either because of vacation or an explicit manual block.
    pub fn is_blocked(&self, day: NaiveDate) -> bool {
        self.is_on_vacation(day) || self.unavailable_dates.contains(&day)
    }

    pub fn is_day_off_weekly(&self, day: NaiveDate) -> bool {
        self.days_off_weekly
            .contains(&(day.weekday().num_days_from_monday() as u8))
    }

    pub fn can_work_morning(&self) -> bool {
        !self.evening_only
    }

    pub fn can_work_evening(&self) -> bool {
        !self.morning_only
    }

    pub fn works_on_weekend(&self) -> bool {
        self.schedule_kind.works_on_weekend()
    }
}
