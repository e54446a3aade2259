use chrono::NaiveDate;
use thiserror::Error;

use crate::shift::ShiftType;

/// Raised at [`crate::Config::new`] when the employee roster, pins, or
/// month/year fields violate one of the scheduler's hard invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("month must be in 1..=12, got {0}")]
    MonthOutOfRange(u32),

    #[error("year must be >= 2024, got {0}")]
    YearOutOfRange(i32),

    #[error("employee {name:?}: {reason}")]
    InvalidEmployee { name: String, reason: String },

    #[error("vacation period end ({end}) is before start ({start})")]
    VacationInverted { start: NaiveDate, end: NaiveDate },

    #[error("pin shift cannot be VACATION")]
    PinIsVacation,

    #[error(
        "not enough on-duty PRIMARY employees: {found} (minimum 4)"
    )]
    NotEnoughPrimaryDuty { found: usize },

    #[error(
        "not enough on-duty REMOTE employees: {found} (minimum 2)"
    )]
    NotEnoughRemoteDuty { found: usize },

    #[error("duplicate employee name {0:?}")]
    DuplicateEmployeeName(String),

    #[error("pin on {date}: employee {name:?} not found among employees")]
    PinUnknownEmployee { date: NaiveDate, name: String },

    #[error("pin on {date}: employee {name:?} has more than one pin for this day")]
    DuplicatePin { date: NaiveDate, name: String },

    #[error(
        "pin on {date}: employee {name:?} is PRIMARY and cannot be pinned to NIGHT"
    )]
    PinIncompatibleSitePrimary { date: NaiveDate, name: String },

    #[error(
        "pin on {date}: employee {name:?} is REMOTE and cannot be pinned to MORNING or EVENING"
    )]
    PinIncompatibleSiteRemote { date: NaiveDate, name: String },
}

/// Raised by the scheduling core when no valid [`crate::Schedule`] can be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("cannot cover {shift:?} on {date}: {reason}")]
    Infeasible {
        shift: ShiftType,
        reason: String,
        date: NaiveDate,
    },

    #[error("schedule has uncovered days: {dates:?}")]
    Uncovered { dates: Vec<NaiveDate> },
}
