use serde::{Deserialize, Serialize};

/// A single day's assignment for one employee.
///
/// MORNING/EVENING/NIGHT are the "duty" shifts that must be covered every
/// calendar day; WORKDAY joins them to make up the four "working" shifts
/// that count toward an employee's monthly norm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Morning,
    Evening,
    Night,
    Workday,
    DayOff,
    Vacation,
}

impl ShiftType {
    /// The three mandatory on-call shifts.
    pub fn is_duty(self) -> bool {
        matches!(self, ShiftType::Morning | ShiftType::Evening | ShiftType::Night)
    }

    /// Duty shifts plus plain business-hours WORKDAY — days that count
    /// toward the employee's monthly working-day norm.
    pub fn is_working(self) -> bool {
        self.is_duty() || matches!(self, ShiftType::Workday)
    }
}

/// The two operational sites. PRIMARY owns the HQ daytime duty shifts;
/// REMOTE owns the midnight shift, worked during its own daytime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Site {
    Primary,
    Remote,
}

impl Site {
    /// Whether this site's employees can be assigned the given duty shift.
    pub fn serves(self, shift: ShiftType) -> bool {
        match self {
            Site::Primary => matches!(shift, ShiftType::Morning | ShiftType::Evening),
            Site::Remote => matches!(shift, ShiftType::Night),
        }
    }
}

/// Whether an employee can be scheduled on weekends/holidays at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleKind {
    Flexible,
    FiveTwo,
}

impl ScheduleKind {
    pub fn works_on_weekend(self) -> bool {
        matches!(self, ScheduleKind::Flexible)
    }
}
