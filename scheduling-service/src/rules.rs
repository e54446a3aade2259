//! Small eligibility predicates shared by the day builder (C5) and the
//! post-passes (C7). Grounded on the teacher's `domain/rules/*.rs` family
//! (`no_morning_after_evening_rule.rs`, `max_days_off_rule.rs`,
//! `min_days_off_rule.rs`) — collapsed into one module here because, unlike
//! the teacher's pluggable `Rule` trait objects, these predicates are
//! consulted inline by the day builder in a fixed order rather than
//! iterated over as a list.

use std::collections::HashSet;

use chrono::NaiveDate;

use shared::{Employee, ScheduleKind, ShiftType};

use crate::calendar::is_weekend_or_holiday;
use crate::state::{EmployeeState, DEFAULT_MAX_CONSECUTIVE_WORKING};

/// Maximum consecutive working days for this employee: their own override,
/// or the global default of 5.
pub fn max_cw(emp: &Employee) -> u32 {
    emp.max_consecutive_working.unwrap_or(DEFAULT_MAX_CONSECUTIVE_WORKING)
}

/// Monthly cap (if any) for the given duty shift type.
pub fn shift_cap(emp: &Employee, shift: ShiftType) -> Option<u32> {
    match shift {
        ShiftType::Morning => emp.max_morning_shifts,
        ShiftType::Evening => emp.max_evening_shifts,
        ShiftType::Night => emp.max_night_shifts,
        _ => None,
    }
}

/// Whether assigning one more `shift` to this employee would exceed their
/// monthly cap for it.
pub fn shift_limit_reached(emp: &Employee, state: &EmployeeState, shift: ShiftType) -> bool {
    match shift_cap(emp, shift) {
        Some(cap) => state.shift_count(shift) >= cap,
        None => false,
    }
}

/// Last night's NIGHT shift blocks any assignment today except rest.
pub fn resting_after_night(state: &EmployeeState) -> bool {
    state.last_shift == Some(ShiftType::Night)
}

/// Last night's EVENING shift blocks MORNING/WORKDAY today (not enough
/// rest), but still allows another EVENING.
pub fn resting_after_evening(state: &EmployeeState) -> bool {
    state.last_shift == Some(ShiftType::Evening)
}

/// General per-day eligibility for any assignment at all (§4.3): not
/// blocked, not a fixed weekly day off, under the streak cap, and not a
/// 5/2 employee on a weekend/holiday.
pub fn can_work(
    emp: &Employee,
    state: &EmployeeState,
    day: NaiveDate,
    holidays: &HashSet<NaiveDate>,
) -> bool {
    if emp.is_blocked(day) {
        return false;
    }
    if emp.is_day_off_weekly(day) {
        return false;
    }
    if state.consecutive_working >= max_cw(emp) {
        return false;
    }
    !(emp.schedule_kind == ScheduleKind::FiveTwo && is_weekend_or_holiday(day, holidays))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ScheduleKind, Site};

    fn employee(name: &str) -> Employee {
        Employee {
            name: name.to_string(),
            site: Site::Primary,
            schedule_kind: ScheduleKind::Flexible,
            on_duty: true,
            morning_only: false,
            evening_only: false,
            team_lead: false,
            vacations: vec![],
            unavailable_dates: Default::default(),
            preferred_shift: None,
            workload_pct: 100,
            days_off_weekly: Default::default(),
            max_morning_shifts: None,
            max_evening_shifts: None,
            max_night_shifts: None,
            max_consecutive_working: None,
            group: None,
            role: String::new(),
        }
    }

    #[test]
    fn max_cw_defaults_to_five() {
        assert_eq!(max_cw(&employee("a")), 5);
    }

    #[test]
    fn max_cw_honors_override() {
        let mut e = employee("a");
        e.max_consecutive_working = Some(3);
        assert_eq!(max_cw(&e), 3);
    }

    #[test]
    fn shift_limit_reached_respects_cap() {
        let mut e = employee("a");
        e.max_morning_shifts = Some(2);
        let mut st = EmployeeState::new(10, 0);
        assert!(!shift_limit_reached(&e, &st, ShiftType::Morning));
        st.morning_count = 2;
        assert!(shift_limit_reached(&e, &st, ShiftType::Morning));
    }

    #[test]
    fn five_two_employee_cannot_work_weekend() {
        let mut e = employee("a");
        e.schedule_kind = ScheduleKind::FiveTwo;
        let st = EmployeeState::new(10, 0);
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert!(!can_work(&e, &st, saturday, &HashSet::new()));
    }
}
