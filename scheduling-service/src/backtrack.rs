//! Backtracking driver (C6). Wraps the day builder (C5) in a bounded
//! retry loop: when a day can't be covered, rewind up to 3 already-built
//! days and retry with a reseeded RNG, rather than failing the whole
//! month on the first dead end. Ported from the retry loop in
//! `original_source/scheduler.py::generate_schedule`.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use shared::{Employee, ScheduleError, ShiftType};

use crate::day_builder::build_day;
use crate::state::EmployeeState;

/// Rewind this many already-built days (and their state snapshots) on each
/// backtrack, hoping a different draw a few days back avoids the dead end.
const BACKTRACK_WINDOW: usize = 3;

/// Give up after this many total backtracks across the whole run.
const MAX_BACKTRACKS: u32 = 10;

fn reseed(seed: u64, total_backtracks: u32, day_idx: usize) -> ChaCha20Rng {
    let derived = seed
        .wrapping_add(u64::from(total_backtracks) * 1000)
        .wrapping_add(day_idx as u64);
    ChaCha20Rng::seed_from_u64(derived)
}

/// Build every day in `all_days` in order, backtracking on infeasibility.
/// Returns the finished day list, or the last infeasibility error once the
/// backtrack budget is exhausted.
pub fn run(
    employees: &[Employee],
    states: &mut HashMap<String, EmployeeState>,
    holidays: &HashSet<NaiveDate>,
    seed: u64,
    all_days: &[NaiveDate],
    pins_by_date: &HashMap<NaiveDate, HashMap<String, ShiftType>>,
) -> Result<Vec<shared::DaySchedule>, ScheduleError> {
    let empty_pins: HashMap<String, ShiftType> = HashMap::new();
    let mut built: Vec<shared::DaySchedule> = Vec::new();
    let mut snapshots: Vec<HashMap<String, EmployeeState>> = Vec::new();
    let mut total_backtracks = 0u32;
    let mut day_idx = 0usize;
    let mut rng = reseed(seed, 0, 0);

    while day_idx < all_days.len() {
        let date = all_days[day_idx];
        let remaining_days = (all_days.len() - day_idx) as u32;
        let pins_today = pins_by_date.get(&date).unwrap_or(&empty_pins);

        snapshots.push(states.clone());

        match build_day(date, employees, states, holidays, &mut rng, remaining_days, pins_today) {
            Ok(day) => {
                built.push(day);
                day_idx += 1;
            }
            Err(err) => {
                total_backtracks += 1;
                tracing::warn!(
                    %date,
                    total_backtracks,
                    error = %err,
                    "day infeasible, attempting backtrack"
                );
                snapshots.pop();

                if total_backtracks > MAX_BACKTRACKS || snapshots.is_empty() {
                    return Err(err);
                }

                let rewind = BACKTRACK_WINDOW.min(built.len()).min(snapshots.len());
                for _ in 0..rewind {
                    built.pop();
                    *states = snapshots.pop().expect("rewind count bounded by snapshot len");
                }
                day_idx -= rewind;
                rng = reseed(seed, total_backtracks, day_idx);
            }
        }
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ScheduleKind, Site};

    fn primary(name: &str) -> Employee {
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

    fn remote(name: &str) -> Employee {
        Employee {
            site: Site::Remote,
            ..primary(name)
        }
    }

    #[test]
    fn builds_a_full_week_without_backtracking() {
        let employees = vec![
            primary("p1"),
            primary("p2"),
            primary("p3"),
            primary("p4"),
            remote("r1"),
            remote("r2"),
        ];
        let mut states: HashMap<String, EmployeeState> = employees
            .iter()
            .map(|e| (e.name.clone(), EmployeeState::new(20, 0)))
            .collect();
        let holidays = HashSet::new();
        let days: Vec<NaiveDate> = (1..=7)
            .map(|d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap())
            .collect();

        let result = run(&employees, &mut states, &holidays, 42, &days, &HashMap::new()).unwrap();
        assert_eq!(result.len(), 7);
        for day in &result {
            assert!(day.is_covered());
        }
    }

    #[test]
    fn gives_up_when_always_infeasible() {
        let employees = vec![primary("p1")];
        let mut states: HashMap<String, EmployeeState> =
            employees.iter().map(|e| (e.name.clone(), EmployeeState::new(20, 0))).collect();
        let holidays = HashSet::new();
        let days = vec![NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()];

        let err = run(&employees, &mut states, &holidays, 1, &days, &HashMap::new()).unwrap_err();
        matches!(err, ScheduleError::Infeasible { .. });
    }
}
