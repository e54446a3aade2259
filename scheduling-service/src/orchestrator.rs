//! Orchestrator (C8): the single entry point that turns a [`Config`] plus a
//! holiday set into a finished [`Schedule`]. Ported from
//! `original_source/scheduler.py::generate_schedule`: seed employee state
//! from the production calendar and any carry-over, hand the month to the
//! backtracking driver (C6), then run the three stabilizing post-passes
//! (C7) in order.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use shared::{Config, DaySchedule, Employee, Schedule, ScheduleError, ScheduleMetadata, ShiftType};

use crate::backtrack;
use crate::calendar::{all_days, blocked_working_days, production_days};
use crate::post_passes::{balance_duty_shifts, balance_weekend_work, target_adjustment};
use crate::state::EmployeeState;

/// `round(production_days * workload_pct / 100)`, matching Python's
/// `round()` (half-to-even), not the "half away from zero" rounding
/// `f64::round()` does. Computed over integers so the tie case
/// (`production_days * workload_pct` an odd multiple of 50) is exact rather
/// than relying on floating-point equality.
fn rounded_target(production_days: u32, workload_pct: u32) -> u32 {
    let scaled = u64::from(production_days) * u64::from(workload_pct);
    let quotient = (scaled / 100) as u32;
    let remainder = scaled % 100;
    match remainder.cmp(&50) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => {
            if quotient % 2 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    }
}

fn seed_states(employees: &[Employee], config: &Config, production: u32) -> HashMap<String, EmployeeState> {
    let mut states = HashMap::new();
    for emp in employees {
        let blocked = blocked_working_days(emp, config.year, config.month);
        let target = rounded_target(production, emp.workload_pct);
        states.insert(emp.name.clone(), EmployeeState::new(target, blocked));
    }

    let carry_by_name: HashMap<&str, &shared::CarryOverState> =
        config.carry_over.iter().map(|c| (c.employee_name.as_str(), c)).collect();
    for emp in employees {
        if let Some(co) = carry_by_name.get(emp.name.as_str()) {
            if let Some(st) = states.get_mut(&emp.name) {
                if co.last_shift.is_some() {
                    st.last_shift = co.last_shift;
                }
                st.consecutive_working = co.consecutive_working;
                st.consecutive_off = co.consecutive_off;
            }
        }
    }
    states
}

fn pins_by_date(config: &Config) -> HashMap<NaiveDate, HashMap<String, ShiftType>> {
    let mut map: HashMap<NaiveDate, HashMap<String, ShiftType>> = HashMap::new();
    for pin in &config.pins {
        map.entry(pin.date).or_default().insert(pin.employee_name.clone(), pin.shift);
    }
    map
}

fn pinned_on(config: &Config) -> HashSet<(NaiveDate, String)> {
    config
        .pins
        .iter()
        .map(|p| (p.date, p.employee_name.clone()))
        .collect()
}

fn recompute_total_working(days: &[DaySchedule], name: &str) -> u32 {
    days.iter().filter(|d| d.is_working(name)).count() as u32
}

/// Build the schedule for one month. `holidays` is the full set of
/// non-working dates (weekends plus any manually declared public
/// holidays) the caller has already resolved.
pub fn generate_schedule(config: &Config, holidays: &HashSet<NaiveDate>) -> Result<Schedule, ScheduleError> {
    let all_month_days = all_days(config.year, config.month);
    let production = production_days(config.year, config.month, holidays);
    tracing::info!(production_days = production, "calendar production-day norm");

    let employees = &config.employees;
    let mut states = seed_states(employees, config, production);
    let pins = pins_by_date(config);
    let pinned = pinned_on(config);

    let mut days = backtrack::run(employees, &mut states, holidays, config.seed, &all_month_days, &pins)?;

    balance_weekend_work(&mut days, employees, &pinned);
    for emp in employees {
        if let Some(st) = states.get_mut(&emp.name) {
            st.total_working = recompute_total_working(&days, &emp.name);
        }
    }

    balance_duty_shifts(&mut days, employees, holidays, &pinned);

    let mut warnings = Vec::new();
    target_adjustment(&mut days, employees, &mut states, holidays, &pinned, &mut warnings);

    let duty_employees: Vec<&Employee> = employees.iter().filter(|e| e.on_duty).collect();
    if !duty_employees.is_empty() {
        let ev_counts: Vec<u32> = duty_employees
            .iter()
            .map(|e| days.iter().filter(|d| d.evening.iter().any(|n| n == &e.name)).count() as u32)
            .collect();
        let max_ev = *ev_counts.iter().max().unwrap();
        let min_ev = *ev_counts.iter().min().unwrap();
        tracing::info!(max = max_ev, min = min_ev, diff = max_ev - min_ev, "evening shift balance");
    }

    let total_nights: u32 = days.iter().map(|d| d.night.len() as u32).sum();
    let total_mornings: u32 = days.iter().map(|d| d.morning.len() as u32).sum();
    let total_evenings: u32 = days.iter().map(|d| d.evening.len() as u32).sum();

    let uncovered: Vec<NaiveDate> = days.iter().filter(|d| !d.is_covered()).map(|d| d.date).collect();
    if !uncovered.is_empty() {
        return Err(ScheduleError::Uncovered { dates: uncovered });
    }

    let working_days_per_employee: HashMap<String, u32> = employees
        .iter()
        .map(|e| (e.name.clone(), states[&e.name].total_working))
        .collect();

    tracing::info!(
        days = days.len(),
        nights = total_nights,
        mornings = total_mornings,
        evenings = total_evenings,
        production_days = production,
        "schedule generated"
    );

    let carry_over = employees
        .iter()
        .map(|e| {
            let st = &states[&e.name];
            shared::CarryOverState {
                employee_name: e.name.clone(),
                last_shift: st.last_shift,
                consecutive_working: st.consecutive_working,
                consecutive_off: st.consecutive_off,
            }
        })
        .collect();

    let metadata = ScheduleMetadata {
        total_mornings,
        total_evenings,
        total_nights,
        holidays_count: holidays.len(),
        production_working_days: production,
        working_days_per_employee,
        carry_over,
    };

    Ok(Schedule {
        config: config.clone(),
        days,
        metadata,
        warnings,
    })
}
