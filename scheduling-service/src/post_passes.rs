//! Post-passes (C7), run in the fixed order the orchestrator calls them in:
//! weekend-work balancing, then duty balancing, then target adjustment.
//! Ported from `_balance_weekend_work` / `_balance_duty_shifts` /
//! `_target_adjustment_pass` in `original_source/scheduler.py`. Pins are
//! immovable: a `(date, employee)` pair in `pinned_on` is excluded from
//! every swap and from every target-adjustment flip.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use shared::{DaySchedule, Employee, ScheduleKind, ShiftType, Site};

use crate::calendar::is_weekend_or_holiday;
use crate::rules::{max_cw, shift_cap};
use crate::state::MAX_CONSECUTIVE_OFF;

fn streak_around(name: &str, idx: usize, days: &[DaySchedule], working: bool) -> u32 {
    let active = |d: &DaySchedule| {
        if working {
            d.is_working(name)
        } else {
            d.is_resting(name)
        }
    };

    let mut left = 0u32;
    let mut i = idx;
    while i > 0 {
        i -= 1;
        if active(&days[i]) {
            left += 1;
        } else {
            break;
        }
    }
    let mut right = 0u32;
    for d in &days[idx + 1..] {
        if active(d) {
            right += 1;
        } else {
            break;
        }
    }
    left + 1 + right
}

/// Duty-shift attributes a site's on-duty employees compete over: PRIMARY
/// contends MORNING+EVENING, REMOTE contends NIGHT alone.
fn duty_attrs(site: Site) -> &'static [ShiftType] {
    match site {
        Site::Primary => &[ShiftType::Morning, ShiftType::Evening],
        Site::Remote => &[ShiftType::Night],
    }
}

/// For each site, swap a weekend duty slot from the most- to the
/// least-worked flexible on-duty employee until `max - min <= 1`.
pub fn balance_weekend_work(
    days: &mut [DaySchedule],
    employees: &[Employee],
    pinned_on: &HashSet<(NaiveDate, String)>,
) {
    let weekend_idxs: Vec<usize> = days
        .iter()
        .enumerate()
        .filter(|(_, d)| matches!(d.date.weekday(), Weekday::Sat | Weekday::Sun))
        .map(|(i, _)| i)
        .collect();
    if weekend_idxs.is_empty() {
        return;
    }

    for site in [Site::Primary, Site::Remote] {
        let duty_emps: Vec<&Employee> = employees
            .iter()
            .filter(|e| e.site == site && e.on_duty && e.schedule_kind == ScheduleKind::Flexible)
            .collect();
        if duty_emps.len() < 2 {
            continue;
        }
        let attrs = duty_attrs(site);
        let max_iters = weekend_idxs.len() * duty_emps.len();

        for _ in 0..max_iters {
            let counts: Vec<(String, u32)> = duty_emps
                .iter()
                .map(|e| {
                    let count = weekend_idxs
                        .iter()
                        .map(|&i| {
                            attrs
                                .iter()
                                .filter(|attr| days[i].list_for_ref(**attr).iter().any(|n| n == &e.name))
                                .count() as u32
                        })
                        .sum();
                    (e.name.clone(), count)
                })
                .collect();

            let (max_name, max_count) = counts.iter().max_by_key(|(_, c)| *c).unwrap().clone();
            let (min_name, min_count) = counts.iter().min_by_key(|(_, c)| *c).unwrap().clone();
            if max_count.saturating_sub(min_count) <= 1 {
                break;
            }

            let mut swapped = false;
            for &i in &weekend_idxs {
                let date = days[i].date;
                if pinned_on.contains(&(date, max_name.clone())) || pinned_on.contains(&(date, min_name.clone())) {
                    continue;
                }
                if days[i].vacation.iter().any(|n| n == &min_name) || days[i].vacation.iter().any(|n| n == &max_name) {
                    continue;
                }

                let Some(max_attr) = attrs
                    .iter()
                    .copied()
                    .find(|attr| days[i].list_for_ref(*attr).iter().any(|n| n == &max_name))
                else {
                    continue;
                };
                if !days[i].day_off.iter().any(|n| n == &min_name) {
                    continue;
                }

                let min_emp = duty_emps.iter().find(|e| e.name == min_name).unwrap();
                if max_attr == ShiftType::Morning && !min_emp.can_work_morning() {
                    continue;
                }
                if max_attr == ShiftType::Evening && !min_emp.can_work_evening() {
                    continue;
                }
                if let Some(cap) = shift_cap(min_emp, max_attr) {
                    let current = days.iter().filter(|d| d.list_for_ref(max_attr).iter().any(|n| n == &min_name)).count() as u32;
                    if current >= cap {
                        continue;
                    }
                }
                if max_attr == ShiftType::Morning && i > 0 && days[i - 1].evening.iter().any(|n| n == &min_name) {
                    continue;
                }

                days[i].list_for(max_attr).retain(|n| n != &max_name);
                days[i].day_off.push(max_name.clone());
                days[i].day_off.retain(|n| n != &min_name);
                days[i].list_for(max_attr).push(min_name.clone());
                swapped = true;
                break;
            }

            if !swapped {
                break;
            }
        }
    }
}

/// Same idea as [`balance_weekend_work`] but on weekdays, swapping a
/// leader's duty slot with a trailer's WORKDAY (not DAY_OFF) — this
/// preserves everyone's `total_working` count, unlike the weekend pass.
pub fn balance_duty_shifts(
    days: &mut [DaySchedule],
    employees: &[Employee],
    holidays: &HashSet<NaiveDate>,
    pinned_on: &HashSet<(NaiveDate, String)>,
) {
    for site in [Site::Primary, Site::Remote] {
        let duty_emps: Vec<&Employee> = employees.iter().filter(|e| e.site == site && e.on_duty).collect();
        if duty_emps.len() < 2 {
            continue;
        }
        let attrs = duty_attrs(site);
        let max_iters = days.len() * duty_emps.len();

        for _ in 0..max_iters {
            let counts: Vec<(String, u32)> = duty_emps
                .iter()
                .map(|e| {
                    let count = days
                        .iter()
                        .map(|d| attrs.iter().filter(|attr| d.list_for_ref(**attr).iter().any(|n| n == &e.name)).count() as u32)
                        .sum();
                    (e.name.clone(), count)
                })
                .collect();

            let (max_name, max_count) = counts.iter().max_by_key(|(_, c)| *c).unwrap().clone();
            let (min_name, min_count) = counts.iter().min_by_key(|(_, c)| *c).unwrap().clone();
            if max_count.saturating_sub(min_count) <= 1 {
                break;
            }

            let mut swapped = false;
            for i in 0..days.len() {
                let date = days[i].date;
                if is_weekend_or_holiday(date, holidays) {
                    continue;
                }
                if pinned_on.contains(&(date, max_name.clone())) || pinned_on.contains(&(date, min_name.clone())) {
                    continue;
                }

                let Some(max_attr) = attrs
                    .iter()
                    .copied()
                    .find(|attr| days[i].list_for_ref(*attr).iter().any(|n| n == &max_name))
                else {
                    continue;
                };
                if !days[i].workday.iter().any(|n| n == &min_name) {
                    continue;
                }

                let min_emp = duty_emps.iter().find(|e| e.name == min_name).unwrap();
                if max_attr == ShiftType::Morning && !min_emp.can_work_morning() {
                    continue;
                }
                if max_attr == ShiftType::Evening && !min_emp.can_work_evening() {
                    continue;
                }
                if let Some(cap) = shift_cap(min_emp, max_attr) {
                    let current = days.iter().filter(|d| d.list_for_ref(max_attr).iter().any(|n| n == &min_name)).count() as u32;
                    if current >= cap {
                        continue;
                    }
                }
                if i > 0 && days[i - 1].evening.iter().any(|n| n == &max_name) {
                    continue;
                }
                if max_attr == ShiftType::Morning && i > 0 && days[i - 1].evening.iter().any(|n| n == &min_name) {
                    continue;
                }

                days[i].list_for(max_attr).retain(|n| n != &max_name);
                days[i].workday.push(max_name.clone());
                days[i].workday.retain(|n| n != &min_name);
                days[i].list_for(max_attr).push(min_name.clone());
                swapped = true;
                break;
            }

            if !swapped {
                break;
            }
        }
    }
}

/// Restore each on-duty employee's `total_working` to their effective
/// target wherever a legal WORKDAY<->DAY_OFF flip exists. Runs last,
/// because the two balancing passes above move totals around (weekend
/// balancing) or move them around without changing them net (duty
/// balancing) before this pass tries to land each employee on-target.
pub fn target_adjustment(
    days: &mut [DaySchedule],
    employees: &[Employee],
    states: &mut std::collections::HashMap<String, crate::state::EmployeeState>,
    holidays: &HashSet<NaiveDate>,
    pinned_on: &HashSet<(NaiveDate, String)>,
    warnings: &mut Vec<String>,
) {
    for emp in employees {
        if !emp.on_duty {
            continue;
        }

        let target = states[&emp.name].effective_target();
        let mut actual = states[&emp.name].total_working;

        if actual > target {
            let mut excess = actual - target;
            for i in (0..days.len()).rev() {
                if excess == 0 {
                    break;
                }
                let date = days[i].date;
                if days[i].workday.iter().any(|n| n == &emp.name)
                    && !is_weekend_or_holiday(date, holidays)
                    && !pinned_on.contains(&(date, emp.name.clone()))
                    && streak_around(&emp.name, i, days, false) <= MAX_CONSECUTIVE_OFF
                {
                    days[i].workday.retain(|n| n != &emp.name);
                    days[i].day_off.push(emp.name.clone());
                    actual -= 1;
                    excess -= 1;
                }
            }
            if excess > 0 {
                let message = format!(
                    "target adjustment: {} is {} working day(s) over target and no legal WORKDAY could be removed",
                    emp.name, excess
                );
                tracing::warn!(employee = %emp.name, excess, "target adjustment could not close excess");
                warnings.push(message);
            }
        } else if actual < target {
            let mut deficit = target - actual;
            for i in 0..days.len() {
                if deficit == 0 {
                    break;
                }
                let date = days[i].date;
                if !days[i].day_off.iter().any(|n| n == &emp.name)
                    || is_weekend_or_holiday(date, holidays)
                    || emp.is_blocked(date)
                {
                    continue;
                }
                if i > 0 && days[i - 1].evening.iter().any(|n| n == &emp.name) {
                    continue;
                }
                if streak_around(&emp.name, i, days, true) > max_cw(emp) {
                    continue;
                }
                days[i].day_off.retain(|n| n != &emp.name);
                days[i].workday.push(emp.name.clone());
                actual += 1;
                deficit -= 1;
            }
            if deficit > 0 {
                let message = format!(
                    "target adjustment: {} is {} working day(s) under target and no legal DAY_OFF could be upgraded",
                    emp.name, deficit
                );
                tracing::warn!(employee = %emp.name, deficit, "target adjustment could not close deficit");
                warnings.push(message);
            }
        }

        states.get_mut(&emp.name).unwrap().total_working = actual;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ScheduleKind, Site};
    use std::collections::HashMap;

    fn employee(name: &str, site: Site) -> Employee {
        Employee {
            name: name.to_string(),
            site,
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
    fn target_adjustment_removes_excess_workday_on_a_weekday() {
        let emp = employee("p1", Site::Primary);
        let d0 = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut days = vec![DaySchedule::new(d0, false)];
        days[0].workday.push("p1".to_string());

        let mut states = HashMap::new();
        let mut st = crate::state::EmployeeState::new(0, 0);
        st.total_working = 1;
        states.insert("p1".to_string(), st);

        let mut warnings = Vec::new();
        target_adjustment(&mut days, &[emp], &mut states, &HashSet::new(), &HashSet::new(), &mut warnings);

        assert!(days[0].day_off.contains(&"p1".to_string()));
        assert!(!days[0].workday.contains(&"p1".to_string()));
        assert_eq!(states["p1"].total_working, 0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn target_adjustment_skips_pinned_day() {
        let emp = employee("p1", Site::Primary);
        let d0 = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut days = vec![DaySchedule::new(d0, false)];
        days[0].workday.push("p1".to_string());

        let mut states = HashMap::new();
        let mut st = crate::state::EmployeeState::new(0, 0);
        st.total_working = 1;
        states.insert("p1".to_string(), st);

        let mut pinned = HashSet::new();
        pinned.insert((d0, "p1".to_string()));

        let mut warnings = Vec::new();
        target_adjustment(&mut days, &[emp], &mut states, &HashSet::new(), &pinned, &mut warnings);

        assert!(days[0].workday.contains(&"p1".to_string()));
        assert_eq!(warnings.len(), 1);
    }
}
