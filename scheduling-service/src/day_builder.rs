//! Day builder (C5): build one day's assignment respecting every hard
//! constraint, or report why a mandatory shift can't be covered. Ported
//! phase-for-phase from `original_source/src/duty_schedule/scheduler.py`'s
//! `_build_day`.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rand_chacha::ChaCha20Rng;

use shared::{DaySchedule, Employee, ScheduleError, ShiftType, Site};

use crate::calendar::is_weekend_or_holiday;
use crate::rules::{can_work, max_cw, resting_after_evening, resting_after_night, shift_limit_reached};
use crate::selectors;
use crate::state::{EmployeeState, MAX_CONSECUTIVE_OFF};

fn infeasible(shift: ShiftType, date: NaiveDate, reason: &str) -> ScheduleError {
    ScheduleError::Infeasible {
        shift,
        reason: reason.to_string(),
        date,
    }
}

/// Build the full assignment for `date`. `pins_today` is honored
/// unconditionally: a pin fills its shift before the corresponding phase
/// runs, and that phase is skipped entirely.
pub fn build_day(
    date: NaiveDate,
    employees: &[Employee],
    states: &mut HashMap<String, EmployeeState>,
    holidays: &HashSet<NaiveDate>,
    rng: &mut ChaCha20Rng,
    remaining_days: u32,
    pins_today: &HashMap<String, ShiftType>,
) -> Result<DaySchedule, ScheduleError> {
    let is_holiday = is_weekend_or_holiday(date, holidays);
    let next_day = date + chrono::Duration::days(1);

    let primary_duty: Vec<&Employee> = employees
        .iter()
        .filter(|e| e.site == Site::Primary && e.on_duty)
        .collect();
    let remote_duty: Vec<&Employee> = employees
        .iter()
        .filter(|e| e.site == Site::Remote && e.on_duty)
        .collect();
    let non_duty: Vec<&Employee> = employees.iter().filter(|e| !e.on_duty).collect();
    let emp_by_name: HashMap<&str, &Employee> = employees.iter().map(|e| (e.name.as_str(), e)).collect();

    let mut assigned: HashMap<String, ShiftType> = pins_today.clone();

    // Phase 1: NIGHT (REMOTE, exactly one).
    let night_pinned = assigned.values().any(|s| *s == ShiftType::Night);
    if !night_pinned {
        let night_eligible: Vec<&Employee> = remote_duty
            .iter()
            .copied()
            .filter(|e| !assigned.contains_key(&e.name))
            .filter(|e| !e.is_blocked(date))
            .filter(|e| !e.is_day_off_weekly(date))
            .filter(|e| !(e.schedule_kind == shared::ScheduleKind::FiveTwo && is_holiday))
            .filter(|e| states[&e.name].consecutive_working < max_cw(e))
            .filter(|e| !shift_limit_reached(e, &states[&e.name], ShiftType::Night))
            .collect();

        if night_eligible.is_empty() {
            return Err(infeasible(
                ShiftType::Night,
                date,
                "no eligible on-duty REMOTE employee",
            ));
        }
        let picked = selectors::deficit_preferring(
            &night_eligible,
            ShiftType::Night,
            states,
            remaining_days,
            rng,
            1,
        );
        for e in picked {
            assigned.insert(e.name.clone(), ShiftType::Night);
        }
    }

    // Candidates common to MORNING/EVENING: PRIMARY, on-duty, not yet
    // assigned, not blocked/weekly-off/after-night/5-2-holiday/streak-capped.
    let primary_available: Vec<&Employee> = primary_duty
        .iter()
        .copied()
        .filter(|e| !assigned.contains_key(&e.name))
        .filter(|e| !e.is_blocked(date))
        .filter(|e| !e.is_day_off_weekly(date))
        .filter(|e| !resting_after_night(&states[&e.name]))
        .filter(|e| !(e.schedule_kind == shared::ScheduleKind::FiveTwo && is_holiday))
        .filter(|e| states[&e.name].consecutive_working < max_cw(e))
        .collect();

    // Phase 2: MORNING (PRIMARY, exactly one).
    let morning_pinned = assigned.values().any(|s| *s == ShiftType::Morning);
    let mut morning_groups_taken: HashSet<String> = assigned
        .iter()
        .filter(|(_, s)| **s == ShiftType::Morning)
        .filter_map(|(name, _)| emp_by_name.get(name.as_str()).and_then(|e| e.group.clone()))
        .collect();

    let morning_eligible: Vec<&Employee> = primary_available
        .iter()
        .copied()
        .filter(|e| e.can_work_morning())
        .filter(|e| !resting_after_evening(&states[&e.name]))
        .filter(|e| !shift_limit_reached(e, &states[&e.name], ShiftType::Morning))
        .filter(|e| e.group.as_ref().map_or(true, |g| !morning_groups_taken.contains(g)))
        .collect();

    let mut morning_pick: Vec<&Employee> = Vec::new();
    if !morning_pinned {
        if morning_eligible.is_empty() {
            return Err(infeasible(
                ShiftType::Morning,
                date,
                "no eligible on-duty PRIMARY employee",
            ));
        }
        morning_pick = selectors::deficit_preferring(
            &morning_eligible,
            ShiftType::Morning,
            states,
            remaining_days,
            rng,
            1,
        );
        for e in &morning_pick {
            assigned.insert(e.name.clone(), ShiftType::Morning);
            if let Some(g) = &e.group {
                morning_groups_taken.insert(g.clone());
            }
        }
    }

    // Phase 3: EVENING (PRIMARY, exactly one).
    let evening_pinned = assigned.values().any(|s| *s == ShiftType::Evening);
    if !evening_pinned {
        let evening_groups_taken: HashSet<String> = assigned
            .iter()
            .filter(|(_, s)| **s == ShiftType::Evening)
            .filter_map(|(name, _)| emp_by_name.get(name.as_str()).and_then(|e| e.group.clone()))
            .collect();

        let evening_pick_pool: Vec<&Employee> = primary_available
            .iter()
            .copied()
            .filter(|e| !assigned.contains_key(&e.name))
            .filter(|e| e.can_work_evening())
            .filter(|e| !shift_limit_reached(e, &states[&e.name], ShiftType::Evening))
            .filter(|e| e.group.as_ref().map_or(true, |g| !evening_groups_taken.contains(g)))
            .collect();

        if evening_pick_pool.is_empty() {
            return Err(infeasible(
                ShiftType::Evening,
                date,
                "no eligible on-duty PRIMARY employee left after morning pick",
            ));
        }

        // An employee whose last shift was EVENING, who still has a
        // deficit and streak headroom, must "re-up" into EVENING rather
        // than being pushed to rest — this is the one case where taking a
        // duty shift today is mandatory, so it takes precedence over the
        // general deficit-preferring pool.
        let after_evening_deficit: Vec<&Employee> = evening_pick_pool
            .iter()
            .copied()
            .filter(|e| resting_after_evening(&states[&e.name]))
            .filter(|e| states[&e.name].needs_more_work(remaining_days))
            .filter(|e| states[&e.name].consecutive_working < max_cw(e).saturating_sub(1))
            .collect();

        let evening_pick = if !after_evening_deficit.is_empty() {
            selectors::fair(&after_evening_deficit, ShiftType::Evening, states, rng, 1)
        } else {
            selectors::deficit_preferring(
                &evening_pick_pool,
                ShiftType::Evening,
                states,
                remaining_days,
                rng,
                1,
            )
        };
        for e in evening_pick {
            assigned.insert(e.name.clone(), ShiftType::Evening);
        }
    }

    // Phase 4: extra PRIMARY working days, weekdays only.
    if !is_holiday {
        let next_is_holiday = is_weekend_or_holiday(next_day, holidays);
        const WORKING: [ShiftType; 3] = [ShiftType::Morning, ShiftType::Evening, ShiftType::Workday];

        loop {
            let extra: Vec<&Employee> = primary_available
                .iter()
                .copied()
                .filter(|e| !assigned.contains_key(&e.name))
                .filter(|e| states[&e.name].needs_more_work(remaining_days))
                .filter(|e| states[&e.name].consecutive_working < max_cw(e))
                .filter(|e| !resting_after_evening(&states[&e.name]))
                .collect();
            if extra.is_empty() {
                break;
            }
            let by_urgency = selectors::urgency(&extra, states, remaining_days, rng);
            let Some(candidate) = by_urgency.first().copied() else {
                break;
            };

            if next_is_holiday {
                let cand_cw_after = states[&candidate.name].consecutive_working + 1;
                let mut available_tomorrow = 0u32;
                for e in &primary_duty {
                    if e.name == candidate.name {
                        if cand_cw_after < max_cw(e) {
                            available_tomorrow += 1;
                        }
                        continue;
                    }
                    let cw_ok = states[&e.name].consecutive_working + 1 < max_cw(e);
                    match assigned.get(&e.name) {
                        None => available_tomorrow += 1,
                        Some(s) if !WORKING.contains(s) => available_tomorrow += 1,
                        Some(_) if cw_ok => available_tomorrow += 1,
                        _ => {}
                    }
                }
                if available_tomorrow < 2 {
                    break;
                }
            }

            assigned.insert(candidate.name.clone(), ShiftType::Workday);
        }
    }

    // Phase 5: remaining PRIMARY employees rest.
    for e in &primary_duty {
        if !assigned.contains_key(&e.name) {
            let shift = if e.is_on_vacation(date) {
                ShiftType::Vacation
            } else {
                ShiftType::DayOff
            };
            assigned.insert(e.name.clone(), shift);
        }
    }

    // Phase 6: REMOTE assignments beyond night.
    for e in &remote_duty {
        if assigned.contains_key(&e.name) {
            continue;
        }
        if e.is_on_vacation(date) {
            assigned.insert(e.name.clone(), ShiftType::Vacation);
            continue;
        }
        if e.unavailable_dates.contains(&date) || e.is_day_off_weekly(date) {
            assigned.insert(e.name.clone(), ShiftType::DayOff);
            continue;
        }
        if is_holiday {
            assigned.insert(e.name.clone(), ShiftType::DayOff);
            continue;
        }
        let cw = states[&e.name].consecutive_working;
        if cw >= max_cw(e) {
            assigned.insert(e.name.clone(), ShiftType::DayOff);
            continue;
        }

        let cw_after = cw + 1;
        let needs_work = states[&e.name].needs_more_work(remaining_days);
        if cw_after >= max_cw(e) && needs_work {
            let mut others_available = 0u32;
            for other in &remote_duty {
                if other.name == e.name {
                    continue;
                }
                if other.is_blocked(next_day) {
                    continue;
                }
                match assigned.get(&other.name) {
                    Some(ShiftType::Vacation) => {}
                    Some(ShiftType::DayOff) => others_available += 1,
                    Some(ShiftType::Night) | Some(ShiftType::Workday) => {
                        if states[&other.name].consecutive_working + 1 < max_cw(other) {
                            others_available += 1;
                        }
                    }
                    _ => others_available += 1,
                }
            }
            if others_available < 1 {
                assigned.insert(e.name.clone(), ShiftType::DayOff);
                continue;
            }
        }

        if states[&e.name].needs_more_work(remaining_days) {
            assigned.insert(e.name.clone(), ShiftType::Workday);
        } else {
            assigned.insert(e.name.clone(), ShiftType::DayOff);
        }
    }

    // Phase 7: non-duty employees.
    for e in &non_duty {
        if assigned.contains_key(&e.name) {
            continue;
        }
        let shift = if e.is_on_vacation(date) {
            ShiftType::Vacation
        } else if e.unavailable_dates.contains(&date) || e.is_day_off_weekly(date) || is_holiday {
            ShiftType::DayOff
        } else {
            ShiftType::Workday
        };
        assigned.insert(e.name.clone(), shift);
    }

    // Phase 8: excess-rest rescue.
    for e in primary_duty.iter().chain(remote_duty.iter()) {
        let st = &states[&e.name];
        if assigned.get(&e.name) == Some(&ShiftType::DayOff)
            && st.consecutive_off >= MAX_CONSECUTIVE_OFF
            && can_work(e, st, date, holidays)
            && !resting_after_evening(st)
            && st.needs_more_work(remaining_days)
            && !is_holiday
        {
            assigned.insert(e.name.clone(), ShiftType::Workday);
        }
    }

    let mut ds = DaySchedule::new(date, is_holiday);
    for e in employees {
        let shift = assigned.get(&e.name).copied().unwrap_or(ShiftType::DayOff);
        ds.push(e.name.clone(), shift);
        states.get_mut(&e.name).expect("state exists for every employee").record(shift);
    }

    Ok(ds)
}
