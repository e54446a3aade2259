//! Candidate selectors (C4): deterministic selection policies layered over
//! a seeded RNG. The RNG only ever breaks ties between otherwise-equal
//! candidates, so re-running `generate_schedule` with the same `(config,
//! holidays)` always produces the same schedule (§8 invariant 11).
//!
//! `fair` and `deficit_preferring` precompute a tiebreak draw per candidate
//! into a sortable tuple before sorting, rather than drawing inside the
//! comparator — `slice::sort_by` may invoke its comparator more than once
//! per element, and drawing fresh randomness on each call would make the
//! order depend on the sort implementation instead of the seed.

use std::collections::HashMap;

use rand_chacha::ChaCha20Rng;
use rand::Rng;

use shared::{Employee, ShiftType};

use crate::state::EmployeeState;

/// Sort by `(shift_count, preferred-shift tiebreak, rng draw)` and take the
/// first `count`. Minimizes the most-used count, honors `preferred_shift`
/// as a soft tiebreak, and stays deterministic via the seeded `rng`.
pub fn fair<'a>(
    candidates: &[&'a Employee],
    shift: ShiftType,
    states: &HashMap<String, EmployeeState>,
    rng: &mut ChaCha20Rng,
    count: usize,
) -> Vec<&'a Employee> {
    let mut keyed: Vec<(u32, u8, u64, &Employee)> = candidates
        .iter()
        .map(|&e| {
            let count = states[&e.name].shift_count(shift);
            let preferred = u8::from(e.preferred_shift != Some(shift));
            let tiebreak = rng.gen::<u64>();
            (count, preferred, tiebreak, e)
        })
        .collect();
    keyed.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));
    keyed.into_iter().take(count).map(|(_, _, _, e)| e).collect()
}

/// Prefer employees who still owe the roster working days (`effective_target
/// - total_working > 0`); fall back to the full candidate pool only if none
/// qualify. Protects employees who already met their monthly norm from being
/// stacked with more duty than they need.
pub fn deficit_preferring<'a>(
    candidates: &[&'a Employee],
    shift: ShiftType,
    states: &HashMap<String, EmployeeState>,
    remaining_days: u32,
    rng: &mut ChaCha20Rng,
    count: usize,
) -> Vec<&'a Employee> {
    let deficit_pool: Vec<&Employee> = candidates
        .iter()
        .copied()
        .filter(|e| states[&e.name].needs_more_work(remaining_days))
        .collect();
    let pool = if deficit_pool.is_empty() {
        candidates.to_vec()
    } else {
        deficit_pool
    };
    fair(&pool, shift, states, rng, count)
}

/// Sort candidates descending by urgency (deficit scaled by remaining days,
/// plus a small rng jitter). Employees who've already met their norm sort
/// to the back via a negative sentinel.
pub fn urgency<'a>(
    candidates: &[&'a Employee],
    states: &HashMap<String, EmployeeState>,
    remaining_days: u32,
    rng: &mut ChaCha20Rng,
) -> Vec<&'a Employee> {
    let mut scored: Vec<(f64, &Employee)> = candidates
        .iter()
        .map(|&e| {
            let st = &states[&e.name];
            let deficit = st.effective_target() as i64 - st.total_working as i64;
            let score = if deficit <= 0 {
                -rng.gen::<f64>()
            } else {
                deficit as f64 / remaining_days.max(1) as f64 + rng.gen::<f64>() * 0.001
            };
            (score, e)
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("scores are always finite"));
    scored.into_iter().map(|(_, e)| e).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
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
    fn fair_picks_least_used_first() {
        let a = employee("a");
        let b = employee("b");
        let mut states = HashMap::new();
        let mut sa = EmployeeState::new(10, 0);
        sa.morning_count = 3;
        states.insert("a".to_string(), sa);
        states.insert("b".to_string(), EmployeeState::new(10, 0));

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let picked = fair(&[&a, &b], ShiftType::Morning, &states, &mut rng, 1);
        assert_eq!(picked[0].name, "b");
    }

    #[test]
    fn fair_is_deterministic_for_a_fixed_seed() {
        let a = employee("a");
        let b = employee("b");
        let c = employee("c");
        let mut states = HashMap::new();
        for name in ["a", "b", "c"] {
            states.insert(name.to_string(), EmployeeState::new(10, 0));
        }

        let run = || {
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            fair(&[&a, &b, &c], ShiftType::Morning, &states, &mut rng, 3)
                .into_iter()
                .map(|e| e.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn deficit_preferring_skips_employees_who_met_norm() {
        let a = employee("a");
        let b = employee("b");
        let mut states = HashMap::new();
        let mut sa = EmployeeState::new(5, 0);
        sa.total_working = 5; // met norm already
        states.insert("a".to_string(), sa);
        states.insert("b".to_string(), EmployeeState::new(5, 0));

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let picked = deficit_preferring(&[&a, &b], ShiftType::Morning, &states, 10, &mut rng, 1);
        assert_eq!(picked[0].name, "b");
    }

    #[test]
    fn urgency_ranks_larger_deficit_first() {
        let a = employee("a");
        let b = employee("b");
        let mut states = HashMap::new();
        let mut sa = EmployeeState::new(10, 0);
        sa.total_working = 8; // deficit 2
        let mut sb = EmployeeState::new(10, 0);
        sb.total_working = 2; // deficit 8
        states.insert("a".to_string(), sa);
        states.insert("b".to_string(), sb);

        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let ranked = urgency(&[&a, &b], &states, 10, &mut rng);
        assert_eq!(ranked[0].name, "b");
    }
}
