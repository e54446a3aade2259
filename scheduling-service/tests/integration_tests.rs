use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use scheduling_service::{generate_schedule, resolve_holidays};
use shared::{CarryOverState, Config, Employee, PinnedAssignment, ScheduleKind, ShiftType, Site, VacationPeriod};

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
        unavailable_dates: HashSet::new(),
        preferred_shift: None,
        workload_pct: 100,
        days_off_weekly: HashSet::new(),
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

fn roster() -> Vec<Employee> {
    vec![
        primary("P1"),
        primary("P2"),
        primary("P3"),
        primary("P4"),
        remote("R1"),
        remote("R2"),
    ]
}

fn weekend_holidays(year: i32, month: u32) -> HashSet<NaiveDate> {
    resolve_holidays(year, month, &HashSet::new())
}

#[test]
fn s1_march_2025_no_holidays_covers_every_day_and_balances_nights() {
    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 42, roster(), vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);

    let schedule = generate_schedule(&config, &holidays).unwrap();
    assert_eq!(schedule.days.len(), 31);
    for day in &schedule.days {
        assert!(day.is_covered());
        assert!(day.morning.iter().all(|n| n.starts_with('P')));
        assert!(day.evening.iter().all(|n| n.starts_with('P')));
        assert!(day.night.iter().all(|n| n.starts_with('R')));
    }

    let r1_nights = schedule.days.iter().filter(|d| d.night.contains(&"R1".to_string())).count();
    let r2_nights = schedule.days.iter().filter(|d| d.night.contains(&"R2".to_string())).count();
    assert!((r1_nights as i64 - r2_nights as i64).abs() <= 3);
}

#[test]
fn s2_february_2025_has_28_days() {
    let config = Config::new(2, 2025, "Europe/Moscow".to_string(), 42, roster(), vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 2);

    let schedule = generate_schedule(&config, &holidays).unwrap();
    assert_eq!(schedule.days.len(), 28);
}

#[test]
fn s3_extra_holiday_is_flagged_alongside_weekends() {
    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 42, roster(), vec![], vec![]).unwrap();
    let mut manual = HashSet::new();
    let extra_holiday = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(); // already a Saturday
    manual.insert(extra_holiday);
    let holidays = resolve_holidays(2025, 3, &manual);

    let schedule = generate_schedule(&config, &holidays).unwrap();
    assert_eq!(schedule.days.len(), 31);
    for day in &schedule.days {
        assert!(day.is_covered());
        let expect_holiday = matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun) || day.date == extra_holiday;
        assert_eq!(day.is_holiday, expect_holiday);
    }
}

#[test]
fn s4_vacationing_employee_never_works_during_the_period() {
    let mut employees = roster();
    let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    employees[0].vacations.push(VacationPeriod::new(start, end).unwrap());

    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 42, employees, vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);
    let schedule = generate_schedule(&config, &holidays).unwrap();

    let mut d = start;
    while d <= end {
        let day = schedule.day_for(d).unwrap();
        assert!(day.vacation.contains(&"P1".to_string()));
        assert!(!day.is_working("P1"));
        d += chrono::Duration::days(1);
    }
}

#[test]
fn s5_pinned_evening_enforces_the_after_evening_rest_rule() {
    let employees = roster();
    let pin_date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let pin = PinnedAssignment::new(pin_date, "P2".to_string(), ShiftType::Evening).unwrap();
    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 42, employees, vec![pin], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);

    let schedule = generate_schedule(&config, &holidays).unwrap();
    let pinned_day = schedule.day_for(pin_date).unwrap();
    assert!(pinned_day.evening.contains(&"P2".to_string()));

    let next_day = schedule.day_for(pin_date + chrono::Duration::days(1)).unwrap();
    assert!(!next_day.morning.contains(&"P2".to_string()));
    assert!(!next_day.workday.contains(&"P2".to_string()));
}

#[test]
fn s6_carry_over_night_forces_rest_on_the_first_day_of_the_month() {
    let employees = roster();
    let carry_over = vec![CarryOverState {
        employee_name: "P1".to_string(),
        last_shift: Some(ShiftType::Night),
        consecutive_working: 4,
        consecutive_off: 0,
    }];
    let config = Config::new(2, 2025, "Europe/Moscow".to_string(), 42, employees, vec![], carry_over).unwrap();
    let holidays = weekend_holidays(2025, 2);

    let schedule = generate_schedule(&config, &holidays).unwrap();
    let first_day = schedule.day_for(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()).unwrap();
    assert!(!first_day.is_working("P1"));
}

#[test]
fn group_exclusivity_is_never_violated_on_a_single_duty_slot() {
    let mut employees = roster();
    employees[0].group = Some("core-oncall".to_string());
    employees[1].group = Some("core-oncall".to_string());

    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 99, employees, vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);
    let schedule = generate_schedule(&config, &holidays).unwrap();

    for day in &schedule.days {
        for list in [&day.morning, &day.evening, &day.night] {
            assert!(!(list.contains(&"P1".to_string()) && list.contains(&"P2".to_string())));
        }
    }
}

#[test]
fn determinism_same_config_and_holidays_yield_identical_schedules() {
    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 123, roster(), vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);

    let a = generate_schedule(&config, &holidays).unwrap();
    let b = generate_schedule(&config, &holidays).unwrap();

    for (da, db) in a.days.iter().zip(b.days.iter()) {
        assert_eq!(da.morning, db.morning);
        assert_eq!(da.evening, db.evening);
        assert_eq!(da.night, db.night);
        assert_eq!(da.workday, db.workday);
        assert_eq!(da.day_off, db.day_off);
        assert_eq!(da.vacation, db.vacation);
    }
}

#[test]
fn five_two_employee_never_appears_on_a_weekend_or_holiday() {
    let mut employees = roster();
    employees.push(primary("P5"));
    employees[6].schedule_kind = ScheduleKind::FiveTwo;
    employees[6].on_duty = false;

    let config = Config::new(3, 2025, "Europe/Moscow".to_string(), 5, employees, vec![], vec![]).unwrap();
    let holidays = weekend_holidays(2025, 3);
    let schedule = generate_schedule(&config, &holidays).unwrap();

    for day in &schedule.days {
        if day.is_holiday {
            assert!(!day.is_working("P5"));
        }
    }
}
