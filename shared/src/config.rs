use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::carry_over::CarryOverState;
use crate::employee::Employee;
use crate::error::ConfigError;
use crate::pin::PinnedAssignment;
use crate::shift::{ShiftType, Site};

/// Top-level configuration for one month's roster generation.
///
/// `Config::new` enforces every hard invariant eagerly (§3): construction
/// never succeeds with a roster or pin list the scheduling core could not
/// act on. [`collect_config_issues`] separately surfaces the *non-fatal*
/// warnings a caller may want to show a human before trusting the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub month: u32,
    pub year: i32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub pins: Vec<PinnedAssignment>,
    #[serde(default)]
    pub carry_over: Vec<CarryOverState>,
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_seed() -> u64 {
    42
}

const MIN_PRIMARY_DUTY: usize = 4;
const MIN_REMOTE_DUTY: usize = 2;

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        month: u32,
        year: i32,
        timezone: String,
        seed: u64,
        employees: Vec<Employee>,
        pins: Vec<PinnedAssignment>,
        carry_over: Vec<CarryOverState>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            month,
            year,
            timezone,
            seed,
            employees,
            pins,
            carry_over,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-run every construction-time invariant from `Config::new` against an
    /// already-built value. Needed for configs that arrive via
    /// deserialization (e.g. a YAML document), which populates the public
    /// fields directly and bypasses `new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=12).contains(&self.month) {
            return Err(ConfigError::MonthOutOfRange(self.month));
        }
        if self.year < 2024 {
            return Err(ConfigError::YearOutOfRange(self.year));
        }
        for emp in &self.employees {
            emp.validate_flags()?;
        }

        let primary_duty = self
            .employees
            .iter()
            .filter(|e| e.site == Site::Primary && e.on_duty)
            .count();
        if primary_duty < MIN_PRIMARY_DUTY {
            return Err(ConfigError::NotEnoughPrimaryDuty {
                found: primary_duty,
            });
        }
        let remote_duty = self
            .employees
            .iter()
            .filter(|e| e.site == Site::Remote && e.on_duty)
            .count();
        if remote_duty < MIN_REMOTE_DUTY {
            return Err(ConfigError::NotEnoughRemoteDuty { found: remote_duty });
        }

        let mut seen_names = HashSet::new();
        for emp in &self.employees {
            if !seen_names.insert(emp.name.clone()) {
                return Err(ConfigError::DuplicateEmployeeName(emp.name.clone()));
            }
        }

        let employees_by_name: HashMap<&str, &Employee> =
            self.employees.iter().map(|e| (e.name.as_str(), e)).collect();

        let mut pinned_seen: HashSet<(chrono::NaiveDate, String)> = HashSet::new();
        for pin in &self.pins {
            if pin.shift == ShiftType::Vacation {
                return Err(ConfigError::PinIsVacation);
            }
            let emp = employees_by_name.get(pin.employee_name.as_str()).ok_or_else(|| {
                ConfigError::PinUnknownEmployee {
                    date: pin.date,
                    name: pin.employee_name.clone(),
                }
            })?;

            let key = (pin.date, emp.name.clone());
            if !pinned_seen.insert(key) {
                return Err(ConfigError::DuplicatePin {
                    date: pin.date,
                    name: emp.name.clone(),
                });
            }

            if emp.site == Site::Primary && pin.shift == ShiftType::Night {
                return Err(ConfigError::PinIncompatibleSitePrimary {
                    date: pin.date,
                    name: emp.name.clone(),
                });
            }
            if emp.site == Site::Remote
                && matches!(pin.shift, ShiftType::Morning | ShiftType::Evening)
            {
                return Err(ConfigError::PinIncompatibleSiteRemote {
                    date: pin.date,
                    name: emp.name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Non-fatal diagnostics about an already-valid `Config`: unknown
/// carry-over employee names, and pins that place a non-duty or team-lead
/// employee into a duty shift (accepted, not rejected, but worth flagging).
pub fn collect_config_issues(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    let employees_by_name: HashMap<&str, &Employee> = config
        .employees
        .iter()
        .map(|e| (e.name.as_str(), e))
        .collect();

    for pin in &config.pins {
        let Some(emp) = employees_by_name.get(pin.employee_name.as_str()) else {
            continue;
        };
        if pin.shift.is_duty() {
            if !emp.on_duty {
                warnings.push(format!(
                    "pin {}: {:?} is not on_duty but is pinned to a duty shift",
                    pin.date, emp.name
                ));
            }
            if emp.team_lead {
                warnings.push(format!(
                    "pin {}: team lead {:?} is pinned to a duty shift",
                    pin.date, emp.name
                ));
            }
        }
    }

    for carry in &config.carry_over {
        if !employees_by_name.contains_key(carry.employee_name.as_str()) {
            warnings.push(format!(
                "carry_over: employee {:?} is not in employees and will be ignored",
                carry.employee_name
            ));
        }
    }

    warnings
}
