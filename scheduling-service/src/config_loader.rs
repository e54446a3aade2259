//! Config loading: turns a YAML document (plus `APP__`-prefixed environment
//! overrides) into a validated [`Config`]. Grounded on the teacher's
//! `infrastructure/config::Settings::new` builder pattern; `Config`'s
//! public, `Deserialize`-derived fields mean [`Config::validate`] must be
//! invoked explicitly after deserialization — the `config` crate's `File`
//! source never runs a type's own constructor.

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::{Config, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("configuration is invalid: {0}")]
    Invalid(#[from] ConfigError),

    #[error("invalid holiday date {raw:?}: expected YYYY-MM-DD")]
    BadHolidayDate { raw: String },
}

/// Load a [`Config`] from `path` (a YAML file), falling back to
/// `APP__`-prefixed environment variables for any field the file omits —
/// e.g. `APP__SEED=7`.
pub fn load_config(path: &str) -> Result<Config, LoadError> {
    let raw = config::Config::builder()
        .add_source(config::File::with_name(path).required(true))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    let cfg: Config = raw.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse a comma-separated `YYYY-MM-DD` list into a holiday date set — the
/// manual fallback a caller uses in place of an online holiday-calendar
/// fetch (out of scope for this crate; see the holiday-provider note in
/// the README).
pub fn parse_manual_holidays(raw: &str) -> Result<HashSet<NaiveDate>, LoadError> {
    let mut holidays = HashSet::new();
    for piece in raw.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let date = NaiveDate::parse_from_str(piece, "%Y-%m-%d").map_err(|_| LoadError::BadHolidayDate {
            raw: piece.to_string(),
        })?;
        holidays.insert(date);
    }
    Ok(holidays)
}

/// Weekends plus any manually declared holiday, restricted to the target
/// month — the holiday set `generate_schedule` expects.
pub fn resolve_holidays(year: i32, month: u32, manual: &HashSet<NaiveDate>) -> HashSet<NaiveDate> {
    crate::calendar::all_days(year, month)
        .into_iter()
        .filter(|d| crate::calendar::is_weekend_or_holiday(*d, manual))
        .collect()
}
