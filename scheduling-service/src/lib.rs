//! Scheduling core: deterministic, seeded duty-roster generation for one
//! calendar month. [`generate_schedule`] is the single entry point; every
//! other module is an internal collaborator it composes.

pub mod backtrack;
pub mod calendar;
pub mod config_loader;
pub mod day_builder;
pub mod orchestrator;
pub mod post_passes;
pub mod rules;
pub mod selectors;
pub mod state;

pub use config_loader::{load_config, parse_manual_holidays, resolve_holidays, LoadError};
pub use orchestrator::generate_schedule;
