use serde::{Deserialize, Serialize};

use crate::shift::ShiftType;

/// Per-employee snapshot of streak counters carried across a month boundary,
/// so cross-month rest rules (after-night, after-evening, streak caps) keep
/// holding on day one of the new month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarryOverState {
    pub employee_name: String,
    #[serde(default)]
    pub last_shift: Option<ShiftType>,
    #[serde(default)]
    pub consecutive_working: u32,
    #[serde(default)]
    pub consecutive_off: u32,
}
