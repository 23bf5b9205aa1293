use chrono::Datelike;
use serde::Serialize;

use super::types::ParsedRoster;

const MIN_YEAR: i32 = 2000;
const MAX_YEARS_AHEAD: i32 = 5;

/// Outcome of checking a parsed roster. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Validate against the current calendar year.
pub fn validate(roster: &ParsedRoster) -> ValidationReport {
    validate_for_year(roster, chrono::Local::now().year())
}

/// Collect every structural problem; never stops at the first one.
pub fn validate_for_year(roster: &ParsedRoster, current_year: i32) -> ValidationReport {
    let mut errors = Vec::new();

    if roster.rows.is_empty() {
        errors.push("no rows found".to_string());
    }
    if !(1..=12).contains(&roster.month) {
        errors.push("invalid month".to_string());
    }
    if !(MIN_YEAR..=current_year + MAX_YEARS_AHEAD).contains(&roster.year) {
        errors.push("invalid year".to_string());
    }
    for (idx, row) in roster.rows.iter().enumerate() {
        if row.date.trim().is_empty() {
            errors.push(format!("row {}: missing date", idx + 1));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
