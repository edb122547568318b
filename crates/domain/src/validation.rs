//! Argument checks run before any request is built

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::errors::{Result, SamplifyError};

/// Fail with a validation error when `value` is blank.
///
/// # Errors
///
/// [`SamplifyError::Validation`] naming `field`.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SamplifyError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Fail with a validation error when `value` is zero.
///
/// # Errors
///
/// [`SamplifyError::Validation`] naming `field`.
pub fn require_non_zero(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(SamplifyError::Validation(format!("{field} must not be zero")));
    }
    Ok(())
}

/// Check the optional `fieldSchedule` of a line item body.
///
/// `startDate` and `endDate` are RFC 3339 timestamps and the start must come
/// strictly before the end. `daysInField`, when present, must be positive.
///
/// # Errors
///
/// [`SamplifyError::Validation`] for an unparsable date, an inverted range
/// or a non-positive `daysInField`.
pub fn validate_field_schedule(line_item: &Value) -> Result<()> {
    let Some(schedule) = line_item.get("fieldSchedule").filter(|v| !v.is_null()) else {
        return Ok(());
    };

    let start = parse_date(schedule, "startDate")?;
    let end = parse_date(schedule, "endDate")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(SamplifyError::Validation(
                "fieldSchedule.startDate must be before fieldSchedule.endDate".to_string(),
            ));
        }
    }

    if let Some(days) = schedule.get("daysInField").filter(|v| !v.is_null()) {
        if !days.as_i64().is_some_and(|d| d > 0) {
            return Err(SamplifyError::Validation(
                "fieldSchedule.daysInField must be a positive integer".to_string(),
            ));
        }
    }
    Ok(())
}

fn parse_date(schedule: &Value, field: &str) -> Result<Option<DateTime<FixedOffset>>> {
    match schedule.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(Some)
            .map_err(|e| SamplifyError::Validation(format!("fieldSchedule.{field}: {e}"))),
        Some(_) => Err(SamplifyError::Validation(format!(
            "fieldSchedule.{field} must be an RFC 3339 string"
        ))),
    }
}
