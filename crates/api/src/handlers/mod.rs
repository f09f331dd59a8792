pub mod attendance;
pub mod auth;
pub mod children;
pub mod entries;
pub mod export;

use chrono::NaiveDate;

use kiddytime_core::{calendar::DateRange, errors::AttendanceError, models::entry::parse_date};

/// Parses a `YYYY-MM-DD` path or query value.
pub(crate) fn date_param(field: &str, value: &str) -> Result<NaiveDate, AttendanceError> {
    parse_date(value).ok_or_else(|| {
        AttendanceError::Validation(format!("{} must be a date in YYYY-MM-DD format", field))
    })
}

/// Both bounds of a `startDate` / `endDate` query are mandatory.
pub(crate) fn range_params(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, AttendanceError> {
    let (Some(start), Some(end)) = (
        start.filter(|s| !s.is_empty()),
        end.filter(|s| !s.is_empty()),
    ) else {
        return Err(AttendanceError::Validation(
            "startDate and endDate are required".to_string(),
        ));
    };
    Ok(DateRange::new(
        date_param("startDate", start)?,
        date_param("endDate", end)?,
    ))
}
