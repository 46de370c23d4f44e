use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::error::ScreenError;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// A date as supplied by a caller: either literal text in the session's
/// format, or a whole month that expands to its first/last day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Exact(String),
    MonthYear { month: u32, year: i32 },
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Exact(value.to_string())
    }
}

impl From<(u32, i32)> for DateInput {
    fn from((month, year): (u32, i32)) -> Self {
        DateInput::MonthYear { month, year }
    }
}

/// Reject formats chrono cannot render. Rendering an invalid format panics,
/// so every formatting path goes through here first.
pub fn check_format(format: &str) -> Result<(), ScreenError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ScreenError::InvalidDateFormat {
            value: String::new(),
            format: format.to_string(),
        });
    }
    Ok(())
}

/// Accept `value` if it parses under `format`. Empty text clears the field
/// and is always accepted.
pub fn validate_date(value: &str, format: &str) -> Result<String, ScreenError> {
    if value.is_empty() {
        return Ok(String::new());
    }

    NaiveDate::parse_from_str(value, format)
        .map(|_| value.to_string())
        .map_err(|_| ScreenError::InvalidDateFormat {
            value: value.to_string(),
            format: format.to_string(),
        })
}

/// First and last calendar day of a month, formatted.
pub fn month_bounds(month: u32, year: i32, format: &str) -> Result<(String, String), ScreenError> {
    if !(1..=12).contains(&month) {
        return Err(ScreenError::InvalidMonth(month));
    }
    if !(1900..=Local::now().year()).contains(&year) {
        return Err(ScreenError::InvalidYear(year));
    }
    check_format(format)?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(ScreenError::InvalidMonth(month))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or(ScreenError::InvalidYear(year))?;

    Ok((
        first.format(format).to_string(),
        last.format(format).to_string(),
    ))
}

/// Resolve the text to write into date slot `slot_index`. A month expands
/// to its first day in slot 0 and its last day in any later slot.
pub fn resolve(value: &DateInput, slot_index: usize, format: &str) -> Result<String, ScreenError> {
    match value {
        DateInput::Exact(text) => validate_date(text, format),
        DateInput::MonthYear { month, year } => {
            let (first, last) = month_bounds(*month, *year, format)?;
            Ok(if slot_index == 0 { first } else { last })
        }
    }
}
