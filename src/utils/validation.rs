use crate::utils::error::{LedgerError, Result};
use chrono::NaiveDate;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Value of an optional text field, or `None` when it is absent or empty.
/// The value is otherwise kept byte-for-byte; ids and names are opaque.
pub fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn require_text<'a>(field_name: &str, value: &'a Option<String>) -> Result<&'a str> {
    supplied(value).ok_or_else(|| LedgerError::missing(field_name))
}

pub fn require_value<T: Copy>(field_name: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| LedgerError::missing(field_name))
}

/// An end month, when present, must not precede the start month.
pub fn validate_window(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
    match end {
        Some(end) if end < start => Err(LedgerError::invalid(
            "end_date",
            &end.format(crate::core::month::MONTH_FORMAT).to_string(),
            "end_date must not be before start_date",
        )),
        _ => Ok(()),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(LedgerError::Config {
            message: format!("{} cannot be empty", field_name),
        });
    }

    if path.contains('\0') {
        return Err(LedgerError::Config {
            message: format!("{} contains null bytes", field_name),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LedgerError::Config {
            message: format!(
                "{} = {} is out of range, must be between {} and {}",
                field_name, value, min, max
            ),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(LedgerError::Config {
            message: format!(
                "{} = '{}' is not supported. Valid values: {}",
                field_name,
                value,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}
