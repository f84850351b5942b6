//! Conversion between "MM-YYYY" month tokens and calendar dates.
//!
//! A month is stored as its mid-month anchor (day 15). Comparing two anchors
//! with `<=`/`>=` therefore orders months exactly, and an anchor always lies
//! strictly inside the first-day/last-day window produced by [`month_window`].

use crate::utils::error::{LedgerError, Result};
use chrono::{Datelike, Months, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

pub const MONTH_FORMAT: &str = "%m-%Y";
pub const MID_MONTH_ANCHOR_DAY: u32 = 15;

static MONTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})-([0-9]{4})$").expect("month token pattern compiles"));

/// Parse an "MM-YYYY" token into the mid-month anchor date.
pub fn parse_month(field: &str, text: &str) -> Result<NaiveDate> {
    let caps = MONTH_TOKEN
        .captures(text)
        .ok_or_else(|| LedgerError::invalid(field, text, "expected MM-YYYY"))?;

    let month: u32 = caps[1]
        .parse()
        .map_err(|_| LedgerError::invalid(field, text, "month is not a number"))?;
    let year: i32 = caps[2]
        .parse()
        .map_err(|_| LedgerError::invalid(field, text, "year is not a number"))?;

    NaiveDate::from_ymd_opt(year, month, MID_MONTH_ANCHOR_DAY)
        .ok_or_else(|| LedgerError::invalid(field, text, "month must be between 01 and 12"))
}

/// Parse an optional token; `None` and blank input stay absent.
pub fn parse_optional_month(field: &str, text: Option<&str>) -> Result<Option<NaiveDate>> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => parse_month(field, t).map(Some),
        None => Ok(None),
    }
}

/// Format a date back to "MM-YYYY". The day component is dropped.
pub fn format_month(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(MONTH_FORMAT).to_string())
}

/// First and last calendar day of the month containing `date`.
pub fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}
