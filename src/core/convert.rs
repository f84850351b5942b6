//! Conversion between transport-facing raw payloads and typed records.
//! Parsing failures surface here, before any business rule runs.

use crate::core::month::{format_month, parse_month, parse_optional_month};
use crate::domain::model::{
    NewSubscription, RawReportFilter, RawSubscription, ReportFilter, Subscription,
};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{require_text, require_value, supplied, validate_window};
use chrono::NaiveDate;

/// Build a creation candidate; user, provider, price and start are required.
pub fn raw_to_new(raw: &RawSubscription) -> Result<NewSubscription> {
    let user_id = require_text("user_id", &raw.user_id)?;
    let provider = require_text("service_name", &raw.provider)?;
    let start_text = require_text("start_date", &raw.start)?;
    let price = require_value("price", raw.price)?;

    let start = parse_month("start_date", start_text)?;
    let end = parse_optional_month("end_date", raw.end.as_deref())?;
    validate_window(start, end)?;

    Ok(NewSubscription {
        user_id: user_id.to_string(),
        provider: provider.to_string(),
        price,
        start,
        end,
    })
}

pub fn subscription_to_raw(record: &Subscription) -> RawSubscription {
    RawSubscription {
        id: Some(record.id),
        user_id: Some(record.user_id.clone()),
        provider: Some(record.provider.clone()),
        price: Some(record.price),
        start: format_month(Some(record.start)),
        end: format_month(record.end),
    }
}

/// Normalized subset of fields supplied to a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub user_id: Option<String>,
    pub provider: Option<String>,
    pub price: Option<u64>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl SubscriptionPatch {
    pub fn from_raw(raw: &RawSubscription) -> Result<Self> {
        Ok(Self {
            user_id: supplied(&raw.user_id).map(str::to_string),
            provider: supplied(&raw.provider).map(str::to_string),
            price: raw.price,
            start: parse_optional_month("start_date", raw.start.as_deref())?,
            end: parse_optional_month("end_date", raw.end.as_deref())?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.provider.is_none()
            && self.price.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Overwrite only the supplied fields, then re-check the window.
    pub fn apply(self, record: &mut Subscription) -> Result<()> {
        if let Some(user_id) = self.user_id {
            record.user_id = user_id;
        }
        if let Some(provider) = self.provider {
            record.provider = provider;
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(start) = self.start {
            record.start = start;
        }
        if self.end.is_some() {
            record.end = self.end;
        }
        validate_window(record.start, record.end)
    }
}

pub fn filter_from_raw(raw: &RawReportFilter) -> Result<ReportFilter> {
    let period = raw.period.trim();
    if period.is_empty() {
        return Err(LedgerError::missing("period"));
    }

    Ok(ReportFilter {
        target_month: parse_month("period", period)?,
        user_id: supplied(&raw.user_id).map(str::to_string),
        provider: supplied(&raw.provider).map(str::to_string),
    })
}
