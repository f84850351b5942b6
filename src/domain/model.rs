use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SubscriptionId)
    }
}

/// Inclusive interval of days during which a subscription counts as active.
/// `end == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl ActiveWindow {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &ActiveWindow) -> bool {
        let self_starts_in_time = other.end.map_or(true, |end| self.start <= end);
        let other_starts_in_time = self.end.map_or(true, |end| other.start <= end);
        self_starts_in_time && other_starts_in_time
    }
}

/// A validated subscription that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub user_id: String,
    pub provider: String,
    pub price: u64,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl NewSubscription {
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start, self.end)
    }

    pub fn into_stored(self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            user_id: self.user_id,
            provider: self.provider,
            price: self.price,
            start: self.start,
            end: self.end,
        }
    }
}

/// Durable subscription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: String,
    pub provider: String,
    pub price: u64,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl Subscription {
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.start, self.end)
    }
}

/// Transport-facing subscription payload. Every field is optional so that
/// "not supplied" stays distinguishable from a zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubscription {
    #[serde(rename = "subscription_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubscriptionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "service_name", default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(rename = "start_date", default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(rename = "end_date", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Transport-facing report request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReportFilter {
    /// Target month, "MM-YYYY".
    pub period: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Normalized report request, built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub target_month: NaiveDate,
    pub user_id: Option<String>,
    pub provider: Option<String>,
}

/// Selection handed to the store for counting and fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub user_id: Option<String>,
    pub provider: Option<String>,
    pub window: ActiveWindow,
}

impl MatchQuery {
    pub fn matches(&self, record: &Subscription) -> bool {
        if let Some(user_id) = &self.user_id {
            if &record.user_id != user_id {
                return false;
            }
        }
        if let Some(provider) = &self.provider {
            if &record.provider != provider {
                return false;
            }
        }
        record.window().overlaps(&self.window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overlap_open_ended() {
        let june_on = ActiveWindow::new(day(2025, 6, 15), None);
        let july_on = ActiveWindow::new(day(2025, 7, 15), None);
        assert!(june_on.overlaps(&july_on));
        assert!(july_on.overlaps(&june_on));
    }

    #[test]
    fn test_overlap_closed_before() {
        let june_only = ActiveWindow::new(day(2025, 6, 15), Some(day(2025, 6, 15)));
        let july_on = ActiveWindow::new(day(2025, 7, 15), None);
        assert!(!june_only.overlaps(&july_on));
        assert!(!july_on.overlaps(&june_only));
    }

    #[test]
    fn test_overlap_touching_is_inclusive() {
        let a = ActiveWindow::new(day(2025, 1, 15), Some(day(2025, 3, 15)));
        let b = ActiveWindow::new(day(2025, 3, 15), Some(day(2025, 5, 15)));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_match_query_filters() {
        let record = Subscription {
            id: SubscriptionId(1),
            user_id: "user1".to_string(),
            provider: "Netflix".to_string(),
            price: 300,
            start: day(2025, 6, 15),
            end: None,
        };
        let window = ActiveWindow::new(day(2025, 7, 1), Some(day(2025, 7, 31)));

        let any = MatchQuery { user_id: None, provider: None, window };
        assert!(any.matches(&record));

        let other_provider = MatchQuery {
            provider: Some("Spotify".to_string()),
            ..any.clone()
        };
        assert!(!other_provider.matches(&record));

        let other_user = MatchQuery {
            user_id: Some("user2".to_string()),
            ..any
        };
        assert!(!other_user.matches(&record));
    }

    #[test]
    fn test_raw_subscription_json_shape() {
        let raw: RawSubscription = serde_json::from_str(
            r#"{"service_name":"Yandex Plus","price":400,"user_id":"u","start_date":"07-2025"}"#,
        )
        .unwrap();
        assert_eq!(raw.provider.as_deref(), Some("Yandex Plus"));
        assert_eq!(raw.price, Some(400));
        assert!(raw.id.is_none());
        assert!(raw.end.is_none());

        let json = serde_json::to_value(&raw).unwrap();
        assert!(json.get("end_date").is_none());
        assert_eq!(json["start_date"], "07-2025");
    }

    #[test]
    fn test_subscription_id_from_str() {
        assert_eq!("42".parse::<SubscriptionId>().unwrap(), SubscriptionId(42));
        assert!("abc".parse::<SubscriptionId>().is_err());
        assert!("-1".parse::<SubscriptionId>().is_err());
    }
}
