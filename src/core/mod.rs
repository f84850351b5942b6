pub mod conflict;
pub mod convert;
pub mod deadline;
pub mod lifecycle;
pub mod month;
pub mod report;

pub use crate::domain::model::{
    RawReportFilter, RawSubscription, Report, Subscription, SubscriptionId,
};
pub use crate::domain::ports::{ConfigProvider, SubscriptionStore};
pub use crate::utils::error::Result;
