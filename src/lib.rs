pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{InMemoryStore, JsonFileStore};
pub use core::{lifecycle::SubscriptionService, report::ReportEngine};
pub use domain::model::{RawReportFilter, RawSubscription, Report, SubscriptionId};
pub use domain::ports::{ConfigProvider, SubscriptionStore};
pub use utils::error::{ErrorKind, LedgerError, Result, StoreError};
