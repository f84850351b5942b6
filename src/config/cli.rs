use crate::core::ConfigProvider;
use crate::domain::model::{RawReportFilter, RawSubscription};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, Validate};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::{DEFAULT_STORE_PATH, MAX_TIMEOUT_SECONDS};

#[derive(Debug, Clone, Parser)]
#[command(name = "subscription-ledger")]
#[command(about = "Track paid subscriptions and report monthly spend")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON file holding the subscription table (overrides config file)
    #[arg(long)]
    pub store_path: Option<String>,

    /// Deadline for each store call, in seconds (overrides config file)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a subscription
    Create(SubscriptionArgs),
    /// Show one subscription
    Get { id: u64 },
    /// List all subscriptions
    List,
    /// Update the supplied fields of a subscription
    Update {
        id: String,
        #[command(flatten)]
        fields: SubscriptionArgs,
    },
    /// Delete a subscription
    Delete { id: u64 },
    /// Total price of subscriptions active in a month
    Report {
        /// Target month, MM-YYYY
        #[arg(long)]
        period: String,
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long = "service-name")]
        provider: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct SubscriptionArgs {
    #[arg(long)]
    pub user_id: Option<String>,
    #[arg(long = "service-name")]
    pub provider: Option<String>,
    #[arg(long)]
    pub price: Option<u64>,
    /// First month, MM-YYYY
    #[arg(long = "start-date")]
    pub start: Option<String>,
    /// Last month, MM-YYYY
    #[arg(long = "end-date")]
    pub end: Option<String>,
}

impl From<SubscriptionArgs> for RawSubscription {
    fn from(args: SubscriptionArgs) -> Self {
        RawSubscription {
            id: None,
            user_id: args.user_id,
            provider: args.provider,
            price: args.price,
            start: args.start,
            end: args.end,
        }
    }
}

impl Command {
    pub fn report_filter(&self) -> Option<RawReportFilter> {
        match self {
            Command::Report {
                period,
                user_id,
                provider,
            } => Some(RawReportFilter {
                period: period.clone(),
                user_id: user_id.clone(),
                provider: provider.clone(),
            }),
            _ => None,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn store_path(&self) -> &str {
        self.store_path.as_deref().unwrap_or(DEFAULT_STORE_PATH)
    }

    fn store_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store_path", self.store_path())?;
        if let Some(seconds) = self.timeout_seconds {
            validate_range("timeout_seconds", seconds, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
