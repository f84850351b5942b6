#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, SubscriptionArgs};
pub use toml_config::TomlConfig;

pub const DEFAULT_STORE_PATH: &str = "./data/subscriptions.json";
pub const MAX_TIMEOUT_SECONDS: u64 = 300;
