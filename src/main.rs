use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use subscription_ledger::utils::{logger, validation::Validate};
use subscription_ledger::{
    CliConfig, Command, ConfigProvider, ErrorKind, JsonFileStore, LedgerError, RawSubscription,
    ReportEngine, SubscriptionId, SubscriptionService, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (optional), CLI flags take precedence
    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(exit_code(e.kind()));
            }
        },
        None => None,
    };

    // 初始化日誌
    let json_logs = cli.json_logs || file_config.as_ref().is_some_and(|c| c.json_logs());
    let level = file_config.as_ref().and_then(|c| c.log_level());
    if json_logs {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }

    let settings = resolve_settings(&cli, file_config);
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(e.kind()));
    }
    tracing::debug!("Resolved settings: {:?}", settings);

    match run(&cli.command, &settings).await {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("failed to encode output")?
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {} (kind: {:?})", e, e.kind());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.kind()));
        }
    }
}

/// File values first, then CLI overrides.
fn resolve_settings(cli: &CliConfig, file_config: Option<TomlConfig>) -> TomlConfig {
    let mut settings = file_config.unwrap_or_default();
    if let Some(path) = &cli.store_path {
        settings.store.path = path.clone();
    }
    if let Some(seconds) = cli.timeout_seconds {
        settings.store.timeout_seconds = Some(seconds);
    }
    settings
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    One(RawSubscription),
    Many(Vec<RawSubscription>),
    Deleted { deleted: SubscriptionId },
    Total { total: u64 },
}

async fn run(command: &Command, settings: &TomlConfig) -> Result<Output, LedgerError> {
    let store = JsonFileStore::open(settings.store_path())
        .await
        .map_err(|e| LedgerError::storage("open", e))?;
    let store = Arc::new(store);

    let mut service = SubscriptionService::new(Arc::clone(&store));
    let mut reports = ReportEngine::new(store);
    if let Some(timeout) = settings.store_timeout() {
        service = service.with_store_timeout(timeout);
        reports = reports.with_store_timeout(timeout);
    }

    match command {
        Command::Create(args) => service
            .create(RawSubscription::from(args.clone()))
            .await
            .map(Output::One),
        Command::Get { id } => service.get_by_id(SubscriptionId(*id)).await.map(Output::One),
        Command::List => service.get_all().await.map(Output::Many),
        Command::Update { id, fields } => service
            .update_by_id(RawSubscription::from(fields.clone()), id)
            .await
            .map(Output::One),
        Command::Delete { id } => {
            let id = SubscriptionId(*id);
            service.delete_by_id(id).await?;
            Ok(Output::Deleted { deleted: id })
        }
        Command::Report { .. } => {
            let filter = command.report_filter().unwrap_or_default();
            let report = reports.report(filter).await?;
            Ok(Output::Total {
                total: report.total,
            })
        }
    }
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Configuration => 1,
        ErrorKind::MissingField | ErrorKind::InvalidFormat => 2,
        ErrorKind::AlreadyExists => 3,
        ErrorKind::NotFound => 4,
        ErrorKind::StorageFailure => 5,
    }
}
