// # dnssyncd - DNS Sync Runner
//
// A THIN integration layer: reads configuration from the environment,
// builds the CIS zone clients, and runs one engine operation. All
// reconciliation logic lives in dnssync-core.
//
// ## Usage
//
// ```bash
// dnssyncd ensure|replace|delete
// ```
//
// ## Configuration
//
// ### Provider
// - `DNSSYNC_CONFIG_FILE`: JSON provider configuration (replaces the variables below)
// - `DNSSYNC_API_KEY`: IAM API key
// - `DNSSYNC_CRN`: CRN of the CIS instance
// - `DNSSYNC_ZONES`: Comma-separated zone ids to build clients for
// - `DNSSYNC_CIS_ENDPOINT`: Custom CIS API URL (optional)
// - `DNSSYNC_USER_AGENT`: User agent (optional)
// - `DNSSYNC_MAX_RETRIES`: Client retry count (optional)
// - `DNSSYNC_RETRY_INTERVAL_SECS`: Client retry interval (optional)
//
// ### Record
// - `DNSSYNC_ZONE_ID`: Zone to act on (defaults to the only configured zone)
// - `DNSSYNC_RECORD_NAME`: Record name
// - `DNSSYNC_RECORD_TYPE`: Record type (default A)
// - `DNSSYNC_RECORD_TARGETS`: Comma-separated target values
// - `DNSSYNC_RECORD_TTL`: TTL in seconds (default 120)
//
// ### Logging
// - `DNSSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export DNSSYNC_API_KEY=your_key
// export DNSSYNC_CRN=crn:v1:bluemix:public:internet-svcs:global:a/123:456::
// export DNSSYNC_ZONES=0123456789abcdef
// export DNSSYNC_RECORD_NAME='*.apps.example.com.'
// export DNSSYNC_RECORD_TARGETS=192.0.2.10,192.0.2.11
//
// dnssyncd ensure
// ```

use anyhow::Result;
use dnssync_core::{DesiredRecord, ProviderConfig, RetryConfig, SyncEngine, ZoneDescriptor};
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded
/// - 1: Configuration or startup error
/// - 2: Runtime error (operation failed)
#[derive(Debug, Clone, Copy)]
enum SyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Engine operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ensure,
    Replace,
    Delete,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ensure" => Ok(Command::Ensure),
            "replace" => Ok(Command::Replace),
            "delete" => Ok(Command::Delete),
            other => anyhow::bail!(
                "Unknown command '{}'. Usage: dnssyncd ensure|replace|delete",
                other
            ),
        }
    }
}

/// Application configuration
struct Config {
    provider: ProviderConfig,
    zone_id: String,
    record: DesiredRecord,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let provider = match env::var("DNSSYNC_CONFIG_FILE") {
            Ok(path) => ProviderConfig::from_json_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path, e))?,
            Err(_) => provider_from_env()?,
        };

        let zone_id = select_zone(env::var("DNSSYNC_ZONE_ID").ok(), &provider.zones)?;

        let ttl = match env::var("DNSSYNC_RECORD_TTL") {
            Ok(s) => s
                .parse::<i64>()
                .map_err(|e| anyhow::anyhow!("DNSSYNC_RECORD_TTL '{}' is not a number: {}", s, e))?,
            Err(_) => 120,
        };

        let record = DesiredRecord::new(
            env::var("DNSSYNC_RECORD_NAME").unwrap_or_default(),
            env::var("DNSSYNC_RECORD_TYPE").unwrap_or_else(|_| "A".to_string()),
            split_list(&env::var("DNSSYNC_RECORD_TARGETS").unwrap_or_default()),
            ttl,
        );

        Ok(Self {
            provider,
            zone_id,
            record,
            log_level: env::var("DNSSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Record fields are checked again by the engine; this catches the
    /// obvious mistakes before any credentials are used.
    fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if !self.provider.zones.contains(&self.zone_id) {
            anyhow::bail!(
                "DNSSYNC_ZONE_ID '{}' is not one of the configured zones: {}",
                self.zone_id,
                self.provider.zones.join(", ")
            );
        }

        if self.record.name.is_empty() {
            anyhow::bail!(
                "DNSSYNC_RECORD_NAME is required. \
                Set it via: export DNSSYNC_RECORD_NAME=www.example.com"
            );
        }

        if self.record.targets.is_empty() {
            anyhow::bail!(
                "DNSSYNC_RECORD_TARGETS must contain at least one target. \
                Set it via: export DNSSYNC_RECORD_TARGETS=192.0.2.10,192.0.2.11"
            );
        }

        parse_log_level(&self.log_level)?;

        Ok(())
    }
}

/// Build the provider configuration from individual variables
fn provider_from_env() -> Result<ProviderConfig> {
    let api_key = env::var("DNSSYNC_API_KEY").map_err(|_| {
        anyhow::anyhow!(
            "DNSSYNC_API_KEY is required. Set it via: export DNSSYNC_API_KEY=your_key"
        )
    })?;
    let crn = env::var("DNSSYNC_CRN")
        .map_err(|_| anyhow::anyhow!("DNSSYNC_CRN is required"))?;
    let zones = split_list(&env::var("DNSSYNC_ZONES").unwrap_or_default());

    let mut config = ProviderConfig::new(api_key, crn, zones);

    if let Ok(url) = env::var("DNSSYNC_CIS_ENDPOINT") {
        config = config.with_service_endpoint(dnssync_core::config::CIS_CUSTOM_ENDPOINT_NAME, url);
    }
    if let Ok(agent) = env::var("DNSSYNC_USER_AGENT") {
        config = config.with_user_agent(agent);
    }

    let mut retry = RetryConfig::default();
    if let Ok(s) = env::var("DNSSYNC_MAX_RETRIES") {
        retry.max_retries = parse_in_range("DNSSYNC_MAX_RETRIES", &s, 1, 10)?;
    }
    if let Ok(s) = env::var("DNSSYNC_RETRY_INTERVAL_SECS") {
        retry.retry_interval_secs = parse_in_range("DNSSYNC_RETRY_INTERVAL_SECS", &s, 1, 300)?;
    }

    Ok(config.with_retry(retry))
}

/// Pick the zone to act on: the explicit one, else the only configured zone
fn select_zone(explicit: Option<String>, zones: &[String]) -> Result<String> {
    match (explicit, zones) {
        (Some(zone), _) => Ok(zone),
        (None, []) => anyhow::bail!(
            "missing zone data. Set it via: export DNSSYNC_ZONES=zone_id[,zone_id...]"
        ),
        (None, [only]) => Ok(only.clone()),
        (None, _) => anyhow::bail!(
            "DNSSYNC_ZONE_ID is required when more than one zone is configured"
        ),
    }
}

/// Split a comma-separated list, dropping empty items
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_in_range<T>(name: &str, value: &str, min: T, max: T) -> Result<T>
where
    T: FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed: T = value
        .parse()
        .map_err(|_| anyhow::anyhow!("{} '{}' is not a valid number", name, value))?;
    if parsed < min || parsed > max {
        anyhow::bail!("{} must be between {} and {}. Got: {}", name, min, max, parsed);
    }
    Ok(parsed)
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNSSYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let command = match env::args().nth(1).as_deref().map(Command::from_str) {
        Some(Ok(command)) => command,
        Some(Err(e)) => {
            eprintln!("{}", e);
            return SyncExitCode::ConfigError.into();
        }
        None => {
            eprintln!("Usage: dnssyncd ensure|replace|delete");
            return SyncExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(command, config).await {
            Ok(()) => SyncExitCode::Success,
            Err(RunError::Startup(e)) => {
                error!("Startup error: {}", e);
                SyncExitCode::ConfigError
            }
            Err(RunError::Verify(e)) => {
                error!("failed to validate dns services: {}", e);
                SyncExitCode::RuntimeError
            }
            Err(RunError::Operation(e)) => {
                error!("{:?} failed: {}", command, e);
                SyncExitCode::RuntimeError
            }
        }
    })
    .into()
}

enum RunError {
    Startup(anyhow::Error),
    Verify(dnssync_core::Error),
    Operation(dnssync_core::Error),
}

/// Build the engine and run one operation
async fn run(command: Command, config: Config) -> std::result::Result<(), RunError> {
    info!(
        "Starting dnssyncd {:?} for {} ({}) in zone {}",
        command, config.record.name, config.record.record_type, config.zone_id
    );

    let registry = build_registry(&config.provider).map_err(RunError::Startup)?;
    registry.verify().await.map_err(RunError::Verify)?;

    let engine = SyncEngine::new(Arc::new(registry));
    let zone = ZoneDescriptor::new(config.zone_id);

    let result = match command {
        Command::Ensure => engine.ensure(&config.record, &zone).await,
        Command::Replace => engine.replace(&config.record, &zone).await,
        Command::Delete => engine.delete(&config.record, &zone).await,
    };
    result.map_err(RunError::Operation)?;

    info!("{:?} completed for {}", command, config.record.name);
    Ok(())
}

#[cfg(feature = "cis")]
fn build_registry(config: &ProviderConfig) -> Result<dnssync_core::ZoneClientRegistry> {
    info!("Building CIS clients for {} zone(s)", config.zones.len());
    Ok(dnssync_provider_cis::build_registry(config)?)
}

#[cfg(not(feature = "cis"))]
fn build_registry(_config: &ProviderConfig) -> Result<dnssync_core::ZoneClientRegistry> {
    anyhow::bail!("dnssyncd was built without a DNS provider; enable the `cis` feature")
}
