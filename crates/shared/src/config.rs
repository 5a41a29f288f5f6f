//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger behaviour.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Prefix for references of manually created vouchers.
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// Prefix for references of vouchers created by bulk import.
    #[serde(default = "default_import_reference_prefix")]
    pub import_reference_prefix: String,
    /// Tenant currency code, reported on every statement.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Reject inactive accounts on new or replaced draft lines.
    #[serde(default = "default_reject_inactive_accounts")]
    pub reject_inactive_accounts: bool,
}

fn default_reference_prefix() -> String {
    "JV".to_string()
}

fn default_import_reference_prefix() -> String {
    "JV-CSV".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_reject_inactive_accounts() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reference_prefix: default_reference_prefix(),
            import_reference_prefix: default_import_reference_prefix(),
            currency: default_currency(),
            reject_inactive_accounts: default_reject_inactive_accounts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "riska=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RISKA").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Loads `.env` (if present) and then the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_with_dotenv() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }
}
