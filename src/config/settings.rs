//! Application settings and configuration structures.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bot credentials and conversation limits
    pub bot: BotSettings,

    /// Log destination and level
    pub logging: LoggingSettings,

    /// Roster location and row window
    pub roster: RosterSettings,

    /// Workspace configuration and snapshot files
    pub workspace: WorkspaceSettings,

    /// Current environment (development, production)
    pub environment: String,
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotSettings {
    /// Authentication token; opaque, only checked for presence
    pub token: String,

    /// Requests a member may make per day
    pub daily_request_limit: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Directory for the log file; empty disables file logging
    pub dir: String,

    pub level: String,
}

/// Roster configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterSettings {
    /// Directory holding `<file_prefix>-result.csv` rosters
    pub dir: String,

    /// First roster row to process (1-indexed)
    pub start_row: usize,

    /// Last roster row to process (inclusive)
    pub end_row: usize,
}

/// Workspace file locations.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSettings {
    /// YAML course configuration
    pub config_file: String,

    /// JSON snapshot the in-memory session loads and saves
    pub snapshot_file: String,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. built-in defaults
    /// 2. config/default.toml and config/{RUN_ENV}.toml
    /// 3. `APP__` environment variables
    /// 4. `BOT_TOKEN`, `LOG_DIR`, `LOG_LEVEL` (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if no bot token is configured.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults(&environment)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__ROSTER__END_ROW=80 -> roster.end_row = 80
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("bot.token", std::env::var("BOT_TOKEN").ok())?
            .set_override_option("logging.dir", std::env::var("LOG_DIR").ok())?
            .set_override_option("logging.level", std::env::var("LOG_LEVEL").ok())?;

        Self::finish(builder)
    }

    /// Settings from an inline TOML document layered over the defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults("development")?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("bot.token", "")?
            .set_default("bot.daily_request_limit", 25)?
            .set_default("logging.dir", "logs")?
            .set_default("logging.level", "info")?
            .set_default("roster.dir", "results")?
            .set_default("roster.start_row", 1)?
            .set_default("roster.end_row", 50)?
            .set_default("workspace.config_file", "bot_config.yml")?
            .set_default("workspace.snapshot_file", "workspace.json")
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                if settings.bot.token.trim().is_empty() {
                    return Err(ConfigError::Message(
                        "bot token is missing; set BOT_TOKEN or bot.token".into(),
                    ));
                }
                Ok(settings)
            })
    }
}
