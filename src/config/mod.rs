//! # Configuration Module
//!
//! Process settings and the workspace course layout.
//! Settings can be loaded from:
//! - Environment variables (prefixed with APP__, plus BOT_TOKEN, LOG_DIR, LOG_LEVEL)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! The course layout lives in a separate YAML file (`bot_config.yml`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guild_admin::config::{Settings, WorkspaceConfig};
//!
//! let settings = Settings::load()?;
//! let courses = WorkspaceConfig::from_path(settings.workspace.config_file.as_ref())?;
//! ```

mod settings;
mod workspace;

pub use settings::*;
pub use workspace::*;
