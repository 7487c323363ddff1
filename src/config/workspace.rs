//! Course layout of a workspace, read from `bot_config.yml`.
//!
//! ```yaml
//! server:
//!   name: Knowledge Kitchen
//!   courses:
//!     - title: Intro to Python
//!       file_prefix: py
//!       roles:
//!         students: students-py-su25
//!         admins: admins-py-su25
//!       categories:
//!         - PYTHON - STUDENTS 01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct WorkspaceConfig {
    #[validate(nested)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1, message = "server name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "no courses configured"))]
    #[validate(nested)]
    pub courses: Vec<CourseConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CourseConfig {
    pub title: String,

    /// Prefix of the course's roster file, `<prefix>-result.csv`
    #[validate(length(min = 1, message = "file prefix must not be empty"))]
    pub file_prefix: String,

    #[validate(nested)]
    pub roles: CourseRoles,

    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CourseRoles {
    #[validate(length(min = 1, message = "students role must not be empty"))]
    pub students: String,

    #[validate(length(min = 1, message = "admins role must not be empty"))]
    pub admins: String,
}

impl CourseConfig {
    /// File name of this course's roster.
    pub fn roster_file(&self) -> String {
        format!("{}-result.csv", self.file_prefix)
    }
}

impl WorkspaceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config
            .validate()
            .map_err(|e| validation_error("workspace config", e))?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}
