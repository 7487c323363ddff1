//! Application Error Types
//!
//! Centralized error taxonomy shared by the session seam and the services.
//! Resolution misses are not errors (the resolver returns `Option`), and a
//! skipped duplicate is an outcome, not a failure.

use std::fmt;

/// Kind of resource an error or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Workspace,
    Category,
    Channel,
    Role,
    Member,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Category => "category",
            Self::Channel => "channel",
            Self::Role => "role",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{kind} not found: {token}")]
    NotFound { kind: ResourceKind, token: String },

    #[error("parent {kind} not found: {token}")]
    ParentNotFound { kind: ResourceKind, token: String },

    #[error("Remote operation failed: {0}")]
    RemoteOperationFailed(String),

    #[error("Malformed configuration: {0}")]
    ConfigMalformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: ResourceKind, token: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            token: token.to_string(),
        }
    }

    pub fn parent_not_found(kind: ResourceKind, token: impl fmt::Display) -> Self {
        Self::ParentNotFound {
            kind,
            token: token.to_string(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteOperationFailed(message.into())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ConfigMalformed(format!("roster: {}", err))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::ConfigMalformed(format!("workspace config: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ConfigMalformed(format!("snapshot: {}", err))
    }
}
