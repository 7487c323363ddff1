//! Server Member entity.

use serde::{Deserialize, Serialize};

/// Represents a user's membership in a server.
///
/// Members are read-only inputs for this crate; only their access to
/// categories and channels is edited, through permission overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Server ID
    pub server_id: i64,

    /// User ID
    pub user_id: i64,

    /// Login name (unique per platform, but matched case-insensitively)
    pub username: String,

    /// Server-specific nickname (if different from username)
    #[serde(default)]
    pub nickname: Option<String>,

    /// IDs of roles assigned to this member, excluding the everyone role
    #[serde(default)]
    pub roles: Vec<i64>,
}

impl Member {
    /// Create a new member with just the required fields.
    pub fn new(server_id: i64, user_id: i64, username: impl Into<String>) -> Self {
        Self {
            server_id,
            user_id,
            username: username.into(),
            nickname: None,
            roles: Vec::new(),
        }
    }

    /// Check if the member has a specific role.
    pub fn has_role(&self, role_id: i64) -> bool {
        self.roles.contains(&role_id)
    }

    /// Nickname when set, login name otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.username)
    }

    /// Mention markup for posting messages.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}
