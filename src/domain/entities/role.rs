//! Role entity.

use serde::{Deserialize, Serialize};

/// Name the remote platform gives the default role.
pub const EVERYONE_ROLE_NAME: &str = "@everyone";

/// Represents a role in a server.
///
/// Roles are read-only inputs: this crate never creates or deletes them.
/// The default ("everyone") role carries the same ID as its server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Snowflake ID
    pub id: i64,

    /// Server ID this role belongs to
    pub server_id: i64,

    pub name: String,

    /// Permission bitfield (64-bit flags)
    #[serde(default)]
    pub permissions: i64,

    /// Position in the role hierarchy (higher = more priority)
    #[serde(default)]
    pub position: i32,
}

impl Role {
    pub fn new(id: i64, server_id: i64, name: impl Into<String>, permissions: i64) -> Self {
        Self {
            id,
            server_id,
            name: name.into(),
            permissions,
            position: 0,
        }
    }

    /// Check if this is the server's default role.
    pub fn is_everyone(&self) -> bool {
        self.id == self.server_id || self.name == EVERYONE_ROLE_NAME
    }
}
