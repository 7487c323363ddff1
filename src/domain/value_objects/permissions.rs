//! Discord-compatible permission flags.
//!
//! Permissions are represented as a 64-bit bitfield where each bit
//! represents a specific permission. Named here are the administrator bit and
//! the four channel bits behind the access switches.

use serde::{Deserialize, Serialize};

/// 64-bit permission bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub i64);

impl Permissions {
    /// Allows all permissions and bypasses channel permission overwrites
    pub const ADMINISTRATOR: i64 = 1 << 3;
    /// Allows guild members to view a channel
    pub const VIEW_CHANNEL: i64 = 1 << 10;
    /// Allows for sending messages in a channel
    pub const SEND_MESSAGES: i64 = 1 << 11;
    /// Allows for deletion of other users messages
    pub const MANAGE_MESSAGES: i64 = 1 << 13;
    /// Allows for reading of message history
    pub const READ_MESSAGE_HISTORY: i64 = 1 << 16;

    /// All permissions combined
    pub const ALL: i64 = 0x1FFFFFFFFFF;

    /// Typical @everyone grant on a fresh server
    pub const DEFAULT: i64 = Self::VIEW_CHANNEL | Self::SEND_MESSAGES | Self::READ_MESSAGE_HISTORY;

    pub const fn new(bits: i64) -> Self {
        Self(bits)
    }

    /// Check if a specific permission is set.
    pub const fn has(&self, permission: i64) -> bool {
        // Administrator overrides all
        if self.0 & Self::ADMINISTRATOR != 0 {
            return true;
        }
        self.0 & permission == permission
    }

    /// Compute effective permissions after applying one overwrite.
    ///
    /// Deny is applied first, then allow: `(base & !deny) | allow`.
    pub fn apply_overwrites(base: i64, allow: i64, deny: i64) -> i64 {
        (base & !deny) | allow
    }
}
