//! Connected-session contract.
//!
//! The remote platform is reached through a session that keeps a cached
//! snapshot of the resource tree and exposes mutations as single async
//! round trips. Transport, authentication and rate limiting live behind
//! this trait.

use async_trait::async_trait;

use crate::domain::entities::{Channel, GuildSnapshot, PermissionOverwrite, Server};
use crate::shared::error::AppError;

/// Session trait for reading the snapshot and mutating remote resources.
///
/// Snapshot reads are synchronous and never fail; they return owned copies
/// so callers can hold them across awaits. Mutations report transport or
/// remote-side failures as `AppError::RemoteOperationFailed`.
#[async_trait]
pub trait WorkspaceSession: Send + Sync {
    /// All servers visible to the session, in iteration order.
    fn guilds(&self) -> Vec<Server>;

    /// Full snapshot of one server.
    fn guild(&self, guild_id: i64) -> Option<GuildSnapshot>;

    /// Create a category at the bottom of the server.
    async fn create_category(&self, guild_id: i64, name: &str) -> Result<Channel, AppError>;

    /// Create a text channel, inside a category when `parent_id` is set.
    async fn create_text_channel(
        &self,
        guild_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Channel, AppError>;

    /// Delete a channel or category.
    async fn delete_channel(&self, channel_id: i64) -> Result<(), AppError>;

    /// Replace the overwrite set of a channel or category.
    async fn edit_overwrites(
        &self,
        channel_id: i64,
        overwrites: Vec<PermissionOverwrite>,
    ) -> Result<(), AppError>;

    /// Post a message; returns the new message ID.
    async fn send_message(&self, channel_id: i64, content: &str) -> Result<i64, AppError>;

    async fn pin_message(&self, channel_id: i64, message_id: i64) -> Result<(), AppError>;
}
