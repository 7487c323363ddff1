//! In-memory workspace session.
//!
//! Implements [`WorkspaceSession`] over snapshots held in memory and
//! optionally persisted as JSON. New resources get snowflake IDs. Every
//! mutation is appended to an operation journal, and failures can be
//! injected per resource name, which makes the session suitable for dry runs
//! and for exercising failure policy.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Channel, ChannelType, GuildSnapshot, PermissionOverwrite, Server};
use crate::domain::session::WorkspaceSession;
use crate::shared::error::{AppError, ResourceKind};
use crate::shared::snowflake::SnowflakeGenerator;

/// A message posted through the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedMessage {
    pub id: i64,
    pub channel_id: i64,
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

/// One mutation, as issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateCategory { guild_id: i64, name: String },
    CreateChannel { guild_id: i64, name: String, parent_id: Option<i64> },
    DeleteChannel { channel_id: i64 },
    EditOverwrites { channel_id: i64, count: usize },
    SendMessage { channel_id: i64 },
    PinMessage { channel_id: i64, message_id: i64 },
}

/// On-disk snapshot layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub guilds: Vec<GuildSnapshot>,
    #[serde(default)]
    pub messages: Vec<PostedMessage>,
}

/// Session backed by in-memory snapshots.
pub struct InMemorySession {
    guilds: RwLock<Vec<GuildSnapshot>>,
    messages: RwLock<Vec<PostedMessage>>,
    journal: Mutex<Vec<Operation>>,
    failing_names: RwLock<HashSet<String>>,
    ids: SnowflakeGenerator,
}

impl InMemorySession {
    pub fn from_snapshots(guilds: Vec<GuildSnapshot>) -> Self {
        Self::from_file(SnapshotFile {
            guilds,
            messages: Vec::new(),
        })
    }

    pub fn from_file(file: SnapshotFile) -> Self {
        Self {
            guilds: RwLock::new(file.guilds),
            messages: RwLock::new(file.messages),
            journal: Mutex::new(Vec::new()),
            failing_names: RwLock::new(HashSet::new()),
            ids: SnowflakeGenerator::new(1),
        }
    }

    /// Load a JSON snapshot; a missing file is an error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let file: SnapshotFile = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.display(), guilds = file.guilds.len(), "Snapshot loaded");
        Ok(Self::from_file(file))
    }

    /// Write the current state back as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let file = SnapshotFile {
            guilds: self.guilds.read().clone(),
            messages: self.messages.read().clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| AppError::Internal(format!("snapshot encode: {}", e)))?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "Snapshot saved");
        Ok(())
    }

    /// Make every mutation touching a resource with this name fail remotely.
    pub fn fail_on(&self, name: impl Into<String>) {
        self.failing_names.write().insert(name.into());
    }

    /// Mutations issued so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.journal.lock().clone()
    }

    pub fn messages(&self) -> Vec<PostedMessage> {
        self.messages.read().clone()
    }

    fn record(&self, operation: Operation) {
        self.journal.lock().push(operation);
    }

    fn check_failure(&self, name: &str) -> Result<(), AppError> {
        if self.failing_names.read().contains(name) {
            return Err(AppError::remote(format!("403 Forbidden: cannot modify '{}'", name)));
        }
        Ok(())
    }

    fn channel_name(&self, channel_id: i64) -> Option<String> {
        self.guilds
            .read()
            .iter()
            .flat_map(|g| g.channels.iter())
            .find(|c| c.id == channel_id)
            .map(|c| c.name.clone())
    }

    fn insert_channel(
        &self,
        guild_id: i64,
        name: &str,
        channel_type: ChannelType,
        parent_id: Option<i64>,
    ) -> Result<Channel, AppError> {
        let mut guilds = self.guilds.write();
        let guild = guilds
            .iter_mut()
            .find(|g| g.server.id == guild_id)
            .ok_or_else(|| AppError::remote(format!("404 Not Found: unknown guild {}", guild_id)))?;

        if let Some(parent_id) = parent_id {
            if guild.category(parent_id).is_none() {
                return Err(AppError::parent_not_found(ResourceKind::Category, parent_id));
            }
        }

        let position = guild
            .channels
            .iter()
            .filter(|c| c.is_category() == (channel_type == ChannelType::Category) && c.parent_id == parent_id)
            .map(|c| c.position + 1)
            .max()
            .unwrap_or(0);

        let mut channel = Channel::new(self.ids.generate(), guild_id, name, channel_type);
        channel.parent_id = parent_id;
        channel.position = position;
        guild.channels.push(channel.clone());
        Ok(channel)
    }
}

#[async_trait]
impl WorkspaceSession for InMemorySession {
    fn guilds(&self) -> Vec<Server> {
        self.guilds.read().iter().map(|g| g.server.clone()).collect()
    }

    fn guild(&self, guild_id: i64) -> Option<GuildSnapshot> {
        self.guilds.read().iter().find(|g| g.server.id == guild_id).cloned()
    }

    async fn create_category(&self, guild_id: i64, name: &str) -> Result<Channel, AppError> {
        self.record(Operation::CreateCategory {
            guild_id,
            name: name.to_string(),
        });
        self.check_failure(name)?;
        self.insert_channel(guild_id, name, ChannelType::Category, None)
    }

    async fn create_text_channel(
        &self,
        guild_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Channel, AppError> {
        self.record(Operation::CreateChannel {
            guild_id,
            name: name.to_string(),
            parent_id,
        });
        self.check_failure(name)?;
        self.insert_channel(guild_id, name, ChannelType::Text, parent_id)
    }

    async fn delete_channel(&self, channel_id: i64) -> Result<(), AppError> {
        self.record(Operation::DeleteChannel { channel_id });
        if let Some(name) = self.channel_name(channel_id) {
            self.check_failure(&name)?;
        }

        let mut guilds = self.guilds.write();
        let guild = guilds
            .iter_mut()
            .find(|g| g.channels.iter().any(|c| c.id == channel_id))
            .ok_or_else(|| AppError::remote(format!("404 Not Found: unknown channel {}", channel_id)))?;

        guild.channels.retain(|c| c.id != channel_id);
        // Children of a deleted category fall back to the server root.
        for channel in guild.channels.iter_mut().filter(|c| c.parent_id == Some(channel_id)) {
            channel.parent_id = None;
        }
        Ok(())
    }

    async fn edit_overwrites(
        &self,
        channel_id: i64,
        overwrites: Vec<PermissionOverwrite>,
    ) -> Result<(), AppError> {
        self.record(Operation::EditOverwrites {
            channel_id,
            count: overwrites.len(),
        });
        if let Some(name) = self.channel_name(channel_id) {
            self.check_failure(&name)?;
        }

        let mut guilds = self.guilds.write();
        let channel = guilds
            .iter_mut()
            .flat_map(|g| g.channels.iter_mut())
            .find(|c| c.id == channel_id)
            .ok_or_else(|| AppError::remote(format!("404 Not Found: unknown channel {}", channel_id)))?;
        channel.overwrites = overwrites;
        Ok(())
    }

    async fn send_message(&self, channel_id: i64, content: &str) -> Result<i64, AppError> {
        self.record(Operation::SendMessage { channel_id });
        if self.channel_name(channel_id).is_none() {
            return Err(AppError::remote(format!("404 Not Found: unknown channel {}", channel_id)));
        }

        let id = self.ids.generate();
        self.messages.write().push(PostedMessage {
            id,
            channel_id,
            content: content.to_string(),
            pinned: false,
        });
        Ok(id)
    }

    async fn pin_message(&self, channel_id: i64, message_id: i64) -> Result<(), AppError> {
        self.record(Operation::PinMessage {
            channel_id,
            message_id,
        });
        let mut messages = self.messages.write();
        let message = messages
            .iter_mut()
            .find(|m| m.id == message_id && m.channel_id == channel_id)
            .ok_or_else(|| AppError::remote(format!("404 Not Found: unknown message {}", message_id)))?;
        message.pinned = true;
        Ok(())
    }
}
