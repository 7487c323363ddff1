//! Channel entity.
//!
//! Categories are channels of type `category`; ordinary channels point at
//! their category through `parent_id`.

use serde::{Deserialize, Serialize};

/// Channel types found in a workspace snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// A text channel within a server
    #[default]
    Text,
    /// A voice channel within a server
    Voice,
    /// A category that contains channels
    Category,
    /// An announcement (news) channel
    Announcement,
    /// A stage channel for hosted audio events
    Stage,
    /// A forum channel
    Forum,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::Category => "category",
            Self::Announcement => "announcement",
            Self::Stage => "stage",
            Self::Forum => "forum",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an overwrite targets a role or a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteType {
    Role,
    Member,
}

/// Permission overwrite attached to a category or channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Target ID (role or user ID)
    pub target_id: i64,

    #[serde(rename = "type")]
    pub target_type: OverwriteType,

    /// Allowed permissions bitfield
    pub allow: i64,

    /// Denied permissions bitfield
    pub deny: i64,
}

/// A category or channel in a workspace snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Snowflake ID
    pub id: i64,

    /// Owning server
    pub server_id: i64,

    pub name: String,

    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,

    /// Sorting position within category or server
    #[serde(default)]
    pub position: i32,

    /// Parent category ID; `None` for categories and uncategorized channels
    #[serde(default)]
    pub parent_id: Option<i64>,

    #[serde(default)]
    pub overwrites: Vec<PermissionOverwrite>,
}

impl Channel {
    pub fn new(id: i64, server_id: i64, name: impl Into<String>, channel_type: ChannelType) -> Self {
        Self {
            id,
            server_id,
            name: name.into(),
            channel_type,
            position: 0,
            parent_id: None,
            overwrites: Vec::new(),
        }
    }

    /// Check if this is a text-like channel (can carry messages).
    pub fn is_text_based(&self) -> bool {
        matches!(
            self.channel_type,
            ChannelType::Text | ChannelType::Announcement
        )
    }

    /// Check if this is a voice-like channel.
    pub fn is_voice_based(&self) -> bool {
        matches!(self.channel_type, ChannelType::Voice | ChannelType::Stage)
    }

    pub fn is_category(&self) -> bool {
        matches!(self.channel_type, ChannelType::Category)
    }
}
