//! Server (guild) entity and the per-server snapshot aggregate.

use serde::{Deserialize, Serialize};

use super::{Channel, Member, Role};

/// Represents a server (guild): the top-level workspace.
///
/// Display names are not unique; the ID is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Snowflake ID
    pub id: i64,

    pub name: String,

    /// User ID of the server owner
    #[serde(default)]
    pub owner_id: i64,
}

impl Server {
    pub fn new(id: i64, name: impl Into<String>, owner_id: i64) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id,
        }
    }
}

/// Point-in-time view of one server's resource tree.
///
/// `channels` holds categories and channels together, in the session's
/// iteration order; that order decides which of several same-named
/// resources a name lookup finds first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub server: Server,

    #[serde(default)]
    pub channels: Vec<Channel>,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub members: Vec<Member>,
}

impl GuildSnapshot {
    pub fn id(&self) -> i64 {
        self.server.id
    }

    pub fn categories(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(|c| c.is_category())
    }

    /// Every non-category channel, uncategorized ones included.
    pub fn non_category_channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(|c| !c.is_category())
    }

    /// Children of a category, in iteration order.
    pub fn channels_in(&self, category_id: i64) -> impl Iterator<Item = &Channel> {
        self.channels
            .iter()
            .filter(move |c| !c.is_category() && c.parent_id == Some(category_id))
    }

    /// Any channel (category or not) by ID.
    pub fn channel(&self, id: i64) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// A category by ID; `None` when the ID belongs to an ordinary channel.
    pub fn category(&self, id: i64) -> Option<&Channel> {
        self.channel(id).filter(|c| c.is_category())
    }

    pub fn role(&self, id: i64) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn member(&self, user_id: i64) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Names of a member's roles, the default role excluded.
    pub fn role_names(&self, member: &Member) -> Vec<&str> {
        self.roles
            .iter()
            .filter(|r| !r.is_everyone() && member.has_role(r.id))
            .map(|r| r.name.as_str())
            .collect()
    }
}
