//! Per-principal access rules.
//!
//! An `AccessRule` is the four-switch view of a permission overwrite that
//! provisioning works with. Each switch is tri-state: `Some(true)` allows,
//! `Some(false)` denies, `None` inherits.

use serde::{Deserialize, Serialize};

use super::Permissions;
use crate::domain::entities::{OverwriteType, PermissionOverwrite};

/// Subject of a permission overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Principal {
    Role(i64),
    Member(i64),
}

impl Principal {
    pub fn id(&self) -> i64 {
        match self {
            Self::Role(id) | Self::Member(id) => *id,
        }
    }

    pub fn overwrite_type(&self) -> OverwriteType {
        match self {
            Self::Role(_) => OverwriteType::Role,
            Self::Member(_) => OverwriteType::Member,
        }
    }
}

impl From<&PermissionOverwrite> for Principal {
    fn from(overwrite: &PermissionOverwrite) -> Self {
        match overwrite.target_type {
            OverwriteType::Role => Self::Role(overwrite.target_id),
            OverwriteType::Member => Self::Member(overwrite.target_id),
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Role(id) => write!(f, "role {}", id),
            Self::Member(id) => write!(f, "member {}", id),
        }
    }
}

/// Access switches for one principal on one category or channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub view: Option<bool>,
    pub read: Option<bool>,
    pub send: Option<bool>,
    pub manage: Option<bool>,
}

impl AccessRule {
    /// Deny view and read; leave the rest inherited.
    pub const fn deny_view() -> Self {
        Self {
            view: Some(false),
            read: Some(false),
            send: None,
            manage: None,
        }
    }

    /// Allow view, read and send.
    pub const fn participant() -> Self {
        Self {
            view: Some(true),
            read: Some(true),
            send: Some(true),
            manage: None,
        }
    }

    /// Allow view and read, deny send and manage.
    pub const fn read_only() -> Self {
        Self {
            view: Some(true),
            read: Some(true),
            send: Some(false),
            manage: Some(false),
        }
    }

    fn switches(&self) -> [(Option<bool>, i64); 4] {
        [
            (self.view, Permissions::VIEW_CHANNEL),
            (self.read, Permissions::READ_MESSAGE_HISTORY),
            (self.send, Permissions::SEND_MESSAGES),
            (self.manage, Permissions::MANAGE_MESSAGES),
        ]
    }

    /// Allow and deny bitfields for this rule.
    pub fn to_bits(&self) -> (i64, i64) {
        self.switches()
            .into_iter()
            .fold((0, 0), |(allow, deny), (switch, bit)| match switch {
                Some(true) => (allow | bit, deny),
                Some(false) => (allow, deny | bit),
                None => (allow, deny),
            })
    }

    /// Rebuild a rule from overwrite bitfields. Bits outside the four
    /// switches are dropped.
    pub fn from_bits(allow: i64, deny: i64) -> Self {
        let switch = |bit: i64| {
            if allow & bit != 0 {
                Some(true)
            } else if deny & bit != 0 {
                Some(false)
            } else {
                None
            }
        };
        Self {
            view: switch(Permissions::VIEW_CHANNEL),
            read: switch(Permissions::READ_MESSAGE_HISTORY),
            send: switch(Permissions::SEND_MESSAGES),
            manage: switch(Permissions::MANAGE_MESSAGES),
        }
    }

    pub fn to_overwrite(&self, principal: Principal) -> PermissionOverwrite {
        let (allow, deny) = self.to_bits();
        PermissionOverwrite {
            target_id: principal.id(),
            target_type: principal.overwrite_type(),
            allow,
            deny,
        }
    }
}
