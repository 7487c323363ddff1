//! # Domain Entities
//!
//! Snapshot types for the remotely-hosted resource tree.
//!
//! - **Server/Guild**: top-level workspace, plus `GuildSnapshot` aggregating
//!   its channels, roles and members
//! - **Channel**: a category or a conversation surface, with its overwrites
//! - **Role**: a named permission group (read-only input)
//! - **Member**: a user account within a server (read-only input)
//! - **RosterRow**: one line of tabular intake data

mod guild;
mod channel;
mod role;
mod member;
mod roster;

pub use guild::{Server, GuildSnapshot};

pub use channel::{Channel, ChannelType, OverwriteType, PermissionOverwrite};

pub use role::{Role, EVERYONE_ROLE_NAME};

pub use member::Member;

pub use roster::{RosterRow, EMAIL_COLUMN};
