//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use guild_admin::config::Settings;
use guild_admin::domain::{
    Channel, ChannelType, GuildSnapshot, Member, Permissions, Role, Server,
};
use guild_admin::infrastructure::session::InMemorySession;

pub const GUILD: i64 = 1;
pub const OWNER: i64 = 900;
pub const PYTHON: i64 = 10;
pub const WEB: i64 = 20;
pub const LOBBY: i64 = 30;
pub const ADMINS: i64 = 40;
pub const STUDENTS: i64 = 41;

/// Builder for one workspace snapshot
pub struct WorkspaceBuilder {
    snapshot: GuildSnapshot,
}

impl WorkspaceBuilder {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            snapshot: GuildSnapshot {
                server: Server::new(id, name, OWNER),
                roles: vec![Role::new(id, id, "@everyone", Permissions::DEFAULT)],
                ..Default::default()
            },
        }
    }

    pub fn category(mut self, id: i64, name: &str) -> Self {
        let channel = Channel::new(id, self.snapshot.id(), name, ChannelType::Category);
        self.snapshot.channels.push(channel);
        self
    }

    pub fn channel(mut self, id: i64, name: &str, parent_id: Option<i64>) -> Self {
        let mut channel = Channel::new(id, self.snapshot.id(), name, ChannelType::Text);
        channel.parent_id = parent_id;
        self.snapshot.channels.push(channel);
        self
    }

    pub fn role(mut self, id: i64, name: &str) -> Self {
        self.snapshot.roles.push(Role::new(id, self.snapshot.id(), name, 0));
        self
    }

    pub fn member(mut self, id: i64, login: &str, nickname: Option<&str>, roles: &[i64]) -> Self {
        let mut member = Member::new(self.snapshot.id(), id, login);
        member.nickname = nickname.map(String::from);
        member.roles = roles.to_vec();
        self.snapshot.members.push(member);
        self
    }

    pub fn build(self) -> GuildSnapshot {
        self.snapshot
    }
}

/// The workspace most tests run against
pub fn knowledge_kitchen() -> GuildSnapshot {
    WorkspaceBuilder::new(GUILD, "Knowledge Kitchen")
        .category(PYTHON, "Python")
        .channel(11, "week-1", Some(PYTHON))
        .channel(12, "week-2", Some(PYTHON))
        .category(WEB, "Web Design")
        .channel(21, "week-1", Some(WEB))
        .channel(LOBBY, "lobby", None)
        .role(ADMINS, "admins-py-su25")
        .role(STUDENTS, "students-py-su25")
        .member(500, "alice", Some("Alice Liddell"), &[STUDENTS])
        .member(501, "bob", None, &[STUDENTS])
        .member(502, "carol", None, &[ADMINS])
        .build()
}

pub fn session() -> Arc<InMemorySession> {
    Arc::new(InMemorySession::from_snapshots(vec![knowledge_kitchen()]))
}

/// Settings with a dummy token and default everything else
pub fn test_settings() -> Settings {
    Settings::from_toml("[bot]\ntoken = \"test-token\"\n").unwrap()
}

/// Roster CSV with `rows` students named s001, s002, ...
pub fn roster_csv(rows: usize) -> String {
    let mut csv = String::from("Email,Discord,First,Last,GitHub\n");
    for n in 1..=rows {
        csv.push_str(&format!("s{:03}@nyu.edu,,First{},Last{},\n", n, n, n));
    }
    csv
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
