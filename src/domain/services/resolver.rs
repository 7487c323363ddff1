//! Identifier resolution.
//!
//! Turns a name-or-ID [`Token`] into a canonical ID within one of five
//! nested scopes. A miss is `None`: callers decide whether to log, skip or
//! fail.
//!
//! Matching rules shared by every scope:
//! - an `Id` token matches a candidate with that ID first; failing that its
//!   decimal text is compared against names; failing that the ID is passed
//!   through unverified;
//! - names compare trimmed and case-insensitively;
//! - the first match in snapshot iteration order wins, duplicates are not
//!   reported.

use crate::domain::entities::{Channel, GuildSnapshot};
use crate::domain::session::WorkspaceSession;
use crate::domain::value_objects::{normalize_name, Token};

/// Where to look a token up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Workspace,
    Category { guild_id: i64 },
    Channel { guild_id: i64, category_id: Option<i64> },
    Role { guild_id: i64 },
    Member { guild_id: i64, match_display_names: bool },
}

/// Name-or-ID resolver over a session's current snapshot.
pub struct Resolver<'a, S: WorkspaceSession + ?Sized> {
    session: &'a S,
}

impl<'a, S: WorkspaceSession + ?Sized> Resolver<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    /// Resolve a token in the given scope.
    pub fn resolve(&self, scope: Scope, token: &Token) -> Option<i64> {
        match scope {
            Scope::Workspace => self.guild(token),
            Scope::Category { guild_id } => self.category(guild_id, token),
            Scope::Channel { guild_id, category_id } => self.channel(guild_id, token, category_id),
            Scope::Role { guild_id } => self.role(guild_id, token),
            Scope::Member {
                guild_id,
                match_display_names,
            } => self.member(guild_id, token, match_display_names),
        }
    }

    pub fn guild(&self, token: &Token) -> Option<i64> {
        let guilds = self.session.guilds();
        match_candidates(token, guilds.iter().map(|g| (g.id, g.name.as_str())))
    }

    pub fn category(&self, guild_id: i64, token: &Token) -> Option<i64> {
        let snapshot = self.session.guild(guild_id)?;
        match_candidates(token, snapshot.categories().map(id_and_name))
    }

    /// Resolve a channel, restricted to one category's children when
    /// `category_id` is set. Categories themselves never match.
    pub fn channel(&self, guild_id: i64, token: &Token, category_id: Option<i64>) -> Option<i64> {
        let snapshot = self.session.guild(guild_id)?;
        match category_id {
            Some(category_id) => {
                snapshot.category(category_id)?;
                match_candidates(token, snapshot.channels_in(category_id).map(id_and_name))
            }
            None => match_candidates(token, snapshot.non_category_channels().map(id_and_name)),
        }
    }

    pub fn role(&self, guild_id: i64, token: &Token) -> Option<i64> {
        let snapshot = self.session.guild(guild_id)?;
        match_candidates(token, snapshot.roles.iter().map(|r| (r.id, r.name.as_str())))
    }

    /// Resolve a member by ID, login name, or (optionally) display name.
    ///
    /// Self-reported names often carry a `#discriminator` suffix; everything
    /// from the first `#` is dropped before matching.
    pub fn member(&self, guild_id: i64, token: &Token, match_display_names: bool) -> Option<i64> {
        let snapshot = self.session.guild(guild_id)?;
        member_in(&snapshot, token, match_display_names)
    }
}

/// Member lookup against an already-fetched snapshot.
pub fn member_in(snapshot: &GuildSnapshot, token: &Token, match_display_names: bool) -> Option<i64> {
    let token = match token {
        Token::Name(name) => {
            let stripped = strip_discriminator(name);
            if stripped.is_empty() {
                return None;
            }
            Token::Name(stripped.to_string())
        }
        Token::Id(id) => Token::Id(*id),
    };

    if let Some(id) = token.as_id() {
        if snapshot.members.iter().any(|m| m.user_id == id) {
            return Some(id);
        }
    }

    let wanted = normalize_name(&token.match_text());
    let by_login = snapshot
        .members
        .iter()
        .find(|m| normalize_name(&m.username) == wanted)
        .map(|m| m.user_id);
    if by_login.is_some() {
        return by_login;
    }

    if match_display_names {
        let by_display = snapshot
            .members
            .iter()
            .find(|m| normalize_name(m.display_name()) == wanted)
            .map(|m| m.user_id);
        if by_display.is_some() {
            return by_display;
        }
    }

    token.as_id()
}

/// Text before the first `#`, trimmed.
pub fn strip_discriminator(name: &str) -> &str {
    name.split('#').next().unwrap_or_default().trim()
}

fn id_and_name(channel: &Channel) -> (i64, &str) {
    (channel.id, channel.name.as_str())
}

/// Core matcher shared by every non-member scope.
fn match_candidates<'c, I>(token: &Token, candidates: I) -> Option<i64>
where
    I: IntoIterator<Item = (i64, &'c str)>,
{
    let candidates: Vec<(i64, &str)> = candidates.into_iter().collect();

    if let Token::Id(id) = token {
        if candidates.iter().any(|(candidate, _)| candidate == id) {
            return Some(*id);
        }
    }

    let wanted = normalize_name(&token.match_text());
    candidates
        .iter()
        .find(|(_, name)| normalize_name(name) == wanted)
        .map(|(id, _)| *id)
        .or_else(|| token.as_id())
}
