//! Listing Service
//!
//! Read-only enumeration of workspaces, categories, channels and members.
//! Listings are returned as data; `presentation::report` renders them.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{Channel, GuildSnapshot, Member, PermissionService, WorkspaceSession};

/// Heading used for the workspace listing.
pub const WORKSPACES_HEADING: &str = "SERVERS/GUILDS";

/// Note attached to an empty category listing.
pub const NO_CATEGORIES_NOTE: &str = "No categories in this server.";

/// A titled table of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Scope path, already upper-cased (e.g. `SERVER / 'PYTHON'`)
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub note: Option<String>,
}

impl Listing {
    fn new(heading: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            heading: heading.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
            note: None,
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Values of the first column, handy in tests and logs.
    pub fn names(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.first().map(String::as_str))
            .collect()
    }
}

/// Listing errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ListError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(i64),

    #[error("Category not found or invalid: {0}")]
    CategoryNotFound(i64),

    #[error("Channel not found: {0}")]
    ChannelNotFound(i64),
}

/// Listing service trait
pub trait ListingService: Send + Sync {
    fn list_workspaces(&self) -> Listing;

    fn list_categories(&self, guild_id: i64) -> Result<Listing, ListError>;

    /// Children of `category_id`, or every text-like and voice-like channel
    fn list_channels(&self, guild_id: i64, category_id: Option<i64>) -> Result<Listing, ListError>;

    /// Members, optionally narrowed to who can view a category or channel.
    /// A channel filter takes precedence over a category filter.
    fn list_members(
        &self,
        guild_id: i64,
        category_id: Option<i64>,
        channel_id: Option<i64>,
    ) -> Result<Listing, ListError>;
}

/// ListingService implementation
pub struct ListingServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    session: Arc<S>,
}

impl<S> ListingServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    fn snapshot(&self, guild_id: i64) -> Result<GuildSnapshot, ListError> {
        self.session.guild(guild_id).ok_or_else(|| {
            tracing::warn!(guild_id, "Workspace not found");
            ListError::WorkspaceNotFound(guild_id)
        })
    }

    fn category<'g>(snapshot: &'g GuildSnapshot, category_id: i64) -> Result<&'g Channel, ListError> {
        snapshot.category(category_id).ok_or_else(|| {
            tracing::warn!(guild_id = snapshot.id(), category_id, "Category not found or invalid");
            ListError::CategoryNotFound(category_id)
        })
    }

    fn member_row(snapshot: &GuildSnapshot, member: &Member) -> Vec<String> {
        vec![
            member.username.clone(),
            member.user_id.to_string(),
            snapshot.role_names(member).join(", "),
        ]
    }

    /// One row per member who can view `target`, each member at most once.
    fn viewers(listing: &mut Listing, snapshot: &GuildSnapshot, target: &Channel) {
        let mut seen = HashSet::new();
        for member in &snapshot.members {
            if PermissionService::can_view(snapshot, member, target) && seen.insert(member.user_id) {
                listing.push(Self::member_row(snapshot, member));
            }
        }
    }
}

fn scope_path(snapshot: &GuildSnapshot, segments: &[&Channel]) -> String {
    let mut path = snapshot.server.name.to_uppercase();
    for segment in segments {
        path.push_str(&format!(" / '{}'", segment.name.to_uppercase()));
    }
    path
}

impl<S> ListingService for ListingServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    fn list_workspaces(&self) -> Listing {
        let mut listing = Listing::new(WORKSPACES_HEADING, &["Server Name", "ID"]);
        for server in self.session.guilds() {
            listing.push(vec![server.name, server.id.to_string()]);
        }
        listing
    }

    fn list_categories(&self, guild_id: i64) -> Result<Listing, ListError> {
        let snapshot = self.snapshot(guild_id)?;

        let mut listing = Listing::new(scope_path(&snapshot, &[]), &["Category Name", "ID"]);
        for category in snapshot.categories() {
            listing.push(vec![category.name.clone(), category.id.to_string()]);
        }
        if listing.rows.is_empty() {
            listing.note = Some(NO_CATEGORIES_NOTE.to_string());
        }
        Ok(listing)
    }

    fn list_channels(&self, guild_id: i64, category_id: Option<i64>) -> Result<Listing, ListError> {
        let snapshot = self.snapshot(guild_id)?;
        let columns = ["Channel Name", "ID"];

        let listing = match category_id {
            Some(category_id) => {
                let category = Self::category(&snapshot, category_id)?;
                let mut listing = Listing::new(scope_path(&snapshot, &[category]), &columns);
                for channel in snapshot.channels_in(category_id) {
                    listing.push(vec![channel.name.clone(), channel.id.to_string()]);
                }
                listing
            }
            None => {
                let mut listing = Listing::new(scope_path(&snapshot, &[]), &columns);
                for channel in snapshot
                    .channels
                    .iter()
                    .filter(|c| c.is_text_based() || c.is_voice_based())
                {
                    listing.push(vec![channel.name.clone(), channel.id.to_string()]);
                }
                listing
            }
        };
        Ok(listing)
    }

    fn list_members(
        &self,
        guild_id: i64,
        category_id: Option<i64>,
        channel_id: Option<i64>,
    ) -> Result<Listing, ListError> {
        let snapshot = self.snapshot(guild_id)?;
        let columns = ["User Name", "ID", "Roles"];

        let category = category_id
            .map(|id| Self::category(&snapshot, id))
            .transpose()?;
        let channel = channel_id
            .map(|id| {
                snapshot
                    .channel(id)
                    .filter(|c| !c.is_category())
                    .ok_or_else(|| {
                        tracing::warn!(guild_id, channel_id = id, "Channel not found");
                        ListError::ChannelNotFound(id)
                    })
            })
            .transpose()?;

        let segments: Vec<&Channel> = category.into_iter().chain(channel).collect();
        let mut listing = Listing::new(scope_path(&snapshot, &segments), &columns);

        match (channel, category) {
            (Some(channel), _) => Self::viewers(&mut listing, &snapshot, channel),
            (None, Some(category)) => Self::viewers(&mut listing, &snapshot, category),
            (None, None) => {
                for member in &snapshot.members {
                    listing.push(Self::member_row(&snapshot, member));
                }
            }
        }
        Ok(listing)
    }
}
