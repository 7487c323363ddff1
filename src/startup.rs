//! Application Startup
//!
//! Builds the session and services from settings and runs one CLI command.
//!
//! [`AppState`] also owns the per-member [`ConversationStore`]. No CLI
//! command reads it; the message-handling side takes it through
//! [`Application::conversations`] so its daily quota comes from the same
//! settings.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::services::{
    BatchService, BatchServiceImpl, BatchTarget, BatchWindow, HydrationOptions, HydrationService,
    HydrationServiceImpl, ListingService, ListingServiceImpl, Provisioned, ProvisioningService,
    ProvisioningServiceImpl,
};
use crate::config::{Settings, WorkspaceConfig};
use crate::domain::{AccessRule, Principal, Resolver, Token, WorkspaceSession};
use crate::infrastructure::conversation_store::ConversationStore;
use crate::infrastructure::roster::Roster;
use crate::infrastructure::session::InMemorySession;
use crate::presentation::cli::Command;
use crate::presentation::report;
use crate::shared::error::{AppError, ResourceKind};

/// Application state shared by command handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<InMemorySession>,
    /// Thread handles and request quotas for the message-handling side
    pub conversations: Arc<ConversationStore>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    state: AppState,
    snapshot_path: PathBuf,
}

impl Application {
    /// Build the application from settings, loading the workspace snapshot
    pub fn build(settings: Settings, snapshot: Option<PathBuf>) -> Result<Self> {
        let snapshot_path = snapshot.unwrap_or_else(|| PathBuf::from(&settings.workspace.snapshot_file));
        let session = InMemorySession::load(&snapshot_path)
            .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
        tracing::info!(path = %snapshot_path.display(), guilds = session.guilds().len(), "Session ready");

        Ok(Self::with_session(settings, Arc::new(session), snapshot_path))
    }

    /// Build around an existing session
    pub fn with_session(settings: Settings, session: Arc<InMemorySession>, snapshot_path: PathBuf) -> Self {
        Self {
            state: AppState {
                session,
                conversations: Arc::new(ConversationStore::new(settings.bot.daily_request_limit)),
                settings: Arc::new(settings),
            },
            snapshot_path,
        }
    }

    pub fn session(&self) -> &Arc<InMemorySession> {
        &self.state.session
    }

    /// Per-member conversation state, limited by the configured daily allowance
    pub fn conversations(&self) -> &Arc<ConversationStore> {
        &self.state.conversations
    }

    /// Write the session back to the snapshot file
    pub fn save(&self) -> Result<()> {
        self.state
            .session
            .save(&self.snapshot_path)
            .with_context(|| format!("saving snapshot {}", self.snapshot_path.display()))
    }

    /// Run one command and return its report text
    pub async fn run(&self, command: Command) -> Result<String> {
        let session = Arc::clone(&self.state.session);
        let settings = &self.state.settings;
        let listing = ListingServiceImpl::new(Arc::clone(&session));
        let provisioning = ProvisioningServiceImpl::new(Arc::clone(&session));

        let output = match command {
            Command::Guilds => report::render_listing(&listing.list_workspaces()),

            Command::Categories { guild } => {
                let guild_id = self.guild(&guild.guild)?;
                report::render_listing(&listing.list_categories(guild_id)?)
            }

            Command::Channels { guild, category } => {
                let guild_id = self.guild(&guild.guild)?;
                let category_id = category.map(|c| self.category(guild_id, &c)).transpose()?;
                report::render_listing(&listing.list_channels(guild_id, category_id)?)
            }

            Command::Members { guild, category, channel } => {
                let guild_id = self.guild(&guild.guild)?;
                let category_id = category.map(|c| self.category(guild_id, &c)).transpose()?;
                let channel_id = channel
                    .map(|c| self.channel(guild_id, &c, category_id))
                    .transpose()?;
                report::render_listing(&listing.list_members(guild_id, category_id, channel_id)?)
            }

            Command::CreateCategory {
                guild,
                name,
                allow_duplicates,
            } => {
                let guild_id = self.guild(&guild.guild)?;
                let outcome = provisioning.create_category(guild_id, &name, allow_duplicates).await?;
                describe_outcome("Category", &name, outcome)
            }

            Command::CreateChannel {
                guild,
                name,
                category,
                allow_duplicates,
            } => {
                let guild_id = self.guild(&guild.guild)?;
                let outcome = provisioning
                    .create_channel(guild_id, &name, category.as_ref(), allow_duplicates)
                    .await?;
                describe_outcome("Channel", &name, outcome)
            }

            Command::DeleteCategory {
                guild,
                category,
                keep_channels,
            } => {
                let guild_id = self.guild(&guild.guild)?;
                let cascade = provisioning.delete_category(guild_id, &category, !keep_channels).await?;
                report::render_cascade(&category, &cascade)
            }

            Command::DeleteChannel { guild, channel } => {
                let guild_id = self.guild(&guild.guild)?;
                let channel_id = provisioning.delete_channel(guild_id, &channel).await?;
                format!("Channel {} (ID: {}) deleted.\n", channel, channel_id)
            }

            Command::Grant {
                guild,
                category,
                channel,
                member,
                role,
                participant,
            } => {
                let guild_id = self.guild(&guild.guild)?;
                let target_id = match (category, channel) {
                    (Some(category), _) => self.category(guild_id, &category)?,
                    (None, Some(channel)) => self.channel(guild_id, &channel, None)?,
                    (None, None) => anyhow::bail!("grant needs --category or --channel"),
                };
                let principal = match (member, role) {
                    (Some(member), _) => Principal::Member(self.member(guild_id, &member)?),
                    (None, Some(role)) => Principal::Role(self.role(guild_id, &role)?),
                    (None, None) => anyhow::bail!("grant needs --member or --role"),
                };
                let rule = if participant {
                    AccessRule::participant()
                } else {
                    AccessRule::read_only()
                };

                provisioning.grant_access(guild_id, target_id, principal, rule).await?;
                format!("Access granted to {} on {}.\n", principal, target_id)
            }

            Command::Roster {
                guild,
                category,
                admins_role,
                file,
                start,
                end,
            } => {
                let guild_id = self.guild(&guild.guild)?;
                let window = BatchWindow::new(
                    start.unwrap_or(settings.roster.start_row),
                    end.unwrap_or(settings.roster.end_row),
                )?;
                let roster = Roster::from_path(&file)?;
                let target = BatchTarget {
                    guild_id,
                    category,
                    admins_role,
                };

                let batch = BatchServiceImpl::new(Arc::clone(&session));
                report::render_batch(&batch.process_roster(&target, &roster, window).await?)
            }

            Command::Hydrate { config, with_rosters } => {
                let path = config.unwrap_or_else(|| PathBuf::from(&settings.workspace.config_file));
                let config = WorkspaceConfig::from_path(&path)?;
                let options = HydrationOptions {
                    roster_dir: with_rosters.then(|| PathBuf::from(&settings.roster.dir)),
                    window: BatchWindow::new(settings.roster.start_row, settings.roster.end_row)?,
                };

                let hydration = HydrationServiceImpl::new(Arc::clone(&session));
                report::render_hydration(&hydration.hydrate(&config, &options).await?)
            }
        };

        Ok(output)
    }

    fn resolver(&self) -> Resolver<'_, InMemorySession> {
        Resolver::new(self.state.session.as_ref())
    }

    fn guild(&self, token: &Token) -> Result<i64, AppError> {
        self.resolver()
            .guild(token)
            .filter(|id| self.state.session.guild(*id).is_some())
            .ok_or_else(|| AppError::not_found(ResourceKind::Workspace, token))
    }

    fn category(&self, guild_id: i64, token: &Token) -> Result<i64, AppError> {
        let snapshot = self.state.session.guild(guild_id);
        self.resolver()
            .category(guild_id, token)
            .filter(|id| snapshot.as_ref().and_then(|s| s.category(*id)).is_some())
            .ok_or_else(|| AppError::not_found(ResourceKind::Category, token))
    }

    fn channel(&self, guild_id: i64, token: &Token, category_id: Option<i64>) -> Result<i64, AppError> {
        let snapshot = self.state.session.guild(guild_id);
        self.resolver()
            .channel(guild_id, token, category_id)
            .filter(|id| snapshot.as_ref().and_then(|s| s.channel(*id)).is_some())
            .ok_or_else(|| AppError::not_found(ResourceKind::Channel, token))
    }

    fn role(&self, guild_id: i64, token: &Token) -> Result<i64, AppError> {
        let snapshot = self.state.session.guild(guild_id);
        self.resolver()
            .role(guild_id, token)
            .filter(|id| snapshot.as_ref().and_then(|s| s.role(*id)).is_some())
            .ok_or_else(|| AppError::not_found(ResourceKind::Role, token))
    }

    fn member(&self, guild_id: i64, token: &Token) -> Result<i64, AppError> {
        let snapshot = self.state.session.guild(guild_id);
        self.resolver()
            .member(guild_id, token, true)
            .filter(|id| snapshot.as_ref().and_then(|s| s.member(*id)).is_some())
            .ok_or_else(|| AppError::not_found(ResourceKind::Member, token))
    }
}

fn describe_outcome(kind: &str, name: &str, outcome: Provisioned) -> String {
    match outcome {
        Provisioned::Created(id) => format!("{} '{}' created (ID: {}).\n", kind, name, id),
        Provisioned::DuplicateSkipped(id) => {
            format!("{} '{}' already exists (ID: {}), skipped.\n", kind, name, id)
        }
    }
}
