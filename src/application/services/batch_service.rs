//! Batch Service
//!
//! Provisions one private channel per roster row: resolve the student,
//! create the channel under the target category, lock it down to the student
//! and the admins role, then post and pin a welcome message. A failing row is
//! logged and recorded; the batch carries on with the next one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use super::provisioning_service::{ProvisionError, Provisioned, ProvisioningService, ProvisioningServiceImpl};
use crate::domain::{
    OverwriteBuilder, Principal, Resolver, RosterRow, Token, WorkspaceSession,
};
use crate::infrastructure::roster::Roster;
use crate::shared::error::AppError;

/// Inclusive, 1-indexed range of roster rows to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchWindow {
    pub start: usize,
    pub end: usize,
}

impl BatchWindow {
    pub fn new(start: usize, end: usize) -> Result<Self, BatchError> {
        if start == 0 || end < start {
            return Err(BatchError::ConfigMalformed(format!(
                "invalid roster window {}..={}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, row: usize) -> bool {
        (self.start..=self.end).contains(&row)
    }

    /// Row numbers that exist in a roster of `len` rows.
    fn rows(&self, len: usize) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end.min(len)
    }
}

impl Default for BatchWindow {
    fn default() -> Self {
        Self { start: 1, end: 50 }
    }
}

/// What to provision a roster into.
#[derive(Debug, Clone)]
pub struct BatchTarget {
    pub guild_id: i64,
    pub category: Token,
    /// Configured name of the admins role
    pub admins_role: String,
}

/// One row that could not be provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    pub channel: String,
    pub error: String,
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// In-window rows read
    pub processed: usize,
    pub created: usize,
    /// Channel already existed and was reused
    pub existing: usize,
    /// Student could not be matched to a member
    pub unmatched: usize,
    /// Rows without a well-formed email
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Batch errors. Only conditions that stop the whole batch are errors;
/// per-row problems end up in [`BatchReport::failures`].
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Malformed configuration: {0}")]
    ConfigMalformed(String),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),
}

impl From<AppError> for BatchError {
    fn from(err: AppError) -> Self {
        Self::ConfigMalformed(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Debug, Clone, Copy)]
struct RowOutcome {
    created: bool,
    matched: bool,
}

/// Batch service trait
#[async_trait]
pub trait BatchService: Send + Sync {
    /// Provision the in-window rows of `roster` into `target`
    async fn process_roster(
        &self,
        target: &BatchTarget,
        roster: &Roster,
        window: BatchWindow,
    ) -> Result<BatchReport, BatchError>;
}

/// BatchService implementation
pub struct BatchServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    session: Arc<S>,
    provisioning: ProvisioningServiceImpl<S>,
}

impl<S> BatchServiceImpl<S>
where
    S: WorkspaceSession + ?Sized + 'static,
{
    pub fn new(session: Arc<S>) -> Self {
        Self {
            provisioning: ProvisioningServiceImpl::new(Arc::clone(&session)),
            session,
        }
    }

    fn resolver(&self) -> Resolver<'_, S> {
        Resolver::new(self.session.as_ref())
    }

    async fn process_row(
        &self,
        target: &BatchTarget,
        category_id: i64,
        admins_role_id: Option<i64>,
        row: &RosterRow,
        channel_name: &str,
    ) -> Result<RowOutcome, RowError> {
        let guild_id = target.guild_id;
        let login = row.login_or(channel_name);

        let member = Token::parse(login)
            .and_then(|token| self.resolver().member(guild_id, &token, true))
            .and_then(|id| self.session.guild(guild_id)?.member(id).cloned());
        if member.is_none() {
            tracing::warn!(login, "Member not found, channel will be admin-only");
        }

        let overwrites = OverwriteBuilder::new(guild_id)
            .deny_default()
            .allow_if(member.as_ref().map(|m| Principal::Member(m.user_id)))
            .allow_if(admins_role_id.map(Principal::Role))
            .build();

        let outcome = self
            .provisioning
            .create_channel(guild_id, channel_name, Some(&Token::Id(category_id)), false)
            .await?;

        let channel_id = self
            .resolver()
            .channel(guild_id, &Token::name(channel_name), Some(category_id))
            .ok_or_else(|| AppError::Internal(format!("channel '{}' missing after create", channel_name)))?;

        tracing::debug!(channel_id, rules = overwrites.len(), "Applying channel overwrites");
        self.provisioning.apply_overwrites(channel_id, &overwrites).await?;

        let admins_mention = match admins_role_id {
            Some(id) => format!("<@&{}>", id),
            None => format!("@{}", target.admins_role),
        };
        let message = welcome_message(row, member.as_ref().map(|m| m.mention()), &admins_mention);
        let message_id = self.session.send_message(channel_id, &message).await?;
        self.session.pin_message(channel_id, message_id).await?;

        Ok(RowOutcome {
            created: matches!(outcome, Provisioned::Created(_)),
            matched: member.is_some(),
        })
    }
}

#[async_trait]
impl<S> BatchService for BatchServiceImpl<S>
where
    S: WorkspaceSession + ?Sized + 'static,
{
    async fn process_roster(
        &self,
        target: &BatchTarget,
        roster: &Roster,
        window: BatchWindow,
    ) -> Result<BatchReport, BatchError> {
        let guild_id = target.guild_id;
        let snapshot = self
            .session
            .guild(guild_id)
            .ok_or(BatchError::WorkspaceNotFound(guild_id))?;

        let category_id = self
            .resolver()
            .category(guild_id, &target.category)
            .filter(|id| snapshot.category(*id).is_some())
            .ok_or_else(|| BatchError::CategoryNotFound(target.category.to_string()))?;

        let admins_role_id = self
            .resolver()
            .role(guild_id, &Token::name(target.admins_role.as_str()))
            .filter(|id| snapshot.role(*id).is_some());
        if admins_role_id.is_none() {
            tracing::warn!(role = %target.admins_role, "Admins role not found, channels will not include it");
        }

        tracing::info!(
            guild_id,
            category_id,
            start = window.start,
            end = window.end,
            rows = roster.len(),
            "Processing roster"
        );

        let mut report = BatchReport::default();
        for number in window.rows(roster.len()) {
            let Some(row) = roster.row(number) else { break };
            report.processed += 1;

            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::error!(row = number, error = %e, "Unreadable roster row");
                    report.failures.push(RowFailure {
                        row: number,
                        channel: String::new(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(channel_name) = row.email_local_part().map(str::to_string) else {
                tracing::warn!(row = number, email = %row.email, "Skipping row without a valid email");
                report.skipped += 1;
                continue;
            };

            let span = tracing::info_span!("roster_row", row = number, channel = %channel_name);
            match self
                .process_row(target, category_id, admins_role_id, &row, &channel_name)
                .instrument(span)
                .await
            {
                Ok(outcome) => {
                    if outcome.created {
                        report.created += 1;
                    } else {
                        report.existing += 1;
                    }
                    if !outcome.matched {
                        report.unmatched += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(row = number, channel = %channel_name, error = %e, "Failed to create channel");
                    report.failures.push(RowFailure {
                        row: number,
                        channel: channel_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            created = report.created,
            existing = report.existing,
            unmatched = report.unmatched,
            skipped = report.skipped,
            failed = report.failed(),
            "Roster processed"
        );
        Ok(report)
    }
}

/// Welcome message pinned in each student channel.
///
/// `member_mention` is `None` when the student's login could not be matched;
/// the message then asks for a manual fix.
pub fn welcome_message(row: &RosterRow, member_mention: Option<String>, admins_mention: &str) -> String {
    let greeting = match member_mention {
        Some(mention) => format!(
            "{}, this channel is for conversation between you and {}.",
            mention, admins_mention
        ),
        None => format!(
            "This channel is for conversation between {} {} and {}. However, the Discord username {} entered into the intake questionnaire could not be matched to a member of this server... we need to manually correct it.",
            row.first_name, row.last_name, admins_mention, row.first_name
        ),
    };

    format!(
        "{}\nStudent details:\n- **First:** {}\n- **Last Name:** {}\n- **Email:** {}\n- **Discord:** {}\n- **GitHub:** {}\n",
        greeting,
        row.first_name,
        row.last_name,
        row.email,
        row.discord.as_deref().unwrap_or_default(),
        row.github.as_deref().unwrap_or_default(),
    )
}
