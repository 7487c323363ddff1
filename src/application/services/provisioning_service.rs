//! Provisioning Service
//!
//! Creates and deletes categories and channels without producing accidental
//! duplicates, and edits their permission overwrites.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    AccessRule, GuildSnapshot, OverwriteSet, Principal, Resolver, Token, WorkspaceSession,
};
use crate::shared::error::{AppError, ResourceKind};

/// Provisioning service trait
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Create a category unless one with that name already exists
    async fn create_category(
        &self,
        guild_id: i64,
        name: &str,
        allow_duplicates: bool,
    ) -> Result<Provisioned, ProvisionError>;

    /// Create a text channel, optionally inside a category
    async fn create_channel(
        &self,
        guild_id: i64,
        name: &str,
        category: Option<&Token>,
        allow_duplicates: bool,
    ) -> Result<Provisioned, ProvisionError>;

    /// Delete a category, its child channels first when cascading
    async fn delete_category(
        &self,
        guild_id: i64,
        category: &Token,
        cascade_channels: bool,
    ) -> Result<CascadeReport, ProvisionError>;

    /// Delete a channel anywhere in the workspace
    async fn delete_channel(&self, guild_id: i64, channel: &Token) -> Result<i64, ProvisionError>;

    /// Merge one principal's rule into a category's or channel's overwrites
    async fn grant_access(
        &self,
        guild_id: i64,
        target_id: i64,
        principal: Principal,
        rule: AccessRule,
    ) -> Result<(), ProvisionError>;

    /// Replace a category's or channel's overwrites
    async fn apply_overwrites(&self, target_id: i64, overwrites: &OverwriteSet) -> Result<(), ProvisionError>;

    /// Copy a category's current overwrites onto a channel
    async fn copy_category_overwrites(
        &self,
        guild_id: i64,
        category_id: i64,
        channel_id: i64,
    ) -> Result<(), ProvisionError>;
}

/// Outcome of a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created(i64),
    /// A resource with the same name already existed; nothing was created
    DuplicateSkipped(i64),
}

impl Provisioned {
    pub fn id(&self) -> i64 {
        match self {
            Self::Created(id) | Self::DuplicateSkipped(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// What a category delete did to the category's children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub category_id: i64,
    pub deleted_channels: Vec<i64>,
    /// Child channels whose delete failed, with the remote error
    pub failed_channels: Vec<(i64, String)>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        self.failed_channels.is_empty()
    }
}

/// Provisioning errors
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(i64),

    #[error("{kind} not found: {token}")]
    NotFound { kind: ResourceKind, token: String },

    #[error("Parent category not found: {0}")]
    ParentNotFound(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ProvisionError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound { kind, token } => Self::NotFound { kind, token },
            AppError::ParentNotFound { token, .. } => Self::ParentNotFound(token),
            AppError::RemoteOperationFailed(msg) => Self::Remote(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// ProvisioningService implementation
pub struct ProvisioningServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    session: Arc<S>,
}

impl<S> ProvisioningServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    fn snapshot(&self, guild_id: i64) -> Result<GuildSnapshot, ProvisionError> {
        self.session.guild(guild_id).ok_or_else(|| {
            tracing::warn!(guild_id, "Workspace not found");
            ProvisionError::WorkspaceNotFound(guild_id)
        })
    }

    fn resolver(&self) -> Resolver<'_, S> {
        Resolver::new(self.session.as_ref())
    }

    /// Resolve a category token to a category that actually exists.
    fn existing_category(&self, snapshot: &GuildSnapshot, token: &Token) -> Option<i64> {
        self.resolver()
            .category(snapshot.id(), token)
            .filter(|id| snapshot.category(*id).is_some())
    }
}

#[async_trait]
impl<S> ProvisioningService for ProvisioningServiceImpl<S>
where
    S: WorkspaceSession + ?Sized + 'static,
{
    async fn create_category(
        &self,
        guild_id: i64,
        name: &str,
        allow_duplicates: bool,
    ) -> Result<Provisioned, ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;

        if !allow_duplicates {
            if let Some(existing) = self.existing_category(&snapshot, &Token::name(name)) {
                tracing::info!(guild_id, category = name, existing, "Category already exists, skipping");
                return Ok(Provisioned::DuplicateSkipped(existing));
            }
        }

        let category = self.session.create_category(guild_id, name).await.map_err(|e| {
            tracing::error!(guild_id, category = name, error = %e, "Failed to create category");
            ProvisionError::from(e)
        })?;

        tracing::info!(guild_id, category = name, id = category.id, "Category created");
        Ok(Provisioned::Created(category.id))
    }

    async fn create_channel(
        &self,
        guild_id: i64,
        name: &str,
        category: Option<&Token>,
        allow_duplicates: bool,
    ) -> Result<Provisioned, ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;

        let category_id = match category {
            Some(token) => Some(self.existing_category(&snapshot, token).ok_or_else(|| {
                tracing::warn!(guild_id, channel = name, category = %token, "Parent category not found");
                ProvisionError::ParentNotFound(token.to_string())
            })?),
            None => None,
        };

        if !allow_duplicates {
            if let Some(existing) = self.resolver().channel(guild_id, &Token::name(name), category_id) {
                tracing::info!(guild_id, channel = name, existing, "Channel already exists, skipping");
                return Ok(Provisioned::DuplicateSkipped(existing));
            }
        }

        let channel = self
            .session
            .create_text_channel(guild_id, name, category_id)
            .await
            .map_err(|e| {
                tracing::error!(guild_id, channel = name, ?category_id, error = %e, "Failed to create channel");
                ProvisionError::from(e)
            })?;

        tracing::info!(guild_id, channel = name, id = channel.id, ?category_id, "Channel created");
        Ok(Provisioned::Created(channel.id))
    }

    async fn delete_category(
        &self,
        guild_id: i64,
        category: &Token,
        cascade_channels: bool,
    ) -> Result<CascadeReport, ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;
        let category_id = self.existing_category(&snapshot, category).ok_or_else(|| {
            tracing::warn!(guild_id, category = %category, "Category not found");
            ProvisionError::NotFound {
                kind: ResourceKind::Category,
                token: category.to_string(),
            }
        })?;

        let mut report = CascadeReport {
            category_id,
            ..Default::default()
        };

        if cascade_channels {
            let children: Vec<(i64, String)> = snapshot
                .channels_in(category_id)
                .map(|c| (c.id, c.name.clone()))
                .collect();

            for (channel_id, channel_name) in children {
                match self.session.delete_channel(channel_id).await {
                    Ok(()) => {
                        tracing::info!(guild_id, channel = %channel_name, channel_id, "Channel deleted");
                        report.deleted_channels.push(channel_id);
                    }
                    Err(e) => {
                        tracing::error!(guild_id, channel = %channel_name, channel_id, error = %e, "Failed to delete channel");
                        report.failed_channels.push((channel_id, e.to_string()));
                    }
                }
            }
        }

        self.session.delete_channel(category_id).await.map_err(|e| {
            tracing::error!(guild_id, category = %category, error = %e, "Failed to delete category");
            ProvisionError::from(e)
        })?;

        tracing::info!(
            guild_id,
            category = %category,
            deleted = report.deleted_channels.len(),
            failed = report.failed_channels.len(),
            "Category deleted"
        );
        Ok(report)
    }

    async fn delete_channel(&self, guild_id: i64, channel: &Token) -> Result<i64, ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;
        let channel_id = self
            .resolver()
            .channel(guild_id, channel, None)
            .filter(|id| snapshot.channel(*id).map_or(false, |c| !c.is_category()))
            .ok_or_else(|| {
                tracing::warn!(guild_id, channel = %channel, "Channel not found");
                ProvisionError::NotFound {
                    kind: ResourceKind::Channel,
                    token: channel.to_string(),
                }
            })?;

        self.session.delete_channel(channel_id).await.map_err(|e| {
            tracing::error!(guild_id, channel = %channel, error = %e, "Failed to delete channel");
            ProvisionError::from(e)
        })?;

        tracing::info!(guild_id, channel = %channel, channel_id, "Channel deleted");
        Ok(channel_id)
    }

    async fn grant_access(
        &self,
        guild_id: i64,
        target_id: i64,
        principal: Principal,
        rule: AccessRule,
    ) -> Result<(), ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;
        let target = snapshot.channel(target_id).ok_or_else(|| ProvisionError::NotFound {
            kind: ResourceKind::Channel,
            token: target_id.to_string(),
        })?;

        // Only this principal's record changes; the others keep every bit.
        let mut overwrites = target.overwrites.clone();
        let record = rule.to_overwrite(principal);
        match overwrites
            .iter_mut()
            .find(|o| o.target_id == principal.id() && o.target_type == principal.overwrite_type())
        {
            Some(existing) => *existing = record,
            None => overwrites.push(record),
        }

        self.session.edit_overwrites(target_id, overwrites).await.map_err(|e| {
            tracing::error!(guild_id, target = %target.name, %principal, error = %e, "Failed to grant access");
            ProvisionError::from(e)
        })?;
        tracing::info!(guild_id, target = %target.name, %principal, "Access granted");
        Ok(())
    }

    async fn apply_overwrites(&self, target_id: i64, overwrites: &OverwriteSet) -> Result<(), ProvisionError> {
        self.session
            .edit_overwrites(target_id, overwrites.to_overwrites())
            .await
            .map_err(|e| {
                tracing::error!(target_id, error = %e, "Failed to edit permission overwrites");
                ProvisionError::from(e)
            })
    }

    async fn copy_category_overwrites(
        &self,
        guild_id: i64,
        category_id: i64,
        channel_id: i64,
    ) -> Result<(), ProvisionError> {
        let snapshot = self.snapshot(guild_id)?;
        let category = snapshot
            .category(category_id)
            .ok_or_else(|| ProvisionError::NotFound {
                kind: ResourceKind::Category,
                token: category_id.to_string(),
            })?;

        // Raw records, so bits outside the access switches survive the copy.
        self.session
            .edit_overwrites(channel_id, category.overwrites.clone())
            .await
            .map_err(|e| {
                tracing::error!(guild_id, category_id, channel_id, error = %e, "Failed to copy category overwrites");
                ProvisionError::from(e)
            })
    }
}
