//! Hydration Service
//!
//! Builds out every course in a workspace configuration: one private
//! category per configured name, opened to the course's admins and students
//! roles, each seeded with a `temp` channel so it is visible even when
//! empty. Optionally provisions the course roster into its first category.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use super::batch_service::{BatchReport, BatchService, BatchServiceImpl, BatchTarget, BatchWindow};
use super::provisioning_service::{ProvisionError, ProvisioningService, ProvisioningServiceImpl};
use crate::config::{CourseConfig, WorkspaceConfig};
use crate::domain::{OverwriteBuilder, Principal, Resolver, Token, WorkspaceSession};
use crate::infrastructure::roster::Roster;

/// Name of the placeholder channel created in each category.
pub const PLACEHOLDER_CHANNEL: &str = "temp";

/// Hydration options
#[derive(Debug, Clone, Default)]
pub struct HydrationOptions {
    /// Directory of course rosters; `None` skips roster provisioning
    pub roster_dir: Option<PathBuf>,
    pub window: BatchWindow,
}

/// Tally of a hydration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub categories_created: usize,
    pub categories_existing: usize,
    /// Categories or rosters that failed, with the error
    pub failures: Vec<(String, String)>,
    /// Roster results by course title
    pub rosters: Vec<(String, BatchReport)>,
}

/// Hydration errors
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
}

/// Hydration service trait
#[async_trait]
pub trait HydrationService: Send + Sync {
    /// Provision every course category and, optionally, course rosters
    async fn hydrate(
        &self,
        config: &WorkspaceConfig,
        options: &HydrationOptions,
    ) -> Result<HydrationReport, HydrationError>;
}

/// HydrationService implementation
pub struct HydrationServiceImpl<S>
where
    S: WorkspaceSession + ?Sized,
{
    session: Arc<S>,
    provisioning: ProvisioningServiceImpl<S>,
    batch: BatchServiceImpl<S>,
}

impl<S> HydrationServiceImpl<S>
where
    S: WorkspaceSession + ?Sized + 'static,
{
    pub fn new(session: Arc<S>) -> Self {
        Self {
            provisioning: ProvisioningServiceImpl::new(Arc::clone(&session)),
            batch: BatchServiceImpl::new(Arc::clone(&session)),
            session,
        }
    }

    /// Create one category, lock it to the course roles and seed it.
    /// Returns whether the category was newly created.
    async fn hydrate_category(
        &self,
        guild_id: i64,
        course: &CourseConfig,
        category_name: &str,
    ) -> Result<bool, ProvisionError> {
        let outcome = self.provisioning.create_category(guild_id, category_name, false).await?;
        let category_id = outcome.id();

        let resolver = Resolver::new(self.session.as_ref());
        let admins = resolver.role(guild_id, &Token::name(course.roles.admins.as_str()));
        let students = resolver.role(guild_id, &Token::name(course.roles.students.as_str()));
        if admins.is_none() || students.is_none() {
            tracing::warn!(
                category = category_name,
                admins = %course.roles.admins,
                students = %course.roles.students,
                "Course role not found, category overwrites will omit it"
            );
        }

        let overwrites = OverwriteBuilder::new(guild_id)
            .deny_default()
            .allow_if(admins.map(Principal::Role))
            .allow_if(students.map(Principal::Role))
            .build();
        self.provisioning.apply_overwrites(category_id, &overwrites).await?;

        let placeholder = self
            .provisioning
            .create_channel(guild_id, PLACEHOLDER_CHANNEL, Some(&Token::Id(category_id)), false)
            .await?;
        self.provisioning
            .copy_category_overwrites(guild_id, category_id, placeholder.id())
            .await?;

        if placeholder.is_created() {
            self.session
                .send_message(placeholder.id(), &format!("Category '{}' auto-created.", category_name))
                .await?;
        }

        Ok(outcome.is_created())
    }

    async fn hydrate_roster(
        &self,
        guild_id: i64,
        course: &CourseConfig,
        roster_dir: &std::path::Path,
        window: BatchWindow,
        report: &mut HydrationReport,
    ) {
        let Some(first_category) = course.categories.first() else {
            tracing::warn!(course = %course.title, "Course has no categories, skipping roster");
            return;
        };

        let path = roster_dir.join(course.roster_file());
        let roster = match Roster::from_path(&path) {
            Ok(roster) => roster,
            Err(e) => {
                tracing::error!(course = %course.title, path = %path.display(), error = %e, "Failed to load roster");
                report.failures.push((course.title.clone(), e.to_string()));
                return;
            }
        };

        let target = BatchTarget {
            guild_id,
            category: Token::name(first_category.as_str()),
            admins_role: course.roles.admins.clone(),
        };
        match self.batch.process_roster(&target, &roster, window).await {
            Ok(batch) => report.rosters.push((course.title.clone(), batch)),
            Err(e) => {
                tracing::error!(course = %course.title, error = %e, "Roster batch failed");
                report.failures.push((course.title.clone(), e.to_string()));
            }
        }
    }
}

#[async_trait]
impl<S> HydrationService for HydrationServiceImpl<S>
where
    S: WorkspaceSession + ?Sized + 'static,
{
    async fn hydrate(
        &self,
        config: &WorkspaceConfig,
        options: &HydrationOptions,
    ) -> Result<HydrationReport, HydrationError> {
        let server_name = &config.server.name;
        let guild_id = Resolver::new(self.session.as_ref())
            .guild(&Token::name(server_name.as_str()))
            .filter(|id| self.session.guild(*id).is_some())
            .ok_or_else(|| HydrationError::WorkspaceNotFound(server_name.clone()))?;

        let mut report = HydrationReport::default();
        for course in &config.server.courses {
            tracing::info!(course = %course.title, categories = course.categories.len(), "Hydrating course");

            for category_name in &course.categories {
                match self.hydrate_category(guild_id, course, category_name).await {
                    Ok(true) => report.categories_created += 1,
                    Ok(false) => report.categories_existing += 1,
                    Err(e) => {
                        tracing::error!(category = %category_name, error = %e, "Failed to hydrate category");
                        report.failures.push((category_name.clone(), e.to_string()));
                    }
                }
            }

            if let Some(roster_dir) = &options.roster_dir {
                self.hydrate_roster(guild_id, course, roster_dir, options.window, &mut report)
                    .await;
            }
        }

        tracing::info!(
            created = report.categories_created,
            existing = report.categories_existing,
            failed = report.failures.len(),
            "Hydration finished"
        );
        Ok(report)
    }
}
