//! Provisioning Tests

use std::sync::Arc;

use async_trait::async_trait;
use mockall::predicate::eq;
use mockall::{mock, Sequence};

use guild_admin::application::services::{
    ProvisionError, Provisioned, ProvisioningService, ProvisioningServiceImpl,
};
use guild_admin::domain::{
    AccessRule, Channel, GuildSnapshot, PermissionOverwrite, Principal, Server, Token,
    WorkspaceSession,
};
use guild_admin::infrastructure::Operation;
use guild_admin::shared::error::{AppError, ResourceKind};

use crate::common::*;

mock! {
    pub Session {}

    #[async_trait]
    impl WorkspaceSession for Session {
        fn guilds(&self) -> Vec<Server>;
        fn guild(&self, guild_id: i64) -> Option<GuildSnapshot>;
        async fn create_category(&self, guild_id: i64, name: &str) -> Result<Channel, AppError>;
        async fn create_text_channel(
            &self,
            guild_id: i64,
            name: &str,
            parent_id: Option<i64>,
        ) -> Result<Channel, AppError>;
        async fn delete_channel(&self, channel_id: i64) -> Result<(), AppError>;
        async fn edit_overwrites(
            &self,
            channel_id: i64,
            overwrites: Vec<PermissionOverwrite>,
        ) -> Result<(), AppError>;
        async fn send_message(&self, channel_id: i64, content: &str) -> Result<i64, AppError>;
        async fn pin_message(&self, channel_id: i64, message_id: i64) -> Result<(), AppError>;
    }
}

fn mock_session() -> MockSession {
    let mut session = MockSession::new();
    session.expect_guilds().returning(|| vec![knowledge_kitchen().server]);
    session
        .expect_guild()
        .returning(|id| (id == GUILD).then(knowledge_kitchen));
    session
}

// ============================================================================
// Cascade delete
// ============================================================================

/// Children are deleted in order before the category, and a failed child
/// does not stop the cascade
#[tokio::test]
async fn test_cascade_deletes_children_then_category() {
    // Arrange
    let mut session = mock_session();
    let mut seq = Sequence::new();
    session
        .expect_delete_channel()
        .with(eq(11))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    session
        .expect_delete_channel()
        .with(eq(12))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(AppError::remote("403 Forbidden")));
    session
        .expect_delete_channel()
        .with(eq(PYTHON))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    // Act
    let report = service
        .delete_category(GUILD, &Token::name("python"), true)
        .await
        .unwrap();

    // Assert
    assert_eq!(report.category_id, PYTHON);
    assert_eq!(report.deleted_channels, vec![11]);
    assert_eq!(report.failed_channels.len(), 1);
    assert_eq!(report.failed_channels[0].0, 12);
    assert!(!report.is_clean());
}

/// Without cascading only the category itself is deleted
#[tokio::test]
async fn test_delete_category_without_cascade() {
    let mut session = mock_session();
    session
        .expect_delete_channel()
        .with(eq(PYTHON))
        .times(1)
        .returning(|_| Ok(()));
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let report = service
        .delete_category(GUILD, &Token::Id(PYTHON), false)
        .await
        .unwrap();

    assert!(report.deleted_channels.is_empty());
    assert!(report.is_clean());
}

/// A failed category delete is an error even after the children went
#[tokio::test]
async fn test_category_delete_failure_is_error() {
    let mut session = mock_session();
    session
        .expect_delete_channel()
        .with(eq(21))
        .times(1)
        .returning(|_| Ok(()));
    session
        .expect_delete_channel()
        .with(eq(WEB))
        .times(1)
        .returning(|_| Err(AppError::remote("503 Service Unavailable")));
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let result = service.delete_category(GUILD, &Token::name("Web Design"), true).await;

    assert!(matches!(result, Err(ProvisionError::Remote(_))));
}

/// Unknown categories issue no deletes at all
#[tokio::test]
async fn test_delete_unknown_category_touches_nothing() {
    let mut session = mock_session();
    session.expect_delete_channel().never();
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let result = service.delete_category(GUILD, &Token::name("Rust"), true).await;

    assert!(matches!(result, Err(ProvisionError::NotFound { .. })));
}

// ============================================================================
// Duplicate-safe creation
// ============================================================================

/// Existing names are reported, not recreated
#[tokio::test]
async fn test_existing_category_is_not_recreated() {
    let mut session = mock_session();
    session.expect_create_category().never();
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let outcome = service.create_category(GUILD, " PYTHON ", false).await.unwrap();

    assert_eq!(outcome, Provisioned::DuplicateSkipped(PYTHON));
}

/// Channel creation into a missing parent never reaches the remote side
#[tokio::test]
async fn test_channel_with_missing_parent_is_rejected() {
    let mut session = mock_session();
    session.expect_create_text_channel().never();
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let result = service
        .create_channel(GUILD, "week-3", Some(&Token::name("Rust")), false)
        .await;

    assert!(matches!(result, Err(ProvisionError::ParentNotFound(_))));
}

/// The parent can vanish between the snapshot read and the create
#[tokio::test]
async fn test_parent_rejected_by_session() {
    let mut session = mock_session();
    session
        .expect_create_text_channel()
        .withf(|guild_id, name, parent_id| {
            *guild_id == GUILD && name == "week-3" && *parent_id == Some(PYTHON)
        })
        .times(1)
        .returning(|_, _, parent| {
            Err(AppError::parent_not_found(ResourceKind::Category, parent.unwrap_or_default()))
        });
    let service = ProvisioningServiceImpl::new(Arc::new(session));

    let result = service
        .create_channel(GUILD, "week-3", Some(&Token::Id(PYTHON)), false)
        .await;

    assert!(matches!(result, Err(ProvisionError::ParentNotFound(token)) if token == PYTHON.to_string()));
}

#[tokio::test]
async fn test_create_in_unknown_workspace() {
    let service = ProvisioningServiceImpl::new(Arc::new(mock_session()));

    let result = service.create_category(999, "Rust", false).await;

    assert!(matches!(result, Err(ProvisionError::WorkspaceNotFound(999))));
}

// ============================================================================
// Against the in-memory session
// ============================================================================

/// Creating the same channel twice yields one remote create
#[tokio::test]
async fn test_repeated_create_is_idempotent() {
    let session = session();
    let service = ProvisioningServiceImpl::new(Arc::clone(&session));

    let first = service
        .create_channel(GUILD, "week-3", Some(&Token::name("Python")), false)
        .await
        .unwrap();
    let second = service
        .create_channel(GUILD, "week-3", Some(&Token::name("Python")), false)
        .await
        .unwrap();

    assert!(first.is_created());
    assert_eq!(second, Provisioned::DuplicateSkipped(first.id()));
    let creates = session
        .operations()
        .into_iter()
        .filter(|op| matches!(op, Operation::CreateChannel { .. }))
        .count();
    assert_eq!(creates, 1);
}

/// Duplicates are allowed on request
#[tokio::test]
async fn test_allow_duplicates_creates_second_category() {
    let session = session();
    let service = ProvisioningServiceImpl::new(Arc::clone(&session));

    let outcome = service.create_category(GUILD, "Python", true).await.unwrap();

    assert!(outcome.is_created());
    assert_ne!(outcome.id(), PYTHON);
    let snapshot = session.guild(GUILD).unwrap();
    assert_eq!(snapshot.categories().filter(|c| c.name == "Python").count(), 2);
}

/// Granting merges into existing overwrites instead of replacing them
#[tokio::test]
async fn test_grant_access_merges_principals() {
    let session = session();
    let service = ProvisioningServiceImpl::new(Arc::clone(&session));

    service
        .grant_access(GUILD, PYTHON, Principal::Role(STUDENTS), AccessRule::read_only())
        .await
        .unwrap();
    service
        .grant_access(GUILD, PYTHON, Principal::Member(500), AccessRule::participant())
        .await
        .unwrap();

    let snapshot = session.guild(GUILD).unwrap();
    let python = snapshot.category(PYTHON).unwrap();
    assert_eq!(python.overwrites.len(), 2);
    assert!(python
        .overwrites
        .contains(&AccessRule::read_only().to_overwrite(Principal::Role(STUDENTS))));
    assert!(python
        .overwrites
        .contains(&AccessRule::participant().to_overwrite(Principal::Member(500))));
}

/// Channels pick up their category's overwrites verbatim
#[tokio::test]
async fn test_copy_category_overwrites() {
    let session = session();
    let service = ProvisioningServiceImpl::new(Arc::clone(&session));
    service
        .grant_access(GUILD, WEB, Principal::Role(ADMINS), AccessRule::participant())
        .await
        .unwrap();

    service.copy_category_overwrites(GUILD, WEB, 21).await.unwrap();

    let snapshot = session.guild(GUILD).unwrap();
    assert_eq!(
        snapshot.channel(21).unwrap().overwrites,
        snapshot.category(WEB).unwrap().overwrites
    );
}

/// A remote failure surfaces as an error and leaves the tree unchanged
#[tokio::test]
async fn test_remote_failure_on_delete_channel() {
    let session = session();
    session.fail_on("lobby");
    let service = ProvisioningServiceImpl::new(Arc::clone(&session));

    let result = service.delete_channel(GUILD, &Token::name("lobby")).await;

    assert!(matches!(result, Err(ProvisionError::Remote(_))));
    assert!(session.guild(GUILD).unwrap().channel(LOBBY).is_some());
}
