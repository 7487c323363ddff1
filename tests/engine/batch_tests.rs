//! Roster Batch Tests

use std::sync::Arc;

use guild_admin::application::services::{
    BatchService, BatchServiceImpl, BatchTarget, BatchWindow,
};
use guild_admin::domain::{Token, WorkspaceSession};
use guild_admin::infrastructure::{InMemorySession, Operation, Roster};

use crate::common::*;

fn target(admins_role: &str) -> BatchTarget {
    BatchTarget {
        guild_id: GUILD,
        category: Token::name("Python"),
        admins_role: admins_role.to_string(),
    }
}

fn roster(csv: &str) -> Roster {
    Roster::from_reader(csv.as_bytes()).unwrap()
}

fn created_channels(session: &InMemorySession) -> Vec<String> {
    session
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            Operation::CreateChannel { name, .. } => Some(name),
            _ => None,
        })
        .collect()
}

/// The default window stops at row 50
#[tokio::test]
async fn test_default_window_stops_at_fifty() {
    // Arrange
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster(&roster_csv(51));

    // Act
    let report = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    // Assert
    assert_eq!(report.processed, 50);
    assert_eq!(report.created, 50);
    assert_eq!(report.unmatched, 50);
    let created = created_channels(&session);
    assert_eq!(created.len(), 50);
    assert_eq!(created.first().map(String::as_str), Some("s001"));
    assert!(!created.iter().any(|name| name == "s051"));
}

#[tokio::test]
async fn test_window_selects_rows() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster(&roster_csv(10));

    let report = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::new(4, 6).unwrap())
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(created_channels(&session), vec!["s004", "s005", "s006"]);
}

/// Matched students get a mention, unmatched ones a request for a manual fix
#[tokio::test]
async fn test_welcome_messages_are_posted_and_pinned() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster(
        "Email,Discord,First,Last,GitHub\n\
         al1@nyu.edu,Alice#1234,Alice,Liddell,aliddell\n\
         zz9@nyu.edu,ghost,Zed,Zero,\n",
    );

    let report = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.unmatched, 1);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.pinned));
    assert!(messages[0]
        .content
        .starts_with("<@500>, this channel is for conversation between you and <@&40>."));
    assert!(messages[0].content.contains("- **GitHub:** aliddell"));
    assert!(messages[1].content.contains("could not be matched to a member of this server"));
    assert!(messages[1].content.contains("we need to manually correct it"));
}

/// Channels are private to the student and the admins role
#[tokio::test]
async fn test_channel_overwrites_lock_out_everyone_else() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster("Email,Discord,First,Last\nbb2@nyu.edu,bob,Bob,Builder\n");

    service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    let snapshot = session.guild(GUILD).unwrap();
    let channel = snapshot
        .channels_in(PYTHON)
        .find(|c| c.name == "bb2")
        .unwrap();
    let mut targets: Vec<i64> = channel.overwrites.iter().map(|o| o.target_id).collect();
    targets.sort();
    assert_eq!(targets, vec![GUILD, ADMINS, 501]);
}

/// A failing row is recorded and the batch moves on
#[tokio::test]
async fn test_failed_row_does_not_stop_batch() {
    let session = session();
    session.fail_on("s002");
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster(&roster_csv(3));

    let report = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].row, 2);
    assert_eq!(report.failures[0].channel, "s002");
}

/// Rows without a usable email are skipped, not failed
#[tokio::test]
async fn test_row_without_email_is_skipped() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster("Email,First,Last\nnot-an-email,Nia,Null\ncc3@nyu.edu,Cy,Cole\n");

    let report = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 1);
    assert_eq!(created_channels(&session), vec!["cc3"]);
}

/// An unknown admins role is mentioned by name and left out of the overwrites
#[tokio::test]
async fn test_unknown_admins_role() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster("Email,First,Last\ndd4@nyu.edu,Di,Dale\n");

    service
        .process_roster(&target("ta-team"), &roster, BatchWindow::default())
        .await
        .unwrap();

    let messages = session.messages();
    assert!(messages[0].content.contains("@ta-team"));
    let snapshot = session.guild(GUILD).unwrap();
    let channel = snapshot.channels_in(PYTHON).find(|c| c.name == "dd4").unwrap();
    assert_eq!(channel.overwrites.len(), 1);
}

/// Rerunning a roster reuses existing channels
#[tokio::test]
async fn test_rerun_reports_existing_channels() {
    let session = session();
    let service = BatchServiceImpl::new(Arc::clone(&session));
    let roster = roster(&roster_csv(2));

    service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();
    let second = service
        .process_roster(&target("admins-py-su25"), &roster, BatchWindow::default())
        .await
        .unwrap();

    assert_eq!(second.created, 0);
    assert_eq!(second.existing, 2);
    assert_eq!(created_channels(&session).len(), 2);
}
