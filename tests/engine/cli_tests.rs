//! Command Tests
//!
//! Parse a command line, run it against a snapshot file and check what was
//! written back.

use clap::Parser;
use tempfile::TempDir;

use guild_admin::config::Settings;
use guild_admin::domain::WorkspaceSession;
use guild_admin::infrastructure::{InMemorySession, SnapshotFile};
use guild_admin::presentation::cli::Cli;
use guild_admin::startup::Application;

use crate::common::*;

fn snapshot_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let file = SnapshotFile {
        guilds: vec![knowledge_kitchen()],
        messages: Vec::new(),
    };
    write_file(dir.path(), "workspace.json", &serde_json::to_string(&file).unwrap());
    dir
}

async fn run(settings: Settings, dir: &TempDir, args: &[&str]) -> anyhow::Result<String> {
    let snapshot = dir.path().join("workspace.json");
    let snapshot = snapshot.to_str().unwrap();
    let argv = ["guild-admin", "--snapshot", snapshot].into_iter().chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).unwrap();

    let mutating = cli.command.is_mutating();
    let app = Application::build(settings, cli.snapshot)?;
    let result = app.run(cli.command).await;
    if mutating {
        app.save()?;
    }
    result
}

fn reload(dir: &TempDir) -> InMemorySession {
    InMemorySession::load(&dir.path().join("workspace.json")).unwrap()
}

/// Mutations survive a save and reload
#[tokio::test]
async fn test_create_category_persists() {
    let dir = snapshot_dir();

    let output = run(
        test_settings(),
        &dir,
        &["create-category", "--guild", "Knowledge Kitchen", "Rust"],
    )
    .await
    .unwrap();

    assert!(output.starts_with("Category 'Rust' created"));
    let snapshot = reload(&dir).guild(GUILD).unwrap();
    assert!(snapshot.categories().any(|c| c.name == "Rust"));
}

#[tokio::test]
async fn test_duplicate_create_is_reported() {
    let dir = snapshot_dir();

    let output = run(
        test_settings(),
        &dir,
        &["create-channel", "--guild", "1", "--category", "Python", "week-1"],
    )
    .await
    .unwrap();

    assert_eq!(output, "Channel 'week-1' already exists (ID: 11), skipped.\n");
}

#[tokio::test]
async fn test_delete_category_cascades() {
    let dir = snapshot_dir();

    let output = run(
        test_settings(),
        &dir,
        &["delete-category", "--guild", "1", "--category", "Python"],
    )
    .await
    .unwrap();

    assert_eq!(output, "Category 'Python' (ID: 10) deleted; 2 channel(s) deleted\n");
    let snapshot = reload(&dir).guild(GUILD).unwrap();
    assert!(snapshot.channel(PYTHON).is_none());
    assert!(snapshot.channel(11).is_none());
    assert!(snapshot.channel(12).is_none());
}

#[tokio::test]
async fn test_grant_participant_access() {
    let dir = snapshot_dir();

    run(
        test_settings(),
        &dir,
        &["grant", "--guild", "1", "--channel", "lobby", "--member", "bob", "--participant"],
    )
    .await
    .unwrap();

    let snapshot = reload(&dir).guild(GUILD).unwrap();
    let lobby = snapshot.channel(LOBBY).unwrap();
    assert_eq!(lobby.overwrites.len(), 1);
    assert_eq!(lobby.overwrites[0].target_id, 501);
}

/// Read-only commands leave the snapshot file untouched
#[tokio::test]
async fn test_listing_does_not_rewrite_snapshot() {
    let dir = snapshot_dir();
    let path = dir.path().join("workspace.json");
    let before = std::fs::read_to_string(&path).unwrap();

    run(test_settings(), &dir, &["guilds"]).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_roster_command_reads_csv() {
    let dir = snapshot_dir();
    let csv = write_file(dir.path(), "py-result.csv", &roster_csv(5));

    let output = run(
        test_settings(),
        &dir,
        &[
            "roster",
            "--guild",
            "1",
            "--category",
            "Python",
            "--admins-role",
            "admins-py-su25",
            "--file",
            csv.to_str().unwrap(),
            "--end",
            "3",
        ],
    )
    .await
    .unwrap();

    assert!(output.starts_with("Rows processed: 3 (created 3, existing 0, unmatched 3, skipped 0, failed 0)"));
    let session = reload(&dir);
    assert_eq!(session.messages().len(), 3);
}

/// Hydration creates each course category with a seeded placeholder channel
#[tokio::test]
async fn test_hydrate_with_rosters() {
    let dir = snapshot_dir();
    let config = write_file(
        dir.path(),
        "bot_config.yml",
        r#"
server:
  name: Knowledge Kitchen
  courses:
    - title: Intro to Python
      file_prefix: py
      roles:
        students: students-py-su25
        admins: admins-py-su25
      categories:
        - PYTHON - STUDENTS 01
"#,
    );
    write_file(dir.path(), "py-result.csv", &roster_csv(2));
    let settings = Settings::from_toml(&format!(
        "[bot]\ntoken = \"test-token\"\n[roster]\ndir = {:?}\n",
        dir.path().to_str().unwrap()
    ))
    .unwrap();

    let output = run(
        settings,
        &dir,
        &["hydrate", "--config", config.to_str().unwrap(), "--with-rosters"],
    )
    .await
    .unwrap();

    assert!(output.starts_with("Categories: 1 created, 0 existing, 0 failed\n"));
    assert!(output.contains("Intro to Python: Rows processed: 2"));

    let session = reload(&dir);
    let snapshot = session.guild(GUILD).unwrap();
    let category = snapshot
        .categories()
        .find(|c| c.name == "PYTHON - STUDENTS 01")
        .unwrap();
    let children: Vec<&str> = snapshot.channels_in(category.id).map(|c| c.name.as_str()).collect();
    assert_eq!(children, vec!["temp", "s001", "s002"]);
    assert!(session
        .messages()
        .iter()
        .any(|m| m.content == "Category 'PYTHON - STUDENTS 01' auto-created."));
}

#[tokio::test]
async fn test_unknown_guild_fails() {
    let dir = snapshot_dir();

    let result = run(test_settings(), &dir, &["categories", "--guild", "Nowhere"]).await;

    assert!(result.unwrap_err().to_string().contains("workspace not found"));
}

/// The conversation store honours the configured daily allowance
#[test]
fn test_conversation_limit_from_settings() {
    let settings = Settings::from_toml("[bot]\ntoken = \"test-token\"\ndaily_request_limit = 2\n").unwrap();
    let app = Application::with_session(settings, session(), "unused.json".into());
    let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

    let store = app.conversations();
    assert_eq!(store.record_request(500, today), Ok(1));
    assert_eq!(store.record_request(500, today), Ok(0));
    assert!(store.record_request(500, today).is_err());
}
