//! Listing Tests
//!
//! Rendered output of the listing commands, end to end.

use std::path::PathBuf;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use guild_admin::application::services::{ProvisioningService, ProvisioningServiceImpl};
use guild_admin::domain::{AccessRule, Principal, Token};
use guild_admin::presentation::cli::{Command, GuildArg};
use guild_admin::startup::Application;

use crate::common::*;

fn app() -> Application {
    Application::with_session(test_settings(), session(), PathBuf::from("unused.json"))
}

fn guild() -> GuildArg {
    GuildArg {
        guild: Token::name("Knowledge Kitchen"),
    }
}

#[tokio::test]
async fn test_categories_table() {
    let output = app()
        .run(Command::Categories { guild: guild() })
        .await
        .unwrap();

    let expected = concat!(
        "                         KNOWLEDGE KITCHEN                         \n",
        "-------------------------------------------------------------------\n",
        "| Category Name                  | ID                             |\n",
        "| ------------------------------ | ------------------------------ |\n",
        "| Python                         | 10                             |\n",
        "| Web Design                     | 20                             |\n",
        "-------------------------------------------------------------------\n",
        "\n",
    );
    assert_eq!(output, expected);
}

/// Only members who can view the channel are listed
#[tokio::test]
async fn test_members_filtered_by_channel_visibility() {
    // Arrange
    let app = app();
    let provisioning = ProvisioningServiceImpl::new(Arc::clone(app.session()));
    provisioning
        .grant_access(GUILD, 11, Principal::Role(GUILD), AccessRule::deny_view())
        .await
        .unwrap();
    provisioning
        .grant_access(GUILD, 11, Principal::Member(500), AccessRule::participant())
        .await
        .unwrap();
    provisioning
        .grant_access(GUILD, 11, Principal::Role(ADMINS), AccessRule::read_only())
        .await
        .unwrap();

    // Act
    let output = app
        .run(Command::Members {
            guild: guild(),
            category: Some(Token::name("Python")),
            channel: Some(Token::name("week-1")),
        })
        .await
        .unwrap();

    // Assert
    let expected = concat!(
        "                              KNOWLEDGE KITCHEN / 'PYTHON' / 'WEEK-1'                               \n",
        "----------------------------------------------------------------------------------------------------\n",
        "| User Name                      | ID                             | Roles                          |\n",
        "| ------------------------------ | ------------------------------ | ------------------------------ |\n",
        "| alice                          | 500                            | students-py-su25               |\n",
        "| carol                          | 502                            | admins-py-su25                 |\n",
        "----------------------------------------------------------------------------------------------------\n",
        "\n",
    );
    assert_eq!(output, expected);
}

/// The channel lookup is scoped to the given category
#[tokio::test]
async fn test_channels_scoped_to_category() {
    let output = app()
        .run(Command::Channels {
            guild: guild(),
            category: Some(Token::Id(WEB)),
        })
        .await
        .unwrap();

    assert!(output.contains("KNOWLEDGE KITCHEN / 'WEB DESIGN'"));
    assert!(output.contains("| week-1                         | 21 "));
    assert!(!output.contains("| 11 "));
    assert!(!output.contains("lobby"));
}

#[tokio::test]
async fn test_empty_workspace_notes_missing_categories() {
    let session = Arc::new(guild_admin::infrastructure::InMemorySession::from_snapshots(vec![
        WorkspaceBuilder::new(7, "Empty").build(),
    ]));
    let app = Application::with_session(test_settings(), session, PathBuf::from("unused.json"));

    let output = app
        .run(Command::Categories {
            guild: GuildArg { guild: Token::Id(7) },
        })
        .await
        .unwrap();

    assert!(output.ends_with("\nNo categories in this server.\n"));
}

/// Unknown selectors are reported instead of listing nothing
#[tokio::test]
async fn test_unknown_category_is_an_error() {
    let result = app()
        .run(Command::Channels {
            guild: guild(),
            category: Some(Token::name("Rust")),
        })
        .await;

    let error = result.unwrap_err().to_string();
    assert!(error.contains("category not found"), "{}", error);
}
