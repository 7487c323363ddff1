//! Roster row: one line of tabular intake data.

use serde::Deserialize;

/// Column that must be present in every roster header.
pub const EMAIL_COLUMN: &str = "Email";

/// One individual to provision a channel for.
///
/// Column names follow the intake questionnaire export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Email", default)]
    pub email: String,

    /// Self-reported platform login; often malformed
    #[serde(rename = "Discord", default)]
    pub discord: Option<String>,

    #[serde(rename = "First", default)]
    pub first_name: String,

    #[serde(rename = "Last", default)]
    pub last_name: String,

    #[serde(rename = "GitHub", default)]
    pub github: Option<String>,
}

impl RosterRow {
    /// Local part of a well-formed email (must contain `@`).
    pub fn email_local_part(&self) -> Option<&str> {
        let (local, _domain) = self.email.trim().split_once('@')?;
        let local = local.trim();
        if local.is_empty() {
            None
        } else {
            Some(local)
        }
    }

    /// Login to look the member up by, defaulting to the email local part.
    pub fn login_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.discord
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
    }
}
