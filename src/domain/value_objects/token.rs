//! Selector tokens.
//!
//! A caller names a resource either by its numeric ID or by its display
//! name. The distinction is made once, when the token is built, so lookups
//! never re-inspect raw input.

use std::fmt;
use std::str::FromStr;

/// A name-or-ID reference to a workspace resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Id(i64),
    Name(String),
}

impl Token {
    /// Build a token from free text: trimmed all-digit input that fits in
    /// an `i64` becomes an `Id`, anything else a `Name`. Blank input yields
    /// `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<i64>() {
                return Some(Self::Id(id));
            }
        }
        Some(Self::Name(trimmed.to_string()))
    }

    /// A token that is always matched by name, even when it looks numeric.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    /// Text compared against display names.
    pub fn match_text(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

impl From<i64> for Token {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl FromStr for Token {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| "selector must not be empty".to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Normalize a display name for comparison: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
