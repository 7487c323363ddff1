//! Command-line surface.
//!
//! Every selector flag takes a name or a numeric ID; the distinction is
//! made once here, when the flag is parsed into a [`Token`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Token;

/// Workspace administration: listings, provisioning and roster batches
#[derive(Parser, Debug)]
#[clap(name = "guild-admin")]
#[clap(about = "Resolve, list and provision workspace categories, channels and access")]
pub struct Cli {
    /// Workspace snapshot to load and save (defaults to the configured file)
    #[clap(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

/// Workspace selector shared by every scoped command.
#[derive(Args, Debug, Clone)]
pub struct GuildArg {
    /// Workspace name or ID
    #[clap(long, env = "GUILD")]
    pub guild: Token,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List workspaces
    Guilds,

    /// List categories in a workspace
    Categories {
        #[clap(flatten)]
        guild: GuildArg,
    },

    /// List channels, optionally inside one category
    Channels {
        #[clap(flatten)]
        guild: GuildArg,

        #[clap(long)]
        category: Option<Token>,
    },

    /// List members, optionally only those who can view a category or channel
    Members {
        #[clap(flatten)]
        guild: GuildArg,

        #[clap(long)]
        category: Option<Token>,

        #[clap(long)]
        channel: Option<Token>,
    },

    /// Create a category unless it already exists
    CreateCategory {
        #[clap(flatten)]
        guild: GuildArg,

        /// Name of the new category
        name: String,

        #[clap(long)]
        allow_duplicates: bool,
    },

    /// Create a text channel unless it already exists
    CreateChannel {
        #[clap(flatten)]
        guild: GuildArg,

        /// Name of the new channel
        name: String,

        /// Parent category
        #[clap(long)]
        category: Option<Token>,

        #[clap(long)]
        allow_duplicates: bool,
    },

    /// Delete a category and, unless told otherwise, its channels
    DeleteCategory {
        #[clap(flatten)]
        guild: GuildArg,

        #[clap(long)]
        category: Token,

        /// Leave child channels in place
        #[clap(long)]
        keep_channels: bool,
    },

    /// Delete a channel
    DeleteChannel {
        #[clap(flatten)]
        guild: GuildArg,

        #[clap(long)]
        channel: Token,
    },

    /// Give a member or role access to a category or channel
    Grant {
        #[clap(flatten)]
        guild: GuildArg,

        #[clap(long, conflicts_with = "channel", required_unless_present = "channel")]
        category: Option<Token>,

        #[clap(long)]
        channel: Option<Token>,

        #[clap(long, conflicts_with = "role", required_unless_present = "role")]
        member: Option<Token>,

        #[clap(long)]
        role: Option<Token>,

        /// Also allow sending messages (default is read-only)
        #[clap(long)]
        participant: bool,
    },

    /// Create one private channel per roster row
    Roster {
        #[clap(flatten)]
        guild: GuildArg,

        /// Category to create the channels in
        #[clap(long)]
        category: Token,

        /// Admins role given access to every channel
        #[clap(long)]
        admins_role: String,

        /// Roster CSV file
        #[clap(long, value_name = "FILE")]
        file: PathBuf,

        /// First row to process (defaults to the configured value)
        #[clap(long)]
        start: Option<usize>,

        /// Last row to process, inclusive
        #[clap(long)]
        end: Option<usize>,
    },

    /// Create every course category from the workspace configuration
    Hydrate {
        /// Workspace configuration (defaults to the configured file)
        #[clap(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Also provision each course's roster into its first category
        #[clap(long)]
        with_rosters: bool,
    },
}

impl Command {
    /// Whether the command can change the workspace.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::Guilds | Self::Categories { .. } | Self::Channels { .. } | Self::Members { .. }
        )
    }
}
