//! CLI argument definitions for the standup timer.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Standup timer -- meeting history.
#[derive(Parser)]
#[command(
    name = "standup",
    version,
    about = "Standup timer -- record and review standup meetings",
    long_about = "Records finished standup meetings per team and reports on the \
                  meeting history. Meetings are append-only."
)]
pub struct Cli {
    /// Path to the meeting database (overrides STANDUP_DB and config).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a finished meeting.
    Record {
        /// Team that held the meeting.
        #[arg(long, short)]
        team: String,

        /// Number of people who gave a status.
        #[arg(long, short)]
        participants: u32,

        /// Time limit per status, in seconds.
        #[arg(long)]
        status_limit: u32,

        /// Total meeting length, in seconds.
        #[arg(long, short)]
        length: u32,

        /// Fastest status, in seconds.
        #[arg(long)]
        quickest: u32,

        /// Slowest status, in seconds.
        #[arg(long)]
        longest: u32,

        /// When the meeting took place (RFC 3339). Defaults to now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Show one meeting.
    Show {
        /// Meeting id.
        id: i64,
    },

    /// List a team's meetings, oldest first.
    List {
        /// Team name.
        team: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show statistics over a team's meetings.
    Stats {
        /// Team name.
        team: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Delete one meeting.
    Delete {
        /// Meeting id.
        id: i64,
    },

    /// Delete every recorded meeting.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_with_all_flags() {
        let cli = Cli::try_parse_from([
            "standup",
            "record",
            "--team",
            "Alpha",
            "--participants",
            "5",
            "--status-limit",
            "120",
            "--length",
            "900",
            "--quickest",
            "30",
            "--longest",
            "180",
            "--at",
            "2024-03-01T09:00:00Z",
        ])
        .unwrap();

        match cli.command {
            Commands::Record {
                team,
                participants,
                status_limit,
                length,
                quickest,
                longest,
                at,
            } => {
                assert_eq!(team, "Alpha");
                assert_eq!(participants, 5);
                assert_eq!(status_limit, 120);
                assert_eq!(length, 900);
                assert_eq!(quickest, 30);
                assert_eq!(longest, 180);
                assert_eq!(at.unwrap().timestamp(), 1_709_283_600);
            }
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn record_requires_team() {
        let result = Cli::try_parse_from([
            "standup",
            "record",
            "--participants",
            "5",
            "--status-limit",
            "120",
            "--length",
            "900",
            "--quickest",
            "30",
            "--longest",
            "180",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["standup", "list", "Alpha", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Commands::List { json: false, .. }));
    }

    #[test]
    fn clear_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["standup", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { yes: false }));
    }
}
