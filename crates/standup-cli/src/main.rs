//! CLI entry point for the standup timer.
//!
//! This binary provides the `standup` command with subcommands for
//! recording meetings and reviewing a team's meeting history.

mod cli;
mod config;

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use standup_store::{Database, Meeting, MeetingDao, MeetingDetails, MeetingId, Team, TeamStats};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = config::load_config(config::CONFIG_PATH);
    init_tracing(&config.log_level);

    let db_path = config.resolve_db_path(cli.db, std::env::var(config::DB_ENV_VAR).ok());
    let dao = open_dao(&db_path)?;

    match cli.command {
        Commands::Record {
            team,
            participants,
            status_limit,
            length,
            quickest,
            longest,
            at,
        } => cmd_record(
            &dao,
            MeetingDetails {
                team: Team::new(team),
                date_time: at.unwrap_or_else(Utc::now),
                num_participants: participants,
                individual_status_length: status_limit,
                meeting_length: length,
                quickest_status: quickest,
                longest_status: longest,
            },
        ),
        Commands::Show { id } => cmd_show(&dao, MeetingId(id)),
        Commands::List { team, json } => cmd_list(&dao, &Team::new(team), json),
        Commands::Stats { team, json } => cmd_stats(&dao, &Team::new(team), json),
        Commands::Delete { id } => cmd_delete(&dao, MeetingId(id)),
        Commands::Clear { yes } => cmd_clear(&dao, yes),
    }
}

fn open_dao(path: &Path) -> Result<MeetingDao> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let db = Database::open(path).context("failed to open database")?;
    let dao = MeetingDao::new(db).context("failed to initialize meeting store")?;
    debug!(path = %path.display(), "meeting store ready");
    Ok(dao)
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn cmd_record(dao: &MeetingDao, details: MeetingDetails) -> Result<()> {
    let saved = dao
        .save(&Meeting::new(details))
        .context("failed to record meeting")?;
    info!(meeting_id = ?saved.id(), "meeting recorded");
    println!("{}", format_meeting(&saved));
    Ok(())
}

fn cmd_show(dao: &MeetingDao, id: MeetingId) -> Result<()> {
    match dao.find_by_id(id).context("failed to look up meeting")? {
        Some(meeting) => println!("{}", format_meeting(&meeting)),
        None => println!("Meeting {id} not found."),
    }
    Ok(())
}

fn cmd_list(dao: &MeetingDao, team: &Team, json: bool) -> Result<()> {
    let meetings = dao
        .find_all_by_team(team)
        .context("failed to list meetings")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meetings)?);
        return Ok(());
    }

    if meetings.is_empty() {
        println!("No meetings recorded for {team}.");
        return Ok(());
    }

    for meeting in &meetings {
        println!("{}", format_meeting(meeting));
    }
    Ok(())
}

fn cmd_stats(dao: &MeetingDao, team: &Team, json: bool) -> Result<()> {
    let meetings = dao
        .find_all_by_team(team)
        .context("failed to list meetings")?;
    let stats = TeamStats::from_meetings(&meetings);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    match stats {
        Some(stats) => println!("{}", format_stats(team, &stats)),
        None => println!("No meetings recorded for {team}."),
    }
    Ok(())
}

fn cmd_delete(dao: &MeetingDao, id: MeetingId) -> Result<()> {
    if dao.delete_by_id(id).context("failed to delete meeting")? {
        println!("Deleted meeting {id}.");
    } else {
        println!("Meeting {id} not found.");
    }
    Ok(())
}

fn cmd_clear(dao: &MeetingDao, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete every meeting without --yes");
    }
    let deleted = dao.delete_all().context("failed to delete meetings")?;
    println!("Deleted {deleted} meeting(s).");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn format_meeting(meeting: &Meeting) -> String {
    let d = meeting.details();
    let id = meeting
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{id:<5} {team:<16} {when}  {people} people  length {length}  \
         limit {limit}  quickest {quickest}  longest {longest}",
        team = d.team,
        when = d.date_time.format("%Y-%m-%d %H:%M"),
        people = d.num_participants,
        length = format_secs(d.meeting_length),
        limit = format_secs(d.individual_status_length),
        quickest = format_secs(d.quickest_status),
        longest = format_secs(d.longest_status),
    )
}

fn format_stats(team: &Team, stats: &TeamStats) -> String {
    format!(
        "{team}: {n} meeting(s) between {first} and {last}\n  \
         avg participants  {people:.1}\n  \
         avg length        {length}\n  \
         avg status limit  {limit}\n  \
         quickest status   {quickest}\n  \
         longest status    {longest}",
        n = stats.num_meetings,
        first = stats.first_meeting.format("%Y-%m-%d"),
        last = stats.last_meeting.format("%Y-%m-%d"),
        people = stats.avg_participants,
        length = format_secs(stats.avg_meeting_length.round() as u32),
        limit = format_secs(stats.avg_individual_status_length.round() as u32),
        quickest = format_secs(stats.quickest_status),
        longest = format_secs(stats.longest_status),
    )
}

/// Render seconds as `m:ss`.
fn format_secs(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn saved_meeting() -> Meeting {
        Meeting::Saved {
            id: MeetingId(3),
            details: MeetingDetails {
                team: Team::new("Alpha"),
                date_time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                num_participants: 5,
                individual_status_length: 120,
                meeting_length: 900,
                quickest_status: 30,
                longest_status: 180,
            },
        }
    }

    #[test]
    fn format_secs_pads_seconds() {
        assert_eq!(format_secs(0), "0:00");
        assert_eq!(format_secs(65), "1:05");
        assert_eq!(format_secs(900), "15:00");
    }

    #[test]
    fn format_meeting_includes_fields() {
        let line = format_meeting(&saved_meeting());
        assert!(line.starts_with("#3"));
        assert!(line.contains("Alpha"));
        assert!(line.contains("2024-03-01 09:00"));
        assert!(line.contains("5 people"));
        assert!(line.contains("length 15:00"));
        assert!(line.contains("quickest 0:30"));
        assert!(line.contains("longest 3:00"));
    }

    #[test]
    fn format_stats_rounds_averages() {
        let stats = TeamStats::from_meetings(&[saved_meeting()]).unwrap();
        let text = format_stats(&Team::new("Alpha"), &stats);
        assert!(text.starts_with("Alpha: 1 meeting(s)"));
        assert!(text.contains("avg participants  5.0"));
        assert!(text.contains("avg length        15:00"));
    }

    #[test]
    fn open_dao_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("standup_timer.db");

        let dao = open_dao(&path).unwrap();
        assert!(path.exists());
        assert!(dao.find_by_id(MeetingId(1)).unwrap().is_none());
    }

    #[test]
    fn clear_without_confirmation_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let dao = open_dao(&dir.path().join("clear.db")).unwrap();
        assert!(cmd_clear(&dao, false).is_err());
    }
}
