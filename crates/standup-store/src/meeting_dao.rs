//! Meeting history persistence.
//!
//! [`MeetingDao`] maps [`Meeting`] records to rows of the `meetings` table.
//! Meetings are inserted once and never updated; they can be looked up by id,
//! listed per team in chronological order, and deleted one by one or in bulk.

use chrono::DateTime;
use rusqlite::{Connection, Row};
use tracing::{debug, instrument, warn};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::model::{Meeting, MeetingDetails, MeetingId, Team};

pub(crate) const TABLE_NAME: &str = "meetings";

pub(crate) const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS meetings (
        _id                      INTEGER PRIMARY KEY AUTOINCREMENT,
        team_name                TEXT NOT NULL,
        meeting_time             INTEGER NOT NULL,
        num_participants         INTEGER NOT NULL,
        individual_status_length INTEGER NOT NULL,
        meeting_length           INTEGER NOT NULL,
        quickest_status          INTEGER NOT NULL,
        longest_status           INTEGER NOT NULL
    );
"#;

/// Column list shared by every SELECT; [`meeting_from_row`] decodes in this order.
const ALL_COLUMNS: &str = "_id, team_name, meeting_time, num_participants, \
                           individual_status_length, meeting_length, quickest_status, longest_status";

/// CRUD access to the meeting history.
#[derive(Clone)]
pub struct MeetingDao {
    db: Database,
}

impl MeetingDao {
    /// Create a DAO backed by `db`, creating or upgrading the schema first.
    pub fn new(db: Database) -> StoreResult<Self> {
        db.init_schema()?;
        Ok(Self { db })
    }

    /// Persist an unsaved meeting and return it with its new id.
    ///
    /// Saved meetings cannot be written again: passing one logs a warning and
    /// fails with [`StoreError::UnsupportedOperation`] without touching the
    /// database.
    #[instrument(skip(self, meeting), fields(team = %meeting.team()))]
    pub fn save(&self, meeting: &Meeting) -> StoreResult<Meeting> {
        match meeting {
            Meeting::Unsaved(details) => self.create(details),
            Meeting::Saved { id, .. } => {
                let msg = format!(
                    "attempted to update existing meeting {id}; meeting entries cannot be updated"
                );
                warn!(meeting_id = %id, "{msg}");
                Err(StoreError::UnsupportedOperation(msg))
            }
        }
    }

    /// Insert a new meeting row and return the saved meeting.
    ///
    /// The returned meeting's time is truncated to milliseconds, matching
    /// what a later lookup returns.
    #[instrument(skip(self, details), fields(team = %details.team))]
    pub fn create(&self, details: &MeetingDetails) -> StoreResult<Meeting> {
        let details = details.truncated_to_millis();
        debug!(
            team = %details.team,
            date_time = %details.date_time,
            "creating new meeting"
        );

        let id = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO meetings (team_name, meeting_time, num_participants, \
                 individual_status_length, meeting_length, quickest_status, longest_status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    details.team.name(),
                    details.date_time.timestamp_millis(),
                    details.num_participants,
                    details.individual_status_length,
                    details.meeting_length,
                    details.quickest_status,
                    details.longest_status,
                ],
            )
            .map_err(|source| StoreError::Write {
                table: TABLE_NAME,
                source,
            })?;
            Ok(MeetingId(conn.last_insert_rowid()))
        })?;

        debug!(meeting_id = %id, "meeting created");
        Ok(Meeting::Saved { id, details })
    }

    /// Fetch a single meeting by id, returning `None` if there is no such row.
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: MeetingId) -> StoreResult<Option<Meeting>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ALL_COLUMNS} FROM meetings WHERE _id = ?1"
            ))?;
            let mut rows = stmt.query(rusqlite::params![id.0])?;
            let meeting = match rows.next()? {
                Some(row) => Some(meeting_from_row(row)?),
                None => None,
            };
            Ok(meeting)
        })
    }

    /// All meetings of `team`, oldest first. Empty when the team has none.
    #[instrument(skip(self), fields(team = %team))]
    pub fn find_all_by_team(&self, team: &Team) -> StoreResult<Vec<Meeting>> {
        let meetings = self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ALL_COLUMNS} FROM meetings WHERE team_name = ?1 \
                 ORDER BY meeting_time ASC, _id ASC"
            ))?;
            let mut rows = stmt.query(rusqlite::params![team.name()])?;

            let mut meetings = Vec::new();
            while let Some(row) = rows.next()? {
                meetings.push(meeting_from_row(row)?);
            }
            Ok(meetings)
        })?;

        debug!(count = meetings.len(), "found meetings");
        Ok(meetings)
    }

    /// Number of meetings recorded for `team`.
    #[instrument(skip(self), fields(team = %team))]
    pub fn count_by_team(&self, team: &Team) -> StoreResult<u64> {
        self.db.execute(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM meetings WHERE team_name = ?1",
                rusqlite::params![team.name()],
                |row| row.get(0),
            )?;
            Ok(count.unsigned_abs())
        })
    }

    /// Remove every meeting. Returns the number of rows deleted.
    #[instrument(skip(self))]
    pub fn delete_all(&self) -> StoreResult<usize> {
        debug!("deleting all meetings");
        self.db
            .execute(|conn| Ok(conn.execute("DELETE FROM meetings", [])?))
    }

    /// Remove a saved meeting. Unsaved meetings are ignored.
    ///
    /// Returns `true` if a row was deleted.
    #[instrument(skip(self, meeting), fields(team = %meeting.team()))]
    pub fn delete(&self, meeting: &Meeting) -> StoreResult<bool> {
        debug!(
            team = %meeting.team(),
            date_time = %meeting.date_time(),
            "deleting meeting"
        );
        match meeting.id() {
            Some(id) => self.delete_by_id(id),
            None => Ok(false),
        }
    }

    /// Remove the meeting with `id`. Returns `true` if it existed.
    #[instrument(skip(self))]
    pub fn delete_by_id(&self, id: MeetingId) -> StoreResult<bool> {
        self.db.execute(|conn| {
            let deleted = delete_row(conn, id)?;
            Ok(deleted > 0)
        })
    }
}

fn delete_row(conn: &Connection, id: MeetingId) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM meetings WHERE _id = ?1",
        rusqlite::params![id.0],
    )
}

/// Decode a row selected with [`ALL_COLUMNS`].
fn meeting_from_row(row: &Row<'_>) -> StoreResult<Meeting> {
    let id: i64 = row.get(0)?;
    let team_name: String = row.get(1)?;
    let millis: i64 = row.get(2)?;

    let date_time = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        StoreError::InvalidRow(format!("meeting {id} has out-of-range time {millis}"))
    })?;

    Ok(Meeting::Saved {
        id: MeetingId(id),
        details: MeetingDetails {
            team: Team::new(team_name),
            date_time,
            num_participants: row.get(3)?,
            individual_status_length: row.get(4)?,
            meeting_length: row.get(5)?,
            quickest_status: row.get(6)?,
            longest_status: row.get(7)?,
        },
    })
}

// ── tests ────────────────────────────────────────────────────────────
