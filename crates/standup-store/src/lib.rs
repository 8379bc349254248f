//! # standup-store
//!
//! Meeting history storage for the standup timer.
//!
//! Provides a SQLite-backed [`MeetingDao`] that records finished standup
//! meetings, looks them up by id, lists them per team in chronological
//! order, and deletes them. Meetings are append-only: once saved they are
//! never updated.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  MeetingDao (meetings table CRUD)        │
//! │  Meeting / Team / TeamStats records      │
//! ├─────────────────────────────────────────┤
//! │  Database (rusqlite WAL, shared handle)  │
//! │  Schema (user_version, drop + recreate)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use standup_store::{Database, Meeting, MeetingDao, MeetingDetails, Team};
//!
//! let dao = MeetingDao::new(Database::open("standup_timer.db")?)?;
//! let saved = dao.save(&Meeting::new(details))?;
//! let history = dao.find_all_by_team(&Team::new("Alpha"))?;
//! ```

pub mod db;
pub mod error;
pub mod meeting_dao;
pub mod model;
pub mod schema;

// ── re-exports ───────────────────────────────────────────────────────

pub use db::{DEFAULT_DATABASE_NAME, Database};
pub use error::{StoreError, StoreResult};
pub use meeting_dao::MeetingDao;
pub use model::{Meeting, MeetingDetails, MeetingId, Team, TeamStats};
pub use schema::SCHEMA_VERSION;
