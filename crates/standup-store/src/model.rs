//! Meeting and team records.
//!
//! A [`Meeting`] is either unsaved (never persisted) or saved with a
//! storage-assigned [`MeetingId`]. Saved meetings are never modified: the
//! meeting history is append-only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
//  Team
// ═══════════════════════════════════════════════════════════════════════

/// A team, identified only by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Meeting
// ═══════════════════════════════════════════════════════════════════════

/// Storage-assigned surrogate key of a meeting row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub i64);

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything recorded about a meeting except its identity.
///
/// Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDetails {
    pub team: Team,
    /// When the meeting took place. Stored with millisecond precision.
    pub date_time: DateTime<Utc>,
    pub num_participants: u32,
    /// Time limit given to each participant's status.
    pub individual_status_length: u32,
    /// Total length of the meeting.
    pub meeting_length: u32,
    /// Fastest status given during the meeting.
    pub quickest_status: u32,
    /// Slowest status given during the meeting.
    pub longest_status: u32,
}

impl MeetingDetails {
    /// Copy of `self` with `date_time` truncated to what the store keeps.
    pub(crate) fn truncated_to_millis(&self) -> Self {
        let date_time =
            DateTime::from_timestamp_millis(self.date_time.timestamp_millis()).unwrap_or(self.date_time);
        Self {
            date_time,
            ..self.clone()
        }
    }
}

/// A meeting record, before or after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Meeting {
    /// Never persisted; has no id.
    Unsaved(MeetingDetails),
    /// Persisted once with a fixed id.
    Saved {
        id: MeetingId,
        #[serde(flatten)]
        details: MeetingDetails,
    },
}

impl Meeting {
    /// Start a new, unsaved meeting.
    pub fn new(details: MeetingDetails) -> Self {
        Self::Unsaved(details)
    }

    /// The storage id, or `None` if the meeting was never saved.
    pub fn id(&self) -> Option<MeetingId> {
        match self {
            Self::Unsaved(_) => None,
            Self::Saved { id, .. } => Some(*id),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn details(&self) -> &MeetingDetails {
        match self {
            Self::Unsaved(details) | Self::Saved { details, .. } => details,
        }
    }

    pub fn team(&self) -> &Team {
        &self.details().team
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.details().date_time
    }

    pub fn into_details(self) -> MeetingDetails {
        match self {
            Self::Unsaved(details) | Self::Saved { details, .. } => details,
        }
    }
}

impl From<MeetingDetails> for Meeting {
    fn from(details: MeetingDetails) -> Self {
        Self::Unsaved(details)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  TeamStats
// ═══════════════════════════════════════════════════════════════════════

/// Aggregates over a team's meeting history.
///
/// Averages are in the same unit as the underlying fields (people or seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub num_meetings: usize,
    pub avg_participants: f64,
    pub avg_meeting_length: f64,
    pub avg_individual_status_length: f64,
    /// Fastest status across all meetings.
    pub quickest_status: u32,
    /// Slowest status across all meetings.
    pub longest_status: u32,
    pub first_meeting: DateTime<Utc>,
    pub last_meeting: DateTime<Utc>,
}

impl TeamStats {
    /// Compute statistics for `meetings`, or `None` when there are none.
    pub fn from_meetings(meetings: &[Meeting]) -> Option<Self> {
        let first = meetings.first()?.details();

        let mut quickest = first.quickest_status;
        let mut longest = first.longest_status;
        let mut earliest = first.date_time;
        let mut latest = first.date_time;
        let (mut participants, mut length, mut status_length) = (0u64, 0u64, 0u64);

        for meeting in meetings {
            let d = meeting.details();
            participants += u64::from(d.num_participants);
            length += u64::from(d.meeting_length);
            status_length += u64::from(d.individual_status_length);
            quickest = quickest.min(d.quickest_status);
            longest = longest.max(d.longest_status);
            earliest = earliest.min(d.date_time);
            latest = latest.max(d.date_time);
        }

        let n = meetings.len() as f64;
        Some(Self {
            num_meetings: meetings.len(),
            avg_participants: participants as f64 / n,
            avg_meeting_length: length as f64 / n,
            avg_individual_status_length: status_length as f64 / n,
            quickest_status: quickest,
            longest_status: longest,
            first_meeting: earliest,
            last_meeting: latest,
        })
    }
}

// ── tests ────────────────────────────────────────────────────────────
