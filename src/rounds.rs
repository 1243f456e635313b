//! Round log
//!
//! One record per round start, append-only. Records are never edited
//! after they are written; scoring policy is left to whoever layers on top.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single round entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub score: u64,
    /// When the round started
    pub timestamp: DateTime<Utc>,
    pub id: Uuid,
}

impl RoundRecord {
    /// ISO-8601 start time with millisecond precision
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Append-only list of rounds, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundLog {
    entries: Vec<RoundRecord>,
}

impl RoundLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a record for a round starting at `now`.
    ///
    /// Timestamps are strictly increasing: a `now` that is not after the
    /// previous record is moved to one millisecond past it.
    pub fn start_round(&mut self, now: DateTime<Utc>, id: Uuid) -> &RoundRecord {
        let timestamp = match self.entries.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::milliseconds(1),
            _ => now,
        };
        self.entries.push(RoundRecord {
            score: 0,
            timestamp,
            id,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The round in progress (or most recently finished)
    pub fn latest(&self) -> Option<&RoundRecord> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.entries.iter()
    }

    pub fn best_score(&self) -> Option<u64> {
        self.entries.iter().map(|r| r.score).max()
    }
}
