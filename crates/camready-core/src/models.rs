use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Venue-scoped paper identifier.
///
/// Numeric ids order by value, text ids lexically, and every numeric id sorts
/// before every text id, so a mixed set still has one total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaperId {
    Numeric(u64),
    Text(String),
}

impl FromStr for PaperId {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("paper id is empty".to_string());
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit())
            && let Ok(value) = trimmed.parse::<u64>()
        {
            return Ok(Self::Numeric(value));
        }
        Ok(Self::Text(trimmed.to_string()))
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AcceptanceTrack {
    Find,
    Main,
    Other(String),
}

impl AcceptanceTrack {
    pub fn label(&self) -> &str {
        match self {
            Self::Find => "Find",
            Self::Main => "Main",
            Self::Other(label) => label,
        }
    }
}

impl FromStr for AcceptanceTrack {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match raw.trim() {
            "Find" => Self::Find,
            "Main" => Self::Main,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for AcceptanceTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[must_use]
pub fn default_accepted_tracks() -> BTreeSet<AcceptanceTrack> {
    BTreeSet::from([AcceptanceTrack::Find, AcceptanceTrack::Main])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedRecord {
    pub paper_id: PaperId,
    pub title: String,
    pub acceptance_track: AcceptanceTrack,
}

/// One note as reported by the review platform. Several records may share a
/// forum when a paper has revisions or edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: String,
    pub forum_id: String,
    pub number: PaperId,
    pub venue_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub paper_id: PaperId,
    pub title: String,
    pub recipient_group: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub venue: String,
    pub generated_at: DateTime<Utc>,
    pub accepted_count: usize,
    pub submitted_count: usize,
    pub missing: Vec<PaperId>,
    pub notified: usize,
    pub dry_run: bool,
}
