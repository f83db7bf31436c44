use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CamReadyError, Result};
use crate::models::{PaperId, SubmissionRecord};

pub type SubmittedSet = BTreeSet<PaperId>;

/// Read-only view of the review platform.
pub trait SubmissionSource {
    /// Fails with `NotFound` when the venue group does not exist or is not visible.
    fn ensure_venue(&self, venue: &str) -> Result<()>;

    fn fetch_submissions(&self, venue: &str) -> Result<Vec<SubmissionRecord>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionExtract {
    pub submitted: SubmittedSet,
    /// Decision-bearing record per forum, restricted to the target venue.
    pub decision_by_forum: BTreeMap<String, SubmissionRecord>,
}

impl SubmissionExtract {
    /// Whether the record's forum carries a decision under the target venue.
    pub fn decision_present(&self, record: &SubmissionRecord) -> bool {
        self.decision_by_forum.contains_key(&record.forum_id)
    }
}

/// Derives the papers counted as submitted under `venue`.
///
/// A forum qualifies when any of its records reports `venue` exactly; every
/// record in a qualifying forum then contributes its number, whatever venue
/// that record itself reports. Fails with `NotFound` on an empty input so the
/// caller can decide whether an empty platform response is acceptable.
pub fn extract_submitted(records: &[SubmissionRecord], venue: &str) -> Result<SubmissionExtract> {
    if records.is_empty() {
        return Err(CamReadyError::NotFound(format!(
            "no submissions found for venue {venue}; check the venue id and your permissions"
        )));
    }

    let decision_by_forum = records
        .iter()
        .filter(|record| record.venue_id == venue)
        .map(|record| (record.forum_id.clone(), record.clone()))
        .collect::<BTreeMap<_, _>>();

    let submitted = records
        .iter()
        .filter(|record| decision_by_forum.contains_key(&record.forum_id))
        .map(|record| record.number.clone())
        .collect();

    Ok(SubmissionExtract {
        submitted,
        decision_by_forum,
    })
}
