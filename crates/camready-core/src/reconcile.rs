use crate::accepted::AcceptedSet;
use crate::models::PaperId;
use crate::submissions::SubmittedSet;

/// Accepted papers with no qualifying submission, ascending.
#[must_use]
pub fn reconcile(accepted: &AcceptedSet, submitted: &SubmittedSet) -> Vec<PaperId> {
    accepted.difference(submitted).cloned().collect()
}
