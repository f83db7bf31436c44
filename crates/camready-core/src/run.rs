use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{info, warn};

use crate::accepted::{AcceptedTable, load_accepted};
use crate::error::{CamReadyError, Result};
use crate::models::{AcceptanceTrack, PaperId, RunSummary, default_accepted_tracks};
use crate::notify::{MessageSender, ReminderTemplate, dispatch};
use crate::reconcile::reconcile;
use crate::submissions::{SubmissionExtract, SubmissionSource, extract_submitted};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub venue: String,
    pub tracks: BTreeSet<AcceptanceTrack>,
    pub template: ReminderTemplate,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            tracks: default_accepted_tracks(),
            template: ReminderTemplate::default(),
            dry_run: false,
        }
    }
}

/// Result of the read-only half of a run, before any reminder goes out.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub accepted_count: usize,
    pub extract: SubmissionExtract,
    pub missing: Vec<PaperId>,
}

/// Loads, extracts and diffs. Venue lookup failures are fatal; an empty
/// submission list is logged and treated as nothing submitted.
pub fn reconcile_venue<S: SubmissionSource + ?Sized>(
    table: &AcceptedTable,
    source: &S,
    options: &RunOptions,
) -> Result<Reconciliation> {
    let accepted = load_accepted(table, &options.tracks);
    info!(
        rows = table.len(),
        accepted = accepted.len(),
        "accepted table loaded"
    );

    source.ensure_venue(&options.venue)?;
    let records = source.fetch_submissions(&options.venue)?;
    let extract = match extract_submitted(&records, &options.venue) {
        Ok(extract) => extract,
        Err(CamReadyError::NotFound(message)) => {
            warn!(venue = %options.venue, "{message}");
            SubmissionExtract::default()
        }
        Err(err) => return Err(err),
    };

    let unknown = extract.submitted.difference(&accepted).count();
    if unknown > 0 {
        warn!(
            unknown,
            submitted = extract.submitted.len(),
            "submitted paper numbers absent from the accepted table; check that Paper ID matches the platform number"
        );
    }

    let missing = reconcile(&accepted, &extract.submitted);
    Ok(Reconciliation {
        accepted_count: accepted.len(),
        extract,
        missing,
    })
}

/// Sends reminders for an already computed reconciliation.
pub fn notify_missing<M: MessageSender + ?Sized>(
    table: &AcceptedTable,
    reconciliation: &Reconciliation,
    sender: &M,
    options: &RunOptions,
) -> Result<RunSummary> {
    let notified = dispatch(
        &reconciliation.missing,
        table,
        &options.venue,
        &options.template,
        sender,
    )?;
    info!(
        venue = %options.venue,
        missing = reconciliation.missing.len(),
        notified,
        dry_run = options.dry_run,
        "reminder run complete"
    );
    Ok(RunSummary {
        venue: options.venue.clone(),
        generated_at: Utc::now(),
        accepted_count: reconciliation.accepted_count,
        submitted_count: reconciliation.extract.submitted.len(),
        missing: reconciliation.missing.clone(),
        notified,
        dry_run: options.dry_run,
    })
}

pub fn run_reminders<S, M>(
    table: &AcceptedTable,
    source: &S,
    sender: &M,
    options: &RunOptions,
) -> Result<RunSummary>
where
    S: SubmissionSource + ?Sized,
    M: MessageSender + ?Sized,
{
    let reconciliation = reconcile_venue(table, source, options)?;
    notify_missing(table, &reconciliation, sender, options)
}
