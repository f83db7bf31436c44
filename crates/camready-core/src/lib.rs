// Public fallible APIs in this crate share one concrete error contract (`CamReadyError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod accepted;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod openreview;
pub mod reconcile;
pub(crate) mod retry_policy;
pub mod run;
pub mod submissions;

pub use accepted::{AcceptedSet, AcceptedTable, load_accepted};
pub use error::{CamReadyError, Result};
pub use notify::{DryRunSender, MessageSender, ReminderTemplate, dispatch};
pub use openreview::OpenReviewClient;
pub use reconcile::reconcile;
pub use run::{RunOptions, run_reminders};
pub use submissions::{SubmissionExtract, SubmissionSource, SubmittedSet, extract_submitted};
