use std::path::PathBuf;

use camready_core::models::AcceptanceTrack;
use camready_core::notify::{DEFAULT_CONFERENCE, DEFAULT_DEADLINE};
use clap::Parser;

mod parsers;


use self::parsers::{parse_non_empty, parse_track};

pub const DEFAULT_VENUE: &str = "EMNLP/2025/Conference";
pub const DEFAULT_ACCEPTED_CSV: &str = "accepted-papers.csv";

#[derive(Debug, Parser)]
#[command(name = "camready")]
#[command(
    about = "Find accepted papers without a camera-ready submission on OpenReview and remind their authors",
    version
)]
pub struct Cli {
    /// OpenReview username.
    pub username: String,
    /// OpenReview password.
    pub password: String,
    /// OpenReview venue ID, found in the URL https://openreview.net/group?id=<VENUE ID>.
    #[arg(long, default_value = DEFAULT_VENUE, value_parser = parse_non_empty)]
    pub venue: String,
    /// "Source of truth" CSV with `Paper ID`, `Title` and `Accepted To` columns.
    #[arg(long, default_value = DEFAULT_ACCEPTED_CSV)]
    pub accepted: PathBuf,
    /// Acceptance track counted as accepted. Repeatable; defaults to Find and Main.
    #[arg(long = "track", value_name = "LABEL", value_parser = parse_track)]
    pub tracks: Vec<AcceptanceTrack>,
    /// Conference name used in the reminder subject and signature.
    #[arg(long, default_value = DEFAULT_CONFERENCE, value_parser = parse_non_empty)]
    pub conference: String,
    /// Deadline wording used in the reminder body.
    #[arg(long, default_value = DEFAULT_DEADLINE, value_parser = parse_non_empty)]
    pub deadline: String,
    /// Reconcile and render reminders without sending them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Print the run summary as JSON instead of the plain missing list.
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Reserved: download all papers in the venue.
    #[arg(long, default_value_t = false)]
    pub all: bool,
    /// Reserved: download PDFs.
    #[arg(long, default_value_t = false)]
    pub pdfs: bool,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
