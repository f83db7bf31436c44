use anyhow::Context;
use camready_core::models::{AcceptanceTrack, PaperId};
use clap::Parser;

use super::support::write_missing_report;
use super::*;

#[test]
fn missing_report_lists_ids_in_given_order() {
    let mut out = Vec::new();
    write_missing_report(
        &mut out,
        &[PaperId::Numeric(7), PaperId::Numeric(12), PaperId::Text("X1".to_string())],
    )
    .expect("write");
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(
        text,
        "The following camera-ready documents have not yet been submitted:\n  7\n  12\n  X1\n"
    );
}

#[test]
fn missing_report_keeps_header_when_nothing_is_missing() {
    let mut out = Vec::new();
    write_missing_report(&mut out, &[]).expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "The following camera-ready documents have not yet been submitted:\n"
    );
}

#[test]
fn exit_code_reads_core_error_through_context() {
    let err = Err::<(), _>(camready_core::CamReadyError::NotFound("venue".to_string()))
        .context("failed to reconcile venue V")
        .expect_err("error");
    assert_eq!(exit_code_for(&err), 2);

    let other = anyhow::anyhow!("unexpected");
    assert_eq!(exit_code_for(&other), 70);
}

#[test]
fn usage_errors_get_their_own_exit_code() {
    let unknown_flag =
        Cli::try_parse_from(["camready", "u", "p", "--no-such-flag"]).expect_err("unknown flag");
    assert_eq!(parse_exit_code(&unknown_flag), 64);

    let missing_password = Cli::try_parse_from(["camready", "u"]).expect_err("missing password");
    assert_eq!(parse_exit_code(&missing_password), 64);
    assert_ne!(
        parse_exit_code(&missing_password),
        camready_core::CamReadyError::NotFound("venue".to_string()).exit_code()
    );
}

#[test]
fn help_and_version_exit_cleanly() {
    let help = Cli::try_parse_from(["camready", "--help"]).expect_err("help");
    assert_eq!(parse_exit_code(&help), 0);

    let version = Cli::try_parse_from(["camready", "--version"]).expect_err("version");
    assert_eq!(parse_exit_code(&version), 0);
}

#[test]
fn run_options_default_tracks_and_template_from_flags() {
    let cli = Cli::try_parse_from([
        "camready",
        "u",
        "p",
        "--conference",
        "ACL 2026",
        "--deadline",
        "Monday, May 4",
        "--dry-run",
    ])
    .expect("parse");
    let options = build_run_options(&cli);
    assert_eq!(options.tracks, default_accepted_tracks());
    assert_eq!(options.template.conference, "ACL 2026");
    assert_eq!(options.template.deadline, "Monday, May 4");
    assert!(options.dry_run);
}

#[test]
fn run_options_use_explicit_tracks_when_given() {
    let cli = Cli::try_parse_from(["camready", "u", "p", "--track", "Main"]).expect("parse");
    let options = build_run_options(&cli);
    assert_eq!(options.tracks.len(), 1);
    assert!(options.tracks.contains(&AcceptanceTrack::Main));
}
