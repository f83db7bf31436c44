use std::io;

use anyhow::{Context, Result};
use camready_core::config::RuntimeConfig;
use camready_core::models::default_accepted_tracks;
use camready_core::run::{RunOptions, notify_missing, reconcile_venue};
use camready_core::{AcceptedTable, DryRunSender, OpenReviewClient, ReminderTemplate};
use tracing::debug;

use crate::cli::Cli;

mod support;

#[cfg(test)]
mod tests;

pub(crate) use self::support::{exit_code_for, parse_exit_code, print_error_payload};
use self::support::{print_json, write_missing_report};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let table = AcceptedTable::from_path(&cli.accepted)
        .with_context(|| format!("failed to load accepted table {}", cli.accepted.display()))?;
    if cli.all || cli.pdfs {
        debug!(all = cli.all, pdfs = cli.pdfs, "download flags are reserved and ignored");
    }

    let options = build_run_options(&cli);
    let client = OpenReviewClient::login(config, &cli.username, &cli.password)?;
    let reconciliation = reconcile_venue(&table, &client, &options)
        .with_context(|| format!("failed to reconcile venue {}", options.venue))?;

    if !cli.json {
        write_missing_report(&mut io::stdout().lock(), &reconciliation.missing)?;
    }

    let summary = if options.dry_run {
        notify_missing(&table, &reconciliation, &DryRunSender::new(), &options)?
    } else {
        notify_missing(&table, &reconciliation, &client, &options)?
    };

    if cli.json {
        print_json(&summary)?;
    }
    Ok(())
}

fn build_run_options(cli: &Cli) -> RunOptions {
    let tracks = if cli.tracks.is_empty() {
        default_accepted_tracks()
    } else {
        cli.tracks.iter().cloned().collect()
    };
    RunOptions {
        venue: cli.venue.clone(),
        tracks,
        template: ReminderTemplate {
            conference: cli.conference.clone(),
            deadline: cli.deadline.clone(),
        },
        dry_run: cli.dry_run,
    }
}
