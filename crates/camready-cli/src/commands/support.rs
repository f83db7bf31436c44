use std::io::{self, Write};

use anyhow::Result;
use camready_core::CamReadyError;
use camready_core::models::PaperId;

const EXIT_USAGE: u8 = 64;
const EXIT_INTERNAL: u8 = 70;

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn write_missing_report<W: Write>(out: &mut W, missing: &[PaperId]) -> Result<()> {
    writeln!(
        out,
        "The following camera-ready documents have not yet been submitted:"
    )?;
    for paper_id in missing {
        writeln!(out, "  {paper_id}")?;
    }
    out.flush()?;
    Ok(())
}

fn core_error(err: &anyhow::Error) -> Option<&CamReadyError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CamReadyError>())
}

pub(crate) fn exit_code_for(err: &anyhow::Error) -> u8 {
    core_error(err).map_or(EXIT_INTERNAL, CamReadyError::exit_code)
}

/// Help and version output exit cleanly; everything else is a usage error.
pub(crate) fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_USAGE } else { 0 }
}

pub(crate) fn print_error_payload(err: &anyhow::Error) -> Result<()> {
    let payload = match core_error(err) {
        Some(core) => core.to_payload("camready.run"),
        None => CamReadyError::Internal(format!("{err:#}")).to_payload("camready.run"),
    };
    print_json(&payload)
}
