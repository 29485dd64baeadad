use std::process::Command;

use anyhow::{Context, bail};
use serde::Serialize;
use voc_core::LineageSettings;

use super::shared::lineage::{CheckReport, prepare};
use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RunResponse {
    ran: bool,
    #[serde(flatten)]
    check: CheckReport,
}

/// Handle `tinyvoc run`.
///
/// The build command itself is not part of the fingerprint, so a dataset
/// recorded by `stamp` is skipped here and `status` agrees with `run`. The
/// previous sidecar is only replaced after the command exits successfully.
pub fn handle(
    args: &RunArgs,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let Some((program, program_args)) = args.command.split_first() else {
        bail!("run: no build command given after --");
    };

    let build = prepare(&args.lineage, settings)?;
    let check = build
        .check()
        .with_context(|| format!("failed to read {}", build.sidecar_path().display()))?;
    let report = CheckReport::new(&build, &args.lineage, &check);

    if check.is_up_to_date() {
        tracing::info!(destination = %report.destination, "dataset is up to date, skipping build");
        return output(
            &RunResponse {
                ran: false,
                check: report,
            },
            flags.format,
        );
    }

    tracing::info!(
        destination = %report.destination,
        freshness = ?check.freshness,
        command = %args.command.join(" "),
        "rebuilding dataset"
    );
    let status = Command::new(program)
        .args(program_args)
        .status()
        .with_context(|| format!("failed to start build command '{program}'"))?;
    if !status.success() {
        bail!("build command failed ({status}); lineage left unchanged");
    }

    let sidecar = build.sidecar_path().display().to_string();
    build
        .finish()
        .with_context(|| format!("failed to write {sidecar}"))?;

    output(
        &RunResponse {
            ran: true,
            check: report,
        },
        flags.format,
    )
}
