use anyhow::Context;
use serde::Serialize;
use voc_core::LineageSettings;

use super::shared::lineage::prepare;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::LineageArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StampResponse {
    sidecar: String,
    dataset_hash: String,
    complete: bool,
}

/// Handle `tinyvoc stamp`.
pub fn handle(
    args: &LineageArgs,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let build = prepare(args, settings)?;
    let sidecar = build.sidecar_path().display().to_string();
    let fingerprint = build
        .finish()
        .with_context(|| format!("failed to write {sidecar}"))?;

    output(
        &StampResponse {
            sidecar,
            dataset_hash: fingerprint.dataset_hash,
            complete: fingerprint.complete,
        },
        flags.format,
    )
}
