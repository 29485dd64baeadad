use anyhow::Context;
use voc_core::LineageSettings;

use super::shared::lineage::{CheckReport, prepare};
use crate::cli::GlobalFlags;
use crate::cli::root_commands::LineageArgs;
use crate::output::output;

/// Handle `tinyvoc status`.
pub fn handle(
    args: &LineageArgs,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let build = prepare(args, settings)?;
    let check = build
        .check()
        .with_context(|| format!("failed to read {}", build.sidecar_path().display()))?;

    output(&CheckReport::new(&build, args, &check), flags.format)
}
