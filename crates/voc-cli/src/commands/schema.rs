use voc_core::lineage_schema;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `tinyvoc schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = lineage_schema()?;
    output(&schema, flags.format)
}
