use anyhow::Context;
use serde::Serialize;
use voc_core::LineageSettings;
use voc_core::hash::hash_file;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HashArgs;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct HashEntry {
    path: String,
    sha256: String,
}

/// Handle `tinyvoc hash`.
pub fn handle(
    args: &HashArgs,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let total = u64::try_from(args.paths.len()).unwrap_or(u64::MAX);
    let progress = Progress::bar(total, "hashing");
    let mut entries = Vec::with_capacity(args.paths.len());

    for path in &args.paths {
        progress.set_message(&path.display().to_string());
        let sha256 = match hash_file(path, settings.chunk_size) {
            Ok(digest) => digest,
            Err(error) => {
                progress.finish_err("hashing failed");
                return Err(error).with_context(|| format!("failed to hash {}", path.display()));
            }
        };
        entries.push(HashEntry {
            path: path.display().to_string(),
            sha256,
        });
        progress.inc(1);
    }

    progress.finish_clear();
    output(&entries, flags.format)
}
