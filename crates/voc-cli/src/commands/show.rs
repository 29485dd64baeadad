use anyhow::Context;
use serde::Serialize;
use voc_core::scan::find_annotations;
use voc_core::store::load_with_limit;
use voc_core::{LineageSettings, LineageSource, Params};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ShowArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SourceRow {
    depth: usize,
    sourcehash: String,
    annotation_path: String,
    image_path: String,
    root_dir: String,
}

#[derive(Debug, Serialize)]
struct ShowResponse {
    sidecar: String,
    stored_hash: String,
    recomputed_hash: String,
    complete: bool,
    drift: bool,
    annotations: Option<usize>,
    params: Params,
    sources: Vec<SourceRow>,
}

/// Handle `tinyvoc show`.
pub fn handle(
    args: &ShowArgs,
    settings: &LineageSettings,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let is_dir = args.path.is_dir();
    let sidecar = if is_dir {
        args.path.join(&settings.file_name)
    } else {
        args.path.clone()
    };

    let record = load_with_limit(&sidecar, settings.max_depth)
        .with_context(|| format!("failed to load lineage from {}", sidecar.display()))?;

    let stored = record.fingerprint().clone();
    let recomputed = record.compute_fingerprint();
    let drift = stored != recomputed;
    if drift {
        tracing::warn!(
            sidecar = %sidecar.display(),
            stored = %stored.dataset_hash,
            recomputed = %recomputed.dataset_hash,
            "stored fingerprint does not match the recorded sources and params"
        );
    }

    let annotations = if is_dir {
        let found = find_annotations(&args.path, &settings.annotation_extension)
            .with_context(|| format!("failed to scan {}", args.path.display()))?;
        Some(found.len())
    } else {
        None
    };

    let mut sources = Vec::new();
    for source in record.sources() {
        flatten(source, 0, &mut sources);
    }

    output(
        &ShowResponse {
            sidecar: sidecar.display().to_string(),
            stored_hash: stored.dataset_hash,
            recomputed_hash: recomputed.dataset_hash,
            complete: recomputed.complete,
            drift,
            annotations,
            params: record.params().clone(),
            sources,
        },
        flags.format,
    )
}

fn flatten(source: &LineageSource, depth: usize, out: &mut Vec<SourceRow>) {
    out.push(SourceRow {
        depth,
        sourcehash: source.source_hash().to_string(),
        annotation_path: source.annotation_path().to_string(),
        image_path: source.image_path().to_string(),
        root_dir: source.root_dir().to_string(),
    });
    for nested in source.sources() {
        flatten(nested, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use voc_core::hash::hash_str;

    use super::*;

    #[test]
    fn source_tree_is_flattened_depth_first() {
        let tree = LineageSource::new(hash_str("merged")).with_sources(vec![
            LineageSource::new(hash_str("frames"))
                .with_sources(vec![LineageSource::new(hash_str("clip"))]),
            LineageSource::unhashed(),
        ]);

        let mut rows = Vec::new();
        flatten(&tree, 0, &mut rows);

        let depths = rows.iter().map(|row| row.depth).collect::<Vec<_>>();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        assert_eq!(rows[2].sourcehash, hash_str("clip"));
        assert!(rows[3].sourcehash.is_empty());
    }
}
