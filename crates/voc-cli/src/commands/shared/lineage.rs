use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use voc_core::{
    Check, IncrementalBuild, LineageRecord, LineageSettings, LineageSource, Sidecar,
};

use super::parse::parse_param;
use crate::cli::root_commands::LineageArgs;
use crate::progress::Progress;

/// Param keys filled in by tinyvoc itself.
const RESERVED_PARAMS: &[&str] = &["destination"];

/// Assemble the record for the dataset described by `args` and wrap it in a
/// build guard at the right sidecar location.
///
/// Sources keep their command-line order. Params are `destination` plus the
/// user's `--param` values, so `status`, `stamp` and `run` given the same
/// arguments fingerprint the same record.
pub fn prepare(
    args: &LineageArgs,
    settings: &LineageSettings,
) -> anyhow::Result<IncrementalBuild> {
    let user_params = args
        .params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if let Some((key, _)) = user_params
        .iter()
        .find(|(key, _)| RESERVED_PARAMS.contains(&key.as_str()))
    {
        anyhow::bail!("param '{key}' is set by tinyvoc and cannot be passed with --param");
    }

    let sources = collect_sources(&args.sources, settings)?;

    let mut record = LineageRecord::from_parts(sources, voc_core::Params::new());
    record.add_param("destination", args.destination.as_path());
    record.extend_params(user_params);

    Ok(IncrementalBuild::at(record, &sidecar(args), settings))
}

#[must_use]
pub fn sidecar(args: &LineageArgs) -> Sidecar {
    if args.frames {
        Sidecar::Frames(args.destination.clone())
    } else {
        Sidecar::Dataset(args.destination.clone())
    }
}

fn collect_sources(
    paths: &[PathBuf],
    settings: &LineageSettings,
) -> anyhow::Result<Vec<LineageSource>> {
    let progress = Progress::spinner("hashing sources");
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        progress.set_message(&format!("hashing {}", path.display()));
        match LineageSource::detect(path, settings) {
            Ok(source) => sources.push(source),
            Err(error) => {
                progress.finish_err("failed to hash sources");
                return Err(error)
                    .with_context(|| format!("failed to read source {}", path.display()));
            }
        }
    }

    progress.finish_clear();
    Ok(sources)
}

/// Freshness report shared by `status` and `run`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub destination: String,
    pub sidecar: String,
    pub freshness: voc_core::Freshness,
    pub reason: &'static str,
    pub up_to_date: bool,
    pub dataset_hash: String,
    pub complete: bool,
    pub previous_hash: Option<String>,
}

impl CheckReport {
    #[must_use]
    pub fn new(build: &IncrementalBuild, args: &LineageArgs, check: &Check) -> Self {
        Self {
            destination: args.destination.display().to_string(),
            sidecar: build.sidecar_path().display().to_string(),
            freshness: check.freshness,
            reason: check.freshness.reason(),
            up_to_date: check.is_up_to_date(),
            dataset_hash: check.current.dataset_hash.clone(),
            complete: check.current.complete,
            previous_hash: check
                .previous
                .as_ref()
                .map(|previous| previous.dataset_hash.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use voc_core::ParamValue;

    use super::*;

    fn args(dir: &TempDir, params: &[&str]) -> LineageArgs {
        LineageArgs {
            sources: vec![dir.path().join("clip.mp4")],
            destination: dir.path().join("frames"),
            frames: true,
            params: params.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn record_carries_destination_and_typed_params() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clip.mp4"), b"video").unwrap();

        let build = prepare(
            &args(&dir, &["every=5", "prefix=clip"]),
            &LineageSettings::default(),
        )
        .unwrap();

        let params = build.record().params();
        assert_eq!(params.get("every"), Some(&ParamValue::Int(5)));
        assert_eq!(
            params.get("destination"),
            Some(&ParamValue::from(dir.path().join("frames")))
        );
        assert_eq!(
            build.sidecar_path(),
            dir.path().join("frames_frames_lineage.json")
        );
    }

    #[test]
    fn reserved_param_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clip.mp4"), b"video").unwrap();

        let err =
            prepare(&args(&dir, &["destination=x"]), &LineageSettings::default()).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn missing_source_names_the_path() {
        let dir = TempDir::new().unwrap();

        let err = prepare(&args(&dir, &[]), &LineageSettings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("clip.mp4"));
    }
}
