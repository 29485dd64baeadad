//! End-to-end lineage scenarios over a real filesystem.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use voc_core::hash::{hash_file, hash_str};
use voc_core::{
    Freshness, IncrementalBuild, LineageRecord, LineageSettings, LineageSource, Params, Sidecar,
    load,
};

fn settings() -> LineageSettings {
    LineageSettings::default()
}

/// Frames exploded from a video, then merged with a labels archive.
fn write_inputs(root: &Path) {
    fs::write(root.join("clip.mp4"), b"not really a video").unwrap();
    fs::write(root.join("labels.zip"), b"PK not really a zip").unwrap();
}

fn explode_record(root: &Path) -> LineageRecord {
    let mut record = LineageRecord::new();
    record.add_source(LineageSource::from_file(&root.join("clip.mp4"), &settings()).unwrap());
    record.add_param("prefix", "clip");
    record.add_param("every", 5);
    record
}

fn merge_record(root: &Path) -> LineageRecord {
    let mut record = LineageRecord::new();
    record.add_source(LineageSource::detect(&root.join("frames"), &settings()).unwrap());
    record.add_source(LineageSource::detect(&root.join("labels.zip"), &settings()).unwrap());
    record.add_param("destination", root.join("merged").as_path());
    record
}

fn explode(root: &Path) {
    fs::create_dir_all(root.join("frames")).unwrap();
    fs::write(root.join("frames/clip_0001.jpg"), b"jpeg").unwrap();
    // Written inside the directory so the merge step can read it back.
    let fingerprint = IncrementalBuild::at(
        explode_record(root),
        &Sidecar::Dataset(root.join("frames")),
        &settings(),
    )
    .finish()
    .unwrap();
    assert!(fingerprint.is_complete());
}

#[test]
fn rebuilding_unchanged_pipeline_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_inputs(root);
    explode(root);

    let sidecar = Sidecar::Dataset(root.join("merged"));
    let first = IncrementalBuild::at(merge_record(root), &sidecar, &settings());
    assert_eq!(first.check().unwrap().freshness, Freshness::NoPrevious);
    first.finish().unwrap();

    let second = IncrementalBuild::at(merge_record(root), &sidecar, &settings());
    assert_eq!(second.check().unwrap().freshness, Freshness::UpToDate);
}

#[test]
fn upstream_change_propagates_through_nested_lineage() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_inputs(root);
    explode(root);

    let sidecar = Sidecar::Dataset(root.join("merged"));
    IncrementalBuild::at(merge_record(root), &sidecar, &settings())
        .finish()
        .unwrap();

    fs::write(root.join("clip.mp4"), b"a different cut").unwrap();
    explode(root);

    let check = IncrementalBuild::at(merge_record(root), &sidecar, &settings())
        .check()
        .unwrap();
    assert_eq!(check.freshness, Freshness::Changed);
}

#[test]
fn merged_sidecar_keeps_two_levels_of_provenance() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_inputs(root);
    explode(root);

    let sidecar = Sidecar::Dataset(root.join("merged"));
    IncrementalBuild::at(merge_record(root), &sidecar, &settings())
        .finish()
        .unwrap();

    let loaded = load(&sidecar.path(&settings())).unwrap();
    let frames = &loaded.sources()[0];
    let video = &frames.sources()[0];
    let archive = &loaded.sources()[1];

    assert_eq!(
        video.source_hash(),
        hash_file(&root.join("clip.mp4"), 4096).unwrap()
    );
    assert_eq!(frames.source_hash(), hash_str(video.source_hash()));
    assert_eq!(
        archive.source_hash(),
        hash_file(&root.join("labels.zip"), 4096).unwrap()
    );
    assert_eq!(archive.annotation_path(), root.join("labels.zip").to_string_lossy());
}

#[test]
fn directory_without_lineage_is_never_up_to_date() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_inputs(root);
    fs::create_dir(root.join("frames")).unwrap();

    let sidecar = Sidecar::Dataset(root.join("merged"));
    IncrementalBuild::at(merge_record(root), &sidecar, &settings())
        .finish()
        .unwrap();

    let check = IncrementalBuild::at(merge_record(root), &sidecar, &settings())
        .check()
        .unwrap();
    assert_eq!(check.freshness, Freshness::Incomplete);
    assert!(!check.current.is_complete());
}

#[test]
fn param_order_scenario() {
    let digest = hash_str("video bytes");
    let mut first = LineageRecord::from_parts(vec![LineageSource::new(digest.clone())], Params::new());
    first.extend_params([("label", "cat")]);
    first.add_param("strict", true);

    let mut second = LineageRecord::from_parts(vec![LineageSource::new(digest)], Params::new());
    second.add_param("strict", true);
    second.add_param("label", "cat");

    assert!(voc_core::is_up_to_date(&first, &second));
}
