//! Lineage sources: the upstream inputs a dataset was derived from.
//!
//! A source is one of three kinds of input:
//!
//! - a single file (a video, an image archive to explode), hashed by content;
//! - a zip archive of annotations, hashed by the archive's own bytes;
//! - a dataset directory produced by an earlier run, whose persisted lineage
//!   is projected into a source so provenance chains across generations.
//!
//! Sources are assembled once and never mutated afterwards. The `with_*`
//! builders consume and return the value so a tree can be put together
//! before it is handed to a record.

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::LineageError;
use crate::hash::hash_file;
use crate::settings::LineageSettings;
use crate::store;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineageSource {
    /// Logical path of the annotation-bearing artifact.
    #[serde(default)]
    annotation_path: String,
    #[serde(default)]
    image_path: String,
    /// Base directory relative paths inside the source resolve against.
    #[serde(default)]
    root_dir: String,
    /// Hex SHA-256 digest, or empty when the hash is unavailable.
    #[serde(default, rename = "sourcehash")]
    source_hash: String,
    #[serde(default)]
    sources: Vec<LineageSource>,
}

impl LineageSource {
    /// A source carrying `source_hash` and nothing else.
    #[must_use]
    pub fn new(source_hash: impl Into<String>) -> Self {
        Self {
            source_hash: source_hash.into(),
            ..Self::default()
        }
    }

    /// A source whose content could not be hashed.
    #[must_use]
    pub fn unhashed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_annotation_path(mut self, annotation_path: impl Into<String>) -> Self {
        self.annotation_path = annotation_path.into();
        self
    }

    #[must_use]
    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Self>) -> Self {
        self.sources = sources;
        self
    }

    /// Source for a single file, hashed by content.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::NotFound`] if the file is absent, or
    /// [`LineageError::Io`] if it cannot be read.
    pub fn from_file(path: &Path, settings: &LineageSettings) -> Result<Self, LineageError> {
        let digest = hash_file(path, settings.chunk_size)?;
        let absolute = std::path::absolute(path).map_err(|e| LineageError::from_io(path, e))?;
        Ok(Self::new(digest).with_image_path(absolute.to_string_lossy()))
    }

    /// Source for a zip archive of annotations.
    ///
    /// The digest covers the archive file itself, not its entries. `root_dir`
    /// defaults to the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::NotFound`] if the archive does not exist.
    pub fn from_archive(
        path: &Path,
        root_dir: Option<&Path>,
        settings: &LineageSettings,
    ) -> Result<Self, LineageError> {
        if !path.exists() {
            return Err(LineageError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let root_dir = match root_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| LineageError::from_io(path, e))?,
        };
        let digest = hash_file(path, settings.chunk_size)?;

        Ok(Self::new(digest)
            .with_annotation_path(path.to_string_lossy())
            .with_root_dir(root_dir.to_string_lossy()))
    }

    /// Source for a dataset directory written by an earlier run.
    ///
    /// When the directory carries a lineage sidecar, the persisted record is
    /// projected with [`LineageRecord::as_source`](crate::LineageRecord::as_source).
    /// Without one the source has no hash and any record containing it is
    /// incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::NotFound`] if `dir` is absent and
    /// [`LineageError::Parse`] if its sidecar is malformed.
    pub fn from_dataset_dir(dir: &Path, settings: &LineageSettings) -> Result<Self, LineageError> {
        let metadata = fs::metadata(dir).map_err(|e| LineageError::from_io(dir, e))?;
        if !metadata.is_dir() {
            return Err(LineageError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "expected a dataset directory",
                ),
            });
        }

        let root_dir = std::path::absolute(dir).map_err(|e| LineageError::from_io(dir, e))?;
        let sidecar = dir.join(&settings.file_name);

        let source = match store::load_with_limit(&sidecar, settings.max_depth) {
            Ok(record) => record.as_source(),
            Err(error) if error.is_not_found() => {
                tracing::warn!(
                    dir = %root_dir.display(),
                    "dataset directory has no lineage sidecar; its provenance is unknown"
                );
                Self::unhashed()
            }
            Err(error) => return Err(error),
        };

        Ok(source.with_root_dir(root_dir.to_string_lossy()))
    }

    /// Build a source from any input path, picking the kind from what is on disk.
    ///
    /// Directories are dataset directories, `.zip` files are annotation
    /// archives rooted at their parent directory, anything else is a single
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::NotFound`] if `path` does not exist, plus any
    /// error of the chosen constructor.
    pub fn detect(path: &Path, settings: &LineageSettings) -> Result<Self, LineageError> {
        let metadata = fs::metadata(path).map_err(|e| LineageError::from_io(path, e))?;
        if metadata.is_dir() {
            return Self::from_dataset_dir(path, settings);
        }

        if is_zip(path) {
            let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
            return Self::from_archive(path, parent, settings);
        }

        Self::from_file(path, settings)
    }

    #[must_use]
    pub fn annotation_path(&self) -> &str {
        &self.annotation_path
    }

    #[must_use]
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    #[must_use]
    pub fn root_dir(&self) -> &str {
        &self.root_dir
    }

    /// The digest, or `""` when unavailable.
    #[must_use]
    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    #[must_use]
    pub fn sources(&self) -> &[Self] {
        &self.sources
    }

    /// Whether this source or any nested source lacks a hash.
    #[must_use]
    pub fn has_missing_hash(&self) -> bool {
        self.source_hash.is_empty() || self.sources.iter().any(Self::has_missing_hash)
    }

    /// Height of the source tree; a source without nested sources has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.sources.iter().map(Self::depth).max().unwrap_or(0)
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::hash::hash_str;
    use crate::record::LineageRecord;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn file_source_hashes_content_and_records_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "clip.mp4", b"frames");

        let source = LineageSource::from_file(&path, &LineageSettings::default()).unwrap();

        assert_eq!(source.source_hash(), hash_str("frames"));
        assert_eq!(source.image_path(), path.to_string_lossy());
        assert!(source.root_dir().is_empty());
        assert!(source.annotation_path().is_empty());
        assert!(source.sources().is_empty());
    }

    #[test]
    fn archive_source_hashes_archive_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "labels.zip", b"PK not really a zip");

        let source =
            LineageSource::from_archive(&path, Some(dir.path()), &LineageSettings::default())
                .unwrap();

        assert_eq!(source.source_hash(), hash_str("PK not really a zip"));
        assert_eq!(source.annotation_path(), path.to_string_lossy());
        assert_eq!(source.root_dir(), dir.path().to_string_lossy());
    }

    #[test]
    fn archive_root_dir_defaults_to_cwd() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "labels.zip", b"zip");

        let source = LineageSource::from_archive(&path, None, &LineageSettings::default()).unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(source.root_dir(), cwd.to_string_lossy());
    }

    #[test]
    fn missing_archive_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = LineageSource::from_archive(
            &dir.path().join("absent.zip"),
            None,
            &LineageSettings::default(),
        )
        .expect_err("archive is missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn dataset_dir_without_sidecar_is_unhashed() {
        let dir = TempDir::new().unwrap();

        let source = LineageSource::from_dataset_dir(dir.path(), &LineageSettings::default()).unwrap();

        assert!(source.source_hash().is_empty());
        assert!(source.has_missing_hash());
        let expected = std::path::absolute(dir.path()).unwrap();
        assert_eq!(source.root_dir(), expected.to_string_lossy());
    }

    #[test]
    fn dataset_dir_with_sidecar_projects_its_record() {
        let dir = TempDir::new().unwrap();
        let settings = LineageSettings::default();
        let a = LineageSource::new(hash_str("a"));
        let b = LineageSource::new(hash_str("b"));
        let mut record = LineageRecord::new();
        record.add_source(a.clone());
        record.add_source(b.clone());
        record.add_param("label", "cat");
        store::dump(&record, &dir.path().join(&settings.file_name)).unwrap();

        let source = LineageSource::from_dataset_dir(dir.path(), &settings).unwrap();

        let concatenated = format!("{}{}", hash_str("a"), hash_str("b"));
        assert_eq!(source.source_hash(), hash_str(&concatenated));
        assert_eq!(source.sources(), &[a, b]);
        assert!(!source.has_missing_hash());
    }

    #[test]
    fn dataset_dir_with_malformed_sidecar_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, "data-lineage.json", b"{ not json");

        let err = LineageSource::from_dataset_dir(dir.path(), &LineageSettings::default())
            .expect_err("malformed sidecar");
        assert!(matches!(err, LineageError::Parse { .. }));
    }

    #[test]
    fn missing_dataset_dir_is_not_found() {
        let err = LineageSource::from_dataset_dir(
            Path::new("/nonexistent/dataset"),
            &LineageSettings::default(),
        )
        .expect_err("directory is missing");
        assert!(err.is_not_found());
    }

    #[test]
    fn detect_picks_kind_from_disk() {
        let dir = TempDir::new().unwrap();
        let settings = LineageSettings::default();
        let zip = write(&dir, "Batch.ZIP", b"zip");
        let video = write(&dir, "clip.mp4", b"video");
        let dataset = dir.path().join("dataset");
        fs::create_dir(&dataset).unwrap();

        let archive = LineageSource::detect(&zip, &settings).unwrap();
        assert_eq!(archive.annotation_path(), zip.to_string_lossy());
        assert_eq!(archive.root_dir(), dir.path().to_string_lossy());

        let file = LineageSource::detect(&video, &settings).unwrap();
        assert!(file.annotation_path().is_empty());
        assert!(!file.image_path().is_empty());

        let directory = LineageSource::detect(&dataset, &settings).unwrap();
        assert!(directory.source_hash().is_empty());

        let err = LineageSource::detect(&dir.path().join("nope"), &settings).expect_err("absent");
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_hash_is_found_at_any_depth() {
        let leaf = LineageSource::unhashed();
        let middle = LineageSource::new(hash_str("m")).with_sources(vec![leaf]);
        let top = LineageSource::new(hash_str("t")).with_sources(vec![middle]);

        assert!(top.has_missing_hash());
        assert_eq!(top.depth(), 3);
        assert!(!LineageSource::new(hash_str("x")).has_missing_hash());
    }
}
