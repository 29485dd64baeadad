//! Sidecar persistence for lineage records.
//!
//! A dataset's lineage lives in a pretty-printed JSON document next to the
//! data it describes:
//!
//! ```json
//! {
//!   "sources": [
//!     { "annotation_path": "", "image_path": "", "root_dir": "", "sourcehash": "", "sources": [] }
//!   ],
//!   "params": { "label": "cat", "strict": true },
//!   "dataset_hash": "…",
//!   "has_sources_without_hash": false
//! }
//! ```
//!
//! Loading validates digest shapes and caps the depth of the source tree, so
//! a hand-edited or hostile file cannot smuggle in malformed provenance.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::LineageError;
use crate::hash::is_digest;
use crate::params::Params;
use crate::record::{Fingerprint, LineageRecord};
use crate::settings::{DEFAULT_MAX_DEPTH, LineageSettings};
use crate::source::LineageSource;

/// On-disk shape of a lineage sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineageDocument {
    #[serde(default)]
    pub sources: Vec<LineageSource>,
    #[serde(default)]
    pub params: Params,
    /// Composite fingerprint at the time the document was written.
    #[serde(default)]
    pub dataset_hash: String,
    #[serde(default)]
    pub has_sources_without_hash: bool,
}

impl LineageDocument {
    /// Snapshot `record` with a freshly computed fingerprint.
    #[must_use]
    pub fn from_record(record: &LineageRecord) -> Self {
        let fingerprint = record.compute_fingerprint();
        Self {
            sources: record.sources().to_vec(),
            params: record.params().clone(),
            dataset_hash: fingerprint.dataset_hash,
            has_sources_without_hash: !fingerprint.complete,
        }
    }

    /// Turn the document back into a record.
    ///
    /// The stored digest is kept as the record's cached value; a document
    /// without one is fingerprinted lazily. Completeness is always derived
    /// from the source tree, never from the stored flag.
    #[must_use]
    pub fn into_record(self) -> LineageRecord {
        if self.dataset_hash.is_empty() {
            return LineageRecord::from_parts(self.sources, self.params);
        }

        let complete = !self.sources.iter().any(LineageSource::has_missing_hash);
        if complete == self.has_sources_without_hash {
            tracing::warn!(
                dataset_hash = %self.dataset_hash,
                stored = self.has_sources_without_hash,
                "has_sources_without_hash disagrees with the source tree; using the tree"
            );
        }

        let fingerprint = Fingerprint {
            dataset_hash: self.dataset_hash,
            complete,
        };
        LineageRecord::with_stored_fingerprint(self.sources, self.params, fingerprint)
    }

    fn validate(&self, path: &Path, max_depth: usize) -> Result<(), LineageError> {
        if !self.dataset_hash.is_empty() && !is_digest(&self.dataset_hash) {
            return Err(LineageError::parse(
                path,
                format!("dataset_hash '{}' is not a sha256 digest", self.dataset_hash),
            ));
        }

        for source in &self.sources {
            if source.depth() > max_depth {
                return Err(LineageError::parse(
                    path,
                    format!("source tree deeper than {max_depth} levels"),
                ));
            }
            validate_source(source, path)?;
        }

        Ok(())
    }
}

fn validate_source(source: &LineageSource, path: &Path) -> Result<(), LineageError> {
    let digest = source.source_hash();
    if !digest.is_empty() && !is_digest(digest) {
        return Err(LineageError::parse(
            path,
            format!("sourcehash '{digest}' is not a sha256 digest"),
        ));
    }
    source
        .sources()
        .iter()
        .try_for_each(|nested| validate_source(nested, path))
}

/// Where a dataset's sidecar lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sidecar {
    /// Inside the dataset directory, under the configured file name.
    Dataset(PathBuf),
    /// Next to a frames directory that is wiped on every rebuild:
    /// `<dir>` + configured suffix.
    Frames(PathBuf),
}

impl Sidecar {
    #[must_use]
    pub fn path(&self, settings: &LineageSettings) -> PathBuf {
        match self {
            Self::Dataset(dir) => dir.join(&settings.file_name),
            Self::Frames(dir) => {
                let trimmed = dir.components().collect::<PathBuf>();
                let mut name = trimmed.into_os_string();
                name.push(&settings.frames_suffix);
                PathBuf::from(name)
            }
        }
    }

    /// The dataset directory this sidecar describes.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        match self {
            Self::Dataset(dir) | Self::Frames(dir) => dir,
        }
    }
}

/// Write `record` to `path`, recomputing its fingerprint first.
///
/// Missing parent directories are created. Returns the fingerprint written.
///
/// # Errors
///
/// Returns [`LineageError::Io`] if the file cannot be written.
pub fn dump(record: &LineageRecord, path: &Path) -> Result<Fingerprint, LineageError> {
    let document = LineageDocument::from_record(record);
    let mut body = serde_json::to_string_pretty(&document)?;
    body.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LineageError::from_io(parent, e))?;
    }
    fs::write(path, body).map_err(|e| LineageError::from_io(path, e))?;

    tracing::info!(
        path = %path.display(),
        dataset_hash = %document.dataset_hash,
        complete = !document.has_sources_without_hash,
        "wrote lineage sidecar"
    );

    Ok(Fingerprint {
        dataset_hash: document.dataset_hash,
        complete: !document.has_sources_without_hash,
    })
}

/// Read a sidecar with the default depth cap.
///
/// # Errors
///
/// See [`load_with_limit`].
pub fn load(path: &Path) -> Result<LineageRecord, LineageError> {
    load_with_limit(path, DEFAULT_MAX_DEPTH)
}

/// Read a sidecar, rejecting source trees deeper than `max_depth`.
///
/// # Errors
///
/// Returns [`LineageError::NotFound`] if the file is absent and
/// [`LineageError::Parse`] if it is not a valid lineage document.
pub fn load_with_limit(path: &Path, max_depth: usize) -> Result<LineageRecord, LineageError> {
    let document = read_document(path)?;
    document.validate(path, max_depth)?;
    tracing::debug!(path = %path.display(), sources = document.sources.len(), "loaded lineage sidecar");
    Ok(document.into_record())
}

/// Read the raw document without validation.
///
/// # Errors
///
/// Returns [`LineageError::NotFound`] if the file is absent and
/// [`LineageError::Parse`] if it is not JSON of the expected shape.
pub fn read_document(path: &Path) -> Result<LineageDocument, LineageError> {
    let body = fs::read_to_string(path).map_err(|e| LineageError::from_io(path, e))?;
    serde_json::from_str(&body).map_err(|e| LineageError::parse(path, e.to_string()))
}

/// JSON Schema describing [`LineageDocument`].
///
/// # Errors
///
/// Returns [`LineageError::Serialize`] if the schema cannot be encoded.
pub fn lineage_schema() -> Result<serde_json::Value, LineageError> {
    Ok(serde_json::to_value(schemars::schema_for!(LineageDocument))?)
}
