//! Tunables shared by source construction, persistence, and scanning.

use crate::hash::DEFAULT_CHUNK_SIZE;

/// Default sidecar file name inside a dataset directory.
pub const DEFAULT_LINEAGE_FILE: &str = "data-lineage.json";

/// Default suffix for sidecars that sit next to a frames directory.
pub const DEFAULT_FRAMES_SUFFIX: &str = "_frames_lineage.json";

/// Default cap on source-tree depth accepted when loading a sidecar.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default annotation file extension.
pub const DEFAULT_ANNOTATION_EXTENSION: &str = "xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageSettings {
    /// Sidecar file name inside a dataset directory.
    pub file_name: String,
    /// Suffix appended to a frames directory path to locate its sidecar.
    pub frames_suffix: String,
    /// Deepest source tree accepted from a persisted sidecar.
    pub max_depth: usize,
    /// Read size used when hashing files.
    pub chunk_size: usize,
    /// Extension (without dot) of annotation files.
    pub annotation_extension: String,
}

impl Default for LineageSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_LINEAGE_FILE.to_string(),
            frames_suffix: DEFAULT_FRAMES_SUFFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            annotation_extension: DEFAULT_ANNOTATION_EXTENSION.to_string(),
        }
    }
}
