//! Sidecar naming and load limits.

use serde::{Deserialize, Serialize};
use voc_core::settings::{DEFAULT_FRAMES_SUFFIX, DEFAULT_LINEAGE_FILE, DEFAULT_MAX_DEPTH};

fn default_file_name() -> String {
    DEFAULT_LINEAGE_FILE.to_string()
}

fn default_frames_suffix() -> String {
    DEFAULT_FRAMES_SUFFIX.to_string()
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineageConfig {
    /// File name of the sidecar written inside a dataset directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Suffix appended to a frames directory path to name its sidecar.
    #[serde(default = "default_frames_suffix")]
    pub frames_suffix: String,

    /// Deepest source tree accepted when loading a sidecar.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            frames_suffix: default_frames_suffix(),
            max_depth: default_max_depth(),
        }
    }
}
