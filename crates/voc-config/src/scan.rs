use serde::{Deserialize, Serialize};
use voc_core::settings::DEFAULT_ANNOTATION_EXTENSION;

fn default_annotation_extension() -> String {
    DEFAULT_ANNOTATION_EXTENSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Extension of annotation files counted inside dataset directories.
    #[serde(default = "default_annotation_extension")]
    pub annotation_extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            annotation_extension: default_annotation_extension(),
        }
    }
}
