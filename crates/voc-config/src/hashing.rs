//! Content hashing configuration.

use serde::{Deserialize, Serialize};
use voc_core::hash::DEFAULT_CHUNK_SIZE;

const fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HashingConfig {
    /// Bytes read per block while hashing a file.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}
