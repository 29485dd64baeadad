//! Annotation discovery inside dataset directories.
//!
//! Datasets are walked with every filter disabled: annotation folders are
//! frequently git-ignored or hidden, and a dataset is whatever is on disk.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::errors::LineageError;

/// All files under `root` whose extension equals `extension`, ignoring
/// ASCII case. The result is sorted.
///
/// # Errors
///
/// Returns [`LineageError::NotFound`] if `root` does not exist and
/// [`LineageError::Walk`] if an entry cannot be read.
pub fn find_annotations(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LineageError> {
    if !root.exists() {
        return Err(LineageError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let wanted = extension.trim_start_matches('.');
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| LineageError::Walk(e.to_string()))?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
        if matches {
            found.push(entry.into_path());
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "scanned annotations");
    Ok(found)
}
