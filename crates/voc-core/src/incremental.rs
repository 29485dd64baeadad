//! Skip-or-build protocol for dataset-producing tools.
//!
//! A tool assembles the record for the dataset it is about to produce, asks
//! [`IncrementalBuild::check`] once before touching the output, and calls
//! [`IncrementalBuild::finish`] once after the output was written
//! successfully. A failed build never reaches `finish`, so the previous
//! sidecar keeps describing whatever was last produced completely.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::LineageError;
use crate::oracle::{Freshness, assess};
use crate::record::{Fingerprint, LineageRecord};
use crate::settings::LineageSettings;
use crate::store::{self, Sidecar};

/// Outcome of comparing the current record with the persisted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub freshness: Freshness,
    pub current: Fingerprint,
    pub previous: Option<Fingerprint>,
}

impl Check {
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        self.freshness.is_up_to_date()
    }
}

#[derive(Debug)]
pub struct IncrementalBuild {
    record: LineageRecord,
    sidecar: PathBuf,
    output_dir: Option<PathBuf>,
    max_depth: usize,
}

impl IncrementalBuild {
    /// Guard a build whose sidecar is written to `sidecar`.
    #[must_use]
    pub fn new(record: LineageRecord, sidecar: PathBuf, settings: &LineageSettings) -> Self {
        Self {
            record,
            sidecar,
            output_dir: None,
            max_depth: settings.max_depth,
        }
    }

    /// Guard a build at a sidecar location. Frames sidecars sit outside the
    /// directory they describe, so that directory must also still exist.
    #[must_use]
    pub fn at(record: LineageRecord, sidecar: &Sidecar, settings: &LineageSettings) -> Self {
        let build = Self::new(record, sidecar.path(settings), settings);
        match sidecar {
            Sidecar::Dataset(_) => build,
            Sidecar::Frames(dir) => build.require_output(dir.clone()),
        }
    }

    /// Treat the dataset as stale whenever `dir` is not an existing directory.
    #[must_use]
    pub fn require_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    #[must_use]
    pub const fn record(&self) -> &LineageRecord {
        &self.record
    }

    #[must_use]
    pub fn sidecar_path(&self) -> &Path {
        &self.sidecar
    }

    /// The record persisted by the previous run, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Parse`] if the sidecar exists but is
    /// malformed, or [`LineageError::Io`] if it cannot be read.
    pub fn previous(&self) -> Result<Option<LineageRecord>, LineageError> {
        match store::load_with_limit(&self.sidecar, self.max_depth) {
            Ok(record) => Ok(Some(record)),
            Err(error) if error.is_not_found() => {
                tracing::debug!(sidecar = %self.sidecar.display(), "no previous lineage");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Decide whether the build can be skipped.
    ///
    /// # Errors
    ///
    /// See [`IncrementalBuild::previous`].
    pub fn check(&self) -> Result<Check, LineageError> {
        let previous = self.previous()?;

        let output_missing = self.output_dir.as_deref().is_some_and(|dir| !dir.is_dir());
        let freshness = if output_missing {
            Freshness::OutputMissing
        } else {
            assess(&self.record, previous.as_ref())
        };

        Ok(Check {
            freshness,
            current: self.record.fingerprint().clone(),
            previous: previous.map(|record| record.fingerprint().clone()),
        })
    }

    /// Persist the record after a successful build.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Io`] if the sidecar cannot be written.
    pub fn finish(self) -> Result<Fingerprint, LineageError> {
        store::dump(&self.record, &self.sidecar)
    }
}
