//! Up-to-date decisions between a freshly assembled record and the one
//! persisted by the previous run.
//!
//! The comparison is conservative: if either side has a source without a
//! hash the answer is "not up to date", even when the digests happen to
//! match.

use serde::Serialize;

use crate::record::LineageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Fingerprints match and both are complete.
    UpToDate,
    /// Both fingerprints are complete and they differ.
    Changed,
    /// At least one side has sources without a hash.
    Incomplete,
    /// No previous record exists.
    NoPrevious,
    /// The output the previous record describes is gone.
    OutputMissing,
}

impl Freshness {
    #[must_use]
    pub const fn is_up_to_date(self) -> bool {
        matches!(self, Self::UpToDate)
    }

    /// Short human explanation used in CLI output.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::UpToDate => "inputs and parameters are unchanged",
            Self::Changed => "inputs or parameters changed",
            Self::Incomplete => "some sources have no hash, cannot prove the dataset is current",
            Self::NoPrevious => "no previous lineage recorded",
            Self::OutputMissing => "output directory is missing",
        }
    }
}

/// Compare `current` against `previous`.
#[must_use]
pub fn compare(current: &LineageRecord, previous: &LineageRecord) -> Freshness {
    let current = current.fingerprint();
    let previous = previous.fingerprint();

    if !current.is_complete() || !previous.is_complete() {
        tracing::warn!(
            current = %current.digest(),
            current_complete = current.is_complete(),
            previous = %previous.digest(),
            previous_complete = previous.is_complete(),
            "skipping up-to-date check: lineage has sources without hash"
        );
        return Freshness::Incomplete;
    }

    if current.digest() == previous.digest() {
        tracing::info!(dataset_hash = %current.digest(), "dataset is up to date");
        Freshness::UpToDate
    } else {
        tracing::info!(
            current = %current.digest(),
            previous = %previous.digest(),
            "dataset fingerprint changed"
        );
        Freshness::Changed
    }
}

/// Whether a dataset built from `current` would equal the one described by
/// `previous`.
#[must_use]
pub fn is_up_to_date(current: &LineageRecord, previous: &LineageRecord) -> bool {
    compare(current, previous).is_up_to_date()
}

/// Like [`compare`], treating an absent previous record as "no prior state".
#[must_use]
pub fn assess(current: &LineageRecord, previous: Option<&LineageRecord>) -> Freshness {
    previous.map_or(Freshness::NoPrevious, |previous| compare(current, previous))
}
