//! Lineage records and their composite fingerprint.
//!
//! A record holds the sources and parameters a dataset was built from. Its
//! fingerprint is
//!
//! ```text
//! sha256( hash(source[0]) + hash(source[1]) + ... + canonical(params) )
//! ```
//!
//! Source order is significant, parameter order is not. The fingerprint is
//! cached on first use and the cache is dropped by every mutating method.

use std::cell::OnceCell;

use serde::Serialize;

use crate::hash::hash_str;
use crate::params::{ParamValue, Params};
use crate::source::LineageSource;

/// Composite digest of a record plus whether every source was hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub dataset_hash: String,
    /// False when any source, at any depth, has no hash.
    pub complete: bool,
}

impl Fingerprint {
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.dataset_hash
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineageRecord {
    sources: Vec<LineageSource>,
    params: Params,
    fingerprint: OnceCell<Fingerprint>,
}

impl PartialEq for LineageRecord {
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources && self.params == other.params
    }
}

impl Eq for LineageRecord {}

impl LineageRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_parts(sources: Vec<LineageSource>, params: Params) -> Self {
        Self {
            sources,
            params,
            fingerprint: OnceCell::new(),
        }
    }

    /// Rebuild a persisted record whose fingerprint was stored alongside it.
    pub(crate) fn with_stored_fingerprint(
        sources: Vec<LineageSource>,
        params: Params,
        fingerprint: Fingerprint,
    ) -> Self {
        Self {
            sources,
            params,
            fingerprint: OnceCell::from(fingerprint),
        }
    }

    #[must_use]
    pub fn sources(&self) -> &[LineageSource] {
        &self.sources
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    pub fn add_source(&mut self, source: LineageSource) {
        self.sources.push(source);
        self.invalidate();
    }

    pub fn set_sources(&mut self, sources: Vec<LineageSource>) {
        self.sources = sources;
        self.invalidate();
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key, value);
        self.invalidate();
    }

    pub fn extend_params<K, V>(&mut self, params: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.params.extend(params);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.fingerprint.take();
    }

    /// Compute the fingerprint from the current sources and params,
    /// bypassing the cache.
    #[must_use]
    pub fn compute_fingerprint(&self) -> Fingerprint {
        let mut buffer = String::with_capacity(self.sources.len() * crate::hash::DIGEST_LEN);
        for source in &self.sources {
            buffer.push_str(source.source_hash());
        }
        buffer.push_str(&self.params.canonical());

        Fingerprint {
            dataset_hash: hash_str(&buffer),
            complete: !self.sources.iter().any(LineageSource::has_missing_hash),
        }
    }

    /// The cached fingerprint, computed on first access after a mutation.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        self.fingerprint.get_or_init(|| self.compute_fingerprint())
    }

    #[must_use]
    pub fn dataset_hash(&self) -> &str {
        self.fingerprint().digest()
    }

    #[must_use]
    pub fn has_sources_without_hash(&self) -> bool {
        !self.fingerprint().is_complete()
    }

    /// Project this record into a source for a downstream dataset.
    ///
    /// The nested sources are this record's sources, unchanged. The digest is
    /// the hash of their concatenated digests; unhashed sources contribute
    /// nothing to it and stay visible through
    /// [`LineageSource::has_missing_hash`].
    #[must_use]
    pub fn as_source(&self) -> LineageSource {
        let concatenated = self
            .sources
            .iter()
            .map(LineageSource::source_hash)
            .collect::<String>();

        LineageSource::new(hash_str(&concatenated)).with_sources(self.sources.clone())
    }
}
