//! Relation Fetchers
//!
//! A relation fetcher turns a document identifier into the raw envelope of
//! the referenced document. Fetching is synchronous from the builder's point
//! of view; timeouts and retries are the fetcher's responsibility.
//!
//! Provided implementations:
//!
//! - `NullRelationFetcher` - every lookup fails with `RelationNotFound`
//! - `StaticRelationFetcher` - in-memory map, counts fetches
//! - `DirectoryRelationFetcher` - reads `<dir>/<uuid>.json` exports

use crate::models::RelationWrapper;
use crate::services::error::FetchError;
use crate::utils::is_uuid;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Source of referenced documents
pub trait RelationFetcher: Send + Sync {
    fn fetch(&self, uuid: &str) -> Result<RelationWrapper, FetchError>;
}

/// Fetcher for builds that never resolve relations
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRelationFetcher;

impl RelationFetcher for NullRelationFetcher {
    fn fetch(&self, uuid: &str) -> Result<RelationWrapper, FetchError> {
        Err(FetchError::not_found(uuid))
    }
}

/// In-memory fetcher keyed by identifier
///
/// Records every lookup, including misses, so callers can assert how many
/// fetches a build performed.
#[derive(Debug, Default)]
pub struct StaticRelationFetcher {
    documents: HashMap<String, RelationWrapper>,
    fetch_count: AtomicUsize,
    fetch_log: Mutex<Vec<String>>,
}

impl StaticRelationFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uuid: impl Into<String>, wrapper: RelationWrapper) {
        self.documents.insert(uuid.into(), wrapper);
    }

    pub fn with_document(mut self, uuid: impl Into<String>, wrapper: RelationWrapper) -> Self {
        self.insert(uuid, wrapper);
        self
    }

    /// Add a document from its raw envelope (bare or `{"story": ...}`)
    pub fn with_raw_document(
        self,
        uuid: impl Into<String>,
        raw: Value,
    ) -> Result<Self, serde_json::Error> {
        let wrapper = RelationWrapper::from_value(raw)?;
        Ok(self.with_document(uuid, wrapper))
    }

    /// Total number of fetch calls served (hits and misses)
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::Acquire)
    }

    /// Identifiers requested so far, in request order
    pub fn fetch_log(&self) -> Vec<String> {
        match self.fetch_log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RelationFetcher for StaticRelationFetcher {
    fn fetch(&self, uuid: &str) -> Result<RelationWrapper, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::AcqRel);
        match self.fetch_log.lock() {
            Ok(mut log) => log.push(uuid.to_string()),
            Err(poisoned) => poisoned.into_inner().push(uuid.to_string()),
        }

        self.documents
            .get(uuid)
            .cloned()
            .ok_or_else(|| FetchError::not_found(uuid))
    }
}

/// Fetcher backed by a directory of exported story files
///
/// Each document lives at `<root>/<uuid>.json`, either as the bare envelope
/// or wrapped in `{"story": ...}`.
#[derive(Debug, Clone)]
pub struct DirectoryRelationFetcher {
    root: PathBuf,
}

impl DirectoryRelationFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RelationFetcher for DirectoryRelationFetcher {
    fn fetch(&self, uuid: &str) -> Result<RelationWrapper, FetchError> {
        // Only identifier-shaped names map to files, never arbitrary paths
        if !is_uuid(uuid) {
            return Err(FetchError::not_found(uuid));
        }

        let path = self.root.join(format!("{}.json", uuid));
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::not_found(uuid));
            }
            Err(e) => return Err(FetchError::Io(e)),
        };

        let raw: Value = serde_json::from_str(&contents)
            .map_err(|e| FetchError::invalid_payload(uuid, e))?;
        RelationWrapper::from_value(raw).map_err(|e| FetchError::invalid_payload(uuid, e))
    }
}
