//! Counter sources: where collection passes get their snapshots from.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use perfcounter_common::{CounterSnapshot, SnapshotDocument};
use tracing::trace;

use crate::error::CollectError;

/// Provider of counter-object snapshots.
///
/// Implementations must be safe to call from overlapping scrapes.
pub trait CounterSource: Send + Sync {
    /// Fetch the current snapshot of `object`.
    fn fetch(&self, object: &str) -> Result<CounterSnapshot, CollectError>;
}

/// Reads a JSON [`SnapshotDocument`] from disk on every fetch.
#[derive(Debug, Clone)]
pub struct SnapshotFileSource {
    path: PathBuf,
}

impl SnapshotFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CounterSource for SnapshotFileSource {
    fn fetch(&self, object: &str) -> Result<CounterSnapshot, CollectError> {
        let document = SnapshotDocument::read_from_file(&self.path).map_err(|e| {
            CollectError::unavailable(
                object,
                format!("failed to read {}: {}", self.path.display(), e),
            )
        })?;

        let snapshot = document.snapshot(object).ok_or_else(|| {
            CollectError::unavailable(
                object,
                format!("object not present in {}", self.path.display()),
            )
        })?;

        trace!(
            object,
            instances = snapshot.len(),
            path = %self.path.display(),
            "Read counter snapshot"
        );
        Ok(snapshot)
    }
}

/// In-memory source with per-object scripted results.
///
/// Records every fetch so callers can check which objects were queried.
#[derive(Debug, Default)]
pub struct MemorySource {
    objects: HashMap<String, Result<CounterSnapshot, String>>,
    fetched: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `snapshot` for its object.
    pub fn with_snapshot(mut self, snapshot: CounterSnapshot) -> Self {
        self.objects.insert(snapshot.object.clone(), Ok(snapshot));
        self
    }

    /// Fail every fetch of `object` with `reason`.
    pub fn with_failure(mut self, object: impl Into<String>, reason: impl Into<String>) -> Self {
        self.objects.insert(object.into(), Err(reason.into()));
        self
    }

    /// Objects fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }
}

impl CounterSource for MemorySource {
    fn fetch(&self, object: &str) -> Result<CounterSnapshot, CollectError> {
        self.fetched.lock().push(object.to_string());

        match self.objects.get(object) {
            Some(Ok(snapshot)) => Ok(snapshot.clone()),
            Some(Err(reason)) => Err(CollectError::unavailable(object, reason.clone())),
            None => Err(CollectError::unavailable(object, "object not registered")),
        }
    }
}
