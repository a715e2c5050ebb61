//! Load-once cache for the scoring artifact.
//!
//! The artifact is loaded at most once per cache lifetime, under a mutex so
//! concurrent first callers cannot race the load. A failed load is cached
//! too: retries would just repeat the same I/O and the same answer. Tests
//! get a fresh lifecycle by constructing a fresh cache.

use crate::artifact::{ArtifactError, ScoringArtifact};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Debug, Clone)]
enum CacheState {
    Unloaded,
    Loaded(Arc<ScoringArtifact>),
    Failed(ArtifactError),
}

#[derive(Debug)]
pub struct ModelCache {
    state: Mutex<CacheState>,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::Unloaded),
        }
    }

    /// Return the cached artifact, running `loader` only on the first call.
    /// Both outcomes are sticky for the lifetime of the cache.
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<ScoringArtifact>, ArtifactError>
    where
        F: FnOnce() -> Result<ScoringArtifact, ArtifactError>,
    {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let CacheState::Unloaded = *state {
            *state = match loader() {
                Ok(artifact) => CacheState::Loaded(Arc::new(artifact)),
                Err(err) => {
                    warn!(%err, "scoring artifact unavailable");
                    CacheState::Failed(err)
                }
            };
        }

        match &*state {
            CacheState::Loaded(artifact) => Ok(Arc::clone(artifact)),
            CacheState::Failed(err) => Err(err.clone()),
            CacheState::Unloaded => unreachable!("state settled above"),
        }
    }
}
