//! Snapshot cache
//!
//! Memoizes the load+rank pipeline per (source path, categories, options).
//! Each key owns a `OnceCell`, so concurrent callers asking for the same
//! uncomputed key wait for a single computation and share its result.
//! Failed loads are not stored; the next call retries.

use crate::config::PipelineOptions;
use crate::error::LeaderboardResult;
use crate::types::LeaderboardSnapshot;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Inputs that fully determine a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub categories: Vec<String>,
    pub options: PipelineOptions,
}

impl CacheKey {
    pub fn new(path: &Path, categories: &[String], options: &PipelineOptions) -> Self {
        Self {
            path: path.to_path_buf(),
            categories: categories.to_vec(),
            options: options.clone(),
        }
    }
}

/// Counters reported by `LeaderboardCache::stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

type Slot = Arc<OnceCell<Arc<LeaderboardSnapshot>>>;

#[derive(Debug, Default)]
pub struct LeaderboardCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LeaderboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached `core::load_leaderboard`
    pub fn load(
        &self,
        path: &Path,
        categories: &[String],
        options: &PipelineOptions,
    ) -> LeaderboardResult<Arc<LeaderboardSnapshot>> {
        let key = CacheKey::new(path, categories, options);
        self.get_or_try_init(key, || super::load_leaderboard(path, categories, options))
    }

    /// Return the snapshot stored under `key`, running `compute` only if
    /// no snapshot is stored yet.
    pub fn get_or_try_init<F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> LeaderboardResult<Arc<LeaderboardSnapshot>>
    where
        F: FnOnce() -> LeaderboardResult<LeaderboardSnapshot>,
    {
        let slot = {
            let mut slots = self.lock();
            Arc::clone(slots.entry(key).or_default())
        };

        let mut computed = false;
        let snapshot = slot.get_or_try_init(|| {
            computed = true;
            compute().map(Arc::new)
        })?;

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(source = %snapshot.source.display(), "leaderboard cache miss");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(Arc::clone(snapshot))
    }

    /// Drop every cached snapshot
    pub fn clear(&self) {
        let mut slots = self.lock();
        let dropped = slots.len();
        slots.clear();
        tracing::info!(dropped, "leaderboard cache cleared");
    }

    /// Drop cached snapshots built from `path`
    pub fn invalidate(&self, path: &Path) {
        let mut slots = self.lock();
        let before = slots.len();
        slots.retain(|key, _| key.path != path);
        tracing::info!(
            source = %path.display(),
            dropped = before - slots.len(),
            "leaderboard cache invalidated"
        );
    }

    /// Number of keys holding a finished snapshot
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Slot>> {
        // Slots are only inserted or removed; a poisoned map is still usable
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
