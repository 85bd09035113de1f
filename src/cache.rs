//! Process-scoped read-through cache over the dataset file.

use std::sync::{Arc, Mutex};

use crate::dataset::{load_dataset, DataPaths};
use crate::schema::Dataset;

/// Loads the dataset once and hands out shared handles until explicitly
/// invalidated.  Callers own the cache, so reloads stay explicit instead of
/// hiding behind a global every accessor mutates.
pub struct DatasetCache {
    paths: DataPaths,
    cached: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            cached: Mutex::new(None),
        }
    }

    /// The cached dataset, loading it (with backup failover) on first use.
    pub fn get(&self) -> anyhow::Result<Arc<Dataset>> {
        let mut cached = self.cached.lock().unwrap();
        if let Some(dataset) = &*cached {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_dataset(&self.paths)?);
        *cached = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the cached copy; the next `get` rereads from disk.
    pub fn invalidate(&self) {
        *self.cached.lock().unwrap() = None;
    }

    pub fn reload(&self) -> anyhow::Result<Arc<Dataset>> {
        self.invalidate();
        self.get()
    }
}
