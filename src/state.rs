use crate::config::Config;
use crate::source::{Loaded, WageSource};
use crate::wages::WageDataset;
use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};
use tokio::sync::{Mutex, OnceCell};
use tracing::error;

const MAX_CACHED_WORKERS: usize = 256;

type DatasetCell = Arc<OnceCell<Arc<WageDataset>>>;

/// Loaded datasets by worker name, oldest evicted first once full.
#[derive(Debug)]
pub struct DatasetCache {
    capacity: usize,
    cells: HashMap<String, DatasetCell>,
    order: VecDeque<String>,
}

impl DatasetCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            cells: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// The cell for `name`; `refresh` swaps in an empty one.
    fn cell(&mut self, name: &str, refresh: bool) -> DatasetCell {
        if !refresh {
            if let Some(cell) = self.cells.get(name) {
                return Arc::clone(cell);
            }
        }

        let cell = DatasetCell::default();
        if self.cells.insert(name.to_string(), Arc::clone(&cell)).is_none() {
            self.order.push_back(name.to_string());
            while self.order.len() > self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.cells.remove(&oldest);
                }
            }
        }
        cell
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: WageSource,
    pub datasets: Arc<Mutex<DatasetCache>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let source = WageSource::from_config(&config);
        Self::with_source(config, source)
    }

    pub fn with_source(config: Config, source: WageSource) -> Self {
        Self {
            config: Arc::new(config),
            source,
            datasets: Arc::new(Mutex::new(DatasetCache::new(MAX_CACHED_WORKERS))),
        }
    }

    /// Dataset for `name`, fetched on first use and reused afterwards.
    /// `refresh` replaces the loaded dataset. Concurrent requests for the
    /// same name share one fetch; other names are never blocked by it.
    /// The sample fallback is returned but not kept, so the next request
    /// retries the real source.
    pub async fn dataset_for(&self, name: Option<&str>, refresh: bool) -> Arc<WageDataset> {
        let Some(name) = name else {
            error!("missing required query parameter: name");
            return Arc::new(WageDataset::default());
        };

        let cell = self.datasets.lock().await.cell(name, refresh);
        let loaded = cell
            .get_or_try_init(|| async {
                match self.source.fetch(name).await {
                    Loaded::Fresh(dataset) => Ok(Arc::new(dataset)),
                    Loaded::Fallback(dataset) => Err(Arc::new(dataset)),
                }
            })
            .await;

        match loaded {
            Ok(dataset) => Arc::clone(dataset),
            Err(fallback) => fallback,
        }
    }
}
