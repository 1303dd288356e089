//! Barangay lookup service for resolving a point to its subdivision.

#[cfg(test)]
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::cache::{CacheKey, ResultCache};
use super::loader::load_boundaries;
use super::stats::{PerformanceMonitor, PerformanceStats};
use super::BoundaryIndex;
use crate::config::LocatorConfig;
use crate::error::LocatorError;
use crate::models::{BarangaySummary, FeatureCollection, Resolution, ResolutionMethod};

/// Lifecycle of the boundary index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorState {
    Uninitialized,
    Initializing,
    Ready,
    /// Initialization failed; every call returns the same error
    Failed,
}

impl LocatorState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LocatorState::Uninitialized,
            1 => LocatorState::Initializing,
            2 => LocatorState::Ready,
            _ => LocatorState::Failed,
        }
    }
}

/// Mutable bookkeeping shared by all queries
#[derive(Debug)]
struct QueryState {
    cache: ResultCache,
    monitor: PerformanceMonitor,
}

/// Point-in-polygon barangay resolver.
///
/// The dataset is loaded on first use. Concurrent first callers wait on the
/// same load, and a failed load is remembered for the life of the value.
pub struct Locator {
    config: LocatorConfig,
    index: OnceCell<Result<Arc<BoundaryIndex>, LocatorError>>,
    state: AtomicU8,
    query_state: Mutex<QueryState>,
    /// Dataset loads attempted
    #[cfg(test)]
    loads: AtomicUsize,
}

impl Locator {
    /// Create a locator that loads `config.dataset_paths` lazily
    pub fn new(config: LocatorConfig) -> Self {
        let query_state = Mutex::new(QueryState {
            cache: ResultCache::new(config.cache_capacity),
            monitor: PerformanceMonitor::new(),
        });

        Self {
            config,
            index: OnceCell::new(),
            state: AtomicU8::new(LocatorState::Uninitialized as u8),
            query_state,
            #[cfg(test)]
            loads: AtomicUsize::new(0),
        }
    }

    /// Create an already initialized locator over an in-memory dataset
    pub fn from_collection(collection: FeatureCollection, config: LocatorConfig) -> Self {
        let index = BoundaryIndex::build(collection, config.quadtree);
        let (result, state) = if index.is_empty() {
            let err = LocatorError::EmptyDataset {
                path: "<memory>".into(),
            };
            (Err(err), LocatorState::Failed)
        } else {
            (Ok(Arc::new(index)), LocatorState::Ready)
        };

        Self {
            index: OnceCell::new_with(Some(result)),
            state: AtomicU8::new(state as u8),
            ..Self::new(config)
        }
    }

    pub fn state(&self) -> LocatorState {
        LocatorState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: LocatorState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Loaded index, initializing on first call
    pub async fn index(&self) -> Result<Arc<BoundaryIndex>, LocatorError> {
        self.index
            .get_or_init(|| self.initialize())
            .await
            .clone()
    }

    async fn initialize(&self) -> Result<Arc<BoundaryIndex>, LocatorError> {
        let start = Instant::now();
        self.set_state(LocatorState::Initializing);
        info!("Initializing barangay locator...");

        let result = self.load_index().await;
        match &result {
            Ok(index) => {
                self.set_state(LocatorState::Ready);
                info!(
                    "Barangay locator initialized in {}ms",
                    start.elapsed().as_millis()
                );
                info!("Loaded {} barangays", index.features().len());
                if let Some(quality) = index.metadata().get("dataQuality") {
                    info!("Data quality: {}", quality);
                }
            }
            Err(e) => {
                self.set_state(LocatorState::Failed);
                tracing::error!("Failed to initialize barangay locator: {}", e);
            }
        }
        result
    }

    async fn load_index(&self) -> Result<Arc<BoundaryIndex>, LocatorError> {
        #[cfg(test)]
        self.loads.fetch_add(1, Ordering::SeqCst);

        let collection = load_boundaries(&self.config.dataset_paths).await?;
        let index = BoundaryIndex::build(collection, self.config.quadtree);
        if index.is_empty() {
            return Err(LocatorError::EmptyDataset {
                path: self.config.dataset_paths.first().cloned().unwrap_or_default(),
            });
        }
        Ok(Arc::new(index))
    }

    fn validate(&self, lat: f64, lng: f64) -> Result<(), LocatorError> {
        // NaN fails both range checks
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(LocatorError::InvalidCoordinate { lat, lng });
        }

        if !self.config.region.contains(lat, lng) {
            warn!(
                "Coordinates may be outside the supported area: {}, {}",
                lat, lng
            );
        }
        Ok(())
    }

    /// Resolve a coordinate to the barangay containing it.
    ///
    /// Falls back to the barangay with the nearest centroid when no boundary
    /// contains the point, so any valid coordinate yields a result.
    pub async fn resolve(&self, lat: f64, lng: f64) -> Result<Resolution, LocatorError> {
        let start = Instant::now();
        let index = self.index().await?;
        self.validate(lat, lng)?;

        let key = CacheKey::new(lat, lng);
        {
            let mut state = self.query_state.lock();
            if let Some(cached) = state.cache.get(&key).cloned() {
                state
                    .monitor
                    .record_cache_hit(start.elapsed().as_secs_f64() * 1000.0);
                debug!("Cache hit for ({}, {}): {}", lat, lng, cached.barangay);
                return Ok(cached);
            }
        }

        debug!("Resolving barangay for coordinates: {}, {}", lat, lng);
        let mut result = match index.containing(lng, lat) {
            Some(entry) => Resolution::from_feature(
                &entry.feature,
                ResolutionMethod::PolygonIntersection,
                lat,
                lng,
            ),
            None => {
                // Non-empty index guarantees a nearest entry
                let (entry, distance) = index
                    .nearest(lat, lng)
                    .ok_or_else(|| LocatorError::EmptyDataset {
                        path: self.config.dataset_paths.first().cloned().unwrap_or_default(),
                    })?;
                let mut r = Resolution::from_feature(
                    &entry.feature,
                    ResolutionMethod::NearestNeighbor,
                    lat,
                    lng,
                );
                r.distance_km = Some(distance);
                r
            }
        };

        let query_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        result.query_time_ms = query_time_ms;

        {
            let mut state = self.query_state.lock();
            state.monitor.record_query(query_time_ms, result.method);
            state.cache.insert(key, result.clone());
        }

        debug!(
            "Found: {} ({}, {:?})",
            result.barangay, result.method, result.confidence
        );
        Ok(result)
    }

    /// Identifying properties of every loaded barangay
    pub async fn list_all(&self) -> Result<Vec<BarangaySummary>, LocatorError> {
        Ok(self.index().await?.summaries())
    }

    /// Metadata block of the loaded dataset
    pub async fn metadata(&self) -> Result<serde_json::Map<String, serde_json::Value>, LocatorError> {
        Ok(self.index().await?.metadata().clone())
    }

    pub async fn performance_stats(&self) -> Result<PerformanceStats, LocatorError> {
        self.index().await?;
        let state = self.query_state.lock();
        Ok(state.monitor.snapshot(state.cache.len()))
    }
}
