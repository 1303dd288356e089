//! Point-in-polygon (PIP) barangay lookup.
//!
//! Loads barangay boundaries, indexes them by area behind a quad-tree and
//! resolves coordinates by ray casting with a nearest-centroid fallback.

mod cache;
pub mod geometry;
mod index;
mod loader;
mod quadtree;
mod service;
mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cache::{CacheKey, ResultCache};
pub use index::{BoundaryIndex, IndexEntry};
pub use loader::{load_boundaries, parse_boundaries};
pub use quadtree::QuadTree;
pub use service::{Locator, LocatorState};
pub use stats::{PerformanceMonitor, PerformanceStats};
