//! Spatial index for fast barangay lookups.

use std::sync::Arc;

use geo::{coord, Coord, Intersects, Rect};
use tracing::{info, warn};

use super::geometry;
use super::quadtree::QuadTree;
use crate::config::QuadTreeConfig;
use crate::models::{BarangaySummary, Feature, FeatureCollection};

/// A feature with its precomputed spatial summary
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub feature: Arc<Feature>,
    pub geometry: geo::Geometry<f64>,
    pub bbox: Rect<f64>,
    pub centroid: Coord<f64>,
    /// Planar shoelace area in square degrees
    pub area: f64,
    /// Planar perimeter in degrees
    pub perimeter: f64,
}

impl IndexEntry {
    /// Returns `None` for geometry without any vertices
    pub fn new(feature: Arc<Feature>) -> Option<Self> {
        let geometry = feature.geometry.to_geo();
        let bbox = geometry::bounding_box(&geometry)?;
        let centroid = geometry::vertex_centroid(&feature.geometry)?;
        let area = geometry::planar_area(&geometry);
        let perimeter = geometry::planar_perimeter(&geometry);

        Some(Self {
            feature,
            geometry,
            bbox,
            centroid,
            area,
            perimeter,
        })
    }

    pub fn name(&self) -> &str {
        &self.feature.properties.name
    }

    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        geometry::contains(&self.geometry, lng, lat)
    }

    /// Great-circle distance from the query to this entry's centroid
    pub fn centroid_distance_km(&self, lat: f64, lng: f64) -> f64 {
        geometry::haversine_km(lat, lng, self.centroid.y, self.centroid.x)
    }
}

/// Immutable lookup structure over a loaded boundary dataset.
///
/// Entries are sorted by ascending area so nested or overlapping boundaries
/// resolve to the most specific one.
pub struct BoundaryIndex {
    features: Vec<Arc<Feature>>,
    metadata: serde_json::Map<String, serde_json::Value>,
    entries: Vec<IndexEntry>,
    tree: Option<QuadTree>,
}

impl BoundaryIndex {
    /// Build spatial index from a feature collection
    pub fn build(collection: FeatureCollection, config: QuadTreeConfig) -> Self {
        info!(
            "Building spatial index for {} barangays...",
            collection.features.len()
        );

        let features: Vec<Arc<Feature>> = collection.features.into_iter().map(Arc::new).collect();

        let mut entries: Vec<IndexEntry> = Vec::with_capacity(features.len());
        for feature in &features {
            match IndexEntry::new(Arc::clone(feature)) {
                Some(entry) => entries.push(entry),
                None => warn!(
                    "Skipping barangay {:?}: geometry has no vertices",
                    feature.properties.name
                ),
            }
        }

        // Smaller (more specific) areas first; stable for equal areas
        entries.sort_by(|a, b| a.area.total_cmp(&b.area));

        let tree = QuadTree::build(
            entries.iter().enumerate().map(|(id, e)| (id, e.bbox)),
            config,
        );

        info!("Spatial index built with {} entries", entries.len());
        if let Some(tree) = &tree {
            info!("Quad-tree holds {} entries, depth {}", tree.len(), tree.depth());
        }

        Self {
            features,
            metadata: collection.metadata,
            entries,
            tree,
        }
    }

    /// Entries whose bounding box contains the point, smallest area first
    pub fn candidates(&self, lng: f64, lat: f64) -> Vec<&IndexEntry> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };

        let point = coord! { x: lng, y: lat };
        let mut ids = tree.query(&Rect::new(point, point));
        ids.sort_unstable();
        ids.into_iter().map(|id| &self.entries[id]).collect()
    }

    /// Same as [`candidates`](Self::candidates) but by scanning every entry
    pub fn candidates_linear(&self, lng: f64, lat: f64) -> Vec<&IndexEntry> {
        let point = coord! { x: lng, y: lat };
        self.entries
            .iter()
            .filter(|e| e.bbox.intersects(&point))
            .collect()
    }

    /// Smallest boundary containing the point
    pub fn containing(&self, lng: f64, lat: f64) -> Option<&IndexEntry> {
        self.candidates(lng, lat)
            .into_iter()
            .find(|e| e.contains(lng, lat))
    }

    /// Entry with the closest centroid and its distance in km
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<(&IndexEntry, f64)> {
        self.entries
            .iter()
            .map(|e| (e, e.centroid_distance_km(lat, lng)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Loaded features, in dataset order
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    pub fn summaries(&self) -> Vec<BarangaySummary> {
        self.features
            .iter()
            .map(|f| BarangaySummary::from(f.as_ref()))
            .collect()
    }

    pub fn metadata(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;
    use crate::pip::fixtures::{collection, square};

    #[test]
    fn test_sorted_by_area() {
        let index = BoundaryIndex::build(
            collection(vec![
                square("Large", 0.0, 0.0, 4.0),
                square("Small", 1.0, 1.0, 1.0),
                square("Medium", 0.5, 0.5, 2.0),
            ]),
            QuadTreeConfig::default(),
        );

        let names: Vec<&str> = index.entries().iter().map(IndexEntry::name).collect();
        assert_eq!(names, vec!["Small", "Medium", "Large"]);

        // Dataset order is kept for listing
        assert_eq!(index.features()[0].properties.name, "Large");
    }

    #[test]
    fn test_nested_resolves_to_smallest() {
        let index = BoundaryIndex::build(
            collection(vec![
                square("Large", 0.0, 0.0, 4.0),
                square("Small", 1.0, 1.0, 1.0),
            ]),
            QuadTreeConfig::default(),
        );

        assert_eq!(index.containing(1.5, 1.5).map(IndexEntry::name), Some("Small"));
        assert_eq!(index.containing(3.5, 3.5).map(IndexEntry::name), Some("Large"));
        assert!(index.containing(5.0, 5.0).is_none());
    }

    #[test]
    fn test_entry_measurements() {
        let entry = IndexEntry::new(Arc::new(square("A", 0.0, 0.0, 2.0))).unwrap();
        assert_eq!(entry.area, 4.0);
        assert_eq!(entry.perimeter, 8.0);
        // Fixture rings repeat their first corner
        assert_eq!(entry.centroid, coord! { x: 0.8, y: 0.8 });
        assert_eq!(entry.bbox.max(), coord! { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_empty_geometry_skipped() {
        let mut empty = square("Empty", 0.0, 0.0, 1.0);
        empty.geometry = Geometry::Polygon(vec![]);

        let index = BoundaryIndex::build(
            collection(vec![empty, square("Real", 0.0, 0.0, 1.0)]),
            QuadTreeConfig::default(),
        );
        assert_eq!(index.len(), 1);
        assert_eq!(index.summaries().len(), 2);
    }

    #[test]
    fn test_tree_candidates_match_linear_scan() {
        // 12x12 patchwork of 0.01 degree cells around Davao
        let mut features = Vec::new();
        for row in 0..12 {
            for col in 0..12 {
                let name = format!("Cell {row}-{col}");
                let size = 0.01 + (row * 12 + col) as f64 * 1e-5;
                features.push(square(&name, 125.5 + col as f64 * 0.01, 7.0 + row as f64 * 0.01, size));
            }
        }
        let index = BoundaryIndex::build(collection(features), QuadTreeConfig::default());

        for i in 0..50 {
            let lng = 125.4995 + i as f64 * 0.00251;
            let lat = 7.1205 - i as f64 * 0.00243;
            let tree: Vec<&str> = index.candidates(lng, lat).into_iter().map(IndexEntry::name).collect();
            let linear: Vec<&str> = index
                .candidates_linear(lng, lat)
                .into_iter()
                .map(IndexEntry::name)
                .collect();
            assert_eq!(tree, linear, "at ({lat}, {lng})");
        }
    }

    #[test]
    fn test_nearest_picks_closest_centroid() {
        let index = BoundaryIndex::build(
            collection(vec![
                square("West", 0.0, 0.0, 1.0),
                square("East", 10.0, 0.0, 1.0),
            ]),
            QuadTreeConfig::default(),
        );

        let (entry, distance) = index.nearest(0.5, 8.0).unwrap();
        assert_eq!(entry.name(), "East");
        assert_eq!(entry.centroid, coord! { x: 10.4, y: 0.4 });
        assert_eq!(distance, geometry::haversine_km(0.5, 8.0, 0.4, 10.4));
    }
}
