//! Core data models for the barangay resolver.

pub mod feature;
pub mod resolution;

pub use feature::{Feature, FeatureCollection, FeatureProperties, Geometry, Position};
pub use resolution::{BarangaySummary, Confidence, Coordinates, Resolution, ResolutionMethod};
