//! Query answers returned to callers.

use serde::{Deserialize, Serialize};

use super::Feature;

/// How a barangay was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// The point lies inside the barangay's boundary
    PolygonIntersection,
    /// No boundary contains the point; the closest centroid was used
    NearestNeighbor,
}

impl ResolutionMethod {
    pub fn confidence(&self) -> Confidence {
        match self {
            ResolutionMethod::PolygonIntersection => Confidence::High,
            ResolutionMethod::NearestNeighbor => Confidence::Medium,
        }
    }
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionMethod::PolygonIntersection => write!(f, "polygon_intersection"),
            ResolutionMethod::NearestNeighbor => write!(f, "nearest_neighbor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

/// Query coordinates echoed back in the result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Result of resolving a coordinate to a barangay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub barangay: String,
    pub city: String,
    pub province: String,
    pub region: String,
    pub source: String,
    pub geometry_type: String,
    pub method: ResolutionMethod,
    pub confidence: Confidence,

    /// Distance to the chosen centroid, only for nearest-neighbor matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    pub coordinates: Coordinates,
    pub query_time_ms: f64,
}

impl Resolution {
    pub fn from_feature(feature: &Feature, method: ResolutionMethod, lat: f64, lng: f64) -> Self {
        let props = &feature.properties;
        Self {
            barangay: props.name.clone(),
            city: props.city.clone(),
            province: props.province.clone(),
            region: props.region.clone(),
            source: props.source.clone().unwrap_or_else(|| "unknown".to_string()),
            geometry_type: feature.geometry.type_name().to_string(),
            method,
            confidence: method.confidence(),
            distance_km: None,
            coordinates: Coordinates { lat, lng },
            query_time_ms: 0.0,
        }
    }
}

/// Identifying properties of a loaded barangay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarangaySummary {
    pub name: String,
    pub city: String,
    pub province: String,
    pub region: String,
}

impl From<&Feature> for BarangaySummary {
    fn from(feature: &Feature) -> Self {
        let props = &feature.properties;
        Self {
            name: props.name.clone(),
            city: props.city.clone(),
            province: props.province.clone(),
            region: props.region.clone(),
        }
    }
}
