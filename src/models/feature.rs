//! Boundary dataset types as they appear on disk.

use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A single `[lng, lat]` position. Extra ordinates (altitude) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat, ..] => Ok(Self {
                lng: *lng,
                lat: *lat,
            }),
            _ => Err(format!(
                "position needs at least 2 ordinates, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lng, p.lat]
    }
}

impl From<Position> for Coord<f64> {
    fn from(p: Position) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

/// GeoJSON-style geometry of a boundary feature
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// GeoJSON type name, reported back on every resolution
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Convert to a `geo` geometry. Rings are closed by `geo`.
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Point(p) => geo::Geometry::Point(Point::from(Coord::from(*p))),
            Geometry::Polygon(rings) => geo::Geometry::Polygon(rings_to_polygon(rings)),
            Geometry::MultiPolygon(parts) => geo::Geometry::MultiPolygon(MultiPolygon::new(
                parts.iter().map(|rings| rings_to_polygon(rings)).collect(),
            )),
        }
    }
}

fn rings_to_polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let mut rings = rings
        .iter()
        .map(|ring| ring.iter().copied().map(Coord::from).collect::<LineString<f64>>());
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Descriptive properties of a barangay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub region: String,
    /// Where the boundary came from (e.g. "arcgis", "osm")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// One administrative subdivision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// The whole boundary dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,

    /// Free-form dataset metadata, e.g. `{"dataQuality": "official"}`
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
