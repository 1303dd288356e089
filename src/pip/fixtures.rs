//! Small synthetic datasets shared by the unit tests.

use crate::models::{Feature, FeatureCollection, FeatureProperties, Geometry, Position};

/// Axis-aligned square barangay with its lower-left corner at `(x, y)`.
/// The ring is closed, as in published GeoJSON.
pub(crate) fn square(name: &str, x: f64, y: f64, size: f64) -> Feature {
    let mut feature = open_square(name, x, y, size);
    if let Geometry::Polygon(rings) = &mut feature.geometry {
        rings[0].push(Position { lng: x, lat: y });
    }
    feature
}

/// Same square with only its four corners, first corner not repeated
pub(crate) fn open_square(name: &str, x: f64, y: f64, size: f64) -> Feature {
    let ring = [(x, y), (x, y + size), (x + size, y + size), (x + size, y)]
        .into_iter()
        .map(|(lng, lat)| Position { lng, lat })
        .collect();

    Feature {
        geometry: Geometry::Polygon(vec![ring]),
        properties: FeatureProperties {
            name: name.to_string(),
            city: "Davao City".to_string(),
            province: "Davao del Sur".to_string(),
            region: "Region XI".to_string(),
            source: None,
        },
    }
}

pub(crate) fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        metadata: Default::default(),
    }
}

/// GeoJSON text for the collection, as the loader reads it from disk
pub(crate) fn geojson(features: &[Feature]) -> String {
    serde_json::json!({
        "type": "FeatureCollection",
        "metadata": { "dataQuality": "test" },
        "features": features,
    })
    .to_string()
}
