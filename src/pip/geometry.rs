//! Planar measurements and containment tests on boundary geometry.
//!
//! Area and perimeter are computed in raw degrees. That is fine for ranking
//! barangays inside a single city but they are not geodesic quantities.

use geo::{BoundingRect, Coord, Geometry, LineString, Polygon, Rect};

use crate::models::{self, Position};

/// Mean Earth radius used for haversine distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Point features count as containing a query within this distance
pub const POINT_MATCH_RADIUS_KM: f64 = 0.01;

/// Axis-aligned box over every vertex of the geometry
pub fn bounding_box(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    geometry.bounding_rect()
}

/// Unweighted mean of the exterior-ring positions as stored in the dataset.
///
/// Works on the raw rings rather than the `geo` conversion, which closes
/// every ring. A ring that repeats its first position contributes it twice.
/// Interior rings are ignored. Multi-polygon parts are pooled into one mean.
pub fn vertex_centroid(geometry: &models::Geometry) -> Option<Coord<f64>> {
    let mut sum = Coord { x: 0.0, y: 0.0 };
    let mut count = 0usize;

    let mut fold = |rings: &[Vec<Position>]| {
        for p in rings.first().into_iter().flatten() {
            sum = sum + Coord::from(*p);
            count += 1;
        }
    };

    match geometry {
        models::Geometry::Point(p) => return Some(Coord::from(*p)),
        models::Geometry::Polygon(rings) => fold(rings.as_slice()),
        models::Geometry::MultiPolygon(parts) => {
            parts.iter().for_each(|rings| fold(rings.as_slice()))
        }
    }

    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Shoelace area of the exterior ring(s), in square degrees
pub fn planar_area(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(p) => ring_area(p.exterior()),
        Geometry::MultiPolygon(mp) => mp.iter().map(|p| ring_area(p.exterior())).sum(),
        _ => 0.0,
    }
}

/// Euclidean length of the exterior ring(s), in degrees
pub fn planar_perimeter(geometry: &Geometry<f64>) -> f64 {
    match geometry {
        Geometry::Polygon(p) => ring_perimeter(p.exterior()),
        Geometry::MultiPolygon(mp) => mp.iter().map(|p| ring_perimeter(p.exterior())).sum(),
        _ => 0.0,
    }
}

fn ring_area(ring: &LineString<f64>) -> f64 {
    let twice: f64 = ring
        .lines()
        .map(|l| l.start.x * l.end.y - l.end.x * l.start.y)
        .sum();
    twice.abs() / 2.0
}

fn ring_perimeter(ring: &LineString<f64>) -> f64 {
    ring.lines()
        .map(|l| (l.dx() * l.dx() + l.dy() * l.dy()).sqrt())
        .sum()
}

/// Ring vertices without the repeated closing vertex
fn open_ring(ring: &LineString<f64>) -> &[Coord<f64>] {
    let coords = ring.0.as_slice();
    match coords {
        [first, .., last] if first == last => &coords[..coords.len() - 1],
        _ => coords,
    }
}

/// Ray-casting test against a single ring.
///
/// For every edge straddling the query latitude, the crossing longitude is
/// computed and the inside flag toggles when the query lies west of it.
pub fn ray_cast(ring: &LineString<f64>, lng: f64, lat: f64) -> bool {
    let coords = open_ring(ring);
    if coords.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (a, b) = (coords[i], coords[j]);
        if (a.y > lat) != (b.y > lat) {
            let crossing = (b.x - a.x) * (lat - a.y) / (b.y - a.y) + a.x;
            if lng < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn polygon_contains(polygon: &Polygon<f64>, lng: f64, lat: f64) -> bool {
    ray_cast(polygon.exterior(), lng, lat)
}

/// Whether a feature geometry contains the query point.
///
/// Only exterior rings are tested, so points inside holes still match.
pub fn contains(geometry: &Geometry<f64>, lng: f64, lat: f64) -> bool {
    match geometry {
        Geometry::Point(p) => haversine_km(lat, lng, p.y(), p.x()) < POINT_MATCH_RADIUS_KM,
        Geometry::Polygon(p) => polygon_contains(p, lng, lat),
        Geometry::MultiPolygon(mp) => mp.iter().any(|p| polygon_contains(p, lng, lat)),
        _ => false,
    }
}

/// Great-circle distance in kilometers
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, point, polygon, MultiPolygon};

    fn ring(coords: &[(f64, f64)]) -> Vec<Position> {
        coords.iter().map(|&(lng, lat)| Position { lng, lat }).collect()
    }

    fn unit_square() -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0)
        ])
    }

    #[test]
    fn test_square_measurements() {
        let square = unit_square();
        assert_eq!(planar_area(&square), 1.0);
        assert_eq!(planar_perimeter(&square), 4.0);

        let bbox = bounding_box(&square).unwrap();
        assert_eq!(bbox.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(bbox.max(), coord! { x: 1.0, y: 1.0 });
    }

    #[test]
    fn test_centroid_is_vertex_mean_not_area_weighted() {
        // Extra vertices along the bottom edge pull the mean down
        let shape = models::Geometry::Polygon(vec![ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
        ])]);
        let c = vertex_centroid(&shape).unwrap();
        assert!((c.x - 2.0).abs() < 1e-12);
        assert!((c.y - 8.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_counts_positions_as_given() {
        let open = models::Geometry::Polygon(vec![ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])]);
        assert_eq!(vertex_centroid(&open), Some(coord! { x: 0.5, y: 0.5 }));

        // The repeated first position is averaged in a second time
        let closed = models::Geometry::Polygon(vec![ring(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (1.0, 0.0),
            (0.0, 0.0),
        ])]);
        assert_eq!(vertex_centroid(&closed), Some(coord! { x: 0.4, y: 0.4 }));
    }

    #[test]
    fn test_centroid_ignores_holes_and_pools_parts() {
        let with_hole = models::Geometry::Polygon(vec![
            ring(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)]),
            ring(&[(3.0, 3.0), (3.0, 3.5), (3.5, 3.5), (3.5, 3.0)]),
        ]);
        assert_eq!(vertex_centroid(&with_hole), Some(coord! { x: 2.0, y: 2.0 }));

        let parts = models::Geometry::MultiPolygon(vec![
            vec![ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])],
            vec![ring(&[(4.0, 0.0), (4.0, 1.0), (5.0, 1.0), (5.0, 0.0)])],
        ]);
        assert_eq!(vertex_centroid(&parts), Some(coord! { x: 2.5, y: 0.5 }));

        assert_eq!(vertex_centroid(&models::Geometry::Polygon(vec![])), None);
        assert_eq!(vertex_centroid(&models::Geometry::MultiPolygon(vec![vec![]])), None);
    }

    #[test]
    fn test_multipolygon_sums_parts() {
        let mp = Geometry::MultiPolygon(MultiPolygon::new(vec![
            polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 0.0)],
            polygon![(x: 5.0, y: 5.0), (x: 5.0, y: 7.0), (x: 7.0, y: 7.0), (x: 7.0, y: 5.0)],
        ]));
        assert_eq!(planar_area(&mp), 5.0);
        assert_eq!(planar_perimeter(&mp), 12.0);
        assert!(contains(&mp, 6.0, 6.0));
        assert!(contains(&mp, 0.5, 0.5));
        assert!(!contains(&mp, 3.0, 3.0));
    }

    #[test]
    fn test_ray_cast_concave() {
        // U shape opening upward
        let u = Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 3.0),
            (x: 2.0, y: 3.0),
            (x: 2.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 3.0),
            (x: 0.0, y: 3.0)
        ]);
        assert!(contains(&u, 0.5, 2.0));
        assert!(contains(&u, 2.5, 2.0));
        assert!(contains(&u, 1.5, 0.5));
        assert!(!contains(&u, 1.5, 2.0));
        assert!(!contains(&u, -1.0, 0.5));
    }

    #[test]
    fn test_point_feature_match_radius() {
        let p = Geometry::Point(point!(x: 125.6, y: 7.07));
        assert!(contains(&p, 125.6, 7.07));
        assert!(!contains(&p, 125.61, 7.07));
        assert_eq!(planar_area(&p), 0.0);
        let raw = models::Geometry::Point(Position { lng: 125.6, lat: 7.07 });
        assert_eq!(vertex_centroid(&raw), Some(coord! { x: 125.6, y: 7.07 }));
    }

    #[test]
    fn test_haversine() {
        assert_eq!(haversine_km(7.0, 125.0, 7.0, 125.0), 0.0);
        // One degree of latitude
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01);
        assert_eq!(haversine_km(5.0, 5.0, 0.5, 0.5), haversine_km(0.5, 0.5, 5.0, 5.0));
    }
}
