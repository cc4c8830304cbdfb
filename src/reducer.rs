use geojson::{Feature, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::track_types::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minimum spacing between kept track points. Chosen by the original system;
/// kept as-is for compatibility.
pub const DISTANCE_THRESHOLD_METERS: f64 = 10.0;

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * 1000.0
}

fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_meters(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Downsample a raw point sequence with greedy distance-threshold filtering.
///
/// The first and last points are always kept; an interior point is kept only
/// when its distance from the most recently kept point exceeds the threshold.
/// This bounds sample spacing in a single order-preserving pass; it does not
/// minimize deviation from the original shape. A sequence that cannot form a
/// line (<2 input points) is reported as absent.
pub fn reduce(points: &[GeoPoint]) -> Option<Vec<GeoPoint>> {
    if points.len() < 2 {
        return None;
    }

    let mut kept = vec![points[0].clone()];
    for p in &points[1..points.len() - 1] {
        if distance_between(kept.last().unwrap(), p) > DISTANCE_THRESHOLD_METERS {
            kept.push(p.clone());
        }
    }
    kept.push(points[points.len() - 1].clone());

    Some(kept)
}

/// Total length of a track, in meters.
pub fn track_distance_meters(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_between(&pair[0], &pair[1]))
        .sum()
}

/// Human-readable distance: "734m", "1.2km".
pub fn distance_label(meters: f64) -> String {
    if meters > 1000.0 {
        format!("{}km", (meters / 100.0).round() / 10.0)
    } else {
        format!("{}m", meters.round() as i64)
    }
}

/// Expose a reduced track as a GeoJSON LineString for the map layer,
/// with [lon, lat, ele] coordinates and distance properties.
pub fn to_line_feature(points: &[GeoPoint]) -> Feature {
    let coords: Vec<Vec<f64>> = points
        .iter()
        .map(|p| vec![p.longitude, p.latitude, p.elevation_meters])
        .collect();

    let distance = track_distance_meters(points);
    let mut props = Map::new();
    props.insert(
        "distanceMeters".to_string(),
        JsonValue::Number(serde_json::Number::from_f64(distance).unwrap_or(0.into())),
    );
    props.insert(
        "distanceLabel".to_string(),
        JsonValue::String(distance_label(distance)),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}
