use serde::{Deserialize, Serialize};

/// Which import format supplied a point's elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevationSource {
    #[serde(rename = "GPX")]
    Gpx,
    #[serde(rename = "TCX")]
    Tcx,
}

/// A single approach-track point in raw latitude/longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_source: Option<ElevationSource>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation_meters: 0.0,
            elevation_source: None,
        }
    }

    /// A point with its elevation attributed to `source` only when the
    /// elevation reading is positive (0 means "no reading" in both formats).
    pub fn with_elevation(
        latitude: f64,
        longitude: f64,
        elevation_meters: f64,
        source: ElevationSource,
    ) -> Self {
        Self {
            latitude,
            longitude,
            elevation_meters,
            elevation_source: (elevation_meters > 0.0).then_some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_source_only_when_positive() {
        let p = GeoPoint::with_elevation(60.0, 5.0, 0.0, ElevationSource::Gpx);
        assert!(p.elevation_source.is_none());
        let p = GeoPoint::with_elevation(60.0, 5.0, 123.5, ElevationSource::Gpx);
        assert_eq!(p.elevation_source, Some(ElevationSource::Gpx));
    }

    #[test]
    fn test_serialization_shape() {
        let p = GeoPoint::with_elevation(60.0, 5.0, 10.0, ElevationSource::Tcx);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "latitude": 60.0,
                "longitude": 5.0,
                "elevationMeters": 10.0,
                "elevationSource": "TCX"
            })
        );
        let bare = serde_json::to_value(GeoPoint::new(60.0, 5.0)).unwrap();
        assert!(bare.get("elevationSource").is_none());
    }
}
