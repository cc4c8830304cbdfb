use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::TopoError;
use crate::track_types::{ElevationSource, GeoPoint};

type Result<T> = std::result::Result<T, TopoError>;

/// Parse GPX track text into a raw (unreduced) point sequence.
///
/// Reads every `<trkpt>` with valid `lat`/`lon` attributes and its optional
/// `<ele>` child. Points with missing or unparseable coordinates are skipped;
/// broken markup truncates the result rather than failing.
pub fn parse_gpx(xml: &str) -> Vec<GeoPoint> {
    let mut reader = Reader::from_str(xml);
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"trkpt" => {
                match parse_trkpt(&e, &mut reader) {
                    Ok(Some(pt)) => points.push(pt),
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"trkpt" => {
                if let Ok((lat, lon)) = parse_lat_lon(&e) {
                    points.push(GeoPoint::new(lat, lon));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    points
}

/// Parse TCX track text into a raw (unreduced) point sequence.
///
/// Reads every `<Trackpoint>` with a nested `Position` (latitude/longitude
/// degrees) and optional `AltitudeMeters`. Trackpoints without a nonzero
/// latitude and longitude are discarded.
pub fn parse_tcx(xml: &str) -> Vec<GeoPoint> {
    let mut reader = Reader::from_str(xml);
    let mut points = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"Trackpoint" => {
                match parse_trackpoint(&mut reader) {
                    Ok(Some(pt)) => points.push(pt),
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    points
}

/// Parse lat/lon attributes from a trkpt start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| TopoError::XmlParse(e.into()))?;
        let key = attr.key.local_name();
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match key.as_ref() {
            b"lat" => {
                lat = Some(val.parse::<f64>().map_err(|_| TopoError::InvalidAttribute {
                    element: "trkpt",
                    attribute: "lat",
                    value: val.to_string(),
                })?);
            }
            b"lon" => {
                lon = Some(val.parse::<f64>().map_err(|_| TopoError::InvalidAttribute {
                    element: "trkpt",
                    attribute: "lon",
                    value: val.to_string(),
                })?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(TopoError::MissingAttribute {
        element: "trkpt",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(TopoError::MissingAttribute {
        element: "trkpt",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

/// Parse a `<trkpt>` element and its children.
/// Called after receiving Event::Start for the element.
fn parse_trkpt<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<GeoPoint>> {
    let (lat, lon) = match parse_lat_lon(start) {
        Ok(coords) => coords,
        Err(_) => {
            // Skip this point if lat/lon are missing or invalid
            reader.read_to_end(start.name()).map_err(TopoError::XmlParse)?;
            return Ok(None);
        }
    };

    let mut elevation = 0.0;
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = reader.read_text(e.name()).map_err(TopoError::XmlParse)?;
                    elevation = text.trim().parse::<f64>().unwrap_or(0.0);
                }
                _ => {
                    // Skip time/extensions/etc.
                    reader.read_to_end(e.name()).map_err(TopoError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(TopoError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(GeoPoint::with_elevation(
        lat,
        lon,
        elevation,
        ElevationSource::Gpx,
    )))
}

/// Parse a `<Trackpoint>` element and its children.
fn parse_trackpoint<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<GeoPoint>> {
    let mut lat = 0.0;
    let mut lon = 0.0;
    let mut elevation = 0.0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"Position" => {
                    let (p_lat, p_lon) = parse_position(reader)?;
                    lat = p_lat;
                    lon = p_lon;
                }
                b"AltitudeMeters" => {
                    let text = reader.read_text(e.name()).map_err(TopoError::XmlParse)?;
                    elevation = text.trim().parse::<f64>().unwrap_or(0.0);
                }
                _ => {
                    reader.read_to_end(e.name()).map_err(TopoError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"Trackpoint" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(TopoError::XmlParse(e)),
            _ => {}
        }
    }

    if lat != 0.0 && lon != 0.0 {
        Ok(Some(GeoPoint::with_elevation(
            lat,
            lon,
            elevation,
            ElevationSource::Tcx,
        )))
    } else {
        Ok(None)
    }
}

/// Parse a `<Position>` element's latitude/longitude degrees.
fn parse_position<'a>(reader: &mut Reader<&'a [u8]>) -> Result<(f64, f64)> {
    let mut lat = 0.0;
    let mut lon = 0.0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"LatitudeDegrees" => {
                    let text = reader.read_text(e.name()).map_err(TopoError::XmlParse)?;
                    lat = text.trim().parse::<f64>().unwrap_or(0.0);
                }
                b"LongitudeDegrees" => {
                    let text = reader.read_text(e.name()).map_err(TopoError::XmlParse)?;
                    lon = text.trim().parse::<f64>().unwrap_or(0.0);
                }
                _ => {
                    reader.read_to_end(e.name()).map_err(TopoError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"Position" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(TopoError::XmlParse(e)),
            _ => {}
        }
    }

    Ok((lat, lon))
}
