pub mod error;
pub mod options;
pub mod overlay;
pub mod path;
pub mod reducer;
pub mod track_parser;
pub mod track_types;

use wasm_bindgen::prelude::*;

use crate::options::OverlayOptions;
use crate::overlay::SymbolSpec;
use crate::track_types::GeoPoint;

/// Parse a drawn route line into its oriented vertex list, returned as a JS
/// array of `{x, y, controlPoints?}` objects. Malformed input parses to an
/// empty array.
#[wasm_bindgen(js_name = parseTopoPath)]
pub fn parse_topo_path(d: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let points = path::orient_base_first(path::parse_path(d));
    serde_wasm_bindgen::to_value(&points).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render overlay symbols into display geometry, returned as a JS array of
/// tagged shape objects.
#[wasm_bindgen(js_name = renderOverlay)]
pub fn render_overlay(
    specs: JsValue,
    width: f64,
    height: f64,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let specs: Vec<SymbolSpec> =
        serde_wasm_bindgen::from_value(specs).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let opts = parse_options(options)?;
    let shapes = overlay::render_symbols(&specs, width, height, &opts);
    serde_wasm_bindgen::to_value(&shapes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render overlay symbols, with JSON strings on both sides of the boundary.
#[wasm_bindgen(js_name = renderOverlayString)]
pub fn render_overlay_string(
    specs_json: &str,
    width: f64,
    height: f64,
    options_json: &str,
) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let specs: Vec<SymbolSpec> =
        serde_json::from_str(specs_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let opts: OverlayOptions = if options_json.is_empty() {
        OverlayOptions::default()
    } else {
        serde_json::from_str(options_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    let shapes = overlay::render_symbols(&specs, width, height, &opts);
    serde_json::to_string(&shapes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Import and reduce a GPX approach track. Returns the kept points, or null
/// when the track cannot form a line.
#[wasm_bindgen(js_name = gpxToTrack)]
pub fn gpx_to_track(xml: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let track = reducer::reduce(&track_parser::parse_gpx(xml));
    track_to_js(track)
}

/// Import and reduce a TCX approach track. Returns the kept points, or null
/// when the track cannot form a line.
#[wasm_bindgen(js_name = tcxToTrack)]
pub fn tcx_to_track(xml: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let track = reducer::reduce(&track_parser::parse_tcx(xml));
    track_to_js(track)
}

/// Import and reduce a GPX approach track as a GeoJSON LineString Feature
/// for the map layer, or null when absent.
#[wasm_bindgen(js_name = gpxToTrackFeature)]
pub fn gpx_to_track_feature(xml: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let track = reducer::reduce(&track_parser::parse_gpx(xml));
    track_feature_to_js(track)
}

/// Import and reduce a TCX approach track as a GeoJSON LineString Feature
/// for the map layer, or null when absent.
#[wasm_bindgen(js_name = tcxToTrackFeature)]
pub fn tcx_to_track_feature(xml: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let track = reducer::reduce(&track_parser::parse_tcx(xml));
    track_feature_to_js(track)
}

fn track_to_js(track: Option<Vec<GeoPoint>>) -> Result<JsValue, JsValue> {
    match track {
        Some(points) => {
            serde_wasm_bindgen::to_value(&points).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(JsValue::NULL),
    }
}

fn track_feature_to_js(track: Option<Vec<GeoPoint>>) -> Result<JsValue, JsValue> {
    match track {
        Some(points) => {
            let feature = reducer::to_line_feature(&points);
            serde_wasm_bindgen::to_value(&feature).map_err(|e| JsValue::from_str(&e.to_string()))
        }
        None => Ok(JsValue::NULL),
    }
}

fn parse_options(options: JsValue) -> Result<OverlayOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(OverlayOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
