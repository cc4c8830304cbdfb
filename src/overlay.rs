use serde::{Deserialize, Serialize};

use crate::options::OverlayOptions;
use crate::path::{orient_base_first, parse_path, place_symbols, PathPoint};

/// Proportional-scale conventions shared by the glyph builders. All overlay
/// symbols size themselves relative to the image, so these factors must stay
/// consistent across builders.
pub const LABEL_RADIUS_FACTOR: f64 = 0.012;
pub const LABEL_FONT_FACTOR: f64 = 0.015;
pub const LABEL_HEIGHT_RATIO: f64 = 1.9;
pub const ANCHOR_DOT_FACTOR: f64 = 0.005;
pub const EXTRA_ANCHOR_DOT_FACTOR: f64 = 0.006;
pub const RAPPEL_RADIUS_FACTOR: f64 = 0.005;
pub const RAPPEL_STROKE_FACTOR: f64 = 0.0015;
pub const DESCENT_FONT_FACTOR: f64 = 0.012;

pub const DESCENT_GLYPH: &str = "➤";

/// Uniform opacity the display layer applies to overlay shapes.
pub const OVERLAY_OPACITY: f64 = 0.9;

const BACKGROUND_COLOR: &str = "black";
const FOREGROUND_COLOR: &str = "white";
const BADGE_FILL: &str = "#000000";
const BADGE_TEXT_FILL: &str = "#FFFFFF";
const ANCHOR_FILL: &str = "#000000";

/// One requested overlay symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SymbolSpec {
    /// Route-number badge at the base of a drawn line, with an optional
    /// anchor dot at its top.
    NumberLabel {
        path: String,
        nr: String,
        #[serde(default)]
        has_anchor: bool,
    },
    /// A standalone anchor dot at a fixed point.
    Anchor { x: f64, y: f64 },
    /// Fixed rappel anchor (ring hanger).
    RappelBolted { x: f64, y: f64 },
    /// Improvised rappel anchor (triangular hanger).
    RappelNotBolted { x: f64, y: f64 },
    /// Directional arrows tiled along a descent path.
    DescentTrail { path: String },
}

/// Renderable geometry handed to the display layer. Text shapes are centered
/// on their coordinate; glyph runs place `glyph` at each percentage offset
/// along `path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "shape",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Shape {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        stroke_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
        fill: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: String,
        bold: bool,
    },
    GlyphRun {
        path: String,
        offsets: Vec<f64>,
        glyph: String,
        font_size: f64,
        fill: String,
        bold: bool,
    },
}

/// Render a batch of symbol requests into display geometry.
pub fn render_symbols(
    specs: &[SymbolSpec],
    width: f64,
    height: f64,
    opts: &OverlayOptions,
) -> Vec<Shape> {
    let scale = opts.scale(width, height);
    let mut shapes = Vec::new();

    for spec in specs {
        match spec {
            SymbolSpec::NumberLabel {
                path,
                nr,
                has_anchor,
            } => {
                let points = orient_base_first(parse_path(path));
                shapes.extend(number_label(&points, nr, *has_anchor, width, height));
            }
            SymbolSpec::Anchor { x, y } => {
                shapes.push(anchor_dot(*x, *y, EXTRA_ANCHOR_DOT_FACTOR * width));
            }
            SymbolSpec::RappelBolted { x, y } => {
                shapes.extend(rappel(*x, *y, true, scale, opts.thumb));
            }
            SymbolSpec::RappelNotBolted { x, y } => {
                shapes.extend(rappel(*x, *y, false, scale, opts.thumb));
            }
            SymbolSpec::DescentTrail { path } => {
                let points = parse_path(path);
                shapes.extend(descent_trail(
                    path,
                    &points,
                    scale,
                    opts.thumb,
                    opts.white_not_black,
                ));
            }
        }
    }

    shapes
}

/// Route-number badge plus optional top-anchor dot, placed from the path's
/// extreme vertices. An empty path renders nothing.
pub fn number_label(
    points: &[PathPoint],
    nr: &str,
    has_anchor: bool,
    width: f64,
    height: f64,
) -> Vec<Shape> {
    let Some(placement) = place_symbols(points, width, height, has_anchor) else {
        return Vec::new();
    };

    let mut shapes = Vec::new();
    if !nr.is_empty() {
        let (x, y) = placement.label;
        let r = LABEL_RADIUS_FACTOR * width;
        shapes.push(Shape::RoundedRect {
            x: x - r,
            y: y - r,
            width: r * 2.0,
            height: r * LABEL_HEIGHT_RATIO,
            rx: r / 3.0,
            fill: BADGE_FILL.to_string(),
        });
        shapes.push(Shape::Text {
            x,
            y,
            text: nr.to_string(),
            font_size: LABEL_FONT_FACTOR * width,
            fill: BADGE_TEXT_FILL.to_string(),
            bold: true,
        });
    }
    if let Some((x, y)) = placement.anchor {
        shapes.push(anchor_dot(x, y, ANCHOR_DOT_FACTOR * width));
    }
    shapes
}

fn anchor_dot(x: f64, y: f64, r: f64) -> Shape {
    Shape::Circle {
        cx: x,
        cy: y,
        r,
        fill: Some(ANCHOR_FILL.to_string()),
        stroke: None,
        stroke_width: 0.0,
    }
}

/// Rappel marker: the anchor-marker geometry drawn twice, a wide background
/// halo under a foreground pass, so it reads on any photo tone.
pub fn rappel(x: f64, y: f64, bolted: bool, scale: f64, thumb: bool) -> Vec<Shape> {
    let factor = if thumb { 2.0 } else { 1.0 };
    let stroke_width = RAPPEL_STROKE_FACTOR * scale * factor;
    let r = RAPPEL_RADIUS_FACTOR * scale * factor;

    let mut shapes = anchor_marker(x, y, r, stroke_width * 2.0, bolted, BACKGROUND_COLOR);
    shapes.extend(anchor_marker(x, y, r, stroke_width, bolted, FOREGROUND_COLOR));
    shapes
}

/// One pass of the anchor-marker geometry: a ring (bolted) or a triangular
/// hanger (not bolted), with a three-segment chain below.
fn anchor_marker(
    x: f64,
    y: f64,
    r: f64,
    stroke_width: f64,
    bolted: bool,
    stroke: &str,
) -> Vec<Shape> {
    let line = |x1: f64, y1: f64, x2: f64, y2: f64| Shape::Line {
        x1,
        y1,
        x2,
        y2,
        stroke: stroke.to_string(),
        stroke_width,
    };

    let mut shapes = Vec::new();
    if bolted {
        shapes.push(Shape::Circle {
            cx: x,
            cy: y,
            r,
            fill: None,
            stroke: Some(stroke.to_string()),
            stroke_width,
        });
    } else {
        // Crossbar and two legs meeting below the center.
        shapes.push(line(x - r, y - r, x + r, y - r));
        shapes.push(line(x - r, y - r, x, y + r * 0.8));
        shapes.push(line(x + r, y - r, x, y + r * 0.8));
    }

    // Chain: vertical drop, then two converging links.
    shapes.push(line(x, y + r, x, y + r * 3.0));
    shapes.push(line(x - r, y + r * 2.0, x, y + r * 3.0));
    shapes.push(line(x + r, y + r * 2.0, x, y + r * 3.0));

    shapes
}

/// Arc length of a parsed path. Cubic segments are estimated from the mean
/// of the chord and the control polygon, which is accurate enough for glyph
/// spacing on pixel-rounded route lines.
pub fn arc_length(points: &[PathPoint]) -> f64 {
    let dist = |ax: i32, ay: i32, bx: i32, by: i32| {
        let dx = (bx - ax) as f64;
        let dy = (by - ay) as f64;
        (dx * dx + dy * dy).sqrt()
    };

    points
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let chord = dist(a.x, a.y, b.x, b.y);
            match b.control_points {
                Some([c0, c1]) => {
                    let polygon = dist(a.x, a.y, c0.x, c0.y)
                        + dist(c0.x, c0.y, c1.x, c1.y)
                        + dist(c1.x, c1.y, b.x, b.y);
                    (chord + polygon) / 2.0
                }
                None => chord,
            }
        })
        .sum()
}

/// Directional glyphs tiled along a descent path at regular arc-length
/// intervals, drawn in two contrasting passes.
pub fn descent_trail(
    d: &str,
    points: &[PathPoint],
    scale: f64,
    thumb: bool,
    white_not_black: bool,
) -> Vec<Shape> {
    let total_length = arc_length(points);
    if total_length <= 0.0 {
        return Vec::new();
    }

    let delta_percent = (scale / total_length) * if thumb { 3.0 } else { 2.0 };
    if delta_percent <= 0.0 || !delta_percent.is_finite() {
        return Vec::new();
    }

    let mut offsets = Vec::new();
    let mut i = 0.0;
    while i <= 100.0 {
        offsets.push(i);
        i += delta_percent;
    }

    let font_size = DESCENT_FONT_FACTOR * scale * if thumb { 2.0 } else { 1.0 };
    let (under, over) = if white_not_black {
        (BACKGROUND_COLOR, FOREGROUND_COLOR)
    } else {
        (FOREGROUND_COLOR, BACKGROUND_COLOR)
    };

    vec![
        Shape::GlyphRun {
            path: d.to_string(),
            offsets: offsets.clone(),
            glyph: DESCENT_GLYPH.to_string(),
            font_size,
            fill: under.to_string(),
            bold: true,
        },
        Shape::GlyphRun {
            path: d.to_string(),
            offsets,
            glyph: DESCENT_GLYPH.to_string(),
            font_size,
            fill: over.to_string(),
            bold: false,
        },
    ]
}
