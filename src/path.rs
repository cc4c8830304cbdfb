use kurbo::{BezPath, PathEl, Point};
use serde::{Deserialize, Serialize};

use crate::overlay::LABEL_RADIUS_FACTOR;

/// A Bézier control point, rounded to pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: i32,
    pub y: i32,
}

/// One vertex of a drawn route line.
///
/// `control_points`, when present, are the two cubic control points for the
/// curve segment ending at this vertex, in source order (entry, exit). A
/// vertex without them is the initial move or the end of a straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: i32,
    pub y: i32,
    #[serde(
        rename = "controlPoints",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub control_points: Option<[ControlPoint; 2]>,
}

impl PathPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            control_points: None,
        }
    }

    pub fn curve(x: i32, y: i32, entry: ControlPoint, exit: ControlPoint) -> Self {
        Self {
            x,
            y,
            control_points: Some([entry, exit]),
        }
    }
}

fn round_point(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn round_ctrl(p: Point) -> ControlPoint {
    let (x, y) = round_point(p);
    ControlPoint { x, y }
}

/// Parse an SVG path description into an ordered vertex list.
///
/// kurbo converts relative commands to absolute and resolves smooth-curve (S)
/// control points, so only absolute move/line/cubic elements come out of it.
/// Quadratics and close commands do not occur in route lines and are dropped.
/// Malformed input parses to an empty path; callers render nothing.
pub fn parse_path(d: &str) -> Vec<PathPoint> {
    let Ok(bez) = BezPath::from_svg(d) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    for el in bez.elements() {
        match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => {
                let (x, y) = round_point(p);
                points.push(PathPoint::new(x, y));
            }
            PathEl::CurveTo(c1, c2, p) => {
                let (x, y) = round_point(p);
                points.push(PathPoint::curve(x, y, round_ctrl(c1), round_ctrl(c2)));
            }
            PathEl::QuadTo(..) | PathEl::ClosePath => {}
        }
    }
    points
}

/// Reverse a path, reassigning each curve's control pair to its new carrier
/// vertex with the pair order swapped. Applying this twice yields the
/// original path.
pub fn reverse_path(points: Vec<PathPoint>) -> Vec<PathPoint> {
    let mut reversed = Vec::with_capacity(points.len());
    for i in (0..points.len()).rev() {
        let p = points[i];
        // The segment that ended at points[i + 1] now ends at p.
        match points.get(i + 1).and_then(|next| next.control_points) {
            Some([c0, c1]) => reversed.push(PathPoint::curve(p.x, p.y, c1, c0)),
            None => reversed.push(PathPoint::new(p.x, p.y)),
        }
    }
    reversed
}

/// Canonicalize drawing direction: a route line starts at its base, so the
/// first vertex must carry the greatest y. Compares endpoints only.
pub fn orient_base_first(points: Vec<PathPoint>) -> Vec<PathPoint> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 && first.y < last.y => {
            reverse_path(points)
        }
        _ => points,
    }
}

/// Anchor points for overlay symbols derived from an oriented path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Route-number badge position: the vertex with maximum y (route start).
    pub label: (f64, f64),
    /// Top-anchor position: the vertex with minimum y, when requested.
    pub anchor: Option<(f64, f64)>,
}

fn clamp_to_frame(x: f64, y: f64, r: f64, width: f64, height: f64) -> (f64, f64) {
    let mut x = x;
    let mut y = y;
    if x < r {
        x = r;
    }
    if x > width - r {
        x = width - r;
    }
    if y < r {
        y = r;
    }
    if y > height - r {
        y = height - r;
    }
    (x, y)
}

/// Compute symbol anchors for a path inside a `width`×`height` frame.
///
/// Both anchors are clamped so a symbol of radius `0.012 × width` centered on
/// them stays fully inside the frame. Returns `None` for an empty path.
pub fn place_symbols(
    points: &[PathPoint],
    width: f64,
    height: f64,
    with_anchor: bool,
) -> Option<Placement> {
    let first = points.first()?;

    let mut ix_label = 0;
    let mut max_y = first.y;
    let mut ix_anchor = 0;
    let mut min_y = first.y;
    for (i, p) in points.iter().enumerate() {
        if p.y > max_y {
            ix_label = i;
            max_y = p.y;
        }
        if p.y < min_y {
            ix_anchor = i;
            min_y = p.y;
        }
    }

    let r = LABEL_RADIUS_FACTOR * width;
    let label_pt = points[ix_label];
    let label = clamp_to_frame(label_pt.x as f64, label_pt.y as f64, r, width, height);

    let anchor = with_anchor.then(|| {
        let p = points[ix_anchor];
        clamp_to_frame(p.x as f64, p.y as f64, r, width, height)
    });

    Some(Placement { label, anchor })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(x: i32, y: i32) -> ControlPoint {
        ControlPoint { x, y }
    }

    #[test]
    fn test_parse_move_line() {
        let points = parse_path("M0,100 L0,0");
        assert_eq!(points, vec![PathPoint::new(0, 100), PathPoint::new(0, 0)]);
    }

    #[test]
    fn test_parse_rounds_coordinates() {
        let points = parse_path("M10.4,20.6 L30.5,39.5");
        assert_eq!(points[0], PathPoint::new(10, 21));
        assert_eq!(points[1], PathPoint::new(31, 40));
    }

    #[test]
    fn test_parse_relative_commands() {
        let points = parse_path("m10,10 l5,5 l-3,2");
        assert_eq!(
            points,
            vec![
                PathPoint::new(10, 10),
                PathPoint::new(15, 15),
                PathPoint::new(12, 17)
            ]
        );
    }

    #[test]
    fn test_parse_cubic_curve() {
        let points = parse_path("M0,0 C10,10 20,20 30,30");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].control_points, Some([ctrl(10, 10), ctrl(20, 20)]));
    }

    #[test]
    fn test_parse_smooth_curve_reflects_control() {
        let points = parse_path("M0,0 C0,10 10,20 20,20 S40,10 40,0");
        assert_eq!(points.len(), 3);
        // S reflects the previous exit control (10,20) around (20,20).
        assert_eq!(points[2].control_points, Some([ctrl(30, 20), ctrl(40, 10)]));
    }

    #[test]
    fn test_parse_malformed_is_empty() {
        assert!(parse_path("not a path").is_empty());
        assert!(parse_path("").is_empty());
    }

    #[test]
    fn test_orient_keeps_base_first_path() {
        let points = parse_path("M0,100 L0,0");
        let oriented = orient_base_first(points.clone());
        assert_eq!(oriented, points);
    }

    #[test]
    fn test_orient_reverses_top_first_path() {
        let oriented = orient_base_first(parse_path("M0,0 L0,100"));
        assert_eq!(
            oriented,
            vec![PathPoint::new(0, 100), PathPoint::new(0, 0)]
        );
    }

    #[test]
    fn test_orient_is_idempotent() {
        let once = orient_base_first(parse_path("M0,0 C10,30 20,60 30,90 L40,120"));
        let twice = orient_base_first(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_oriented_first_y_not_below_last_y() {
        for d in ["M0,0 L0,100", "M0,100 L0,0", "M5,50 L9,50", "M0,0 C1,1 2,2 3,3"] {
            let oriented = orient_base_first(parse_path(d));
            if oriented.len() >= 2 {
                assert!(oriented.first().unwrap().y >= oriented.last().unwrap().y);
            }
        }
    }

    #[test]
    fn test_orient_short_paths_unchanged() {
        assert!(orient_base_first(Vec::new()).is_empty());
        let single = vec![PathPoint::new(3, 4)];
        assert_eq!(orient_base_first(single.clone()), single);
    }

    #[test]
    fn test_reverse_swaps_control_pairs() {
        let points = vec![
            PathPoint::new(0, 0),
            PathPoint::curve(30, 30, ctrl(10, 10), ctrl(20, 20)),
            PathPoint::new(40, 40),
        ];
        let reversed = reverse_path(points);
        assert_eq!(reversed[0], PathPoint::new(40, 40));
        assert_eq!(reversed[1], PathPoint::new(30, 30));
        assert_eq!(
            reversed[2],
            PathPoint::curve(0, 0, ctrl(20, 20), ctrl(10, 10))
        );
    }

    #[test]
    fn test_reverse_is_involution() {
        let points = vec![
            PathPoint::new(0, 0),
            PathPoint::curve(30, 30, ctrl(10, 10), ctrl(20, 20)),
            PathPoint::curve(60, 10, ctrl(40, 40), ctrl(50, 20)),
            PathPoint::new(70, 5),
        ];
        assert_eq!(reverse_path(reverse_path(points.clone())), points);
    }

    #[test]
    fn test_orientation_invariant_placement() {
        // The same line drawn in either direction places symbols identically.
        let a = orient_base_first(parse_path("M0,100 L0,0"));
        let b = orient_base_first(parse_path("M0,0 L0,100"));
        assert_eq!(a, b);
        let w = 800.0;
        let h = 600.0;
        assert_eq!(
            place_symbols(&a, w, h, true),
            place_symbols(&b, w, h, true)
        );
    }

    #[test]
    fn test_place_label_at_max_y() {
        let points = parse_path("M400,500 L420,100");
        let placement = place_symbols(&points, 800.0, 600.0, true).unwrap();
        assert_eq!(placement.label, (400.0, 500.0));
        assert_eq!(placement.anchor, Some((420.0, 100.0)));
    }

    #[test]
    fn test_place_clamps_to_frame() {
        let points = parse_path("M0,100 L0,0");
        let w = 800.0;
        let h = 600.0;
        let r = LABEL_RADIUS_FACTOR * w;
        let placement = place_symbols(&points, w, h, true).unwrap();
        assert_eq!(placement.label, (r, 100.0));
        assert_eq!(placement.anchor, Some((r, r)));
    }

    #[test]
    fn test_place_without_anchor() {
        let points = parse_path("M400,500 L420,100");
        let placement = place_symbols(&points, 800.0, 600.0, false).unwrap();
        assert!(placement.anchor.is_none());
    }

    #[test]
    fn test_place_empty_path() {
        assert!(place_symbols(&[], 800.0, 600.0, true).is_none());
    }

    #[test]
    fn test_point_serialization_shape() {
        let p = PathPoint::curve(1, 2, ctrl(3, 4), ctrl(5, 6));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "x": 1,
                "y": 2,
                "controlPoints": [{"x": 3, "y": 4}, {"x": 5, "y": 6}]
            })
        );
        let plain = serde_json::to_value(PathPoint::new(7, 8)).unwrap();
        assert_eq!(plain, serde_json::json!({"x": 7, "y": 8}));
    }
}
