use crate::config::{ChannelRange, ColorRanges};
use crate::models::{PieceColor, PieceShape};
use image::RgbImage;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Label a region by the first color mask that matches any of its pixels.
///
/// Masks are checked red, then blue, then white; the proportion of matching
/// pixels plays no role.
pub fn classify_color(roi: &RgbImage, ranges: &ColorRanges) -> PieceColor {
    let any_in = |range: &ChannelRange| roi.pixels().any(|p| range.contains(p));

    if any_in(&ranges.red) {
        PieceColor::Red
    } else if any_in(&ranges.blue) {
        PieceColor::Blue
    } else if any_in(&ranges.white) {
        PieceColor::White
    } else {
        PieceColor::Undefined
    }
}

/// Number of polygon vertices used for the shape decision
pub fn count_vertices(contour: &[Point<i32>], approx_epsilon: Option<f64>) -> usize {
    match approx_epsilon {
        Some(epsilon) if epsilon > 0.0 && contour.len() > 2 => {
            let mut polygon = approximate_polygon_dp(contour, epsilon, true);
            // closed approximations repeat the starting point
            if polygon.len() > 1 && polygon.first() == polygon.last() {
                polygon.pop();
            }
            polygon.len()
        }
        _ => contour.len(),
    }
}

/// Few vertices means circular; this is a vertex-count heuristic only
pub fn classify_shape(vertices: usize, max_circular_vertices: usize) -> PieceShape {
    if vertices <= max_circular_vertices {
        PieceShape::Circular
    } else {
        PieceShape::NonCircular
    }
}

/// Small pieces are assumed to be the ones with a hole punched through them
pub fn has_hole(area: f64, hole_area_threshold: f64) -> bool {
    area < hole_area_threshold
}
