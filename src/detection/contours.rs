use crate::pipeline::BoundingBox;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

/// Find the outer boundaries of the top-level foreground regions.
///
/// Hole borders and regions nested inside holes are dropped. Each boundary is
/// returned in compressed chain form (see [`compress_chain`]).
pub fn find_external_contours(binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| compress_chain(&c.points))
        .collect()
}

/// Drop every boundary point that continues a straight horizontal, vertical
/// or diagonal run, keeping only the points where the direction changes.
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: Point<i32>, b: Point<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect()
}

/// Unsigned polygon area (shoelace formula)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| p1.x as i64 * p2.y as i64 - p2.x as i64 * p1.y as i64)
        .sum();

    twice_area.abs() as f64 / 2.0
}

/// Length of the closed polyline, including the last-to-first segment
pub fn closed_perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let dx = (p2.x - p1.x) as f64;
            let dy = (p2.y - p1.y) as f64;
            dx.hypot(dy)
        })
        .sum()
}

/// Smallest upright box containing every point; sizes count pixels inclusively
pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    if min_x < 0 || min_y < 0 {
        return None;
    }

    Some(BoundingBox {
        x: min_x as u32,
        y: min_y as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}
