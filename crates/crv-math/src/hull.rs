//! Planar convex hull of a control polygon, for overlay rendering.

use crate::Point2;

/// z-component of `(p - u) x (v - u)`. Negative when `p` lies left of the directed line `u -> v`.
fn side(p: Point2, u: Point2, v: Point2) -> f64 {
    (p - u).perp_dot(v - u)
}

fn left_of(u: Point2, v: Point2, points: &[Point2]) -> Vec<Point2> {
    points.iter().copied().filter(|&p| side(p, u, v) < 0.0).collect()
}

/// Hull vertices strictly left of `u -> v`, ordered from `v` back towards `u`.
fn extend(u: Point2, v: Point2, points: &[Point2], hull: &mut Vec<Point2>) {
    let Some(w) = points
        .iter()
        .copied()
        .min_by(|&a, &b| side(a, u, v).total_cmp(&side(b, u, v)))
    else {
        return;
    };

    extend(w, v, &left_of(w, v, points), hull);
    hull.push(w);
    extend(u, w, &left_of(u, w, points), hull);
}

/// Compute the convex hull of `points` with quickhull.
///
/// Returns a closed polygon: the first vertex (the point with the largest x)
/// is repeated at the end. Collinear boundary points are dropped. Returns an
/// empty vector for empty input.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let by_x = |a: &&Point2, b: &&Point2| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y));
    let (Some(&u), Some(&v)) = (points.iter().min_by(by_x), points.iter().max_by(by_x)) else {
        return Vec::new();
    };

    let mut hull = vec![v];
    extend(u, v, &left_of(u, v, points), &mut hull);
    if u != v {
        hull.push(u);
        extend(v, u, &left_of(v, u, points), &mut hull);
    }
    hull.push(v);
    hull
}

/// Signed area of a closed polygon (shoelace formula).
pub fn polygon_area(polygon: &[Point2]) -> f64 {
    0.5 * polygon
        .windows(2)
        .map(|w| w[0].perp_dot(w[1]))
        .sum::<f64>()
}
