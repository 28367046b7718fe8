//! Catmull-Rom tangent estimation from neighbouring control points.

use std::fmt;
use std::ops::Range;

use crv_core::{CurveError, Result};
use crv_math::VectorSpace;
use serde::{Deserialize, Serialize};

/// Boundary policy for the first and last control point of a Catmull-Rom spline.
///
/// Interior tangents are always the centered difference `(P_{i+1} - P_{i-1}) / 2`.
/// The policies differ only at the ends:
///
/// | policy      | curve covers       | end tangent `T_0`    | min points |
/// |-------------|--------------------|----------------------|------------|
/// | `Anchor`    | `P_1 ..= P_{n-2}`  | not needed           | 4          |
/// | `Duplicate` | `P_0 ..= P_{n-1}`  | `(P_1 - P_0) / 2`    | 2          |
/// | `Reflect`   | `P_0 ..= P_{n-1}`  | `P_1 - P_0`          | 2          |
/// | `Zero`      | `P_0 ..= P_{n-1}`  | `0`                  | 2          |
///
/// `Duplicate` and `Reflect` are phantom-point schemes: a phantom `P_{-1}` equal
/// to `P_0`, or `P_0` mirrored away from `P_1`, feeds the centered difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndCondition {
    /// First and last points only shape the neighbouring tangents.
    #[default]
    Anchor,
    Duplicate,
    Reflect,
    Zero,
}

impl EndCondition {
    pub fn min_points(self) -> usize {
        match self {
            Self::Anchor => 4,
            Self::Duplicate | Self::Reflect | Self::Zero => 2,
        }
    }

    /// Indices of the control points the curve passes through.
    pub fn interpolated_range(self, point_count: usize) -> Range<usize> {
        match self {
            Self::Anchor => 1..point_count.saturating_sub(1).max(1),
            Self::Duplicate | Self::Reflect | Self::Zero => 0..point_count,
        }
    }

    /// Phantom neighbour beyond `end`, on the side away from `inner`.
    fn phantom<P: VectorSpace>(self, end: P, inner: P) -> Option<P> {
        match self {
            Self::Duplicate => Some(end),
            Self::Reflect => Some(end * 2.0 - inner),
            Self::Anchor | Self::Zero => None,
        }
    }
}

impl fmt::Display for EndCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Anchor => "anchor",
            Self::Duplicate => "duplicate",
            Self::Reflect => "reflect",
            Self::Zero => "zero",
        };
        f.write_str(name)
    }
}

/// Centered finite difference `(next - prev) / 2`.
pub fn central_difference<P: VectorSpace>(prev: P, next: P) -> P {
    (next - prev) * 0.5
}

/// Tangents for every point in `end.interpolated_range(points.len())`, in order.
pub fn estimate_tangents<P: VectorSpace>(points: &[P], end: EndCondition) -> Result<Vec<P>> {
    let n = points.len();
    if n < end.min_points() {
        return Err(CurveError::configuration(format!(
            "Catmull-Rom with {end} end condition needs at least {} points, got {n}",
            end.min_points()
        )));
    }

    let interior = points
        .windows(3)
        .map(|w| central_difference(w[0], w[2]));

    if end == EndCondition::Anchor {
        return Ok(interior.collect());
    }

    let first = end
        .phantom(points[0], points[1])
        .map_or(P::ZERO, |before| central_difference(before, points[1]));
    let last = end
        .phantom(points[n - 1], points[n - 2])
        .map_or(P::ZERO, |after| central_difference(points[n - 2], after));

    let mut tangents = Vec::with_capacity(n);
    tangents.push(first);
    tangents.extend(interior);
    tangents.push(last);
    Ok(tangents)
}

/// Tangent at `p1` of the Barry-Goldman pyramid through three points at
/// knots `k0 < k1 < k2`, as a derivative with respect to the knot parameter.
/// Equal spacing reduces it to [`central_difference`] divided by the spacing.
pub fn knot_difference<P: VectorSpace>(p: [P; 3], k: [f64; 3]) -> P {
    (p[1] - p[0]) / (k[1] - k[0]) - (p[2] - p[0]) / (k[2] - k[0]) + (p[2] - p[1]) / (k[2] - k[1])
}

/// Check that `knots` holds one finite, strictly increasing value per point.
pub fn check_knots(knots: &[f64], point_count: usize) -> Result<()> {
    if knots.len() != point_count {
        return Err(CurveError::configuration(format!(
            "{} knots given for {point_count} points",
            knots.len()
        )));
    }
    if knots.iter().any(|k| !k.is_finite()) || knots.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CurveError::configuration(
            "knots must be finite and strictly increasing",
        ));
    }
    Ok(())
}

/// Like [`estimate_tangents`], over non-uniform knots (one per point).
///
/// Phantom end points get a phantom knot at the same spacing as their inner
/// neighbour, so uniform knots `0, 1, ..., n-1` give the uniform tangents.
pub fn estimate_tangents_with_knots<P: VectorSpace>(
    points: &[P],
    knots: &[f64],
    end: EndCondition,
) -> Result<Vec<P>> {
    let n = points.len();
    if n < end.min_points() {
        return Err(CurveError::configuration(format!(
            "Catmull-Rom with {end} end condition needs at least {} points, got {n}",
            end.min_points()
        )));
    }
    check_knots(knots, n)?;

    let interior = points
        .windows(3)
        .zip(knots.windows(3))
        .map(|(p, k)| knot_difference([p[0], p[1], p[2]], [k[0], k[1], k[2]]));

    if end == EndCondition::Anchor {
        return Ok(interior.collect());
    }

    let first = end.phantom(points[0], points[1]).map_or(P::ZERO, |before| {
        let k_before = 2.0 * knots[0] - knots[1];
        knot_difference([before, points[0], points[1]], [k_before, knots[0], knots[1]])
    });
    let last = end.phantom(points[n - 1], points[n - 2]).map_or(P::ZERO, |after| {
        let k_after = 2.0 * knots[n - 1] - knots[n - 2];
        knot_difference([points[n - 2], points[n - 1], after], [knots[n - 2], knots[n - 1], k_after])
    });

    let mut tangents = Vec::with_capacity(n);
    tangents.push(first);
    tangents.extend(interior);
    tangents.push(last);
    Ok(tangents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crv_math::DVec2;

    fn zigzag() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(3.0, 2.0),
        ]
    }

    #[test]
    fn test_anchor_interior_only() {
        let tangents = estimate_tangents(&zigzag(), EndCondition::Anchor).unwrap();
        assert_eq!(tangents, vec![DVec2::new(1.0, 0.0), DVec2::new(1.0, 0.0)]);
        assert_eq!(EndCondition::Anchor.interpolated_range(4), 1..3);
    }

    #[test]
    fn test_duplicate_end_tangents() {
        let tangents = estimate_tangents(&zigzag(), EndCondition::Duplicate).unwrap();
        assert_eq!(tangents.len(), 4);
        assert_eq!(tangents[0], DVec2::new(0.5, 1.0));
        assert_eq!(tangents[3], DVec2::new(0.5, 1.0));
    }

    #[test]
    fn test_reflect_end_tangents() {
        let tangents = estimate_tangents(&zigzag(), EndCondition::Reflect).unwrap();
        assert_eq!(tangents[0], DVec2::new(1.0, 2.0));
        assert_eq!(tangents[3], DVec2::new(1.0, 2.0));
        assert_eq!(tangents[1], DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_zero_end_tangents() {
        let tangents = estimate_tangents(&zigzag(), EndCondition::Zero).unwrap();
        assert_eq!(tangents[0], DVec2::ZERO);
        assert_eq!(tangents[3], DVec2::ZERO);
    }

    #[test]
    fn test_two_points_with_phantoms() {
        let points = [0.0, 4.0];
        assert_eq!(estimate_tangents(&points, EndCondition::Duplicate).unwrap(), vec![2.0, 2.0]);
        assert_eq!(estimate_tangents(&points, EndCondition::Reflect).unwrap(), vec![4.0, 4.0]);
    }

    #[test]
    fn test_too_few_points() {
        let points = [0.0, 1.0, 2.0];
        let err = estimate_tangents(&points, EndCondition::Anchor).unwrap_err();
        assert!(matches!(err, CurveError::Configuration(_)));
        assert!(estimate_tangents(&[1.0], EndCondition::Zero).is_err());
    }

    #[test]
    fn test_uniform_knots_match_centered_differences() {
        let points = zigzag();
        for end in [EndCondition::Anchor, EndCondition::Duplicate, EndCondition::Reflect, EndCondition::Zero] {
            let plain = estimate_tangents(&points, end).unwrap();
            let knotted = estimate_tangents_with_knots(&points, &[0.0, 1.0, 2.0, 3.0], end).unwrap();
            assert_eq!(plain.len(), knotted.len());
            for (a, b) in plain.iter().zip(&knotted) {
                assert!((*a - *b).length() < 1e-12, "{end}: {a:?} != {b:?}");
            }
        }
        // Doubling every spacing halves the parametric speed
        let stretched = estimate_tangents_with_knots(&points, &[0.0, 2.0, 4.0, 6.0], EndCondition::Anchor).unwrap();
        assert_eq!(stretched, vec![DVec2::new(0.5, 0.0), DVec2::new(0.5, 0.0)]);
    }

    #[test]
    fn test_rejects_bad_knots() {
        let points = zigzag();
        for knots in [vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 1.0, 2.0], vec![0.0, f64::NAN, 2.0, 3.0]] {
            let err = estimate_tangents_with_knots(&points, &knots, EndCondition::Anchor).unwrap_err();
            assert!(matches!(err, CurveError::Configuration(_)), "{knots:?}");
        }
    }
}
