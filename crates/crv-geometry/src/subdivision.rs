//! Interpolatory four-point curve subdivision.

use crv_core::{CurveError, Result};
use crv_math::VectorSpace;

use crate::curve::check_finite;

/// Tension giving the classic four-point scheme, which reproduces cubics.
pub const DEFAULT_TENSION: f64 = 1.0 / 16.0;

/// Passes beyond this would allocate more than `2^20` points per input point.
pub const MAX_ITERATIONS: usize = 20;

/// Refine a polyline with the four-point scheme.
///
/// Each pass keeps every current point and inserts one new point between
/// each consecutive pair `(p_{i+1}, p_{i+2})`:
///
/// `(1/2 + w) (p_{i+1} + p_{i+2}) - w (p_i + p_{i+3})`
///
/// The first and last point are duplicated as phantom neighbours, so the
/// result starts and ends at the input ends and passes through every input
/// point. `n` points become `2^k (n - 1) + 1` after `k` passes. With `w = 0`
/// the new points are plain chord midpoints.
pub fn four_point_subdivision<P: VectorSpace>(
    points: &[P],
    iterations: usize,
    tension: f64,
) -> Result<Vec<P>> {
    if points.len() < 4 {
        return Err(CurveError::configuration(format!(
            "four-point subdivision needs at least 4 points, got {}",
            points.len()
        )));
    }
    if !tension.is_finite() {
        return Err(CurveError::configuration(format!(
            "subdivision tension must be finite, got {tension}"
        )));
    }
    if iterations > MAX_ITERATIONS {
        return Err(CurveError::configuration(format!(
            "at most {MAX_ITERATIONS} subdivision passes supported, got {iterations}"
        )));
    }
    check_finite(points, "control point")?;

    let mut data = Vec::with_capacity(points.len() + 2);
    data.push(points[0]);
    data.extend_from_slice(points);
    data.push(points[points.len() - 1]);

    for _ in 0..iterations {
        let len = data.len();
        let mut next = Vec::with_capacity(2 * len - 3);
        next.push(data[0]);
        for w in data.windows(4) {
            next.push(w[1]);
            next.push((w[1] + w[2]) * (0.5 + tension) - (w[0] + w[3]) * tension);
        }
        next.push(data[len - 2]);
        next.push(data[len - 1]);
        data = next;
    }
    log::trace!(
        "four-point subdivision: {} points -> {} after {iterations} passes",
        points.len(),
        data.len() - 2
    );

    data.pop();
    data.remove(0);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crv_math::DVec2;

    fn square_wave() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(3.0, 1.0),
            DVec2::new(4.0, 0.0),
        ]
    }

    #[test]
    fn test_point_count_and_interpolation() {
        let points = square_wave();
        let refined = four_point_subdivision(&points, 3, DEFAULT_TENSION).unwrap();
        assert_eq!(refined.len(), 8 * (points.len() - 1) + 1);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(refined[8 * i], *p);
        }
    }

    #[test]
    fn test_zero_passes_returns_input() {
        let points = square_wave();
        assert_eq!(four_point_subdivision(&points, 0, DEFAULT_TENSION).unwrap(), points);
    }

    #[test]
    fn test_single_pass_insertion() {
        let points = vec![0.0, 1.0, 8.0, 27.0];
        let refined = four_point_subdivision(&points, 1, DEFAULT_TENSION).unwrap();
        assert_eq!(refined.len(), 7);
        // Interior insertion reproduces the cubic x^3 at x = 1.5
        assert!((refined[3] - 3.375).abs() < 1e-12);
        // End insertion uses the duplicated phantom point
        let expected = (0.0 + 1.0) * (0.5 + DEFAULT_TENSION) - (0.0 + 8.0) * DEFAULT_TENSION;
        assert!((refined[1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_tension_is_midpoints() {
        let points = vec![0.0, 2.0, 4.0, 10.0];
        let refined = four_point_subdivision(&points, 1, 0.0).unwrap();
        assert_eq!(refined, vec![0.0, 1.0, 2.0, 3.0, 4.0, 7.0, 10.0]);
    }

    #[test]
    fn test_collinear_stays_on_line() {
        let points: Vec<_> = (0..5).map(|i| DVec2::new(i as f64, 3.0 * i as f64)).collect();
        for p in four_point_subdivision(&points, 4, DEFAULT_TENSION).unwrap() {
            assert!((p.y - 3.0 * p.x).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let three = [0.0, 1.0, 2.0];
        assert!(matches!(
            four_point_subdivision(&three, 1, DEFAULT_TENSION),
            Err(CurveError::Configuration(_))
        ));
        let four = [0.0, 1.0, 2.0, 3.0];
        assert!(four_point_subdivision(&four, 1, f64::NAN).is_err());
        assert!(four_point_subdivision(&four, MAX_ITERATIONS + 1, DEFAULT_TENSION).is_err());
    }
}
