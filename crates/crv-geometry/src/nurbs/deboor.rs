//! Local B-spline and NURBS evaluation over a single knot span.
//!
//! Every evaluator looks up the span containing `t` and combines only the
//! `degree + 1` basis functions supported there, so the cost depends on the
//! degree and not on the number of control points.
//!
//! Inputs are trusted: callers pass a validated [`KnotVector`](super::KnotVector)
//! with matching control points, which the curve types guarantee.

use crv_core::{CurveError, Result, Tolerance};
use crv_math::VectorSpace;

use super::knot::{basis_functions, basis_functions_derivs, find_span};

/// Evaluate a B-spline curve point at parameter `t` using the De Boor algorithm.
pub(crate) fn curve_point<P: VectorSpace>(degree: usize, knots: &[f64], control_points: &[P], t: f64) -> P {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let basis = basis_functions(degree, knots, span, t);

    control_points[span - degree..=span]
        .iter()
        .zip(&basis)
        .fold(P::ZERO, |acc, (&cp, &b)| acc + cp * b)
}

/// Evaluate the tangent (first derivative) of a B-spline curve at parameter `t`.
pub(crate) fn curve_tangent<P: VectorSpace>(
    degree: usize,
    knots: &[f64],
    control_points: &[P],
    t: f64,
) -> P {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let (_, dn) = basis_functions_derivs(degree, knots, span, t);

    control_points[span - degree..=span]
        .iter()
        .zip(&dn)
        .fold(P::ZERO, |acc, (&cp, &d)| acc + cp * d)
}

/// Weighted sums `(Σ w_i N_i P_i, Σ w_i N_i)` over the active span.
fn weighted_sums<P: VectorSpace>(
    degree: usize,
    control_points: &[P],
    weights: &[f64],
    span: usize,
    basis: &[f64],
) -> (P, f64) {
    let mut point = P::ZERO;
    let mut w = 0.0;

    for (i, &b) in basis.iter().enumerate() {
        let idx = span - degree + i;
        let bw = b * weights[idx];
        point += control_points[idx] * bw;
        w += bw;
    }

    (point, w)
}

fn check_denominator(w: f64, t: f64, tolerance: Tolerance) -> Result<()> {
    if tolerance.is_zero_denominator(w) {
        return Err(CurveError::division(format!(
            "NURBS weight sum vanishes at t = {t} (sum = {w:e})"
        )));
    }
    Ok(())
}

/// Evaluate a rational B-spline (NURBS) curve point at parameter `t`.
///
/// Fails with a division error when the weighted basis sum is zero within `tolerance`.
pub(crate) fn nurbs_curve_point<P: VectorSpace>(
    degree: usize,
    knots: &[f64],
    control_points: &[P],
    weights: &[f64],
    t: f64,
    tolerance: Tolerance,
) -> Result<P> {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let basis = basis_functions(degree, knots, span, t);

    let (point, w) = weighted_sums(degree, control_points, weights, span, &basis);
    check_denominator(w, t, tolerance)?;
    Ok(point / w)
}

/// Evaluate the tangent of a NURBS curve at parameter `t` (quotient rule).
pub(crate) fn nurbs_curve_tangent<P: VectorSpace>(
    degree: usize,
    knots: &[f64],
    control_points: &[P],
    weights: &[f64],
    t: f64,
    tolerance: Tolerance,
) -> Result<P> {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, t);
    let (basis, dbasis) = basis_functions_derivs(degree, knots, span, t);

    let (a, w) = weighted_sums(degree, control_points, weights, span, &basis);
    let (da, dw) = weighted_sums(degree, control_points, weights, span, &dbasis);
    check_denominator(w, t, tolerance)?;

    let c = a / w;
    Ok((da - c * dw) / w)
}
