//! Hermite interpolation (one polynomial) and cubic Hermite splines (one cubic per segment).

use crv_core::{CurveError, Result, Tolerance, Validate};
use crv_math::VectorSpace;
use serde::Serialize;

use super::{check_finite, check_nodes, node_domain, ControlPoint, Curve};
use crate::basis::{hermite_basis, hermite_basis_derivative, uniform_nodes};
use crate::tangent::check_knots;

/// Global Hermite interpolation.
///
/// The polynomial passes through every control point at its node and, where
/// a tangent is supplied, matches that tangent too. Higher derivatives go
/// through [`HermiteCurve::from_derivatives`]. Stored in Newton form over the
/// node sequence in which every node repeats once per constraint.
#[derive(Debug, Clone, Serialize)]
pub struct HermiteCurve<P> {
    nodes: Vec<f64>,
    /// Node sequence `z_k` with repeated entries for derivative constraints
    expanded: Vec<f64>,
    /// Newton coefficients `f[z_0, ..., z_k]`
    coefficients: Vec<P>,
}

impl<P: VectorSpace> HermiteCurve<P> {
    pub fn new(control_points: &[ControlPoint<P>]) -> Result<Self> {
        let nodes = uniform_nodes(control_points.len());
        Self::with_nodes(control_points, nodes, Tolerance::default())
    }

    pub fn with_nodes(
        control_points: &[ControlPoint<P>],
        nodes: Vec<f64>,
        tolerance: Tolerance,
    ) -> Result<Self> {
        let data: Vec<Vec<P>> = control_points
            .iter()
            .map(|cp| std::iter::once(cp.position).chain(cp.tangent).collect())
            .collect();
        Self::from_derivatives(&data, nodes, tolerance)
    }

    /// Interpolate derivatives of any order.
    ///
    /// `data[i]` lists `f(x_i), f'(x_i), f''(x_i), ...` for node `x_i`; each
    /// entry adds one constraint, so the degree is the total count minus one.
    pub fn from_derivatives(data: &[Vec<P>], nodes: Vec<f64>, tolerance: Tolerance) -> Result<Self> {
        if data.len() < 2 {
            return Err(CurveError::configuration(format!(
                "Hermite interpolation needs at least 2 points, got {}",
                data.len()
            )));
        }
        check_nodes(&nodes, data.len(), tolerance)?;
        for (i, values) in data.iter().enumerate() {
            if values.is_empty() {
                return Err(CurveError::configuration(format!(
                    "control point {i} has no position"
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(CurveError::configuration(format!(
                    "control point {i} has a non-finite coordinate"
                )));
            }
        }

        let total = data.iter().map(Vec::len).sum();
        let mut expanded = Vec::with_capacity(total);
        let mut column = Vec::with_capacity(total);
        // (point index, position within its run of equal nodes)
        let mut owners = Vec::with_capacity(total);
        for (i, (values, &x)) in data.iter().zip(&nodes).enumerate() {
            for j in 0..values.len() {
                expanded.push(x);
                column.push(values[0]);
                owners.push((i, j));
            }
        }

        let curve = Self {
            nodes,
            coefficients: divided_differences(&expanded, column, data, &owners),
            expanded,
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Polynomial degree: one less than the number of constraints.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }
}

/// In-place Newton divided differences over a node sequence with runs of
/// equal nodes. Inside a run `f[x, ..., x]` (order + 1 copies) is
/// `f^(order)(x) / order!`.
fn divided_differences<P: VectorSpace>(
    z: &[f64],
    mut column: Vec<P>,
    data: &[Vec<P>],
    owners: &[(usize, usize)],
) -> Vec<P> {
    let m = z.len();
    for order in 1..m {
        for k in (order..m).rev() {
            let (i, run) = owners[k];
            column[k] = if run >= order {
                data[i][order] / factorial(order)
            } else {
                (column[k] - column[k - 1]) / (z[k] - z[k - order])
            };
        }
    }
    column
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|v| v as f64).product()
}

impl<P: VectorSpace> Validate for HermiteCurve<P> {
    fn validate(&self) -> Result<()> {
        check_finite(&self.coefficients, "Newton coefficient")
    }
}

impl<P: VectorSpace> Curve<P> for HermiteCurve<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        let m = self.coefficients.len();
        let mut p = self.coefficients[m - 1];
        for k in (0..m - 1).rev() {
            p = self.coefficients[k] + p * (t - self.expanded[k]);
        }
        Ok(p)
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        let m = self.coefficients.len();
        let mut p = self.coefficients[m - 1];
        let mut dp = P::ZERO;
        for k in (0..m - 1).rev() {
            dp = p + dp * (t - self.expanded[k]);
            p = self.coefficients[k] + p * (t - self.expanded[k]);
        }
        Ok(dp)
    }

    fn domain(&self) -> (f64, f64) {
        node_domain(&self.nodes)
    }
}

/// Piecewise cubic Hermite spline with explicit per-point tangents.
///
/// Segment `i` joins `P_i` and `P_{i+1}` over `t ∈ [k_i, k_{i+1}]`, with
/// knots `k_i = i` unless given. Tangents are derivatives with respect to
/// `t`; adjacent segments share position and tangent at their common point (C1).
#[derive(Debug, Clone, Serialize)]
pub struct HermiteSpline<P> {
    positions: Vec<P>,
    tangents: Vec<P>,
    knots: Vec<f64>,
}

impl<P: VectorSpace> HermiteSpline<P> {
    /// Every control point must carry a tangent.
    pub fn new(control_points: &[ControlPoint<P>]) -> Result<Self> {
        let tangents = control_points
            .iter()
            .enumerate()
            .map(|(i, cp)| {
                cp.tangent.ok_or_else(|| {
                    CurveError::configuration(format!("control point {i} has no tangent"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let positions = control_points.iter().map(|cp| cp.position).collect();
        Self::from_parts(positions, tangents)
    }

    pub fn from_parts(positions: Vec<P>, tangents: Vec<P>) -> Result<Self> {
        let knots = uniform_nodes(positions.len());
        Self::with_knots(positions, tangents, knots)
    }

    /// One strictly increasing knot per position.
    pub fn with_knots(positions: Vec<P>, tangents: Vec<P>, knots: Vec<f64>) -> Result<Self> {
        let spline = Self {
            positions,
            tangents,
            knots,
        };
        spline.validate()?;
        Ok(spline)
    }

    pub fn positions(&self) -> &[P] {
        &self.positions
    }

    pub fn tangents(&self) -> &[P] {
        &self.tangents
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Active segment index, local parameter `u ∈ [0, 1]` and segment width
    /// for an in-domain `t`.
    fn segment(&self, t: f64) -> (usize, f64, f64) {
        let last = self.knots.len() - 2;
        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last);
        let width = self.knots[i + 1] - self.knots[i];
        (i, (t - self.knots[i]) / width, width)
    }

    fn combine(&self, i: usize, h: [f64; 4], width: f64) -> P {
        self.positions[i] * h[0]
            + self.tangents[i] * (h[1] * width)
            + self.positions[i + 1] * h[2]
            + self.tangents[i + 1] * (h[3] * width)
    }
}

impl<P: VectorSpace> Validate for HermiteSpline<P> {
    fn validate(&self) -> Result<()> {
        if self.positions.len() < 2 {
            return Err(CurveError::configuration(format!(
                "Hermite spline needs at least 2 points, got {}",
                self.positions.len()
            )));
        }
        if self.tangents.len() != self.positions.len() {
            return Err(CurveError::configuration(format!(
                "{} tangents given for {} points",
                self.tangents.len(),
                self.positions.len()
            )));
        }
        check_finite(&self.positions, "control point")?;
        check_finite(&self.tangents, "tangent")?;
        check_knots(&self.knots, self.positions.len())
    }
}

impl<P: VectorSpace> Curve<P> for HermiteSpline<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        let (i, u, width) = self.segment(t);
        Ok(self.combine(i, hermite_basis(u), width))
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        let (i, u, width) = self.segment(t);
        Ok(self.combine(i, hermite_basis_derivative(u), width) / width)
    }

    fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.knots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crv_math::DVec2;

    fn assert_vec_eq(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-10, "{a:?} != {b:?}");
    }

    #[test]
    fn test_hermite_two_points_is_cubic_segment() {
        let cps = [
            ControlPoint::with_tangent(DVec2::new(0.0, 0.0), DVec2::new(1.0, 3.0)),
            ControlPoint::with_tangent(DVec2::new(2.0, 1.0), DVec2::new(0.5, -2.0)),
        ];
        let global = HermiteCurve::new(&cps).unwrap();
        let spline = HermiteSpline::new(&cps).unwrap();
        assert_eq!(global.degree(), 3);

        for k in 0..=10 {
            let t = k as f64 / 10.0;
            assert_vec_eq(global.point_at(t).unwrap(), spline.point_at(t).unwrap());
            assert_vec_eq(global.tangent_at(t).unwrap(), spline.tangent_at(t).unwrap());
        }
    }

    #[test]
    fn test_hermite_matches_positions_and_tangents() {
        let cps = [
            ControlPoint::with_tangent(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)),
            ControlPoint::new(DVec2::new(1.0, 2.0)),
            ControlPoint::with_tangent(DVec2::new(3.0, 1.0), DVec2::new(0.0, -1.0)),
        ];
        let curve = HermiteCurve::new(&cps).unwrap();
        assert_eq!(curve.degree(), 4);

        for (i, cp) in cps.iter().enumerate() {
            let t = i as f64;
            assert_vec_eq(curve.point_at(t).unwrap(), cp.position);
            if let Some(tangent) = cp.tangent {
                assert_vec_eq(curve.tangent_at(t).unwrap(), tangent);
            }
        }
    }

    #[test]
    fn test_hermite_without_tangents_reduces_to_lagrange() {
        // Points of y = x^2 at nodes 0, 1, 2
        let cps: Vec<_> = [0.0, 1.0, 4.0].into_iter().map(ControlPoint::new).collect();
        let curve = HermiteCurve::new(&cps).unwrap();
        assert_eq!(curve.degree(), 2);
        assert_abs_diff_eq!(curve.point_at(1.5).unwrap(), 2.25, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.tangent_at(1.5).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hermite_custom_nodes() {
        // f(x) = x^3 with f(0) = 0, f'(0) = 0, f(2) = 8, f'(2) = 12
        let cps = [
            ControlPoint::with_tangent(0.0, 0.0),
            ControlPoint::with_tangent(8.0, 12.0),
        ];
        let curve = HermiteCurve::with_nodes(&cps, vec![0.0, 2.0], Tolerance::default()).unwrap();
        assert_eq!(curve.domain(), (0.0, 2.0));
        assert_abs_diff_eq!(curve.point_at(1.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.point_at(1.5).unwrap(), 3.375, epsilon = 1e-12);
    }

    #[test]
    fn test_hermite_second_derivatives() {
        // f(x) = x^5: six constraints at two nodes pin the quintic exactly
        let data = vec![vec![0.0, 0.0, 0.0], vec![1.0, 5.0, 20.0]];
        let curve = HermiteCurve::from_derivatives(&data, vec![0.0, 1.0], Tolerance::default()).unwrap();
        assert_eq!(curve.degree(), 5);
        for t in [0.25, 0.5, 0.8] {
            assert_abs_diff_eq!(curve.point_at(t).unwrap(), t.powi(5), epsilon = 1e-12);
            assert_abs_diff_eq!(curve.tangent_at(t).unwrap(), 5.0 * t.powi(4), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hermite_mixed_derivative_orders() {
        // f(x) = x^4 - 2x: value and two derivatives at 0, value at 1, value and slope at 2
        let f = |x: f64| x.powi(4) - 2.0 * x;
        let data = vec![
            vec![DVec2::new(0.0, f(0.0)), DVec2::new(1.0, -2.0), DVec2::new(0.0, 0.0)],
            vec![DVec2::new(1.0, f(1.0))],
            vec![DVec2::new(2.0, f(2.0)), DVec2::new(1.0, 30.0)],
        ];
        let curve = HermiteCurve::from_derivatives(&data, uniform_nodes(3), Tolerance::default()).unwrap();
        assert_eq!(curve.degree(), 5);
        for t in [0.3, 1.0, 1.7] {
            assert_vec_eq(curve.point_at(t).unwrap(), DVec2::new(t, f(t)));
        }
        assert_vec_eq(curve.tangent_at(2.0).unwrap(), DVec2::new(1.0, 30.0));
    }

    #[test]
    fn test_hermite_rejects_bad_input() {
        let single = [ControlPoint::with_tangent(0.0, 1.0)];
        assert!(matches!(HermiteCurve::new(&single), Err(CurveError::Configuration(_))));

        let cps = [ControlPoint::new(0.0), ControlPoint::new(1.0)];
        assert!(matches!(
            HermiteCurve::with_nodes(&cps, vec![1.0, 1.0], Tolerance::default()),
            Err(CurveError::Division(_))
        ));

        let missing = vec![vec![0.0], Vec::new()];
        assert!(matches!(
            HermiteCurve::from_derivatives(&missing, vec![0.0, 1.0], Tolerance::default()),
            Err(CurveError::Configuration(_))
        ));
    }

    #[test]
    fn test_spline_segments_and_c1() {
        let cps: Vec<_> = (0..4)
            .map(|i| {
                let x = i as f64;
                ControlPoint::with_tangent(DVec2::new(x, (x * x) % 3.0), DVec2::new(1.0, 0.5 - x))
            })
            .collect();
        let spline = HermiteSpline::new(&cps).unwrap();
        assert_eq!(spline.domain(), (0.0, 3.0));
        assert_eq!(spline.segment_count(), 3);

        for (i, cp) in cps.iter().enumerate() {
            let t = i as f64;
            assert_eq!(spline.point_at(t).unwrap(), cp.position);
            assert_vec_eq(spline.tangent_at(t).unwrap(), cp.tangent.unwrap());
        }

        // Left and right limits agree at interior joints
        let eps = 1e-7;
        for joint in [1.0, 2.0] {
            let left = spline.point_at(joint - eps).unwrap();
            let right = spline.point_at(joint + eps).unwrap();
            assert!((left - right).length() < 1e-5);
            let dl = spline.tangent_at(joint - eps).unwrap();
            let dr = spline.tangent_at(joint + eps).unwrap();
            assert!((dl - dr).length() < 1e-5);
        }
    }

    #[test]
    fn test_spline_requires_every_tangent() {
        let cps = [
            ControlPoint::with_tangent(0.0, 1.0),
            ControlPoint::new(1.0),
        ];
        let err = HermiteSpline::new(&cps).unwrap_err();
        assert_eq!(err, CurveError::configuration("control point 1 has no tangent"));
        assert!(HermiteSpline::from_parts(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(HermiteSpline::with_knots(vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.0]).is_err());
    }

    #[test]
    fn test_spline_custom_knots() {
        // y = x^2 sampled at uneven knots with exact slopes is reproduced exactly
        let knots = vec![0.0, 0.5, 2.0, 3.0];
        let positions: Vec<f64> = knots.iter().map(|k| k * k).collect();
        let tangents: Vec<f64> = knots.iter().map(|k| 2.0 * k).collect();
        let spline = HermiteSpline::with_knots(positions, tangents, knots.clone()).unwrap();
        assert_eq!(spline.domain(), (0.0, 3.0));
        assert_eq!(spline.breakpoints(), knots);
        for t in [0.2, 0.5, 1.25, 2.0, 2.7, 3.0] {
            assert_abs_diff_eq!(spline.point_at(t).unwrap(), t * t, epsilon = 1e-12);
            assert_abs_diff_eq!(spline.tangent_at(t).unwrap(), 2.0 * t, epsilon = 1e-12);
        }
    }
}
