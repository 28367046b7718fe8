//! Lagrange interpolation: one polynomial through every control point.

use crv_core::{CurveError, Result, Tolerance, Validate};
use crv_math::VectorSpace;
use serde::Serialize;

use super::{check_finite, check_nodes, node_domain, Curve};
use crate::basis::{lagrange_basis, lagrange_basis_derivative, uniform_nodes};

/// The interpolating polynomial `C(t) = Σ L_i(t) P_i` with `C(x_i) = P_i`.
///
/// Nodes default to `0, 1, ..., n - 1`, making the domain the index range.
/// Oscillates strongly for many points and offers no local control.
#[derive(Debug, Clone, Serialize)]
pub struct LagrangeCurve<P> {
    control_points: Vec<P>,
    nodes: Vec<f64>,
    tolerance: Tolerance,
}

impl<P: VectorSpace> LagrangeCurve<P> {
    pub fn new(control_points: Vec<P>) -> Result<Self> {
        let nodes = uniform_nodes(control_points.len());
        Self::with_nodes(control_points, nodes, Tolerance::default())
    }

    /// Interpolate `control_points[i]` at parameter `nodes[i]`.
    pub fn with_nodes(control_points: Vec<P>, nodes: Vec<f64>, tolerance: Tolerance) -> Result<Self> {
        let curve = Self {
            control_points,
            nodes,
            tolerance,
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// All basis weights `L_0(t) ..= L_{n-1}(t)`.
    pub fn basis_weights(&self, t: f64) -> Result<Vec<f64>> {
        CurveError::check_domain(t, self.domain())?;
        (0..self.nodes.len())
            .map(|i| lagrange_basis(&self.nodes, i, t))
            .collect()
    }
}

impl<P: VectorSpace> Validate for LagrangeCurve<P> {
    fn validate(&self) -> Result<()> {
        if self.control_points.len() < 2 {
            return Err(CurveError::configuration(format!(
                "Lagrange interpolation needs at least 2 points, got {}",
                self.control_points.len()
            )));
        }
        check_finite(&self.control_points, "control point")?;
        check_nodes(&self.nodes, self.control_points.len(), self.tolerance)
    }
}

impl<P: VectorSpace> Curve<P> for LagrangeCurve<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        let weights = self.basis_weights(t)?;
        Ok(self
            .control_points
            .iter()
            .zip(weights)
            .fold(P::ZERO, |acc, (&p, w)| acc + p * w))
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        self.control_points
            .iter()
            .enumerate()
            .try_fold(P::ZERO, |acc, (i, &p)| {
                Ok(acc + p * lagrange_basis_derivative(&self.nodes, i, t)?)
            })
    }

    fn domain(&self) -> (f64, f64) {
        node_domain(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crv_math::DVec2;

    fn parabola() -> LagrangeCurve<DVec2> {
        LagrangeCurve::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_parabola_through_three_points() {
        let curve = parabola();
        let p = curve.point_at(1.5).unwrap();
        assert_abs_diff_eq!(p.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_parabola_derivative() {
        // (x, x^2)' = (1, 2x)
        let curve = parabola();
        for &t in &[0.0, 0.5, 1.25, 2.0] {
            let d = curve.tangent_at(t).unwrap();
            assert_abs_diff_eq!(d.x, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(d.y, 2.0 * t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolates_exactly_at_nodes() {
        let points = vec![3.0, -1.0, 4.0, 1.5, -5.0];
        let nodes = vec![0.0, 0.3, 1.1, 2.0, 2.2];
        let curve = LagrangeCurve::with_nodes(points.clone(), nodes.clone(), Tolerance::default())
            .unwrap();
        for (x, p) in nodes.iter().zip(&points) {
            assert_eq!(curve.point_at(*x).unwrap(), *p);
        }
        assert_eq!(curve.domain(), (0.0, 2.2));
    }

    #[test]
    fn test_basis_weights_sum_to_one() {
        let curve = parabola();
        let weights = curve.basis_weights(0.7).unwrap();
        assert_eq!(weights.len(), 3);
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_duplicate_nodes_rejected() {
        let err = LagrangeCurve::with_nodes(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 1.0], Tolerance::default())
            .unwrap_err();
        assert!(matches!(err, CurveError::Division(_)));
    }

    #[test]
    fn test_needs_two_points() {
        assert!(matches!(
            LagrangeCurve::new(vec![1.0]),
            Err(CurveError::Configuration(_))
        ));
        assert!(matches!(
            LagrangeCurve::new(vec![1.0, f64::NAN]),
            Err(CurveError::Configuration(_))
        ));
    }

    #[test]
    fn test_outside_domain() {
        let curve = parabola();
        assert!(matches!(curve.point_at(-0.1), Err(CurveError::Domain { .. })));
        assert!(matches!(curve.tangent_at(2.1), Err(CurveError::Domain { .. })));
    }
}
