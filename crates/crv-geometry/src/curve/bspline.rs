//! B-spline and NURBS curve implementations.

use crv_core::{CurveError, Result, Tolerance, Validate};
use crv_math::VectorSpace;
use serde::Serialize;

use super::{check_finite, Curve};
use crate::nurbs::{deboor, KnotVector};

/// A B-spline curve defined by a knot vector (which fixes the degree) and control points.
///
/// With a clamped knot vector the curve starts at the first and ends at the
/// last control point. It stays inside the convex hull of the control points.
#[derive(Debug, Clone, Serialize)]
pub struct BSplineCurve<P> {
    knots: KnotVector,
    control_points: Vec<P>,
}

impl<P: VectorSpace> BSplineCurve<P> {
    pub fn new(knots: KnotVector, control_points: Vec<P>) -> Result<Self> {
        let curve = Self {
            knots,
            control_points,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Clamped curve of the given degree through the first and last control point.
    pub fn clamped(degree: usize, control_points: Vec<P>) -> Result<Self> {
        Self::new(KnotVector::clamped(control_points.len(), degree)?, control_points)
    }

    pub fn uniform(degree: usize, control_points: Vec<P>) -> Result<Self> {
        Self::new(KnotVector::uniform(control_points.len(), degree)?, control_points)
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    /// Basis values `N_{0,p}(t) ..= N_{n-1,p}(t)`; at most `degree + 1` are non-zero.
    pub fn basis_weights(&self, t: f64) -> Result<Vec<f64>> {
        CurveError::check_domain(t, self.domain())?;
        Ok(span_weights(&self.knots, t))
    }
}

/// Full-length basis vector built from the local basis of the span containing `t`.
fn span_weights(knots: &KnotVector, t: f64) -> Vec<f64> {
    let p = knots.degree();
    let span = knots.find_span(t);
    let local = crate::nurbs::basis_functions(p, knots.as_slice(), span, t);
    let mut weights = vec![0.0; knots.point_count()];
    weights[span - p..=span].copy_from_slice(&local);
    weights
}

fn check_point_count(knots: &KnotVector, count: usize, what: &str) -> Result<()> {
    if knots.point_count() != count {
        return Err(CurveError::configuration(format!(
            "knot vector of length {} expects {} {what}, got {count}",
            knots.len(),
            knots.point_count()
        )));
    }
    Ok(())
}

impl<P: VectorSpace> Validate for BSplineCurve<P> {
    fn validate(&self) -> Result<()> {
        check_point_count(&self.knots, self.control_points.len(), "control points")?;
        check_finite(&self.control_points, "control point")
    }
}

impl<P: VectorSpace> Curve<P> for BSplineCurve<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        Ok(deboor::curve_point(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            t,
        ))
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        Ok(deboor::curve_tangent(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            t,
        ))
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.knots.breakpoints()
    }
}

/// A NURBS (Non-Uniform Rational B-Spline) curve.
///
/// Extends [`BSplineCurve`] with one positive weight per control point. Equal
/// weights give back the plain B-spline.
#[derive(Debug, Clone, Serialize)]
pub struct NurbsCurve<P> {
    knots: KnotVector,
    control_points: Vec<P>,
    weights: Vec<f64>,
    tolerance: Tolerance,
}

impl<P: VectorSpace> NurbsCurve<P> {
    pub fn new(knots: KnotVector, control_points: Vec<P>, weights: Vec<f64>) -> Result<Self> {
        let curve = Self {
            knots,
            control_points,
            weights,
            tolerance: Tolerance::default(),
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Replace the threshold below which the weighted basis sum counts as zero.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Rational basis `R_i(t) = w_i N_i(t) / Σ_j w_j N_j(t)`.
    pub fn basis_weights(&self, t: f64) -> Result<Vec<f64>> {
        CurveError::check_domain(t, self.domain())?;
        let mut basis = span_weights(&self.knots, t);
        for (b, w) in basis.iter_mut().zip(&self.weights) {
            *b *= w;
        }
        let sum: f64 = basis.iter().sum();
        if self.tolerance.is_zero_denominator(sum) {
            return Err(CurveError::division(format!(
                "NURBS weight sum vanishes at t = {t} (sum = {sum:e})"
            )));
        }
        Ok(basis.into_iter().map(|b| b / sum).collect())
    }
}

impl<P: VectorSpace> Validate for NurbsCurve<P> {
    fn validate(&self) -> Result<()> {
        check_point_count(&self.knots, self.control_points.len(), "control points")?;
        check_point_count(&self.knots, self.weights.len(), "weights")?;
        check_finite(&self.control_points, "control point")?;
        if let Some(i) = self.weights.iter().position(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(CurveError::configuration(format!(
                "weight {i} must be finite and positive, got {}",
                self.weights[i]
            )));
        }
        Ok(())
    }
}

impl<P: VectorSpace> Curve<P> for NurbsCurve<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        deboor::nurbs_curve_point(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            t,
            self.tolerance,
        )
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        CurveError::check_domain(t, self.domain())?;
        deboor::nurbs_curve_tangent(
            self.degree(),
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            t,
            self.tolerance,
        )
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.knots.breakpoints()
    }
}
