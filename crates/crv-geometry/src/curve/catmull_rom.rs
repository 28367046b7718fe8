use crv_core::Result;
use crv_math::VectorSpace;
use serde::Serialize;

use super::{check_finite, Curve, HermiteSpline};
use crate::tangent::{estimate_tangents, estimate_tangents_with_knots, EndCondition};

/// Catmull-Rom spline: a Hermite spline whose tangents are estimated from
/// neighbouring control points.
///
/// Segment `i` of the underlying spline covers `t ∈ [i, i + 1]`. With the
/// default [`EndCondition::Anchor`] the curve starts at `P_1` and ends at
/// `P_{n-2}`.
///
/// [`CatmullRomSpline::with_knots`] builds the non-uniform variant: point `P_i`
/// is reached at knot `k_i`, so under `Anchor` the domain is `[k_1, k_{n-2}]`.
/// Each segment then equals the Barry-Goldman pyramid over its four points.
#[derive(Debug, Clone, Serialize)]
pub struct CatmullRomSpline<P> {
    control_points: Vec<P>,
    end_condition: EndCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    knots: Option<Vec<f64>>,
    #[serde(skip)]
    spline: HermiteSpline<P>,
}

impl<P: VectorSpace> CatmullRomSpline<P> {
    pub fn new(control_points: Vec<P>, end_condition: EndCondition) -> Result<Self> {
        check_finite(&control_points, "control point")?;
        let tangents = estimate_tangents(&control_points, end_condition)?;
        let positions = control_points[end_condition.interpolated_range(control_points.len())].to_vec();
        let spline = HermiteSpline::from_parts(positions, tangents)?;
        Ok(Self {
            control_points,
            end_condition,
            knots: None,
            spline,
        })
    }

    /// Non-uniform spline with one strictly increasing knot per control point.
    pub fn with_knots(control_points: Vec<P>, end_condition: EndCondition, knots: Vec<f64>) -> Result<Self> {
        check_finite(&control_points, "control point")?;
        let tangents = estimate_tangents_with_knots(&control_points, &knots, end_condition)?;
        let range = end_condition.interpolated_range(control_points.len());
        let spline = HermiteSpline::with_knots(
            control_points[range.clone()].to_vec(),
            tangents,
            knots[range].to_vec(),
        )?;
        Ok(Self {
            control_points,
            end_condition,
            knots: Some(knots),
            spline,
        })
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    pub fn end_condition(&self) -> EndCondition {
        self.end_condition
    }

    /// Caller-supplied knots, if any.
    pub fn knots(&self) -> Option<&[f64]> {
        self.knots.as_deref()
    }

    /// The equivalent Hermite spline.
    pub fn as_hermite(&self) -> &HermiteSpline<P> {
        &self.spline
    }
}

impl<P: VectorSpace> Curve<P> for CatmullRomSpline<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        self.spline.point_at(t)
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        self.spline.tangent_at(t)
    }

    fn domain(&self) -> (f64, f64) {
        self.spline.domain()
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.spline.breakpoints()
    }
}
