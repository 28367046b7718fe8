//! Curve trait, control point model, and the family-polymorphic curve.

mod bspline;
mod catmull_rom;
mod hermite;
mod lagrange;

use std::fmt;

use crv_core::{CurveError, Result, Tolerance};
use crv_math::VectorSpace;
use serde::{Deserialize, Serialize};

use crate::nurbs::{KnotMode, KnotVector};
use crate::sampler::Samples;
use crate::tangent::EndCondition;

pub use bspline::{BSplineCurve, NurbsCurve};
pub use catmull_rom::CatmullRomSpline;
pub use hermite::{HermiteCurve, HermiteSpline};
pub use lagrange::LagrangeCurve;

/// A parametric curve with a closed parameter domain.
///
/// Implementations are immutable after construction; evaluation has no side
/// effects, so a curve may be shared across threads and sampled concurrently.
pub trait Curve<P: VectorSpace>: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Result<P>;

    /// Evaluate the first derivative with respect to `t`.
    fn tangent_at(&self, t: f64) -> Result<P>;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Ascending segment boundaries, from `t_min` to `t_max`.
    ///
    /// Curves made of a single polynomial piece report just the domain ends.
    fn breakpoints(&self) -> Vec<f64> {
        let (t_min, t_max) = self.domain();
        vec![t_min, t_max]
    }

    fn segment_count(&self) -> usize {
        self.breakpoints().len() - 1
    }

    /// Lazily sample `per_segment` evenly spaced points in every segment.
    fn samples(&self, per_segment: usize) -> Result<Samples<&Self, P>>
    where
        Self: Sized,
    {
        Samples::new(self, per_segment)
    }
}

impl<P: VectorSpace, C: Curve<P> + ?Sized> Curve<P> for &C {
    fn point_at(&self, t: f64) -> Result<P> {
        (**self).point_at(t)
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        (**self).tangent_at(t)
    }

    fn domain(&self) -> (f64, f64) {
        (**self).domain()
    }

    fn breakpoints(&self) -> Vec<f64> {
        (**self).breakpoints()
    }
}

/// A control point with the optional per-point data some families use.
///
/// Hermite splines require `tangent`; Hermite interpolation uses it where
/// present. NURBS read `weight` (default 1). Other families ignore both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint<P> {
    pub position: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangent: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl<P> ControlPoint<P> {
    pub fn new(position: P) -> Self {
        Self {
            position,
            tangent: None,
            weight: None,
        }
    }

    pub fn with_tangent(position: P, tangent: P) -> Self {
        Self {
            position,
            tangent: Some(tangent),
            weight: None,
        }
    }

    pub fn with_weight(position: P, weight: f64) -> Self {
        Self {
            position,
            tangent: None,
            weight: Some(weight),
        }
    }
}

impl<P> From<P> for ControlPoint<P> {
    fn from(position: P) -> Self {
        Self::new(position)
    }
}

/// The six supported interpolation/approximation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveFamily {
    Lagrange,
    Hermite,
    BSpline,
    HermiteSpline,
    CatmullRom,
    Nurbs,
}

impl CurveFamily {
    pub const ALL: [CurveFamily; 6] = [
        Self::Lagrange,
        Self::Hermite,
        Self::BSpline,
        Self::HermiteSpline,
        Self::CatmullRom,
        Self::Nurbs,
    ];

    /// Whether the family evaluates segment by segment.
    pub fn is_piecewise(self) -> bool {
        !matches!(self, Self::Lagrange | Self::Hermite)
    }
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lagrange => "Lagrange interpolation",
            Self::Hermite => "Hermite interpolation",
            Self::BSpline => "B-spline",
            Self::HermiteSpline => "Hermite spline",
            Self::CatmullRom => "Catmull-Rom spline",
            Self::Nurbs => "NURBS",
        };
        f.write_str(name)
    }
}

/// Optional per-family settings. Unset fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// B-spline/NURBS degree, default [`CurveParams::DEFAULT_DEGREE`]
    pub degree: Option<usize>,
    /// B-spline/NURBS knot layout, default clamped
    pub knot_mode: Option<KnotMode>,
    /// Explicit B-spline/NURBS knots, overriding `knot_mode`. For Catmull-Rom,
    /// one strictly increasing parameter per control point.
    pub knots: Option<Vec<f64>>,
    /// Lagrange/Hermite interpolation nodes, default `0..n`
    pub nodes: Option<Vec<f64>>,
    /// Catmull-Rom boundary policy, default [`EndCondition::Anchor`]
    pub end_condition: Option<EndCondition>,
    pub tolerance: Tolerance,
}

impl CurveParams {
    pub const DEFAULT_DEGREE: usize = 3;

    pub fn degree(&self) -> usize {
        self.degree.unwrap_or(Self::DEFAULT_DEGREE)
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }

    pub fn with_knot_mode(mut self, mode: KnotMode) -> Self {
        self.knot_mode = Some(mode);
        self
    }

    pub fn with_knots(mut self, knots: Vec<f64>) -> Self {
        self.knots = Some(knots);
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<f64>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_end_condition(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = Some(end_condition);
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Knot vector for `point_count` points: explicit knots if given, otherwise built from the mode.
    pub fn knot_vector(&self, point_count: usize) -> Result<KnotVector> {
        let degree = self.degree();
        match &self.knots {
            Some(knots) => KnotVector::from_knots(degree, knots.clone(), point_count),
            None => KnotVector::build(point_count, degree, self.knot_mode.unwrap_or_default()),
        }
    }
}

/// A curve of any family behind one tagged type.
#[derive(Debug, Clone, Serialize)]
pub enum AnyCurve<P> {
    Lagrange(LagrangeCurve<P>),
    Hermite(HermiteCurve<P>),
    BSpline(BSplineCurve<P>),
    HermiteSpline(HermiteSpline<P>),
    CatmullRom(CatmullRomSpline<P>),
    Nurbs(NurbsCurve<P>),
}

macro_rules! dispatch {
    ($self:expr, $curve:ident => $body:expr) => {
        match $self {
            AnyCurve::Lagrange($curve) => $body,
            AnyCurve::Hermite($curve) => $body,
            AnyCurve::BSpline($curve) => $body,
            AnyCurve::HermiteSpline($curve) => $body,
            AnyCurve::CatmullRom($curve) => $body,
            AnyCurve::Nurbs($curve) => $body,
        }
    };
}

impl<P: VectorSpace> AnyCurve<P> {
    /// Build and validate a curve of `family` from caller-owned control points.
    pub fn build(
        family: CurveFamily,
        control_points: &[ControlPoint<P>],
        params: &CurveParams,
    ) -> Result<Self> {
        log::debug!(
            "building {family} from {} control points",
            control_points.len()
        );
        let positions = || control_points.iter().map(|cp| cp.position).collect::<Vec<_>>();
        let nodes = || {
            params
                .nodes
                .clone()
                .unwrap_or_else(|| crate::basis::uniform_nodes(control_points.len()))
        };

        let curve = match family {
            CurveFamily::Lagrange => Self::Lagrange(LagrangeCurve::with_nodes(
                positions(),
                nodes(),
                params.tolerance,
            )?),
            CurveFamily::Hermite => Self::Hermite(HermiteCurve::with_nodes(
                control_points,
                nodes(),
                params.tolerance,
            )?),
            CurveFamily::BSpline => {
                let knots = params.knot_vector(control_points.len())?;
                Self::BSpline(BSplineCurve::new(knots, positions())?)
            }
            CurveFamily::HermiteSpline => Self::HermiteSpline(HermiteSpline::new(control_points)?),
            CurveFamily::CatmullRom => {
                let end_condition = params.end_condition.unwrap_or_default();
                Self::CatmullRom(match &params.knots {
                    Some(knots) => CatmullRomSpline::with_knots(positions(), end_condition, knots.clone())?,
                    None => CatmullRomSpline::new(positions(), end_condition)?,
                })
            }
            CurveFamily::Nurbs => {
                let knots = params.knot_vector(control_points.len())?;
                let weights = control_points
                    .iter()
                    .map(|cp| cp.weight.unwrap_or(1.0))
                    .collect();
                Self::Nurbs(
                    NurbsCurve::new(knots, positions(), weights)?.with_tolerance(params.tolerance),
                )
            }
        };
        Ok(curve)
    }

    pub fn family(&self) -> CurveFamily {
        match self {
            Self::Lagrange(_) => CurveFamily::Lagrange,
            Self::Hermite(_) => CurveFamily::Hermite,
            Self::BSpline(_) => CurveFamily::BSpline,
            Self::HermiteSpline(_) => CurveFamily::HermiteSpline,
            Self::CatmullRom(_) => CurveFamily::CatmullRom,
            Self::Nurbs(_) => CurveFamily::Nurbs,
        }
    }
}

impl<P: VectorSpace> Curve<P> for AnyCurve<P> {
    fn point_at(&self, t: f64) -> Result<P> {
        dispatch!(self, c => c.point_at(t))
    }

    fn tangent_at(&self, t: f64) -> Result<P> {
        dispatch!(self, c => c.tangent_at(t))
    }

    fn domain(&self) -> (f64, f64) {
        dispatch!(self, c => c.domain())
    }

    fn breakpoints(&self) -> Vec<f64> {
        dispatch!(self, c => c.breakpoints())
    }
}

/// Evaluate a curve of `family` at a single parameter value.
pub fn evaluate<P: VectorSpace>(
    family: CurveFamily,
    control_points: &[ControlPoint<P>],
    params: &CurveParams,
    t: f64,
) -> Result<P> {
    AnyCurve::build(family, control_points, params)?.point_at(t)
}

/// Lazily sample a curve of `family`, `sample_count` points per segment.
///
/// The returned sequence owns its curve; clone it to restart.
pub fn sample<P: VectorSpace>(
    family: CurveFamily,
    control_points: &[ControlPoint<P>],
    params: &CurveParams,
    sample_count: usize,
) -> Result<Samples<AnyCurve<P>, P>> {
    Samples::new(AnyCurve::build(family, control_points, params)?, sample_count)
}

/// Sample like [`sample`], evaluating the points on the rayon thread pool.
pub fn sample_par<P: VectorSpace>(
    family: CurveFamily,
    control_points: &[ControlPoint<P>],
    params: &CurveParams,
    sample_count: usize,
) -> Result<Vec<P>> {
    let curve = AnyCurve::build(family, control_points, params)?;
    crate::sampler::sample_par(&curve, sample_count)
}

/// Reject non-finite coordinates in caller input.
pub(crate) fn check_finite<P: VectorSpace>(points: &[P], what: &str) -> Result<()> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(CurveError::configuration(format!(
            "{what} {i} has a non-finite coordinate"
        ))),
        None => Ok(()),
    }
}

/// Check interpolation nodes: one per point, finite, pairwise distinct.
pub(crate) fn check_nodes(nodes: &[f64], point_count: usize, tolerance: Tolerance) -> Result<()> {
    if nodes.len() != point_count {
        return Err(CurveError::configuration(format!(
            "{} nodes given for {point_count} control points",
            nodes.len()
        )));
    }
    if nodes.iter().any(|x| !x.is_finite()) {
        return Err(CurveError::configuration("interpolation nodes must be finite"));
    }
    let mut sorted = nodes.to_vec();
    sorted.sort_by(f64::total_cmp);
    if let Some(w) = sorted
        .windows(2)
        .find(|w| tolerance.nodes_coincide(w[0], w[1]))
    {
        return Err(CurveError::division(format!(
            "interpolation nodes coincide at {} and {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

/// Domain spanned by a validated, non-empty node vector.
pub(crate) fn node_domain(nodes: &[f64]) -> (f64, f64) {
    nodes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}
