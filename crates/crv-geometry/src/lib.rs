//! Curve geometry: interpolating and approximating parametric curves.
//!
//! Six families share one [`Curve`] interface: Lagrange and Hermite
//! interpolation, B-spline, Hermite spline, Catmull-Rom spline and NURBS.
//! Curves are built and validated once from control points, then evaluated
//! at single parameters or sampled lazily segment by segment.

pub mod basis;
pub mod curve;
pub mod nurbs;
pub mod sampler;
pub mod subdivision;
pub mod tangent;
pub mod tessellate;

pub use curve::{
    evaluate, sample, sample_par, AnyCurve, BSplineCurve, CatmullRomSpline, ControlPoint, Curve,
    CurveFamily, CurveParams, HermiteCurve, HermiteSpline, LagrangeCurve, NurbsCurve,
};
pub use nurbs::{build_knots, KnotMode, KnotVector};
pub use sampler::{ParameterSequence, Samples};
pub use subdivision::four_point_subdivision;
pub use tangent::EndCondition;
pub use tessellate::curve_to_polyline;
