//! B-spline/NURBS core algorithms: knot vector utilities and De Boor evaluation.

pub(crate) mod deboor;
pub mod knot;

pub use knot::{
    basis_functions, basis_functions_derivs, build_knots, find_span, KnotMode, KnotVector,
};
