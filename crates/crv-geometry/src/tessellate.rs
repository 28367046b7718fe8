//! Adaptive conversion of curves to polylines.

use crv_core::{CurveError, Result};
use crv_math::VectorSpace;

use crate::curve::Curve;

/// Maximum recursion depth for adaptive subdivision.
pub const MAX_DEPTH: u32 = 12;

/// Convert a curve to a polyline using adaptive subdivision.
///
/// Every segment between consecutive breakpoints is tessellated on its own,
/// so corners at segment joints are always kept. Within a segment the
/// parameter interval is halved while the curve midpoint deviates from the
/// chord midpoint by more than `tolerance`, up to [`MAX_DEPTH`] levels.
///
/// # Arguments
/// * `curve` - The curve to tessellate
/// * `tolerance` - Maximum allowed midpoint deviation, must be positive
///
/// # Returns
/// The polyline vertices, starting at the domain minimum and ending at the domain maximum.
pub fn curve_to_polyline<P, C>(curve: &C, tolerance: f64) -> Result<Vec<P>>
where
    P: VectorSpace,
    C: Curve<P> + ?Sized,
{
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(CurveError::configuration(format!(
            "tessellation tolerance must be positive, got {tolerance}"
        )));
    }

    let breakpoints = curve.breakpoints();
    let mut points = vec![curve.point_at(breakpoints[0])?];
    for w in breakpoints.windows(2) {
        let (p0, p1) = (curve.point_at(w[0])?, curve.point_at(w[1])?);
        subdivide_curve(curve, (w[0], p0), (w[1], p1), tolerance, &mut points, 0)?;
    }
    log::trace!("tessellated {} segments into {} points", breakpoints.len() - 1, points.len());
    Ok(points)
}

fn subdivide_curve<P, C>(
    curve: &C,
    (t0, p0): (f64, P),
    (t1, p1): (f64, P),
    tolerance: f64,
    points: &mut Vec<P>,
    depth: u32,
) -> Result<()>
where
    P: VectorSpace,
    C: Curve<P> + ?Sized,
{
    let t_mid = (t0 + t1) * 0.5;
    let p_mid = curve.point_at(t_mid)?;

    // Chord midpoint
    let chord_mid = (p0 + p1) * 0.5;
    let deviation = p_mid.distance(chord_mid);

    if depth < MAX_DEPTH && deviation > tolerance {
        subdivide_curve(curve, (t0, p0), (t_mid, p_mid), tolerance, points, depth + 1)?;
        subdivide_curve(curve, (t_mid, p_mid), (t1, p1), tolerance, points, depth + 1)?;
    } else {
        points.push(p1);
    }
    Ok(())
}
