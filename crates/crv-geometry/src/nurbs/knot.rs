//! Knot vector construction and span lookup for B-spline/NURBS evaluation.

use std::fmt;

use crv_core::{CurveError, Result};
use serde::{Deserialize, Serialize};

/// How a knot vector is laid out when derived from point count and degree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnotMode {
    /// Evenly spaced knots `k_i = i`. The curve does not reach the end control points.
    Uniform,
    /// Open uniform knots: `degree + 1` repeated knots at both ends, so the
    /// curve starts at the first and ends at the last control point.
    #[default]
    #[serde(alias = "open")]
    Clamped,
}

impl fmt::Display for KnotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::Clamped => f.write_str("clamped"),
        }
    }
}

/// A validated, non-decreasing knot vector for a fixed degree.
///
/// Always holds `point_count + degree + 1` knots with a non-empty parameter
/// domain `[k_degree, k_point_count]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnotVector {
    degree: usize,
    knots: Vec<f64>,
}

impl KnotVector {
    /// Evenly spaced knots `0, 1, ..., n + p`.
    pub fn uniform(point_count: usize, degree: usize) -> Result<Self> {
        check_counts(point_count, degree)?;
        let knots = (0..point_count + degree + 1).map(|i| i as f64).collect();
        log::trace!("uniform knot vector: n={point_count}, p={degree}");
        Ok(Self { degree, knots })
    }

    /// Knots clamped to `[0, n - p]` with multiplicity `p + 1` at both ends.
    pub fn clamped(point_count: usize, degree: usize) -> Result<Self> {
        check_counts(point_count, degree)?;
        let last = (point_count - degree) as f64;
        let knots = std::iter::repeat(0.0)
            .take(degree + 1)
            .chain((1..point_count - degree).map(|i| i as f64))
            .chain(std::iter::repeat(last).take(degree + 1))
            .collect();
        log::trace!("clamped knot vector: n={point_count}, p={degree}");
        Ok(Self { degree, knots })
    }

    pub fn build(point_count: usize, degree: usize, mode: KnotMode) -> Result<Self> {
        match mode {
            KnotMode::Uniform => Self::uniform(point_count, degree),
            KnotMode::Clamped => Self::clamped(point_count, degree),
        }
    }

    /// Wrap caller-supplied knots after checking them against `point_count` and `degree`.
    pub fn from_knots(degree: usize, knots: Vec<f64>, point_count: usize) -> Result<Self> {
        check_counts(point_count, degree)?;
        let expected = point_count + degree + 1;
        if knots.len() != expected {
            return Err(CurveError::configuration(format!(
                "knot vector length must be n + p + 1 = {expected}, got {} knots for {point_count} points with degree {degree}",
                knots.len()
            )));
        }
        if knots.iter().any(|k| !k.is_finite()) {
            return Err(CurveError::configuration("knot vector contains non-finite values"));
        }
        if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
            return Err(CurveError::configuration(format!(
                "knot vector must be non-decreasing: k[{}] = {} > k[{}] = {}",
                i,
                knots[i],
                i + 1,
                knots[i + 1]
            )));
        }
        if knots[degree] >= knots[point_count] {
            return Err(CurveError::configuration(format!(
                "knot vector has an empty domain [{}, {}]",
                knots[degree], knots[point_count]
            )));
        }
        Ok(Self { degree, knots })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of control points this knot vector supports.
    pub fn point_count(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Parameter domain `(k_p, k_n)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.point_count()])
    }

    /// Distinct knot values inside the domain; consecutive pairs bound the polynomial spans.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut breaks: Vec<f64> = self.knots[self.degree..=self.point_count()].to_vec();
        breaks.dedup();
        breaks
    }

    /// Knot span containing `t`, see [`find_span`].
    pub fn find_span(&self, t: f64) -> usize {
        find_span(self.degree, &self.knots, self.point_count() - 1, t)
    }
}

/// Build the knot vector for `point_count` control points of the given degree.
pub fn build_knots(point_count: usize, degree: usize, mode: KnotMode) -> Result<KnotVector> {
    KnotVector::build(point_count, degree, mode)
}

fn check_counts(point_count: usize, degree: usize) -> Result<()> {
    if point_count < degree + 1 {
        return Err(CurveError::configuration(format!(
            "degree {degree} needs at least {} control points, got {point_count}",
            degree + 1
        )));
    }
    Ok(())
}

/// Find the knot span index for parameter `t` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= t < knots[i+1]`, restricted to
/// non-empty spans in `[degree, n]`. At the upper boundary the last non-empty
/// span is returned, so the curve end is the left limit of that span.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
///
/// # Panics
///
/// Panics if `knots` has fewer than `n + 2` entries. [`KnotVector::find_span`]
/// is the checked entry point.
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        let mut span = n;
        while span > degree && knots[span] >= knots[span + 1] {
            span -= 1;
        }
        return span;
    }
    if t <= knots[degree] {
        let mut span = degree;
        while span < n && knots[span] >= knots[span + 1] {
            span += 1;
        }
        return span;
    }

    // Binary search
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Compute the non-vanishing basis functions at parameter `t`.
///
/// Returns a vector of `degree + 1` basis function values N_{span-degree,degree}(t)
/// through N_{span,degree}(t). `span` must be a non-empty span.
///
/// # Panics
///
/// Panics if `span < degree` or `span + degree` is out of bounds for `knots`.
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Compute basis functions and their first derivatives at parameter `t`.
///
/// Uses `N'_{i,p} = p N_{i,p-1} / (k_{i+p} - k_i) - p N_{i+1,p-1} / (k_{i+p+1} - k_{i+1})`
/// over the same span; terms with a zero denominator vanish.
///
/// # Panics
///
/// Same conditions as [`basis_functions`].
pub fn basis_functions_derivs(
    degree: usize,
    knots: &[f64],
    span: usize,
    t: f64,
) -> (Vec<f64>, Vec<f64>) {
    let values = basis_functions(degree, knots, span, t);
    let mut derivs = vec![0.0; degree + 1];
    if degree == 0 {
        return (values, derivs);
    }

    // N_{span-p+1, p-1} ..= N_{span, p-1}
    let lower = basis_functions(degree - 1, knots, span, t);
    let p = degree as f64;

    for (r, d) in derivs.iter_mut().enumerate() {
        let i = span - degree + r;
        let mut acc = 0.0;
        if r >= 1 {
            let den = knots[i + degree] - knots[i];
            if den != 0.0 {
                acc += lower[r - 1] / den;
            }
        }
        if r < degree {
            let den = knots[i + degree + 1] - knots[i + 1];
            if den != 0.0 {
                acc -= lower[r] / den;
            }
        }
        *d = p * acc;
    }

    (values, derivs)
}
