//! Scalar basis functions: Lagrange, Bernstein/Hermite, and Cox-de Boor B-spline.
//!
//! All functions are pure. A curve point is the sum of its control points
//! weighted by these functions.

use crv_core::{CurveError, Result};

/// Nodes `0, 1, ..., count - 1`.
pub fn uniform_nodes(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64).collect()
}

fn node(nodes: &[f64], i: usize) -> Result<f64> {
    nodes.get(i).copied().ok_or_else(|| {
        CurveError::configuration(format!("basis index {i} out of range for {} nodes", nodes.len()))
    })
}

fn coincident(i: usize, j: usize, x: f64) -> CurveError {
    CurveError::division(format!("interpolation nodes {i} and {j} coincide at {x}"))
}

/// Lagrange basis polynomial `L_i(t) = Π_{j≠i} (t - x_j) / (x_i - x_j)`.
///
/// `L_i(x_i)` is exactly 1 and `L_i(x_j)` exactly 0 for `j ≠ i`.
pub fn lagrange_basis(nodes: &[f64], i: usize, t: f64) -> Result<f64> {
    let xi = node(nodes, i)?;
    let mut value = 1.0;
    for (j, &xj) in nodes.iter().enumerate() {
        if j == i {
            continue;
        }
        let den = xi - xj;
        if den == 0.0 {
            return Err(coincident(i, j, xi));
        }
        value *= (t - xj) / den;
    }
    Ok(value)
}

/// First derivative of [`lagrange_basis`].
pub fn lagrange_basis_derivative(nodes: &[f64], i: usize, t: f64) -> Result<f64> {
    let xi = node(nodes, i)?;
    let mut sum = 0.0;
    for (m, &xm) in nodes.iter().enumerate() {
        if m == i {
            continue;
        }
        let den = xi - xm;
        if den == 0.0 {
            return Err(coincident(i, m, xi));
        }
        let mut term = 1.0 / den;
        for (j, &xj) in nodes.iter().enumerate() {
            if j != i && j != m {
                term *= (t - xj) / (xi - xj);
            }
        }
        sum += term;
    }
    Ok(sum)
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k.min(n - k)).fold(1.0, |acc, j| acc * (n - j) as f64 / (j + 1) as f64)
}

/// Bernstein polynomial `b_{i,n}(u) = C(n, i) u^i (1 - u)^(n - i)`. Zero for `i > n`.
pub fn bernstein(degree: usize, i: usize, u: f64) -> f64 {
    if i > degree {
        return 0.0;
    }
    binomial(degree, i) * u.powi(i as i32) * (1.0 - u).powi((degree - i) as i32)
}

/// Cubic Hermite basis `[h00, h10, h01, h11]` at local parameter `u ∈ [0, 1]`.
///
/// `h00`/`h01` weight the segment's start/end positions, `h10`/`h11` its
/// start/end tangents. Expressed through the cubic Bernstein basis so that
/// `u = 0` and `u = 1` reproduce the end positions exactly.
pub fn hermite_basis(u: f64) -> [f64; 4] {
    let [b0, b1, b2, b3] = [0, 1, 2, 3].map(|i| bernstein(3, i, u));
    [b0 + b1, b1 / 3.0, b2 + b3, -b2 / 3.0]
}

/// Derivatives of [`hermite_basis`] with respect to `u`.
pub fn hermite_basis_derivative(u: f64) -> [f64; 4] {
    let u2 = u * u;
    [
        6.0 * u2 - 6.0 * u,
        3.0 * u2 - 4.0 * u + 1.0,
        -6.0 * u2 + 6.0 * u,
        3.0 * u2 - 2.0 * u,
    ]
}

/// B-spline basis `N_{i,p}(t)` by Cox-de Boor recursion.
///
/// Terms with a zero denominator contribute 0. Degree-zero functions are the
/// indicators of `[k_i, k_{i+1})`, except at the domain end `t = k_n` where
/// `(k_i, k_{i+1}]` is used so the last span stays closed.
pub fn bspline_basis(knots: &[f64], degree: usize, i: usize, t: f64) -> f64 {
    let n = knots.len().saturating_sub(degree + 1);
    let at_end = n > 0 && t == knots[n];
    cox_de_boor(knots, degree, i, t, at_end)
}

fn cox_de_boor(knots: &[f64], p: usize, i: usize, t: f64, at_end: bool) -> f64 {
    if i + p + 1 >= knots.len() {
        return 0.0;
    }
    if p == 0 {
        let (a, b) = (knots[i], knots[i + 1]);
        let inside = if at_end { a < t && t <= b } else { a <= t && t < b };
        return if inside { 1.0 } else { 0.0 };
    }

    let mut value = 0.0;
    let left = knots[i + p] - knots[i];
    if left != 0.0 {
        value += (t - knots[i]) / left * cox_de_boor(knots, p - 1, i, t, at_end);
    }
    let right = knots[i + p + 1] - knots[i + 1];
    if right != 0.0 {
        value += (knots[i + p + 1] - t) / right * cox_de_boor(knots, p - 1, i + 1, t, at_end);
    }
    value
}
