//! Gauss rules on the interval and the reference triangle.

use crate::quadrature::types::{IntervalRule, QuadratureError, TriangleRule};
use std::f64::consts::PI;

/// Largest number of Gauss-Legendre points that is tabulated.
pub const MAX_GAUSS_POINTS: usize = 40;

lazy_static! {
    static ref GAUSS_LEGENDRE_RULES: Vec<IntervalRule> =
        (1..=MAX_GAUSS_POINTS).map(compute_gauss_legendre).collect();
}

/// Legendre polynomial of degree `n` and its derivative at `x`.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for j in 2..=n {
        let j = j as f64;
        let p2 = ((2.0 * j - 1.0) * x * p1 - (j - 1.0) * p0) / j;
        p0 = p1;
        p1 = p2;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let derivative = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, derivative)
}

fn compute_gauss_legendre(npoints: usize) -> IntervalRule {
    let n = npoints as f64;
    let mut points = vec![0.0; npoints];
    let mut weights = vec![0.0; npoints];

    for i in 0..(npoints + 1) / 2 {
        let mut x = f64::cos(PI * (i as f64 + 0.75) / (n + 0.5));
        for _ in 0..100 {
            let (p, dp) = legendre(npoints, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1E-16 {
                break;
            }
        }
        let (_, dp) = legendre(npoints, x);
        let w = 1.0 / ((1.0 - x * x) * dp * dp);

        // Roots come in descending order on [-1, 1].
        points[i] = 0.5 * (1.0 - x);
        points[npoints - 1 - i] = 0.5 * (1.0 + x);
        weights[i] = w;
        weights[npoints - 1 - i] = w;
    }

    IntervalRule {
        npoints,
        points,
        weights,
    }
}

/// Return the Gauss-Legendre rule with `npoints` points on [0, 1].
pub fn gauss_legendre(npoints: usize) -> Result<&'static IntervalRule, QuadratureError> {
    if npoints == 0 || npoints > MAX_GAUSS_POINTS {
        Err(QuadratureError::RuleNotFound(npoints))
    } else {
        Ok(&GAUSS_LEGENDRE_RULES[npoints - 1])
    }
}

/// A collapsed Gauss rule on the reference triangle with `npoints` points per direction.
///
/// The square [0, 1]^2 is mapped onto the triangle by `u = s (1 - t)`,
/// `v = s t`, which collapses the edge `s = 0` onto the vertex (0, 0). The
/// Jacobian `s` cancels a `1/r` singularity located at that vertex. The rule
/// integrates polynomials of total degree `2 npoints - 2` exactly.
pub fn collapsed_triangle_rule(npoints: usize) -> Result<TriangleRule, QuadratureError> {
    let rule = gauss_legendre(npoints)?;
    let mut points = Vec::with_capacity(npoints * npoints);
    let mut weights = Vec::with_capacity(npoints * npoints);
    for (s, ws) in rule.points.iter().zip(rule.weights.iter()) {
        for (t, wt) in rule.points.iter().zip(rule.weights.iter()) {
            points.push([s * (1.0 - t), s * t]);
            weights.push(ws * wt * s);
        }
    }
    Ok(TriangleRule {
        order: 2 * npoints - 2,
        points,
        weights,
    })
}

/// A rule on the reference triangle that integrates polynomials of degree `order` exactly.
pub fn triangle_rule(order: usize) -> Result<TriangleRule, QuadratureError> {
    let npoints = (order + 3) / 2;
    let mut rule = collapsed_triangle_rule(npoints)?;
    rule.order = rule.order.max(order);
    Ok(rule)
}
