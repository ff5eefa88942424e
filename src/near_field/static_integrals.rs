//! Closed-form integrals of the static kernel `1/R` over a flat triangle.
//!
//! The observation point is split into its signed height `h` above the
//! plane of the panel and its projection `rho` onto that plane. Each edge
//! contributes through its outward in-plane normal `u`, tangent `t`, the
//! signed distance `p0` from `rho` to the edge line and the arc-length
//! coordinates `s-`, `s+` of its endpoints measured from the foot of the
//! perpendicular.
use crate::geometry::Vector3;

/// Heights below this fraction of the panel radius are treated as in-plane.
const PLANE_TOLERANCE: f64 = 1E-10;

/// Static integrals over a panel, with `R = |x - x'|`.
#[derive(Debug, Clone)]
pub(crate) struct StaticIntegrals {
    /// `∫ 1/R`
    pub(crate) i0: f64,
    /// `∫ (x' - x)/R`
    pub(crate) i1: Vector3,
    /// `∫ (x - x')/R³`
    pub(crate) j: Vector3,
    /// `∫ (x' - x)_i (x' - x)_j / R³`
    pub(crate) k: [[f64; 3]; 3],
}

/// `∫ dl / R` along an edge, choosing the form that avoids cancellation.
fn edge_log(s_minus: f64, s_plus: f64, r_minus: f64, r_plus: f64) -> f64 {
    if s_plus + s_minus >= 0.0 {
        ((r_plus + s_plus) / (r_minus + s_minus)).ln()
    } else {
        ((r_minus - s_minus) / (r_plus - s_plus)).ln()
    }
}

/// Evaluate the static integrals of the panel `vertices` at `point`.
///
/// Points in the plane of the panel take the principal value of the
/// normal component of `j`, which jumps by the subtended solid angle
/// across the panel.
pub(crate) fn static_integrals(
    vertices: &[Vector3; 3],
    normal: &Vector3,
    radius: f64,
    point: &Vector3,
) -> StaticIntegrals {
    let mut h = normal.dot(&(*point - vertices[0]));
    if h.abs() < PLANE_TOLERANCE * radius {
        h = 0.0;
    }
    let rho = *point - *normal * h;

    let mut i0 = 0.0;
    let mut i1_plane = Vector3::zeros();
    let mut j_plane = Vector3::zeros();
    let mut solid_angle = 0.0;
    // Gradient of the edge sum in i1_plane, d_i (sum_m u_m E_m)_j.
    let mut grad_i1_plane = [[0.0; 3]; 3];

    for m in 0..3 {
        let a = vertices[m];
        let b = vertices[(m + 1) % 3];
        let t = (b - a) / (b - a).norm();
        let u = t.cross(normal);

        let s_minus = (a - rho).dot(&t);
        let s_plus = (b - rho).dot(&t);
        let p0 = (a - rho).dot(&u);
        let r0_squared = p0 * p0 + h * h;
        let r_minus = (point - a).norm();
        let r_plus = (point - b).norm();

        let f = edge_log(s_minus, s_plus, r_minus, r_plus);
        let beta = f64::atan2(p0 * s_plus, r0_squared + h.abs() * r_plus)
            - f64::atan2(p0 * s_minus, r0_squared + h.abs() * r_minus);

        i0 += p0 * f - h.abs() * beta;
        i1_plane += u * (0.5 * (r0_squared * f + s_plus * r_plus - s_minus * r_minus));
        j_plane += u * f;
        solid_angle += beta;

        // Gradient of the line integral of R along the edge.
        let grad_edge = (*normal * h - u * p0) * f - t * (r_plus - r_minus);
        for (i, row) in grad_i1_plane.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry += u[j] * grad_edge[i];
            }
        }
    }

    let sign = if h == 0.0 { 0.0 } else { h.signum() };
    let j = j_plane + *normal * (sign * solid_angle);

    let mut k = [[0.0; 3]; 3];
    for (i, row) in k.iter_mut().enumerate() {
        for (l, entry) in row.iter_mut().enumerate() {
            *entry = grad_i1_plane[i][l] - normal[i] * normal[l] * i0 + h * normal[l] * j[i];
            if i == l {
                *entry += i0;
            }
        }
    }

    StaticIntegrals {
        i0,
        i1: i1_plane - *normal * (h * i0),
        j,
        k,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quadrature::triangle_rule;
    use approx::assert_relative_eq;

    fn panel() -> ([Vector3; 3], Vector3) {
        let vertices = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.1, 0.0),
            Vector3::new(0.2, 0.9, 0.3),
        ];
        let normal = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
        (vertices, normal / normal.norm())
    }

    /// Brute-force integrals on a uniformly subdivided panel.
    fn subdivided(vertices: &[Vector3; 3], point: &Vector3, n: usize) -> StaticIntegrals {
        let rule = triangle_rule(14).unwrap();
        let e1 = (vertices[1] - vertices[0]) / n as f64;
        let e2 = (vertices[2] - vertices[0]) / n as f64;
        let twice_area = e1.cross(&e2).norm();
        let mut result = StaticIntegrals {
            i0: 0.0,
            i1: Vector3::zeros(),
            j: Vector3::zeros(),
            k: [[0.0; 3]; 3],
        };
        for a in 0..n {
            for b in 0..(n - a) {
                let corner = vertices[0] + e1 * a as f64 + e2 * b as f64;
                let mut cells = vec![(corner, e1, e2)];
                if a + b + 1 < n {
                    cells.push((corner + e1 + e2, -e2, -e1));
                }
                for (origin, d1, d2) in cells {
                    for (p, w) in rule.points.iter().zip(rule.weights.iter()) {
                        let y = origin + d1 * p[0] + d2 * p[1];
                        let w = w * twice_area;
                        let d = y - *point;
                        let r = d.norm();
                        result.i0 += w / r;
                        result.i1 += d * (w / r);
                        result.j -= d * (w / (r * r * r));
                        for i in 0..3 {
                            for l in 0..3 {
                                result.k[i][l] += w * d[i] * d[l] / (r * r * r);
                            }
                        }
                    }
                }
            }
        }
        result
    }

    #[test]
    fn test_against_subdivision() {
        let (vertices, normal) = panel();
        for point in [
            Vector3::new(0.4, 0.3, 0.8),
            Vector3::new(1.5, 1.0, -0.2),
            Vector3::new(0.4, 0.35, 0.5),
        ] {
            let exact = static_integrals(&vertices, &normal, 1.0, &point);
            let numerical = subdivided(&vertices, &point, 12);
            assert_relative_eq!(exact.i0, numerical.i0, max_relative = 1E-9);
            assert_relative_eq!(exact.i1, numerical.i1, epsilon = 1E-9);
            assert_relative_eq!(exact.j, numerical.j, epsilon = 1E-9);
            for i in 0..3 {
                for l in 0..3 {
                    assert_relative_eq!(exact.k[i][l], numerical.k[i][l], epsilon = 1E-9);
                }
            }
        }
    }

    #[test]
    fn test_trace_and_symmetry() {
        // The trace of k is i0, and k is symmetric.
        let (vertices, normal) = panel();
        for point in [
            Vector3::new(0.3, 0.2, 0.05),
            Vector3::new(0.4, 0.3, 0.1),
            Vector3::new(1.2, 0.12, 0.0),
            Vector3::new(-0.5, 0.5, 0.5),
        ] {
            let s = static_integrals(&vertices, &normal, 1.0, &point);
            assert_relative_eq!(s.k[0][0] + s.k[1][1] + s.k[2][2], s.i0, max_relative = 1E-12);
            for i in 0..3 {
                for l in 0..3 {
                    assert_relative_eq!(s.k[i][l], s.k[l][i], epsilon = 1E-12);
                }
            }
        }
    }

    #[test]
    fn test_solid_angle_jump() {
        // Just above and below the centroid the normal component of j
        // approaches plus and minus 2 pi; on the panel it is the average.
        let (vertices, normal) = panel();
        let centroid = (vertices[0] + vertices[1] + vertices[2]) / 3.0;
        let above = static_integrals(&vertices, &normal, 1.0, &(centroid + normal * 1E-7));
        let below = static_integrals(&vertices, &normal, 1.0, &(centroid - normal * 1E-7));
        let on = static_integrals(&vertices, &normal, 1.0, &centroid);
        let pi2 = 2.0 * std::f64::consts::PI;
        assert_relative_eq!(above.j.dot(&normal), pi2, max_relative = 1E-5);
        assert_relative_eq!(below.j.dot(&normal), -pi2, max_relative = 1E-5);
        assert_relative_eq!(on.j.dot(&normal), 0.0, epsilon = 1E-12);
        assert_relative_eq!(above.i0, on.i0, max_relative = 1E-5);
    }
}
