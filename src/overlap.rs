//! Closed-form overlap integrals between RWG functions sharing a panel.
//!
//! On a flat panel every integrand is a polynomial in the position, so the
//! integrals reduce to dot and cross products of the panel's edge vectors.
//! With `Qa` the source vertex of the first function, `L1` the edge from
//! `Qa` to the next vertex and `L2` the edge from there to the last vertex,
//! points of the panel are `x = Qa + s L1 + t L2` with `0 <= t <= s <= 1`.
use crate::constants::NUM_OVERLAPS;
use crate::geometry::{RwgSurface, Vector3};

/// Overlap integrals between two RWG functions `fa` and `fb`.
///
/// `n` is the panel normal and `r` the position relative to the torque centre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlapIntegrals {
    /// `∫ fa · fb`
    pub overlap: f64,
    /// `∫ fa · (n × fb)`
    pub cross: f64,
    /// `∫ n (fa · fb)`
    pub bullet: Vector3,
    /// `∫ n (∇·fa)(∇·fb)`
    pub nabla_nabla: Vector3,
    /// `∫ (n × fa)(∇·fb)`
    pub times_nabla: Vector3,
    /// `∫ (r × n)(fa · fb)`
    pub rx_bullet: Vector3,
    /// `∫ (r × n)(∇·fa)(∇·fb)`
    pub rx_nabla_nabla: Vector3,
    /// `∫ r × (n × fa)(∇·fb)`
    pub rx_times_nabla: Vector3,
}

impl OverlapIntegrals {
    /// The integrals in their conventional flat order.
    ///
    /// Entries are: overlap, cross, then (bullet, nabla-nabla, times-nabla)
    /// for x, y and z, then the same nine torque-weighted entries.
    pub fn to_array(&self) -> [f64; NUM_OVERLAPS] {
        let mut array = [0.0; NUM_OVERLAPS];
        array[0] = self.overlap;
        array[1] = self.cross;
        for i in 0..3 {
            array[2 + 3 * i] = self.bullet[i];
            array[3 + 3 * i] = self.nabla_nabla[i];
            array[4 + 3 * i] = self.times_nabla[i];
            array[11 + 3 * i] = self.rx_bullet[i];
            array[12 + 3 * i] = self.rx_nabla_nabla[i];
            array[13 + 3 * i] = self.rx_times_nabla[i];
        }
        array
    }

    /// Add the contribution of one panel shared by both functions.
    ///
    /// `source_a` and `source_b` are the local indices of the source vertices
    /// of the two functions on this panel and `sign` the product of their
    /// polarities.
    #[allow(clippy::too_many_arguments)]
    fn add_panel(
        &mut self,
        surface: &RwgSurface,
        panel: usize,
        source_a: usize,
        source_b: usize,
        sign: f64,
        lengths: f64,
        torque_center: &Vector3,
    ) {
        let p = surface.panel(panel);
        let qa = *surface.vertex(p.vertices[source_a]);
        let qa_p1 = *surface.vertex(p.vertices[(source_a + 1) % 3]);
        let qa_p2 = *surface.vertex(p.vertices[(source_a + 2) % 3]);
        let qb = *surface.vertex(p.vertices[source_b]);
        let z = p.normal;

        let l1 = qa_p1 - qa;
        let l2 = qa_p2 - qa_p1;
        let dq = qa - qb;
        let ra = qa - *torque_center;

        let z_l1 = z.cross(&l1);
        let z_l2 = z.cross(&l2);
        let z_dq = z.cross(&dq);
        let z_ra = z.cross(&ra);

        let prefactor = sign * lengths / (2.0 * p.area);

        let l1l1 = l1.dot(&l1);
        let l1l2 = l1.dot(&l2);
        let l1dq = l1.dot(&dq);
        let l2l2 = l2.dot(&l2);
        let l2dq = l2.dot(&dq);

        let times = (l1 * 2.0 + l2).dot(&z_dq) / 6.0;
        // Zeroth and first moments of (x - Qa) · (x - Qb) in units of the panel area.
        let bullet1 = (l1l1 + l1l2) / 4.0 + l1dq / 3.0 + l2l2 / 12.0 + l2dq / 6.0;
        let bullet2 = (l1l1 + l1l2) / 5.0 + l1dq / 4.0 + l2l2 / 15.0 + l2dq / 8.0;
        let bullet3 =
            l1l1 / 10.0 + 2.0 * l1l2 / 15.0 + l1dq / 8.0 + l2l2 / 20.0 + l2dq / 12.0;
        let nabla_cross = (l1l1 + l1l2) / 2.0 + l2l2 / 6.0;

        self.overlap += prefactor * bullet1;
        self.cross += prefactor * times;
        self.bullet += z * (prefactor * bullet1);
        self.nabla_nabla += z * (prefactor * 2.0);
        self.times_nabla += (z_l1 * 2.0 + z_l2) * (prefactor / 3.0);
        self.rx_bullet -= (z_ra * bullet1 + z_l1 * bullet2 + z_l2 * bullet3) * prefactor;
        self.rx_nabla_nabla -=
            (z_ra * 2.0 + z_l1 * (4.0 / 3.0) + z_l2 * (2.0 / 3.0)) * prefactor;
        self.rx_times_nabla += (z * nabla_cross
            + ra.cross(&z_l1) * (2.0 / 3.0)
            + ra.cross(&z_l2) * (1.0 / 3.0))
            * prefactor;
    }
}

/// Overlap integrals between the RWG functions of edges `alpha` and `beta`.
///
/// Torque-weighted entries use positions relative to `torque_center`.
/// Functions whose supports share no panel give all zeros.
pub fn overlap_integrals(
    surface: &RwgSurface,
    alpha: usize,
    beta: usize,
    torque_center: &Vector3,
) -> OverlapIntegrals {
    let ea = surface.edge(alpha);
    let eb = surface.edge(beta);
    let lengths = ea.length * eb.length;
    let mut result = OverlapIntegrals::default();

    for (a_positive, b_positive) in [(true, true), (true, false), (false, true), (false, false)] {
        let (Some((panel_a, source_a)), Some((panel_b, source_b))) =
            (ea.half(a_positive), eb.half(b_positive))
        else {
            continue;
        };
        if panel_a == panel_b {
            let sign = if a_positive == b_positive { 1.0 } else { -1.0 };
            result.add_panel(
                surface,
                panel_a,
                source_a,
                source_b,
                sign,
                lengths,
                torque_center,
            );
        }
    }
    result
}

/// The edges whose RWG functions overlap the function of `edge`.
///
/// These are the edge itself followed by the other edges of its positive
/// panel and, if present, of its negative panel: five edges in the interior
/// of a mesh, three for a half-RWG function, fewer next to boundaries of
/// open surfaces.
pub fn overlapping_edges(surface: &RwgSurface, edge: usize) -> Vec<usize> {
    let e = surface.edge(edge);
    let mut neighbours = Vec::with_capacity(5);
    neighbours.push(edge);
    for (panel, source) in [e.half(true), e.half(false)].into_iter().flatten() {
        let p = surface.panel(panel);
        neighbours.extend(
            [(source + 1) % 3, (source + 2) % 3]
                .iter()
                .filter_map(|&local| p.edges[local]),
        );
    }
    neighbours
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quadrature::triangle_rule;
    use crate::shapes::{regular_sphere, screen_triangles};
    use approx::assert_relative_eq;

    /// Brute-force cubature of the overlap integrals on the shared panels.
    fn numerical_overlaps(
        surface: &RwgSurface,
        alpha: usize,
        beta: usize,
        center: &Vector3,
    ) -> OverlapIntegrals {
        let rule = triangle_rule(6).unwrap();
        let mut result = OverlapIntegrals::default();
        for (panel_index, panel) in surface.panels().iter().enumerate() {
            let div = |edge: usize| {
                let e = surface.edge(edge);
                if e.positive_panel == panel_index {
                    e.length / panel.area
                } else if e.negative_panel == Some(panel_index) {
                    -e.length / panel.area
                } else {
                    0.0
                }
            };
            let (div_a, div_b) = (div(alpha), div(beta));
            let v = surface.panel_coords(panel_index);
            for (p, w) in rule.points.iter().zip(rule.weights.iter()) {
                let x = v[0] + (v[1] - v[0]) * p[0] + (v[2] - v[0]) * p[1];
                let w = w * 2.0 * panel.area;
                let fa = surface.basis_value(alpha, panel_index, &x);
                let fb = surface.basis_value(beta, panel_index, &x);
                let n = panel.normal;
                let r = x - *center;
                result.overlap += w * fa.dot(&fb);
                result.cross += w * fa.dot(&n.cross(&fb));
                result.bullet += n * (w * fa.dot(&fb));
                result.nabla_nabla += n * (w * div_a * div_b);
                result.times_nabla += n.cross(&fa) * (w * div_b);
                result.rx_bullet += r.cross(&n) * (w * fa.dot(&fb));
                result.rx_nabla_nabla += r.cross(&n) * (w * div_a * div_b);
                result.rx_times_nabla += r.cross(&n.cross(&fa)) * (w * div_b);
            }
        }
        result
    }

    #[test]
    fn test_against_cubature() {
        let sphere = regular_sphere(1, 1.3).unwrap();
        let center = Vector3::new(0.1, -0.2, 0.3);
        for alpha in [0, 7, 19] {
            for beta in overlapping_edges(&sphere, alpha) {
                let exact = overlap_integrals(&sphere, alpha, beta, &center).to_array();
                let numerical = numerical_overlaps(&sphere, alpha, beta, &center).to_array();
                for (e, n) in exact.iter().zip(numerical.iter()) {
                    assert_relative_eq!(e, n, epsilon = 1E-12, max_relative = 1E-10);
                }
            }
        }
    }

    #[test]
    fn test_symmetry() {
        let sphere = regular_sphere(1, 1.0).unwrap();
        let origin = Vector3::zeros();
        for alpha in 0..sphere.num_edges() {
            for beta in overlapping_edges(&sphere, alpha) {
                let ab = overlap_integrals(&sphere, alpha, beta, &origin);
                let ba = overlap_integrals(&sphere, beta, alpha, &origin);
                assert_relative_eq!(ab.overlap, ba.overlap, epsilon = 1E-13);
                assert_relative_eq!(ab.cross, -ba.cross, epsilon = 1E-13);
                assert_relative_eq!(ab.nabla_nabla, ba.nabla_nabla, epsilon = 1E-13);
            }
        }
    }

    #[test]
    fn test_self_overlap_is_positive() {
        let sphere = regular_sphere(0, 1.0).unwrap();
        for e in 0..sphere.num_edges() {
            let o = overlap_integrals(&sphere, e, e, &Vector3::zeros());
            assert!(o.overlap > 0.0);
            assert_relative_eq!(o.cross, 0.0, epsilon = 1E-14);
        }
    }

    #[test]
    fn test_disjoint_edges_vanish() {
        let sphere = regular_sphere(2, 1.0).unwrap();
        let neighbours = overlapping_edges(&sphere, 0);
        let far = (0..sphere.num_edges())
            .find(|e| {
                let p = sphere.edge(*e);
                let q = sphere.edge(0);
                (p.centroid - q.centroid).norm() > 1.0
            })
            .unwrap();
        assert!(!neighbours.contains(&far));
        let o = overlap_integrals(&sphere, 0, far, &Vector3::zeros());
        assert!(o.to_array().iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_overlapping_edge_counts() {
        let sphere = regular_sphere(1, 1.0).unwrap();
        for e in 0..sphere.num_edges() {
            let n = overlapping_edges(&sphere, e);
            assert_eq!(n.len(), 5);
            assert_eq!(n[0], e);
            let mut sorted = n.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), 5);
        }

        // Edges along the boundary of an open screen lose their boundary neighbours.
        let screen = screen_triangles(2).unwrap();
        let counts = (0..screen.num_edges())
            .map(|e| overlapping_edges(&screen, e).len())
            .collect::<Vec<_>>();
        assert!(counts.iter().all(|c| *c <= 5));
        assert!(counts.iter().any(|c| *c < 5));
    }
}
