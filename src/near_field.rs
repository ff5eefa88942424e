//! Potentials and reduced fields of half RWG functions.
//!
//! The source is the restriction of an RWG function to one panel,
//! `f(x') = (L / 2A) (x' - Q)`, with surface divergence `L / A`. Its
//! reduced potentials are
//!
//! * `p = (L / A) ∫ G(x, x')`,
//! * `a = (L / 2A) ∫ (x' - Q) G(x, x')`,
//!
//! with `G = exp(ikR) / (4 pi R)`, and its reduced fields are
//! `e = a + ∇p / k²` and `h = ∇ × a`.
mod static_integrals;

use crate::constants::{DEFAULT_FAR_ORDER, DEFAULT_NEAR_POINTS, NEAR_FIELD_RADII};
use crate::geometry::{ComplexProducts, ComplexVector3, RwgSurface, Vector3};
use crate::quadrature::{
    apex_rule, collapsed_triangle_rule, triangle_rule, QuadratureError, TriangleRule,
};
use crate::traits::PotentialEvaluator;
use num::Zero;
use rlst::c64;
use static_integrals::static_integrals;
use std::f64::consts::PI;

/// Below this value of `|kR|` the regularised kernels use their Taylor series.
const SERIES_THRESHOLD: f64 = 1E-3;

/// Potentials of a half RWG function and their first derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedPotentials {
    /// Scalar potential.
    pub p: c64,
    /// Vector potential.
    pub a: ComplexVector3,
    /// Gradient of the scalar potential.
    pub dp: ComplexVector3,
    /// Derivatives of the vector potential, `da[i][j] = ∂_i a_j`.
    pub da: [[c64; 3]; 3],
}

impl Default for ReducedPotentials {
    fn default() -> Self {
        Self {
            p: c64::zero(),
            a: ComplexVector3::zeros(),
            dp: ComplexVector3::zeros(),
            da: [[c64::zero(); 3]; 3],
        }
    }
}

impl ReducedPotentials {
    /// The reduced fields at wavenumber `k`.
    pub fn fields(&self, k: c64) -> ReducedFields {
        let da = &self.da;
        ReducedFields {
            e: self.a + self.dp / (k * k),
            h: ComplexVector3::new(
                da[1][2] - da[2][1],
                da[2][0] - da[0][2],
                da[0][1] - da[1][0],
            ),
        }
    }
}

/// Reduced electric and magnetic fields of a half RWG function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducedFields {
    /// `a + ∇p / k²`
    pub e: ComplexVector3,
    /// `∇ × a`
    pub h: ComplexVector3,
}

impl ReducedFields {
    /// Zero fields.
    pub fn zero() -> Self {
        Self {
            e: ComplexVector3::zeros(),
            h: ComplexVector3::zeros(),
        }
    }
}

/// Reduced fields of the half RWG function on (`panel`, `source_vertex`) at `point`.
pub fn reduced_fields<P: PotentialEvaluator + ?Sized>(
    evaluator: &P,
    surface: &RwgSurface,
    panel: usize,
    source_vertex: usize,
    point: &Vector3,
    k: c64,
) -> ReducedFields {
    evaluator
        .potentials(surface, panel, source_vertex, point, k)
        .fields(k)
}

/// The Helmholtz kernel `G` and `G'(R) / R` at distance `r`.
pub(crate) fn helmholtz_kernels(k: c64, r: f64) -> (c64, c64) {
    let ikr = c64::new(0.0, 1.0) * k * r;
    let e = ikr.exp();
    let g = e / (4.0 * PI * r);
    (g, g * (ikr - 1.0) / (r * r))
}

/// The kernels with their static parts removed.
///
/// Returns `(exp(ikR) - 1) / (4 pi R)` and
/// `((ikR - 1) exp(ikR) + 1) / (4 pi R³)`.
fn regularised_kernels(k: c64, r: f64) -> (c64, c64) {
    let ik = c64::new(0.0, 1.0) * k;
    let ikr = ik * r;
    if ikr.norm() < SERIES_THRESHOLD {
        let ik2 = ik * ik;
        let ik3 = ik2 * ik;
        let ik4 = ik3 * ik;
        let ik5 = ik4 * ik;
        let g = ik + ik2 * (r / 2.0) + ik3 * (r * r / 6.0) + ik4 * (r * r * r / 24.0);
        let dg = ik2 / (2.0 * r) + ik3 / 3.0 + ik4 * (r / 8.0) + ik5 * (r * r / 30.0);
        (g / (4.0 * PI), dg / (4.0 * PI))
    } else {
        let e = ikr.exp();
        (
            (e - 1.0) / (4.0 * PI * r),
            ((ikr - 1.0) * e + 1.0) / (4.0 * PI * r * r * r),
        )
    }
}

/// Kernel moments over a source panel.
///
/// With `d = x' - x`: `m0 = ∫ G`, `m1 = ∫ d G`, `n1 = -∫ d g` and
/// `n2[i][j] = -∫ d_i d_j g`, where `g = G'(R) / R`.
struct KernelMoments {
    m0: c64,
    m1: ComplexVector3,
    n1: ComplexVector3,
    n2: [[c64; 3]; 3],
}

impl KernelMoments {
    fn zero() -> Self {
        Self {
            m0: c64::zero(),
            m1: ComplexVector3::zeros(),
            n1: ComplexVector3::zeros(),
            n2: [[c64::zero(); 3]; 3],
        }
    }

    fn add(&mut self, d: &Vector3, w: f64, g: c64, dg: c64) {
        self.m0 += g * w;
        self.m1 += d.scale_complex(g * w);
        self.n1 -= d.scale_complex(dg * w);
        for (i, row) in self.n2.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry -= dg * (w * d[i] * d[j]);
            }
        }
    }

    /// Scale the moments into potentials of the source `(L / 2A) (x' - Q)`.
    fn potentials(&self, scale: f64, x_minus_q: &Vector3) -> ReducedPotentials {
        let mut da = [[c64::zero(); 3]; 3];
        for (i, row) in da.iter_mut().enumerate() {
            for (j, entry) in row.iter_mut().enumerate() {
                *entry = (self.n2[i][j] + self.n1[i] * x_minus_q[j]) * scale;
            }
        }
        ReducedPotentials {
            p: self.m0 * (2.0 * scale),
            a: (self.m1 + x_minus_q.scale_complex(self.m0)) * c64::from(scale),
            dp: self.n1 * c64::from(2.0 * scale),
            da,
        }
    }
}

/// Potential evaluator for flat panels.
///
/// Points further than a few panel radii from the source use a plain
/// triangle rule. Closer points split the kernel into its static part,
/// integrated in closed form, and a bounded remainder integrated with a
/// rule collapsed at the projection of the point onto the panel.
#[derive(Debug, Clone)]
pub struct PanelPotentialEvaluator {
    far_rule: TriangleRule,
    near_points: usize,
}

impl Default for PanelPotentialEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_FAR_ORDER, DEFAULT_NEAR_POINTS).unwrap()
    }
}

impl PanelPotentialEvaluator {
    /// Create an evaluator.
    ///
    /// `far_order` is the polynomial order of the rule for distant points,
    /// `near_points` the number of Gauss points per direction of each
    /// sub-triangle used for nearby points.
    pub fn new(far_order: usize, near_points: usize) -> Result<Self, QuadratureError> {
        collapsed_triangle_rule(near_points)?;
        Ok(Self {
            far_rule: triangle_rule(far_order)?,
            near_points,
        })
    }

    /// Potentials computed with a plain triangle rule.
    pub(crate) fn cubature_potentials(
        &self,
        rule: &TriangleRule,
        surface: &RwgSurface,
        panel: usize,
        source_vertex: usize,
        point: &Vector3,
        k: c64,
    ) -> ReducedPotentials {
        let p = surface.panel(panel);
        let v = surface.panel_coords(panel);
        let mut moments = KernelMoments::zero();
        for (r, w) in rule.points.iter().zip(rule.weights.iter()) {
            let y = v[0] + (v[1] - v[0]) * r[0] + (v[2] - v[0]) * r[1];
            let d = y - *point;
            let (g, dg) = helmholtz_kernels(k, d.norm());
            moments.add(&d, w * 2.0 * p.area, g, dg);
        }
        moments.potentials(
            half_rwg_scale(surface, panel, source_vertex),
            &(*point - v[source_vertex]),
        )
    }

    /// Potentials computed with the static part split off.
    pub(crate) fn singular_potentials(
        &self,
        surface: &RwgSurface,
        panel: usize,
        source_vertex: usize,
        point: &Vector3,
        k: c64,
    ) -> ReducedPotentials {
        let p = surface.panel(panel);
        let v = surface.panel_coords(panel);
        let s = static_integrals(&v, &p.normal, p.radius, point);

        let quarter_pi = 1.0 / (4.0 * PI);
        let mut moments = KernelMoments {
            m0: c64::from(s.i0 * quarter_pi),
            m1: s.i1.scale_complex(c64::from(quarter_pi)),
            n1: s.j.scale_complex(c64::from(-quarter_pi)),
            n2: s.k.map(|row| row.map(|x| c64::from(x * quarter_pi))),
        };

        let projection = *point - p.normal * p.normal.dot(&(*point - v[0]));
        let rule = apex_rule(&v, &p.normal, &projection, self.near_points).unwrap_or_default();
        for (y, w) in rule.points.iter().zip(rule.weights.iter()) {
            let d = *y - *point;
            let r = d.norm();
            if r == 0.0 {
                continue;
            }
            let (g, dg) = regularised_kernels(k, r);
            moments.add(&d, *w, g, dg);
        }
        moments.potentials(
            half_rwg_scale(surface, panel, source_vertex),
            &(*point - v[source_vertex]),
        )
    }
}

/// `L / 2A` for the half RWG function with source vertex `source_vertex`.
fn half_rwg_scale(surface: &RwgSurface, panel: usize, source_vertex: usize) -> f64 {
    let p = surface.panel(panel);
    let a = surface.vertex(p.vertices[(source_vertex + 1) % 3]);
    let b = surface.vertex(p.vertices[(source_vertex + 2) % 3]);
    0.5 * (a - b).norm() / p.area
}

impl PotentialEvaluator for PanelPotentialEvaluator {
    fn potentials(
        &self,
        surface: &RwgSurface,
        panel: usize,
        source_vertex: usize,
        point: &Vector3,
        k: c64,
    ) -> ReducedPotentials {
        let p = surface.panel(panel);
        if (point - p.centroid).norm() > NEAR_FIELD_RADII * p.radius {
            self.cubature_potentials(&self.far_rule, surface, panel, source_vertex, point, k)
        } else {
            self.singular_potentials(surface, panel, source_vertex, point, k)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::is_finite;
    use crate::shapes::{regular_sphere, rwg_pair};
    use approx::assert_relative_eq;

    fn assert_potentials_eq(a: &ReducedPotentials, b: &ReducedPotentials, tolerance: f64) {
        let scale = a.p.norm().max(a.dp.norm()).max(a.a.norm());
        assert!((a.p - b.p).norm() < tolerance * scale);
        assert!((a.a - b.a).norm() < tolerance * scale);
        assert!((a.dp - b.dp).norm() < tolerance * scale);
        for i in 0..3 {
            for j in 0..3 {
                assert!((a.da[i][j] - b.da[i][j]).norm() < tolerance * scale);
            }
        }
    }

    fn tilted_pair() -> RwgSurface {
        rwg_pair(
            [0.0, 0.0, 0.0],
            [1.0, 0.1, 0.0],
            [0.2, 0.9, 0.3],
            [1.1, 1.0, 0.5],
        )
        .unwrap()
    }

    #[test]
    fn test_regularised_kernels_are_continuous() {
        let k = c64::new(2.0, 0.1);
        for r in [0.999E-3 / k.norm(), 1.001E-3 / k.norm()] {
            let (g, dg) = regularised_kernels(k, r);
            let (g_full, dg_full) = helmholtz_kernels(k, r);
            let g_static = 1.0 / (4.0 * PI * r);
            assert_relative_eq!(g.re, (g_full - g_static).re, max_relative = 1E-6);
            assert_relative_eq!(g.im, (g_full - g_static).im, max_relative = 1E-6);
            assert_relative_eq!(dg.re, (dg_full + g_static / (r * r)).re, max_relative = 1E-4);
        }
    }

    #[test]
    fn test_near_matches_cubature_at_moderate_distance() {
        let surface = tilted_pair();
        let evaluator = PanelPotentialEvaluator::default();
        let fine = triangle_rule(40).unwrap();
        let k = c64::new(2.0, 0.1);
        let p = surface.panel(0);
        for point in [
            p.centroid + p.normal * (2.0 * p.radius),
            p.centroid + Vector3::new(2.5, -1.0, 0.5) * p.radius,
        ] {
            for source_vertex in 0..3 {
                let near = evaluator.singular_potentials(&surface, 0, source_vertex, &point, k);
                let cubature =
                    evaluator.cubature_potentials(&fine, &surface, 0, source_vertex, &point, k);
                assert_potentials_eq(&near, &cubature, 1E-7);
            }
        }
    }

    #[test]
    fn test_far_switch_is_continuous() {
        let surface = tilted_pair();
        let evaluator = PanelPotentialEvaluator::default();
        let k = c64::new(1.0, 0.0);
        let p = surface.panel(1);
        let point = p.centroid + p.normal * (NEAR_FIELD_RADII * p.radius);
        let far = evaluator.cubature_potentials(&evaluator.far_rule, &surface, 1, 0, &point, k);
        let near = evaluator.singular_potentials(&surface, 1, 0, &point, k);
        assert_potentials_eq(&near, &far, 1E-6);
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let surface = tilted_pair();
        let evaluator = PanelPotentialEvaluator::default();
        let k = c64::new(2.0, 0.1);
        let p = surface.panel(0);
        let v = surface.panel_coords(0);
        let delta = 1E-5;
        for point in [
            p.centroid + p.normal * 0.1,
            p.centroid + Vector3::new(0.05, 0.02, 0.03),
            // On the neighbouring panel.
            surface.panel(1).centroid,
            // In the plane of the panel but outside it.
            v[0] + (v[1] - v[0]) * 1.3 + (v[2] - v[0]) * 0.1,
        ] {
            let centre = evaluator.potentials(&surface, 0, 2, &point, k);
            for i in 0..3 {
                let step = Vector3::ith(i, 1.0) * delta;
                let plus = evaluator.potentials(&surface, 0, 2, &(point + step), k);
                let minus = evaluator.potentials(&surface, 0, 2, &(point - step), k);
                let dp = (plus.p - minus.p) / (2.0 * delta);
                assert!((dp - centre.dp[i]).norm() < 1E-4 * centre.dp.norm());
                for j in 0..3 {
                    let da = (plus.a[j] - minus.a[j]) / (2.0 * delta);
                    assert!((da - centre.da[i][j]).norm() < 1E-4 * centre.dp.norm());
                }
            }
        }
    }

    #[test]
    fn test_fields() {
        let potentials = ReducedPotentials {
            p: c64::new(1.0, 0.0),
            a: ComplexVector3::new(c64::new(1.0, 0.0), c64::new(0.0, 1.0), c64::zero()),
            dp: ComplexVector3::new(c64::new(4.0, 0.0), c64::zero(), c64::zero()),
            da: [
                [c64::zero(), c64::new(3.0, 0.0), c64::zero()],
                [c64::new(1.0, 0.0), c64::zero(), c64::new(2.0, 0.0)],
                [c64::zero(), c64::zero(), c64::zero()],
            ],
        };
        let fields = potentials.fields(c64::new(2.0, 0.0));
        assert_relative_eq!(fields.e.x.re, 2.0);
        assert_relative_eq!(fields.e.y.im, 1.0);
        assert_relative_eq!(fields.h.x.re, 2.0);
        assert_relative_eq!(fields.h.y.re, 0.0);
        assert_relative_eq!(fields.h.z.re, 2.0);
    }

    #[test]
    fn test_sphere_self_panel_is_finite() {
        let sphere = regular_sphere(1, 1.0).unwrap();
        let evaluator = PanelPotentialEvaluator::default();
        let k = c64::new(1.5, 0.0);
        for panel in 0..sphere.num_panels() {
            let point = sphere.panel(panel).centroid;
            let fields = reduced_fields(&evaluator, &sphere, panel, 0, &point, k);
            assert!(is_finite(&fields.e));
            assert!(is_finite(&fields.h));
        }
    }
}
