//! Power, force and torque from the equivalence principle.
use crate::constants::{TENTHIRDS, ZVAC};
use crate::geometry::Geometry;
use crate::matrix_elements::{MatrixElementAssembler, MatrixElements};
use crate::near_field::PanelPotentialEvaluator;
use crate::overlap::{overlap_integrals, OverlapIntegrals};
use crate::pft::{
    CurrentCorrelations, CurrentSource, PftAccumulator, PftOptions, PftOutput, PftResult,
};
use crate::singular::DuffyPanelIntegrator;
use crate::traits::{PanelPairIntegrator, PotentialEvaluator};
use crate::types::Side;
use log::{debug, info, warn};
use num::{One, Zero};
use rayon::prelude::*;
use rlst::c64;

/// Material parameters on the side of the surface where fields are traced.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SideParameters {
    /// +1 outside, -1 inside.
    sign: f64,
    /// Wavenumber.
    k: c64,
    /// Wave impedance relative to vacuum.
    zrel: c64,
    /// Electric contrast, zero outside.
    gamma_e: c64,
    /// Magnetic contrast, zero outside.
    gamma_m: c64,
}

impl SideParameters {
    fn new(
        omega: c64,
        (eps_out, mu_out): (c64, c64),
        (eps_in, mu_in): (c64, c64),
        side: Side,
    ) -> Self {
        match side {
            Side::Exterior => Self {
                sign: 1.0,
                k: omega * (eps_out * mu_out).sqrt(),
                zrel: (mu_out / eps_out).sqrt(),
                gamma_e: c64::zero(),
                gamma_m: c64::zero(),
            },
            Side::Interior => Self {
                sign: -1.0,
                k: omega * (eps_in * mu_in).sqrt(),
                zrel: (mu_in / eps_in).sqrt(),
                gamma_e: (c64::one() / eps_in - c64::one() / eps_out) * ZVAC,
                gamma_m: (c64::one() / mu_in - c64::one() / mu_out) / ZVAC,
            },
        }
    }
}

/// Factors converting matrix elements into power, force and torque.
#[derive(Debug, Clone)]
struct EquivalencePrefactors {
    sign: f64,
    pee: c64,
    pem: c64,
    pme: c64,
    pmm: c64,
    fee1: c64,
    fee2: c64,
    fem1: c64,
    fem2: c64,
    fme1: c64,
    fme2: c64,
    fmm1: c64,
    fmm2: c64,
    // Contrast terms, zero outside.
    fee3: c64,
    fmm3: c64,
    fem3: c64,
    fme3: c64,
}

impl EquivalencePrefactors {
    fn new(omega: c64, p: &SideParameters) -> Self {
        let i = c64::new(0.0, 1.0);
        let kz = p.k * ZVAC * p.zrel;
        let koz = p.k / (ZVAC * p.zrel);
        let omega2 = omega * omega;
        let t = TENTHIRDS;
        Self {
            sign: p.sign,
            pee: 0.5 * i * kz,
            pem: c64::from(-0.5),
            pme: c64::from(0.5),
            pmm: 0.5 * i * koz,
            fee1: -0.5 * t * kz / omega,
            fee2: c64::from(0.5 * t * ZVAC),
            fem1: 0.5 * t / (i * omega),
            fem2: 0.5 * t * i * koz * ZVAC,
            fme1: -0.5 * t / (i * omega),
            fme2: -0.5 * t * i * kz / ZVAC,
            fmm1: -0.5 * t * koz / omega,
            fmm2: c64::from(0.5 * t / ZVAC),
            fee3: 0.25 * t * p.gamma_e / omega2,
            fmm3: 0.25 * t * p.gamma_m / omega2,
            fem3: -0.25 * t * p.gamma_m * ZVAC / (i * omega),
            fme3: 0.25 * t * p.gamma_e / (i * omega * ZVAC),
        }
    }

    /// The contribution of one pair of edges.
    ///
    /// `overlaps` carries the contrast correction on the inside.
    fn contribution(
        &self,
        m: &MatrixElements,
        c: &CurrentCorrelations,
        overlaps: Option<&OverlapIntegrals>,
    ) -> PftResult {
        let power = self.sign
            * (c.kk * self.pee * m.be
                + c.kn * self.pem * m.bh
                + c.nk * self.pme * m.bh
                + c.nn * self.pmm * m.be)
                .re;

        let mut force = [0.0; 3];
        let mut torque = [0.0; 3];
        for i in 0..3 {
            force[i] = self.sign
                * (c.kk * (self.fee1 * m.divbe[i] + self.fee2 * m.bxh[i])
                    + c.kn * (self.fem1 * m.divbh[i] + self.fem2 * m.bxe[i])
                    + c.nk * (self.fme1 * m.divbh[i] + self.fme2 * m.bxe[i])
                    + c.nn * (self.fmm1 * m.divbe[i] + self.fmm2 * m.bxh[i]))
                    .re;
            torque[i] = self.sign
                * (c.kk * (self.fee1 * m.divbrxe[i] + self.fee2 * m.rxbxh[i])
                    + c.kn * (self.fem1 * m.divbrxh[i] + self.fem2 * m.rxbxe[i])
                    + c.nk * (self.fme1 * m.divbrxh[i] + self.fme2 * m.rxbxe[i])
                    + c.nn * (self.fmm1 * m.divbrxe[i] + self.fmm2 * m.rxbxh[i]))
                    .re;
        }

        if let Some(o) = overlaps {
            let same = self.fee3 * c.kk + self.fmm3 * c.nn;
            let mixed = self.fem3 * c.kn + self.fme3 * c.nk;
            for i in 0..3 {
                force[i] -= (same * o.nabla_nabla[i] + mixed * o.times_nabla[i]).re;
                torque[i] -= (same * o.rx_nabla_nabla[i] + mixed * o.rx_times_nabla[i]).re;
            }
        }

        PftResult {
            power,
            scattered_power: 0.0,
            force: force.into(),
            torque: torque.into(),
        }
    }
}

/// Power, force and torque on surface `surface_index` from the equivalence principle.
///
/// Fields are traced on `side` of the surface. Every ordered pair of edges
/// contributes; pairs are distributed over the rayon thread pool.
///
/// The trace needs both an interior and an exterior region with
/// penetrable materials: PEC surfaces, surfaces bounding no interior and
/// invalid surface indices log a warning and give zeros.
pub fn eppft(
    geometry: &Geometry,
    surface_index: usize,
    omega: c64,
    currents: &CurrentSource,
    side: Side,
    options: &PftOptions,
) -> PftOutput {
    let assembler = DuffyPanelIntegrator::new(options.singular_points).and_then(|integrator| {
        MatrixElementAssembler::new(
            PanelPotentialEvaluator::default(),
            integrator,
            options.matrix_element_options(),
        )
    });
    match assembler {
        Ok(assembler) => eppft_with_assembler(
            geometry,
            surface_index,
            omega,
            currents,
            side,
            &assembler,
            options.by_edge,
        ),
        Err(e) => {
            warn!("Cannot build the EPPFT quadrature rules: {e}");
            let num_edges = geometry.surface(surface_index).map_or(0, |s| s.num_edges());
            PftOutput::zero(num_edges, options.by_edge)
        }
    }
}

/// [eppft] with a user-supplied matrix-element assembler.
///
/// Torques are taken about the torque centre of the assembler.
pub fn eppft_with_assembler<P: PotentialEvaluator, S: PanelPairIntegrator>(
    geometry: &Geometry,
    surface_index: usize,
    omega: c64,
    currents: &CurrentSource,
    side: Side,
    assembler: &MatrixElementAssembler<P, S>,
    by_edge: bool,
) -> PftOutput {
    let Some(surface) = geometry.surface(surface_index) else {
        warn!("EPPFT requested for unknown surface {surface_index}");
        return PftOutput::zero(0, by_edge);
    };
    let num_edges = surface.num_edges();
    let interior = match surface.interior_region() {
        Some(interior) if !surface.is_pec() => interior,
        _ => {
            warn!("EPPFT is not available for PEC surfaces (surface {surface_index})");
            return PftOutput::zero(num_edges, by_edge);
        }
    };

    let parameters = SideParameters::new(
        omega,
        geometry.region(surface.exterior_region()).eps_mu(omega),
        geometry.region(interior).eps_mu(omega),
        side,
    );
    let prefactors = EquivalencePrefactors::new(omega, &parameters);
    info!(
        "Computing EPPFT for surface {surface_index} ({side:?}, ZRel = {})",
        parameters.zrel
    );
    debug!(
        "EPPFT over {} edge pairs on {} threads",
        num_edges * num_edges,
        rayon::current_num_threads()
    );

    let offset = geometry.offset(surface_index);
    let center = assembler.options().torque_center;
    let k = parameters.k;

    (0..num_edges * num_edges)
        .into_par_iter()
        .fold(
            || PftAccumulator::new(num_edges, by_edge),
            |mut accumulator, pair| {
                let (alpha, beta) = (pair / num_edges, pair % num_edges);
                let m = assembler.matrix_elements(surface, alpha, surface, beta, k);
                let c = currents.correlations(offset, false, alpha, beta);
                let overlaps = match side {
                    Side::Interior => Some(overlap_integrals(surface, alpha, beta, &center)),
                    Side::Exterior => None,
                };
                accumulator.add(alpha, prefactors.contribution(&m, &c, overlaps.as_ref()));
                accumulator
            },
        )
        .reduce(
            || PftAccumulator::new(num_edges, by_edge),
            PftAccumulator::merge,
        )
        .into_output()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{ComplexProducts, Vector3};

    fn vacuum() -> (c64, c64) {
        (c64::one(), c64::one())
    }

    #[test]
    fn test_exterior_has_no_contrast() {
        let omega = c64::new(0.3, 0.0);
        let glass = (c64::new(2.25, 0.0), c64::one());
        let p = SideParameters::new(omega, vacuum(), glass, Side::Exterior);
        assert_eq!(p.sign, 1.0);
        assert_eq!(p.gamma_e, c64::zero());
        assert!((p.k - omega).norm() < 1E-15);

        let q = SideParameters::new(omega, vacuum(), glass, Side::Interior);
        assert_eq!(q.sign, -1.0);
        assert!((q.k - omega * 1.5).norm() < 1E-15);
        assert!((q.gamma_e - (1.0 / 2.25 - 1.0) * ZVAC).norm() < 1E-12);
        assert_eq!(q.gamma_m, c64::zero());
    }

    #[test]
    fn test_equal_materials_have_no_contrast() {
        let omega = c64::new(0.7, 0.01);
        let metal = (c64::new(-3.0, 0.4), c64::new(1.2, 0.0));
        let p = SideParameters::new(omega, metal, metal, Side::Interior);
        let f = EquivalencePrefactors::new(omega, &p);
        for x in [f.fee3, f.fmm3, f.fem3, f.fme3] {
            assert_eq!(x, c64::zero());
        }

        // The contrast correction then leaves the contribution unchanged.
        let m = MatrixElements {
            be: c64::new(0.1, 0.2),
            divbe: Vector3::new(0.3, -0.1, 0.2).to_complex(),
            bxh: Vector3::new(-0.2, 0.4, 0.1).to_complex(),
            ..Default::default()
        };
        let c = CurrentCorrelations::from_coefficients(
            c64::new(1.0, -0.5),
            c64::new(0.2, 0.1),
            c64::new(0.3, 0.3),
            c64::new(-0.4, 0.0),
        );
        let o = OverlapIntegrals {
            nabla_nabla: Vector3::new(1.0, 2.0, 3.0),
            times_nabla: Vector3::new(-1.0, 0.5, 0.0),
            rx_nabla_nabla: Vector3::new(0.1, 0.2, 0.3),
            rx_times_nabla: Vector3::new(0.3, 0.2, 0.1),
            ..Default::default()
        };
        assert_eq!(
            f.contribution(&m, &c, Some(&o)),
            f.contribution(&m, &c, None)
        );
    }

    #[test]
    fn test_inside_and_outside_signs() {
        // With equal materials the inside trace is the negative of the outside trace.
        let omega = c64::new(0.4, 0.0);
        let outside = EquivalencePrefactors::new(
            omega,
            &SideParameters::new(omega, vacuum(), vacuum(), Side::Exterior),
        );
        let inside = EquivalencePrefactors::new(
            omega,
            &SideParameters::new(omega, vacuum(), vacuum(), Side::Interior),
        );
        let m = MatrixElements {
            be: c64::new(0.5, 0.25),
            bh: c64::new(-0.1, 0.3),
            divbe: Vector3::new(0.3, -0.1, 0.2).to_complex(),
            rxbxe: Vector3::new(0.0, 0.1, 0.0).to_complex(),
            ..Default::default()
        };
        let c = CurrentCorrelations::from_coefficients(
            c64::new(1.0, 0.0),
            c64::new(0.0, 0.001),
            c64::new(0.5, 0.5),
            c64::new(0.002, 0.0),
        );
        let a = outside.contribution(&m, &c, None);
        let b = inside.contribution(&m, &c, None);
        assert_eq!(a.power, -b.power);
        assert_eq!(a.force, -b.force);
        assert_eq!(a.torque, -b.torque);
    }
}
