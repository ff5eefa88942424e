//! Power, force and torque from overlap integrals.
use crate::constants::{TENTHIRDS, ZVAC};
use crate::geometry::{Geometry, RwgSurface};
use crate::overlap::{overlap_integrals, overlapping_edges, OverlapIntegrals};
use crate::pft::{
    CurrentCorrelations, CurrentSource, PftAccumulator, PftOptions, PftOutput, PftResult,
};
use log::{info, warn};
use rlst::{c64, DynamicArray, RandomAccessByRef};

/// Material factors of the overlap formulas.
struct OverlapPrefactors {
    omega: c64,
    /// Wave impedance of the exterior medium in ohms.
    zz: c64,
    /// Squared wavenumber of the exterior medium.
    k2: c64,
}

impl OverlapPrefactors {
    fn contribution(&self, o: &OverlapIntegrals, c: &CurrentCorrelations) -> PftResult {
        let field = -(c.kk * self.zz + c.nn / self.zz);
        let mixed = (c.nk - c.kn) * 2.0 / (c64::new(0.0, 1.0) * self.omega);
        let factor = 0.25 * TENTHIRDS;

        let mut force = [0.0; 3];
        let mut torque = [0.0; 3];
        for i in 0..3 {
            force[i] = factor
                * (field * (c64::from(o.bullet[i]) - o.nabla_nabla[i] / self.k2)
                    + mixed * o.times_nabla[i])
                    .re;
            torque[i] = factor
                * (field * (c64::from(o.rx_bullet[i]) - o.rx_nabla_nabla[i] / self.k2)
                    + mixed * o.rx_times_nabla[i])
                    .re;
        }
        PftResult {
            power: 0.25 * ((c.kn - c.nk) * o.cross).re,
            scattered_power: 0.0,
            force: force.into(),
            torque: torque.into(),
        }
    }
}

/// Power extinguished from an incident field by the currents on a surface.
///
/// `excitation` holds the right-hand side of the scattering problem in
/// the layout of the coefficient vector: electric entries are scaled by
/// `-Z0` and magnetic entries by `-1` to obtain incident fields.
pub fn extinction(
    surface: &RwgSurface,
    offset: usize,
    coefficients: &DynamicArray<c64, 1>,
    excitation: &DynamicArray<c64, 1>,
) -> f64 {
    let mut total = 0.0;
    let mut index = offset;
    for _ in 0..surface.num_edges() {
        let k = *coefficients.get([index]).unwrap();
        let v_e = -ZVAC * *excitation.get([index]).unwrap();
        total += 0.5 * (k.conj() * v_e).re;
        index += 1;
        if surface.is_pec() {
            continue;
        }
        let n = -ZVAC * *coefficients.get([index]).unwrap();
        let v_h = -*excitation.get([index]).unwrap();
        total += 0.5 * (n.conj() * v_h).re;
        index += 1;
    }
    total
}

/// Power, force and torque on surface `surface_index` from overlap integrals.
///
/// Only pairs of edges whose supports share a panel contribute. Material
/// properties are those of the exterior region. If `currents` are
/// coefficients and an `excitation` is given, the scattered power is the
/// extinction minus the absorbed power; otherwise it is zero.
///
/// An invalid surface index logs a warning and gives zeros.
pub fn opft(
    geometry: &Geometry,
    surface_index: usize,
    omega: c64,
    currents: &CurrentSource,
    excitation: Option<&DynamicArray<c64, 1>>,
    options: &PftOptions,
) -> PftOutput {
    let Some(surface) = geometry.surface(surface_index) else {
        warn!("OPFT requested for unknown surface {surface_index}");
        return PftOutput::zero(0, options.by_edge);
    };
    let offset = geometry.offset(surface_index);
    let is_pec = surface.is_pec();

    let (eps, mu) = geometry.region(surface.exterior_region()).eps_mu(omega);
    let prefactors = OverlapPrefactors {
        omega,
        zz: ZVAC * (mu / eps).sqrt(),
        k2: omega * omega * eps * mu,
    };
    info!(
        "Computing OPFT for surface {surface_index} (Z = {} ohm)",
        prefactors.zz
    );

    let mut accumulator = PftAccumulator::new(surface.num_edges(), options.by_edge);
    for alpha in 0..surface.num_edges() {
        for beta in overlapping_edges(surface, alpha) {
            let o = overlap_integrals(surface, alpha, beta, &options.torque_center);
            let c = currents.correlations(offset, is_pec, alpha, beta);
            accumulator.add(alpha, prefactors.contribution(&o, &c));
        }
    }
    let mut output = accumulator.into_output();

    if let (CurrentSource::Coefficients(coefficients), Some(excitation)) =
        (currents, excitation)
    {
        output.total.scattered_power =
            extinction(surface, offset, coefficients, excitation) - output.total.power;
    }
    output
}
