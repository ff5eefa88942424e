//! Traits for the collaborators of the power, force and torque routines.
use crate::geometry::{RwgSurface, Vector3};
use crate::near_field::ReducedPotentials;
use crate::singular::{KernelResult, PanelPairRequest};
use rlst::c64;

/// A homogeneous material filling one region.
pub trait MaterialModel: Sync + Send {
    /// Relative permittivity and permeability at angular frequency `omega`.
    fn eps_mu(&self, omega: c64) -> (c64, c64);

    /// Wavenumber `omega sqrt(eps mu)` in the material.
    fn wavenumber(&self, omega: c64) -> c64 {
        let (eps, mu) = self.eps_mu(omega);
        omega * (eps * mu).sqrt()
    }

    /// Wave impedance relative to vacuum, `sqrt(mu / eps)`.
    fn relative_impedance(&self, omega: c64) -> c64 {
        let (eps, mu) = self.eps_mu(omega);
        (mu / eps).sqrt()
    }
}

/// Evaluation of the potentials of half an RWG function.
///
/// The source is the restriction of a basis function to one panel,
/// `f(x') = (L / 2A) (x' - Q)`, where `Q` is the panel vertex with local
/// index `source_vertex` and `L` the length of the opposite edge.
pub trait PotentialEvaluator: Sync {
    /// Potentials at `point` for wavenumber `k`.
    fn potentials(
        &self,
        surface: &RwgSurface,
        panel: usize,
        source_vertex: usize,
        point: &Vector3,
        k: c64,
    ) -> ReducedPotentials;
}

/// Evaluation of singular double integrals over a pair of touching panels.
pub trait PanelPairIntegrator: Sync {
    /// Evaluate every kernel integral of a request, in request order.
    fn integrate(&self, request: &PanelPairRequest) -> Vec<KernelResult>;
}
