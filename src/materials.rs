//! Material models.
use crate::traits::MaterialModel;
use num::One;
use rlst::c64;

/// Vacuum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vacuum;

impl MaterialModel for Vacuum {
    fn eps_mu(&self, _omega: c64) -> (c64, c64) {
        (c64::one(), c64::one())
    }
}

/// A material with frequency-independent permittivity and permeability.
#[derive(Debug, Clone, Copy)]
pub struct ConstantMaterial {
    eps: c64,
    mu: c64,
}

impl ConstantMaterial {
    /// Create a new material.
    pub fn new(eps: c64, mu: c64) -> Self {
        Self { eps, mu }
    }
}

impl MaterialModel for ConstantMaterial {
    fn eps_mu(&self, _omega: c64) -> (c64, c64) {
        (self.eps, self.mu)
    }
}

/// A Drude metal, `eps(w) = eps_inf - wp^2 / (w (w + i gamma))`, `mu = 1`.
///
/// Frequencies are in the same units as the angular frequency passed to
/// [MaterialModel::eps_mu].
#[derive(Debug, Clone, Copy)]
pub struct DrudeMaterial {
    eps_inf: f64,
    omega_p: f64,
    gamma: f64,
}

impl DrudeMaterial {
    /// Create a new material.
    pub fn new(eps_inf: f64, omega_p: f64, gamma: f64) -> Self {
        Self {
            eps_inf,
            omega_p,
            gamma,
        }
    }
}

impl MaterialModel for DrudeMaterial {
    fn eps_mu(&self, omega: c64) -> (c64, c64) {
        let eps = self.eps_inf
            - self.omega_p * self.omega_p / (omega * (omega + c64::new(0.0, self.gamma)));
        (eps, c64::one())
    }
}
