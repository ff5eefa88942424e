//! Surface-current correlations between pairs of edges.
use crate::constants::ZVAC;
use num::Zero;
use rlst::{c64, DynamicArray, RandomAccessByRef};

/// Correlations `<x_alpha^* y_beta>` of electric (`k`) and magnetic (`n`)
/// surface-current coefficients of two edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentCorrelations {
    /// `k_alpha^* k_beta`
    pub kk: c64,
    /// `k_alpha^* n_beta`
    pub kn: c64,
    /// `n_alpha^* k_beta`
    pub nk: c64,
    /// `n_alpha^* n_beta`
    pub nn: c64,
}

impl CurrentCorrelations {
    /// Correlations of deterministic coefficients.
    pub fn from_coefficients(k_alpha: c64, n_alpha: c64, k_beta: c64, n_beta: c64) -> Self {
        Self {
            kk: k_alpha.conj() * k_beta,
            kn: k_alpha.conj() * n_beta,
            nk: n_alpha.conj() * k_beta,
            nn: n_alpha.conj() * n_beta,
        }
    }
}

/// Where the surface currents come from.
///
/// Coefficients of a surface start at its offset in the geometry. Non-PEC
/// surfaces store two coefficients per edge, the electric current followed
/// by the magnetic current; PEC surfaces store the electric current only.
#[derive(Clone, Copy)]
pub enum CurrentSource<'a> {
    /// A solution vector.
    ///
    /// Magnetic coefficients are stored divided by `-Z0` and are rescaled on
    /// access.
    Coefficients(&'a DynamicArray<c64, 1>),
    /// A correlation matrix, `sigma[[i, j]] = <x_i x_j^*>`.
    ///
    /// Magnetic entries already carry the `-Z0` scaling.
    Correlations(&'a DynamicArray<c64, 2>),
}

impl CurrentSource<'_> {
    /// The electric and (rescaled) magnetic coefficients of an edge.
    ///
    /// Correlation matrices have no coefficients; they give None.
    pub fn coefficients(&self, offset: usize, is_pec: bool, edge: usize) -> Option<(c64, c64)> {
        match self {
            Self::Coefficients(v) => {
                if is_pec {
                    Some((*v.get([offset + edge]).unwrap(), c64::zero()))
                } else {
                    Some((
                        *v.get([offset + 2 * edge]).unwrap(),
                        -ZVAC * *v.get([offset + 2 * edge + 1]).unwrap(),
                    ))
                }
            }
            Self::Correlations(_) => None,
        }
    }

    /// The current correlations between edges `alpha` and `beta`.
    pub fn correlations(
        &self,
        offset: usize,
        is_pec: bool,
        alpha: usize,
        beta: usize,
    ) -> CurrentCorrelations {
        match self {
            Self::Coefficients(_) => {
                let (k_alpha, n_alpha) = self.coefficients(offset, is_pec, alpha).unwrap();
                let (k_beta, n_beta) = self.coefficients(offset, is_pec, beta).unwrap();
                CurrentCorrelations::from_coefficients(k_alpha, n_alpha, k_beta, n_beta)
            }
            Self::Correlations(sigma) => {
                if is_pec {
                    CurrentCorrelations {
                        kk: *sigma.get([offset + beta, offset + alpha]).unwrap(),
                        kn: c64::zero(),
                        nk: c64::zero(),
                        nn: c64::zero(),
                    }
                } else {
                    let (a, b) = (offset + 2 * alpha, offset + 2 * beta);
                    CurrentCorrelations {
                        kk: *sigma.get([b, a]).unwrap(),
                        kn: *sigma.get([b + 1, a]).unwrap(),
                        nk: *sigma.get([b, a + 1]).unwrap(),
                        nn: *sigma.get([b + 1, a + 1]).unwrap(),
                    }
                }
            }
        }
    }
}
