//! Double integrals over pairs of touching panels.
//!
//! Requests are normalised as `(1 / 4 A_a A_b) ∫∫ P(x, x') K(|x - x'|)`,
//! with `x` on the first panel, `x'` on the second, a polynomial `P` from
//! [KernelIntegrand] and a kernel from [Kernel].
use crate::constants::DEFAULT_SINGULAR_POINTS;
use crate::geometry::Vector3;
use crate::near_field::helmholtz_kernels;
use crate::quadrature::{
    triangle_duffy, triangle_rule, PanelConnectivity, PanelPairRule, QuadratureError,
};
use crate::traits::PanelPairIntegrator;
use itertools::izip;
use num::Zero;
use rlst::c64;

/// Kernels of the panel-pair integrals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// `G(r) = exp(ikr) / (4 pi r)`
    Helmholtz,
    /// `G'(r) / r = (ikr - 1) exp(ikr) / (4 pi r³)`
    GradHelmholtz,
}

/// Polynomial factors of the panel-pair integrals.
///
/// `n` is the request direction, `Qa` and `Qb` the source vertices of the
/// two half RWG functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelIntegrand {
    /// `2 n · (x' - Qb)`, paired with [Kernel::Helmholtz].
    DivergenceField,
    /// `4 n · (x - x')`, paired with [Kernel::GradHelmholtz].
    DivergenceGradient,
    /// `2 n · [(x - x') × (x' - Qb)]`, paired with [Kernel::GradHelmholtz].
    DivergenceCurl,
    /// `n · [(x - Qa) × (x' - Qb)]`, paired with [Kernel::Helmholtz].
    CrossField,
    /// `2 n · [(x - Qa) × (x - x')]`, paired with [Kernel::GradHelmholtz].
    CrossGradient,
}

impl KernelIntegrand {
    /// The kernel this integrand is integrated against.
    pub fn kernel(&self) -> Kernel {
        match self {
            Self::DivergenceField | Self::CrossField => Kernel::Helmholtz,
            Self::DivergenceGradient | Self::DivergenceCurl | Self::CrossGradient => {
                Kernel::GradHelmholtz
            }
        }
    }

    /// Evaluate the polynomial factor.
    pub fn evaluate(
        &self,
        direction: &Vector3,
        x: &Vector3,
        xp: &Vector3,
        qa: &Vector3,
        qb: &Vector3,
    ) -> f64 {
        match self {
            Self::DivergenceField => 2.0 * direction.dot(&(*xp - *qb)),
            Self::DivergenceGradient => 4.0 * direction.dot(&(*x - *xp)),
            Self::DivergenceCurl => 2.0 * direction.dot(&(*x - *xp).cross(&(*xp - *qb))),
            Self::CrossField => direction.dot(&(*x - *qa).cross(&(*xp - *qb))),
            Self::CrossGradient => 2.0 * direction.dot(&(*x - *qa).cross(&(*x - *xp))),
        }
    }
}

/// One integral of a panel-pair request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelRequest {
    /// The polynomial factor.
    pub integrand: KernelIntegrand,
    /// The kernel.
    pub kernel: Kernel,
    /// The direction `n` entering the polynomial factor.
    pub direction: Vector3,
}

impl KernelRequest {
    /// A request with the kernel that belongs to `integrand`.
    pub fn new(integrand: KernelIntegrand, direction: Vector3) -> Self {
        Self {
            integrand,
            kernel: integrand.kernel(),
            direction,
        }
    }
}

/// A batch of integrals over one pair of panels.
#[derive(Debug, Clone)]
pub struct PanelPairRequest {
    /// Number of shared vertices.
    pub shared: usize,
    /// Vertices of the first panel, shared vertices first.
    pub va: [Vector3; 3],
    /// Vertices of the second panel, shared vertices first and in matching order.
    pub vb: [Vector3; 3],
    /// Source vertex of the half RWG function on the first panel.
    pub qa: Vector3,
    /// Source vertex of the half RWG function on the second panel.
    pub qb: Vector3,
    /// Wavenumber.
    pub k: c64,
    /// The integrals to evaluate.
    pub requests: Vec<KernelRequest>,
}

/// The value of one integral and an estimate of its absolute error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelResult {
    /// Value.
    pub value: c64,
    /// Error estimate.
    pub error: f64,
}

/// Reference-coordinate point pairs and weights of a panel-pair rule.
#[derive(Debug, Clone)]
struct PointPairs {
    test_points: Vec<[f64; 2]>,
    trial_points: Vec<[f64; 2]>,
    weights: Vec<f64>,
}

impl From<PanelPairRule> for PointPairs {
    fn from(rule: PanelPairRule) -> Self {
        Self {
            test_points: rule.test_points,
            trial_points: rule.trial_points,
            weights: rule.weights,
        }
    }
}

impl PointPairs {
    /// A tensor-product rule for separated panels.
    fn regular(order: usize) -> Result<Self, QuadratureError> {
        let rule = triangle_rule(order)?;
        let n = rule.npoints();
        let mut pairs = Self {
            test_points: Vec::with_capacity(n * n),
            trial_points: Vec::with_capacity(n * n),
            weights: Vec::with_capacity(n * n),
        };
        for (p, wp) in rule.points.iter().zip(rule.weights.iter()) {
            for (q, wq) in rule.points.iter().zip(rule.weights.iter()) {
                pairs.test_points.push(*p);
                pairs.trial_points.push(*q);
                pairs.weights.push(wp * wq);
            }
        }
        Ok(pairs)
    }

    /// A rule for panels sharing `shared` vertices, which come first.
    fn touching(shared: usize, npoints: usize) -> Result<Self, QuadratureError> {
        let connectivity = PanelConnectivity::shared_first(shared)?;
        Ok(triangle_duffy(&connectivity, npoints)?.into())
    }

    fn integrate(&self, request: &PanelPairRequest) -> Vec<c64> {
        let va = &request.va;
        let vb = &request.vb;
        let mut values = vec![c64::zero(); request.requests.len()];
        for (p, q, w) in izip!(&self.test_points, &self.trial_points, &self.weights) {
            let x = va[0] + (va[1] - va[0]) * p[0] + (va[2] - va[0]) * p[1];
            let xp = vb[0] + (vb[1] - vb[0]) * q[0] + (vb[2] - vb[0]) * q[1];
            let (g, dg) = helmholtz_kernels(request.k, (x - xp).norm());
            for (value, r) in values.iter_mut().zip(request.requests.iter()) {
                let polynomial =
                    r.integrand
                        .evaluate(&r.direction, &x, &xp, &request.qa, &request.qb);
                let kernel = match r.kernel {
                    Kernel::Helmholtz => g,
                    Kernel::GradHelmholtz => dg,
                };
                *value += kernel * (w * polynomial);
            }
        }
        values
    }
}

/// Panel-pair integrator based on Duffy rules.
///
/// Touching panels use the singular rules of [triangle_duffy]; separated
/// panels use a tensor product of triangle rules. Errors are estimated by
/// comparing with the rule of two fewer points per dimension.
#[derive(Debug, Clone)]
pub struct DuffyPanelIntegrator {
    npoints: usize,
    /// Rules indexed by the number of shared vertices.
    rules: Vec<PointPairs>,
    coarse_rules: Vec<PointPairs>,
}

impl Default for DuffyPanelIntegrator {
    fn default() -> Self {
        Self::new(DEFAULT_SINGULAR_POINTS).unwrap()
    }
}

impl DuffyPanelIntegrator {
    /// Create an integrator with `npoints` Gauss points per dimension.
    ///
    /// At least three points are needed for the error estimate.
    pub fn new(npoints: usize) -> Result<Self, QuadratureError> {
        if npoints < 3 {
            return Err(QuadratureError::RuleNotFound(npoints));
        }
        let build = |n: usize| -> Result<Vec<PointPairs>, QuadratureError> {
            let mut rules = vec![PointPairs::regular(2 * n - 1)?];
            for shared in 1..=3 {
                rules.push(PointPairs::touching(shared, n)?);
            }
            Ok(rules)
        };
        Ok(Self {
            npoints,
            rules: build(npoints)?,
            coarse_rules: build(npoints - 2)?,
        })
    }

    /// Number of Gauss points per dimension.
    pub fn npoints(&self) -> usize {
        self.npoints
    }
}

impl PanelPairIntegrator for DuffyPanelIntegrator {
    fn integrate(&self, request: &PanelPairRequest) -> Vec<KernelResult> {
        let index = request.shared.min(3);
        let fine = self.rules[index].integrate(request);
        let coarse = self.coarse_rules[index].integrate(request);
        fine.iter()
            .zip(coarse.iter())
            .map(|(f, c)| KernelResult {
                value: *f,
                error: (f - c).norm(),
            })
            .collect()
    }
}
