//! Matrix elements between an RWG function and the fields of another.
//!
//! For test function `fa` (edge `alpha`) and the reduced fields `e`, `h` of
//! source function `fb` (edge `beta`), the elements are
//!
//! * `be = <fa | e>` and `bh = <fa | h>`,
//! * `divbe = <∇·fa | e>` and `divbh = <∇·fa | h>`,
//! * `bxe = <fa × e>` and `bxh = <fa × h>`,
//! * `divbrxe = <(∇·fa) r × e>` and `divbrxh = <(∇·fa) r × h>`,
//! * `rxbxe = <r × (fa × e)>` and `rxbxh = <r × (fa × h)>`,
//!
//! with `r` measured from the torque centre.
use crate::constants::{DEFAULT_CUBATURE_ORDER, DEFAULT_SINGULAR_POINTS};
use crate::geometry::{
    classify_panel_pair, is_finite, ComplexProducts, ComplexVector3, RwgSurface, Vector3,
};
use crate::near_field::{reduced_fields, PanelPotentialEvaluator, ReducedFields};
use crate::quadrature::{triangle_rule, QuadratureError, TriangleRule};
use crate::singular::{DuffyPanelIntegrator, KernelIntegrand, KernelRequest, PanelPairRequest};
use crate::traits::{PanelPairIntegrator, PotentialEvaluator};
use rlst::c64;

/// Integrands requested for each direction of a singular panel pair.
const SINGULAR_INTEGRANDS: [KernelIntegrand; 5] = [
    KernelIntegrand::DivergenceField,
    KernelIntegrand::DivergenceGradient,
    KernelIntegrand::DivergenceCurl,
    KernelIntegrand::CrossField,
    KernelIntegrand::CrossGradient,
];

/// Matrix elements between two RWG functions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatrixElements {
    /// `<fa | e>`
    pub be: c64,
    /// `<fa | h>`
    pub bh: c64,
    /// `<∇·fa | e>`
    pub divbe: ComplexVector3,
    /// `<∇·fa | h>`
    pub divbh: ComplexVector3,
    /// `<fa × e>`
    pub bxe: ComplexVector3,
    /// `<fa × h>`
    pub bxh: ComplexVector3,
    /// `<(∇·fa) r × e>`
    pub divbrxe: ComplexVector3,
    /// `<(∇·fa) r × h>`
    pub divbrxh: ComplexVector3,
    /// `<r × (fa × e)>`
    pub rxbxe: ComplexVector3,
    /// `<r × (fa × h)>`
    pub rxbxh: ComplexVector3,
}

impl MatrixElements {
    /// True if every element is finite.
    pub fn is_finite(&self) -> bool {
        self.be.is_finite()
            && self.bh.is_finite()
            && [
                &self.divbe,
                &self.divbh,
                &self.bxe,
                &self.bxh,
                &self.divbrxe,
                &self.divbrxh,
                &self.rxbxe,
                &self.rxbxh,
            ]
            .iter()
            .all(|v| is_finite(v))
    }

    /// Add one cubature point on a panel of the test function.
    ///
    /// `b = x - Q` for the test half, `r = x - x0`, `to_positive` and
    /// `to_negative` are the fields of the two halves of the source function
    /// at `x`. `polarity` is the sign of the test half and `signs` the
    /// weights of the two source halves in the divergence and cross
    /// elements, zero where a panel pair is handled separately.
    #[allow(clippy::too_many_arguments)]
    fn add_point(
        &mut self,
        b: &Vector3,
        r: &Vector3,
        to_positive: &ReducedFields,
        to_negative: &ReducedFields,
        w: f64,
        polarity: f64,
        signs: (f64, f64),
    ) {
        let e = to_positive.e - to_negative.e;
        let h = to_positive.h - to_negative.h;
        let pw = c64::from(polarity * w);
        let (s0, s1) = (c64::from(signs.0), c64::from(signs.1));

        self.be += b.dot_complex(&e) * pw;
        self.bh += b.dot_complex(&h) * pw;

        let w2 = c64::from(2.0 * w);
        self.divbe += (to_positive.e * s0 + to_negative.e * s1) * w2;
        self.divbh += (to_positive.h * s0 + to_negative.h * s1) * w2;

        self.bxe += (b.cross_complex(&to_positive.e) * s0 + b.cross_complex(&to_negative.e) * s1)
            * c64::from(w);
        self.bxh += b.cross_complex(&h) * pw;

        self.divbrxe += r.cross_complex(&e) * pw;
        self.divbrxh += r.cross_complex(&h) * pw;

        // r × (b × e) = b (r · e) - e (r · b)
        let rb = c64::from(r.dot(b));
        self.rxbxe += (b.scale_complex(r.dot_complex(&e)) - e * rb) * pw;
        self.rxbxh += (b.scale_complex(r.dot_complex(&h)) - h * rb) * pw;
    }
}

/// Options of the matrix-element assembler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixElementOptions {
    /// Polynomial order of the cubature rule on the test panels.
    pub order: usize,
    /// Integrate singular panel pairs by cubature too.
    pub force_cubature: bool,
    /// Origin of the torque-weighted elements.
    pub torque_center: Vector3,
}

impl Default for MatrixElementOptions {
    fn default() -> Self {
        Self {
            order: DEFAULT_CUBATURE_ORDER,
            force_cubature: false,
            torque_center: Vector3::zeros(),
        }
    }
}

/// Assembler of [MatrixElements].
///
/// Elements are integrated by cubature over the panels of the test
/// function, evaluating the source fields with a [PotentialEvaluator].
/// When both functions live on the same surface, panel pairs that touch
/// are removed from the cubature of `divbe`, `divbh` and `bxe` and
/// integrated by a [PanelPairIntegrator] instead. The other elements are
/// always integrated by cubature.
pub struct MatrixElementAssembler<P: PotentialEvaluator, S: PanelPairIntegrator> {
    evaluator: P,
    integrator: S,
    options: MatrixElementOptions,
    rule: TriangleRule,
    singular_requests: Vec<KernelRequest>,
}

impl Default for MatrixElementAssembler<PanelPotentialEvaluator, DuffyPanelIntegrator> {
    fn default() -> Self {
        Self::new(
            PanelPotentialEvaluator::default(),
            DuffyPanelIntegrator::new(DEFAULT_SINGULAR_POINTS).unwrap(),
            MatrixElementOptions::default(),
        )
        .unwrap()
    }
}

impl<P: PotentialEvaluator, S: PanelPairIntegrator> MatrixElementAssembler<P, S> {
    /// Create an assembler.
    pub fn new(
        evaluator: P,
        integrator: S,
        options: MatrixElementOptions,
    ) -> Result<Self, QuadratureError> {
        let mut singular_requests = Vec::with_capacity(3 * SINGULAR_INTEGRANDS.len());
        for mu in 0..3 {
            for integrand in SINGULAR_INTEGRANDS {
                singular_requests.push(KernelRequest::new(integrand, Vector3::ith(mu, 1.0)));
            }
        }
        Ok(Self {
            evaluator,
            integrator,
            rule: triangle_rule(options.order)?,
            options,
            singular_requests,
        })
    }

    /// The options.
    pub fn options(&self) -> &MatrixElementOptions {
        &self.options
    }

    /// Matrix elements between edge `alpha` of `surface_a` and edge `beta` of `surface_b`.
    ///
    /// Surfaces are the same when they are the same object.
    pub fn matrix_elements(
        &self,
        surface_a: &RwgSurface,
        alpha: usize,
        surface_b: &RwgSurface,
        beta: usize,
        k: c64,
    ) -> MatrixElements {
        let mut elements = MatrixElements::default();
        let mut omit = [[false; 2]; 2];
        if !self.options.force_cubature && std::ptr::eq(surface_a, surface_b) {
            self.add_singular_pairs(surface_a, alpha, beta, k, &mut elements, &mut omit);
        }
        self.add_cubature(surface_a, alpha, surface_b, beta, k, &omit, &mut elements);
        elements
    }

    /// Integrate touching panel pairs and mark them as done.
    fn add_singular_pairs(
        &self,
        surface: &RwgSurface,
        alpha: usize,
        beta: usize,
        k: c64,
        elements: &mut MatrixElements,
        omit: &mut [[bool; 2]; 2],
    ) {
        let ea = surface.edge(alpha);
        let eb = surface.edge(beta);
        let lengths = ea.length * eb.length;
        let k2 = k * k;

        for (a, a_positive) in [(0, true), (1, false)] {
            for (b, b_positive) in [(0, true), (1, false)] {
                let (Some((panel_a, source_a)), Some((panel_b, source_b))) =
                    (ea.half(a_positive), eb.half(b_positive))
                else {
                    continue;
                };
                let c = classify_panel_pair(surface, panel_a, surface, panel_b);
                if c.shared == 0 {
                    continue;
                }
                omit[a][b] = true;

                let request = PanelPairRequest {
                    shared: c.shared,
                    va: c.va,
                    vb: c.vb,
                    qa: *surface.vertex(surface.panel(panel_a).vertices[source_a]),
                    qb: *surface.vertex(surface.panel(panel_b).vertices[source_b]),
                    k,
                    requests: self.singular_requests.clone(),
                };
                let results = self.integrator.integrate(&request);

                let mut divbe = [c64::default(); 3];
                let mut divbh = [c64::default(); 3];
                let mut bxe = [c64::default(); 3];
                for (mu, r) in results.chunks_exact(SINGULAR_INTEGRANDS.len()).enumerate() {
                    divbe[mu] = r[0].value + r[1].value / k2;
                    divbh[mu] = r[2].value;
                    bxe[mu] = r[3].value + r[4].value / k2;
                }

                let sign = if a_positive == b_positive { 1.0 } else { -1.0 };
                elements.divbe += ComplexVector3::from(divbe) * c64::from(sign * lengths);
                elements.divbh += ComplexVector3::from(divbh) * c64::from(sign * lengths);
                elements.bxe += ComplexVector3::from(bxe) * c64::from(sign * lengths);
            }
        }
    }

    /// Fields of one half of the source function, zero if the half is absent.
    fn half_fields(
        &self,
        surface: &RwgSurface,
        half: Option<(usize, usize)>,
        point: &Vector3,
        k: c64,
    ) -> ReducedFields {
        match half {
            Some((panel, source)) => {
                reduced_fields(&self.evaluator, surface, panel, source, point, k)
            }
            None => ReducedFields::zero(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_cubature(
        &self,
        surface_a: &RwgSurface,
        alpha: usize,
        surface_b: &RwgSurface,
        beta: usize,
        k: c64,
        omit: &[[bool; 2]; 2],
        elements: &mut MatrixElements,
    ) {
        let ea = surface_a.edge(alpha);
        let eb = surface_b.edge(beta);
        let v1 = *surface_a.vertex(ea.v1);
        let v2 = *surface_a.vertex(ea.v2);
        let center = self.options.torque_center;
        let source_positive = eb.half(true);
        let source_negative = eb.half(false);

        let mut halves = vec![(*surface_a.vertex(ea.qp), 1.0, omit[0])];
        if let Some(qm) = ea.qm {
            halves.push((*surface_a.vertex(qm), -1.0, omit[1]));
        }

        for (p, w) in self.rule.points.iter().zip(self.rule.weights.iter()) {
            let w = w * ea.length;
            for (q, polarity, omitted) in halves.iter() {
                let b = (v1 - *q) * p[0] + (v2 - *q) * p[1];
                let x = *q + b;
                let to_positive = self.half_fields(surface_b, source_positive, &x, k);
                let to_negative = self.half_fields(surface_b, source_negative, &x, k);
                let signs = (
                    if omitted[0] { 0.0 } else { *polarity },
                    if omitted[1] { 0.0 } else { -*polarity },
                );
                elements.add_point(
                    &b,
                    &(x - center),
                    &to_positive,
                    &to_negative,
                    w,
                    *polarity,
                    signs,
                );
            }
        }
    }
}
