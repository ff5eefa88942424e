//! Power, force and torque traces.
//!
//! Two algorithms are provided:
//!
//! * [opft] combines closed-form overlap integrals between RWG functions
//!   whose supports touch.
//! * [eppft] evaluates the equivalence-principle expressions over every
//!   pair of edges of a surface, using
//!   [MatrixElementAssembler](crate::matrix_elements::MatrixElementAssembler) for the
//!   fields of one edge on the support of another.
//!
//! Forces are returned in nanonewtons and torques in nanonewton-microns for
//! lengths in microns and fields in volts per micron.
mod currents;
mod eppft;
mod opft;

pub use currents::{CurrentCorrelations, CurrentSource};
pub use eppft::{eppft, eppft_with_assembler};
pub use opft::{extinction, opft};

use crate::constants::{
    DEFAULT_CUBATURE_ORDER, DEFAULT_SINGULAR_POINTS, FORCE_CUBATURE_ENV, NUM_EPPFT, NUM_OPFT,
};
use crate::geometry::Vector3;
use crate::matrix_elements::MatrixElementOptions;
use std::ops::{Add, AddAssign};

/// Options of the power, force and torque traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PftOptions {
    pub(crate) cubature_order: usize,
    pub(crate) force_cubature: bool,
    pub(crate) singular_points: usize,
    pub(crate) torque_center: Vector3,
    pub(crate) by_edge: bool,
}

impl Default for PftOptions {
    fn default() -> Self {
        Self {
            cubature_order: DEFAULT_CUBATURE_ORDER,
            force_cubature: false,
            singular_points: DEFAULT_SINGULAR_POINTS,
            torque_center: Vector3::zeros(),
            by_edge: false,
        }
    }
}

impl PftOptions {
    /// Default options, forcing cubature if the environment variable
    /// [FORCE_CUBATURE_ENV] is set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if std::env::var_os(FORCE_CUBATURE_ENV).is_some() {
            options.force_cubature(true);
        }
        options
    }

    /// Set the cubature order of the equivalence-principle matrix elements.
    pub fn cubature_order(&mut self, order: usize) -> &mut Self {
        self.cubature_order = order;
        self
    }

    /// Integrate singular panel pairs by cubature instead of Duffy rules.
    pub fn force_cubature(&mut self, force: bool) -> &mut Self {
        self.force_cubature = force;
        self
    }

    /// Set the number of Gauss points per dimension for singular panel pairs.
    pub fn singular_points(&mut self, npoints: usize) -> &mut Self {
        self.singular_points = npoints;
        self
    }

    /// Set the point about which torques are taken.
    ///
    /// Overlap torques obey `T' = T - d × F` when the centre moves by `d`.
    /// Equivalence-principle torques do not: the `(∇·fa) r × e` elements
    /// carry half the weight of the shift, so the two traces only agree
    /// about the centre the currents were computed for. Do not compare
    /// them about a shifted centre.
    pub fn torque_center(&mut self, center: Vector3) -> &mut Self {
        self.torque_center = center;
        self
    }

    /// Also return the contribution of every edge.
    pub fn by_edge(&mut self, by_edge: bool) -> &mut Self {
        self.by_edge = by_edge;
        self
    }

    /// The options of the matrix-element assembler.
    pub fn matrix_element_options(&self) -> MatrixElementOptions {
        MatrixElementOptions {
            order: self.cubature_order,
            force_cubature: self.force_cubature,
            torque_center: self.torque_center,
        }
    }
}

/// Absorbed power, scattered power, force and torque.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PftResult {
    /// Absorbed power.
    pub power: f64,
    /// Scattered power (overlap trace with an excitation only).
    pub scattered_power: f64,
    /// Force.
    pub force: Vector3,
    /// Torque.
    pub torque: Vector3,
}

impl PftResult {
    /// Power, force and torque in the order (P, Fx, Fy, Fz, Tx, Ty, Tz).
    pub fn to_eppft_array(&self) -> [f64; NUM_EPPFT] {
        [
            self.power,
            self.force.x,
            self.force.y,
            self.force.z,
            self.torque.x,
            self.torque.y,
            self.torque.z,
        ]
    }

    /// All quantities in the order (P, Pscat, Fx, Fy, Fz, Tx, Ty, Tz).
    pub fn to_opft_array(&self) -> [f64; NUM_OPFT] {
        [
            self.power,
            self.scattered_power,
            self.force.x,
            self.force.y,
            self.force.z,
            self.torque.x,
            self.torque.y,
            self.torque.z,
        ]
    }
}

impl AddAssign for PftResult {
    fn add_assign(&mut self, rhs: Self) {
        self.power += rhs.power;
        self.scattered_power += rhs.scattered_power;
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

impl Add for PftResult {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// The result of a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct PftOutput {
    /// Totals over the surface.
    pub total: PftResult,
    /// Contribution of each edge, if requested.
    ///
    /// The contribution of a pair of edges is attributed to the first edge
    /// of the pair. The entries sum to `total`, except for the scattered
    /// power, which is only available as a total.
    pub by_edge: Option<Vec<PftResult>>,
}

impl PftOutput {
    /// An all-zero output for a surface with `num_edges` edges.
    pub fn zero(num_edges: usize, by_edge: bool) -> Self {
        Self {
            total: PftResult::default(),
            by_edge: by_edge.then(|| vec![PftResult::default(); num_edges]),
        }
    }
}

/// Running sums of a trace, one per worker thread.
#[derive(Debug, Clone)]
struct PftAccumulator {
    total: PftResult,
    by_edge: Option<Vec<PftResult>>,
}

impl PftAccumulator {
    fn new(num_edges: usize, by_edge: bool) -> Self {
        let PftOutput { total, by_edge } = PftOutput::zero(num_edges, by_edge);
        Self { total, by_edge }
    }

    fn add(&mut self, edge: usize, contribution: PftResult) {
        self.total += contribution;
        if let Some(by_edge) = self.by_edge.as_mut() {
            by_edge[edge] += contribution;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.total += other.total;
        if let (Some(a), Some(b)) = (self.by_edge.as_mut(), other.by_edge) {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
        }
        self
    }

    fn into_output(self) -> PftOutput {
        PftOutput {
            total: self.total,
            by_edge: self.by_edge,
        }
    }
}
