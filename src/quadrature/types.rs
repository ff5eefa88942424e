//! Type definitions.

/// Quadrature error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum QuadratureError {
    /// No rule with the requested number of points is available.
    #[error("No quadrature rule with {0} points")]
    RuleNotFound(usize),
    /// The panels do not share a vertex, so no singular rule applies.
    #[error("Panels sharing {0} vertices have no singular rule")]
    ConnectivityError(usize),
}

/// A Gauss-Legendre rule on the interval [0, 1].
///
/// The weights sum to one.
#[derive(Debug, Clone)]
pub struct IntervalRule {
    /// The number of points.
    pub npoints: usize,
    /// The points in [0, 1].
    pub points: Vec<f64>,
    /// The weights.
    pub weights: Vec<f64>,
}

/// A rule on the reference triangle with vertices (0, 0), (1, 0), (0, 1).
///
/// The weights sum to 1/2, the area of the reference triangle.
#[derive(Debug, Clone)]
pub struct TriangleRule {
    /// The polynomial degree integrated exactly.
    pub order: usize,
    /// Reference coordinates (u, v) of the points.
    pub points: Vec<[f64; 2]>,
    /// The weights.
    pub weights: Vec<f64>,
}

impl TriangleRule {
    /// The number of points.
    pub fn npoints(&self) -> usize {
        self.weights.len()
    }
}

/// How two triangles of a singular rule touch.
///
/// Local vertex indices refer to the reference triangle
/// 0: (0, 0), 1: (1, 0), 2: (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelConnectivity {
    /// Both triangles are the same.
    Identical,
    /// The triangles share an edge; each pair lists the local vertices of the
    /// edge in matching order.
    Edge {
        /// Local vertices of the shared edge in the test triangle.
        test: (usize, usize),
        /// Local vertices of the shared edge in the trial triangle.
        trial: (usize, usize),
    },
    /// The triangles share a single vertex.
    Vertex {
        /// Local index of the vertex in the test triangle.
        test: usize,
        /// Local index of the vertex in the trial triangle.
        trial: usize,
    },
}

impl PanelConnectivity {
    /// Connectivity of two triangles whose shared vertices come first, in matching order.
    pub fn shared_first(shared: usize) -> Result<Self, QuadratureError> {
        match shared {
            1 => Ok(Self::Vertex { test: 0, trial: 0 }),
            2 => Ok(Self::Edge {
                test: (0, 1),
                trial: (0, 1),
            }),
            3 => Ok(Self::Identical),
            _ => Err(QuadratureError::ConnectivityError(shared)),
        }
    }
}

/// A rule for integrals over a pair of touching triangles.
///
/// Test and trial points are reference coordinates on the respective
/// triangles. The weights sum to 1/4, the product of the reference areas.
#[derive(Debug, Clone)]
pub struct PanelPairRule {
    /// The connectivity the rule was built for.
    pub connectivity: PanelConnectivity,
    /// Points on the test triangle.
    pub test_points: Vec<[f64; 2]>,
    /// Points on the trial triangle.
    pub trial_points: Vec<[f64; 2]>,
    /// The weights.
    pub weights: Vec<f64>,
}

impl PanelPairRule {
    /// The number of points.
    pub fn npoints(&self) -> usize {
        self.weights.len()
    }
}
