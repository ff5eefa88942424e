//! Triangulated surfaces carrying RWG basis functions.
use crate::geometry::vector::Vector3;

/// A flat triangular panel.
#[derive(Debug, Clone)]
pub struct RwgPanel {
    /// Indices of the three vertices, counter-clockwise about the normal.
    pub vertices: [usize; 3],
    /// Index of the basis function living on the edge opposite each vertex.
    ///
    /// Boundary edges of open surfaces carry no basis function.
    pub edges: [Option<usize>; 3],
    /// Panel area.
    pub area: f64,
    /// Unit normal, `(v1 - v0) x (v2 - v0)` normalised.
    pub normal: Vector3,
    /// Centroid.
    pub centroid: Vector3,
    /// Largest distance from the centroid to a vertex.
    pub radius: f64,
}

impl RwgPanel {
    /// Create a panel from its vertex indices and coordinates.
    pub fn new(vertices: [usize; 3], coords: [Vector3; 3]) -> Self {
        let normal = (coords[1] - coords[0]).cross(&(coords[2] - coords[0]));
        let twice_area = normal.norm();
        let centroid = (coords[0] + coords[1] + coords[2]) / 3.0;
        let radius = coords
            .iter()
            .map(|v| (v - centroid).norm())
            .fold(0.0, f64::max);
        Self {
            vertices,
            edges: [None; 3],
            area: 0.5 * twice_area,
            normal: normal / twice_area,
            centroid,
            radius,
        }
    }

    /// Local index (0, 1 or 2) of a global vertex index, if it belongs to this panel.
    pub fn local_index(&self, vertex: usize) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }
}

/// An RWG basis function attached to an edge.
///
/// On the positive panel the function is `(L / 2A+) (x - Q+)`, on the
/// negative panel `-(L / 2A-) (x - Q-)`, where `Q` is the panel vertex
/// opposite the edge and `L` the edge length.
#[derive(Debug, Clone)]
pub struct RwgEdge {
    /// Index of the positive panel.
    pub positive_panel: usize,
    /// Local index of `Q+` within the positive panel.
    pub positive_index: usize,
    /// Index of the negative panel (None for a half-RWG boundary function).
    pub negative_panel: Option<usize>,
    /// Local index of `Q-` within the negative panel.
    pub negative_index: Option<usize>,
    /// Vertex index of `Q+`.
    pub qp: usize,
    /// Vertex index of `Q-`.
    pub qm: Option<usize>,
    /// First vertex of the edge (follows `Q+` counter-clockwise in the positive panel).
    pub v1: usize,
    /// Second vertex of the edge.
    pub v2: usize,
    /// Edge length.
    pub length: f64,
    /// Edge midpoint.
    pub centroid: Vector3,
}

impl RwgEdge {
    /// The panel and local source-vertex index for one polarity.
    ///
    /// `positive = false` returns None for half-RWG functions.
    pub fn half(&self, positive: bool) -> Option<(usize, usize)> {
        if positive {
            Some((self.positive_panel, self.positive_index))
        } else {
            self.negative_panel.zip(self.negative_index)
        }
    }
}

/// A closed or open triangulated surface bounding one or two regions.
#[derive(Debug, Clone)]
pub struct RwgSurface {
    pub(crate) vertices: Vec<Vector3>,
    pub(crate) panels: Vec<RwgPanel>,
    pub(crate) edges: Vec<RwgEdge>,
    pub(crate) exterior_region: usize,
    pub(crate) interior_region: Option<usize>,
    pub(crate) is_pec: bool,
}

impl RwgSurface {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of panels.
    pub fn num_panels(&self) -> usize {
        self.panels.len()
    }

    /// Number of edges carrying basis functions.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of current coefficients (one per edge for PEC, otherwise two).
    pub fn num_basis_functions(&self) -> usize {
        if self.is_pec {
            self.edges.len()
        } else {
            2 * self.edges.len()
        }
    }

    /// Vertex coordinates.
    pub fn vertex(&self, index: usize) -> &Vector3 {
        &self.vertices[index]
    }

    /// A panel.
    pub fn panel(&self, index: usize) -> &RwgPanel {
        &self.panels[index]
    }

    /// An edge.
    pub fn edge(&self, index: usize) -> &RwgEdge {
        &self.edges[index]
    }

    /// All panels.
    pub fn panels(&self) -> &[RwgPanel] {
        &self.panels
    }

    /// All edges.
    pub fn edges(&self) -> &[RwgEdge] {
        &self.edges
    }

    /// Coordinates of the three vertices of a panel.
    pub fn panel_coords(&self, index: usize) -> [Vector3; 3] {
        self.panels[index].vertices.map(|v| self.vertices[v])
    }

    /// Index of the exterior region.
    pub fn exterior_region(&self) -> usize {
        self.exterior_region
    }

    /// Index of the interior region, None if the surface bounds nothing.
    pub fn interior_region(&self) -> Option<usize> {
        self.interior_region
    }

    /// True for perfectly conducting surfaces (electric currents only).
    pub fn is_pec(&self) -> bool {
        self.is_pec
    }

    /// Set the regions on both sides of the surface.
    pub fn set_regions(&mut self, exterior: usize, interior: Option<usize>) {
        self.exterior_region = exterior;
        self.interior_region = interior;
    }

    /// Mark the surface as perfectly conducting.
    pub fn set_pec(&mut self, is_pec: bool) {
        self.is_pec = is_pec;
    }

    /// The RWG function of `edge` evaluated at a point of one of its panels.
    ///
    /// Returns zero if `panel` is not part of the support.
    pub fn basis_value(&self, edge: usize, panel: usize, point: &Vector3) -> Vector3 {
        let e = &self.edges[edge];
        let p = &self.panels[panel];
        if e.positive_panel == panel {
            (*point - self.vertices[e.qp]) * (0.5 * e.length / p.area)
        } else if e.negative_panel == Some(panel) {
            match e.qm {
                Some(qm) => (*point - self.vertices[qm]) * (-0.5 * e.length / p.area),
                None => Vector3::zeros(),
            }
        } else {
            Vector3::zeros()
        }
    }
}
