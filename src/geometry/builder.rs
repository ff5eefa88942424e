//! Surface builder
use crate::geometry::surface::{RwgEdge, RwgPanel, RwgSurface};
use crate::geometry::vector::Vector3;
use crate::types::{PftError, Result};
use std::collections::HashMap;

/// Builder for an [RwgSurface] from points and triangles given by id.
///
/// Edges shared by two triangles become RWG basis functions. The positive
/// panel of each edge is the first triangle (in insertion order) that
/// contains it.
pub struct SurfaceBuilder {
    points: Vec<Vector3>,
    cells: Vec<[usize; 3]>,
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
    duplicate_id: Option<usize>,
    exterior_region: usize,
    interior_region: Option<usize>,
    is_pec: bool,
    half_rwg_boundary: bool,
}

impl Default for SurfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceBuilder {
    /// Create a builder for a surface between region 0 (exterior) and region 1 (interior).
    pub fn new() -> Self {
        Self::new_with_capacity(0, 0)
    }

    /// Create a builder with preallocated storage.
    pub fn new_with_capacity(npoints: usize, ncells: usize) -> Self {
        Self {
            points: Vec::with_capacity(npoints),
            cells: Vec::with_capacity(ncells),
            point_indices_to_ids: Vec::with_capacity(npoints),
            point_ids_to_indices: HashMap::new(),
            cell_indices_to_ids: Vec::with_capacity(ncells),
            cell_ids_to_indices: HashMap::new(),
            duplicate_id: None,
            exterior_region: 0,
            interior_region: Some(1),
            is_pec: false,
            half_rwg_boundary: false,
        }
    }

    /// Add a point.
    pub fn add_point(&mut self, id: usize, data: [f64; 3]) {
        if self
            .point_ids_to_indices
            .insert(id, self.point_indices_to_ids.len())
            .is_some()
        {
            self.duplicate_id.get_or_insert(id);
        }
        self.point_indices_to_ids.push(id);
        self.points.push(Vector3::from(data));
    }

    /// Add a triangle given by three point ids.
    pub fn add_cell(&mut self, id: usize, cell_data: [usize; 3]) {
        if self
            .cell_ids_to_indices
            .insert(id, self.cell_indices_to_ids.len())
            .is_some()
        {
            self.duplicate_id.get_or_insert(id);
        }
        self.cell_indices_to_ids.push(id);
        self.cells.push(cell_data);
    }

    /// Set the exterior and (optional) interior region indices.
    pub fn set_regions(&mut self, exterior: usize, interior: Option<usize>) {
        self.exterior_region = exterior;
        self.interior_region = interior;
    }

    /// Mark the surface as perfectly conducting.
    pub fn set_pec(&mut self, is_pec: bool) {
        self.is_pec = is_pec;
    }

    /// Attach half-RWG functions to boundary edges of open surfaces.
    pub fn set_half_rwg_boundary(&mut self, half_rwg: bool) {
        self.half_rwg_boundary = half_rwg;
    }

    /// Number of points added so far.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Create the surface.
    pub fn create_surface(self) -> Result<RwgSurface> {
        if let Some(id) = self.duplicate_id {
            return Err(PftError::DuplicateId(id));
        }

        let mut panels = Vec::with_capacity(self.cells.len());
        for (cell_id, cell) in self.cell_indices_to_ids.iter().zip(self.cells.iter()) {
            let mut vertices = [0; 3];
            for (v, point) in vertices.iter_mut().zip(cell.iter()) {
                *v = *self
                    .point_ids_to_indices
                    .get(point)
                    .ok_or(PftError::UnknownPoint {
                        cell: *cell_id,
                        point: *point,
                    })?;
            }
            let coords = vertices.map(|v| self.points[v]);
            let longest = (0..3)
                .map(|i| (coords[i] - coords[(i + 1) % 3]).norm())
                .fold(0.0, f64::max);
            let panel = RwgPanel::new(vertices, coords);
            if !(2.0 * panel.area > 1E-12 * longest * longest) {
                return Err(PftError::DegenerateCell(*cell_id));
            }
            panels.push(panel);
        }

        // For every edge, the panels containing it and the local index of the
        // opposite vertex, in order of first appearance.
        let mut edge_keys = HashMap::<(usize, usize), usize>::new();
        let mut incidences = Vec::<Vec<(usize, usize)>>::new();
        for (panel_index, panel) in panels.iter().enumerate() {
            for local in 0..3 {
                let a = panel.vertices[(local + 1) % 3];
                let b = panel.vertices[(local + 2) % 3];
                let key = (a.min(b), a.max(b));
                let slot = *edge_keys.entry(key).or_insert_with(|| {
                    incidences.push(Vec::with_capacity(2));
                    incidences.len() - 1
                });
                incidences[slot].push((panel_index, local));
            }
        }

        let mut edges = Vec::with_capacity(incidences.len());
        for incidence in incidences.iter() {
            let (positive, negative) = match incidence.as_slice() {
                [p] if self.half_rwg_boundary => (*p, None),
                [_] => continue,
                [p, m] => (*p, Some(*m)),
                _ => {
                    let panel = &panels[incidence[0].0];
                    let local = incidence[0].1;
                    return Err(PftError::NonManifoldEdge(
                        self.point_indices_to_ids[panel.vertices[(local + 1) % 3]],
                        self.point_indices_to_ids[panel.vertices[(local + 2) % 3]],
                    ));
                }
            };

            let edge_index = edges.len();
            let (pp, pi) = positive;
            panels[pp].edges[pi] = Some(edge_index);
            if let Some((mp, mi)) = negative {
                panels[mp].edges[mi] = Some(edge_index);
            }

            let panel = &panels[pp];
            let v1 = panel.vertices[(pi + 1) % 3];
            let v2 = panel.vertices[(pi + 2) % 3];
            edges.push(RwgEdge {
                positive_panel: pp,
                positive_index: pi,
                negative_panel: negative.map(|(mp, _)| mp),
                negative_index: negative.map(|(_, mi)| mi),
                qp: panel.vertices[pi],
                qm: negative.map(|(mp, mi)| panels[mp].vertices[mi]),
                v1,
                v2,
                length: (self.points[v1] - self.points[v2]).norm(),
                centroid: (self.points[v1] + self.points[v2]) * 0.5,
            });
        }

        if edges.is_empty() {
            return Err(PftError::EmptySurface);
        }

        Ok(RwgSurface {
            vertices: self.points,
            panels,
            edges,
            exterior_region: self.exterior_region,
            interior_region: self.interior_region,
            is_pec: self.is_pec,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_triangles() {
        let mut b = SurfaceBuilder::new();
        b.add_point(10, [0.0, 0.0, 0.0]);
        b.add_point(11, [1.0, 0.0, 0.0]);
        b.add_point(12, [0.0, 1.0, 0.0]);
        b.add_point(13, [1.0, 1.0, 0.0]);
        b.add_cell(0, [10, 11, 12]);
        b.add_cell(1, [11, 13, 12]);
        let surface = b.create_surface().unwrap();

        assert_eq!(surface.num_panels(), 2);
        assert_eq!(surface.num_edges(), 1);
        assert_eq!(surface.num_basis_functions(), 2);

        let edge = surface.edge(0);
        assert_eq!(edge.positive_panel, 0);
        assert_eq!(edge.negative_panel, Some(1));
        assert_eq!(edge.qp, 0);
        assert_eq!(edge.qm, Some(3));
        assert_relative_eq!(edge.length, f64::sqrt(2.0), epsilon = 1E-14);
        assert_eq!(surface.panel(0).edges[0], Some(0));
        assert_eq!(surface.panel(1).edges[1], Some(0));
        assert_eq!(surface.panel(0).edges[1], None);

        assert_relative_eq!(surface.panel(0).area, 0.5, epsilon = 1E-14);
        assert_relative_eq!(
            surface.panel(0).normal,
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1E-14
        );
    }

    #[test]
    fn test_half_rwg_boundary() {
        let mut b = SurfaceBuilder::new();
        b.add_point(0, [0.0, 0.0, 0.0]);
        b.add_point(1, [1.0, 0.0, 0.0]);
        b.add_point(2, [0.0, 1.0, 0.0]);
        b.add_cell(0, [0, 1, 2]);
        b.set_half_rwg_boundary(true);
        let surface = b.create_surface().unwrap();
        assert_eq!(surface.num_edges(), 3);
        assert!(surface.edges().iter().all(|e| e.negative_panel.is_none()));
    }

    #[test]
    fn test_errors() {
        let mut b = SurfaceBuilder::new();
        b.add_point(0, [0.0, 0.0, 0.0]);
        b.add_point(1, [1.0, 0.0, 0.0]);
        b.add_cell(0, [0, 1, 2]);
        assert_eq!(
            b.create_surface().unwrap_err(),
            PftError::UnknownPoint { cell: 0, point: 2 }
        );

        let mut b = SurfaceBuilder::new();
        b.add_point(0, [0.0, 0.0, 0.0]);
        b.add_point(1, [1.0, 0.0, 0.0]);
        b.add_point(2, [2.0, 0.0, 0.0]);
        b.add_cell(7, [0, 1, 2]);
        assert_eq!(b.create_surface().unwrap_err(), PftError::DegenerateCell(7));

        let mut b = SurfaceBuilder::new();
        b.add_point(0, [0.0, 0.0, 0.0]);
        b.add_point(1, [1.0, 0.0, 0.0]);
        b.add_point(2, [0.0, 1.0, 0.0]);
        b.add_point(3, [0.0, -1.0, 0.0]);
        b.add_point(4, [0.0, 0.0, 1.0]);
        b.add_cell(0, [0, 1, 2]);
        b.add_cell(1, [1, 0, 3]);
        b.add_cell(2, [0, 1, 4]);
        assert_eq!(
            b.create_surface().unwrap_err(),
            PftError::NonManifoldEdge(0, 1)
        );
    }
}
