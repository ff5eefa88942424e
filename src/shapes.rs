//! Meshes of simple shapes.
use crate::geometry::{RwgSurface, SurfaceBuilder};
use crate::types::Result;
use std::collections::{hash_map::Entry::Vacant, HashMap};

/// Create a regular sphere of the given radius centred at the origin.
///
/// The sphere starts as a regular octahedron. Each refinement splits every
/// triangle into four through its edge midpoints, which are then projected
/// onto the sphere. Normals point outwards.
pub fn regular_sphere(refinement_level: u32, radius: f64) -> Result<RwgSurface> {
    let mut points = vec![
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, -1.0],
    ];
    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for _ in 0..refinement_level {
        let mut midpoints = HashMap::<(usize, usize), usize>::new();
        let mut new_cells = Vec::with_capacity(4 * cells.len());
        for c in &cells {
            let mut m = [0; 3];
            for (i, [a, b]) in [[1, 2], [0, 2], [0, 1]].iter().enumerate() {
                let key = (c[*a].min(c[*b]), c[*a].max(c[*b]));
                if let Vacant(e) = midpoints.entry(key) {
                    let (pa, pb) = (points[key.0], points[key.1]);
                    let mid = [
                        0.5 * (pa[0] + pb[0]),
                        0.5 * (pa[1] + pb[1]),
                        0.5 * (pa[2] + pb[2]),
                    ];
                    let size = mid.iter().map(|x| x * x).sum::<f64>().sqrt();
                    points.push(mid.map(|x| x / size));
                    e.insert(points.len() - 1);
                }
                m[i] = midpoints[&key];
            }
            new_cells.push([c[0], m[2], m[1]]);
            new_cells.push([c[1], m[0], m[2]]);
            new_cells.push([c[2], m[1], m[0]]);
            new_cells.push([m[0], m[1], m[2]]);
        }
        cells = new_cells;
    }

    let mut b = SurfaceBuilder::new_with_capacity(points.len(), cells.len());
    for (i, p) in points.iter().enumerate() {
        b.add_point(i, p.map(|x| radius * x));
    }
    for (i, c) in cells.iter().enumerate() {
        b.add_cell(i, *c);
    }
    b.create_surface()
}

/// Create a triangulated unit square screen in the plane z = 0.
///
/// `ncells` is the number of squares along each side; each square is split
/// into two triangles. The screen is open: boundary edges carry no basis
/// functions.
pub fn screen_triangles(ncells: usize) -> Result<RwgSurface> {
    let mut b = SurfaceBuilder::new_with_capacity((ncells + 1) * (ncells + 1), 2 * ncells * ncells);
    let n = ncells as f64;
    for y in 0..=ncells {
        for x in 0..=ncells {
            b.add_point(y * (ncells + 1) + x, [x as f64 / n, y as f64 / n, 0.0]);
        }
    }
    for y in 0..ncells {
        for x in 0..ncells {
            let corner = y * (ncells + 1) + x;
            b.add_cell(
                2 * (y * ncells + x),
                [corner, corner + 1, corner + ncells + 2],
            );
            b.add_cell(
                2 * (y * ncells + x) + 1,
                [corner, corner + ncells + 2, corner + ncells + 1],
            );
        }
    }
    b.create_surface()
}

/// Create two triangles `(qp, v1, v2)` and `(qm, v2, v1)` carrying a single RWG function.
pub fn rwg_pair(qp: [f64; 3], v1: [f64; 3], v2: [f64; 3], qm: [f64; 3]) -> Result<RwgSurface> {
    let mut b = SurfaceBuilder::new_with_capacity(4, 2);
    b.add_point(0, qp);
    b.add_point(1, v1);
    b.add_point(2, v2);
    b.add_point(3, qm);
    b.add_cell(0, [0, 1, 2]);
    b.add_cell(1, [3, 2, 1]);
    b.create_surface()
}
