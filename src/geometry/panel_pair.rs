//! Classification of panel pairs by shared vertices.
use crate::geometry::surface::RwgSurface;
use crate::geometry::vector::Vector3;

/// Relative tolerance (in units of the larger panel radius) for identifying coincident vertices.
const VERTEX_TOLERANCE: f64 = 1E-8;

/// How two panels touch, with their vertices in a canonical order.
///
/// The first `shared` vertices of `va` and `vb` coincide pairwise. With at
/// most one shared vertex the order is a rotation of the panel's own order.
#[derive(Debug, Clone)]
pub struct PanelPairClassification {
    /// Number of common vertices: 0 (disjoint), 1, 2 or 3 (identical panels).
    pub shared: usize,
    /// Vertices of the first panel in canonical order.
    pub va: [Vector3; 3],
    /// Vertices of the second panel in canonical order.
    pub vb: [Vector3; 3],
    /// Local indices of `va` within the first panel.
    pub local_a: [usize; 3],
    /// Local indices of `vb` within the second panel.
    pub local_b: [usize; 3],
    /// Centroid distance divided by the larger panel radius.
    pub r_rel: f64,
}

/// Classify a pair of panels, possibly on different surfaces.
pub fn classify_panel_pair(
    surface_a: &RwgSurface,
    panel_a: usize,
    surface_b: &RwgSurface,
    panel_b: usize,
) -> PanelPairClassification {
    let pa = surface_a.panel(panel_a);
    let pb = surface_b.panel(panel_b);
    let ca = surface_a.panel_coords(panel_a);
    let cb = surface_b.panel_coords(panel_b);

    let radius = pa.radius.max(pb.radius);
    let r_rel = (pa.centroid - pb.centroid).norm() / radius;
    let tolerance = VERTEX_TOLERANCE * radius;

    let mut matches = Vec::<(usize, usize)>::with_capacity(3);
    for (i, x) in ca.iter().enumerate() {
        if let Some(j) = cb.iter().position(|y| (x - y).norm() < tolerance) {
            matches.push((i, j));
        }
    }

    let (local_a, local_b) = match matches.as_slice() {
        [] => ([0, 1, 2], [0, 1, 2]),
        [(i, j)] => (rotated(*i), rotated(*j)),
        [(i0, j0), (i1, j1)] => (
            [*i0, *i1, 3 - i0 - i1],
            [*j0, *j1, 3 - j0 - j1],
        ),
        _ => {
            let mut local_b = [0; 3];
            for (i, j) in matches.iter() {
                local_b[*i] = *j;
            }
            ([0, 1, 2], local_b)
        }
    };

    PanelPairClassification {
        shared: matches.len(),
        va: local_a.map(|i| ca[i]),
        vb: local_b.map(|j| cb[j]),
        local_a,
        local_b,
        r_rel,
    }
}

fn rotated(first: usize) -> [usize; 3] {
    [first, (first + 1) % 3, (first + 2) % 3]
}
