//! Utility functions for creating Duffy rules

/// Vertices of the reference triangle.
const REFERENCE_VERTICES: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

/// Apply a map to every point of a rule.
pub(crate) fn transform_coords(points: &mut [[f64; 2]], fun: &impl Fn([f64; 2]) -> [f64; 2]) {
    for p in points.iter_mut() {
        *p = fun(*p);
    }
}

/// Create a triangle mapper
///
/// Duffy rules are generated on the triangle with vertices
/// (0, 0), (1, 0), (1, 1). The mapper sends these to the reference
/// vertices `v0`, `v1` and `3 - v0 - v1` respectively.
pub(crate) fn create_triangle_mapper(v0: usize, v1: usize) -> impl Fn([f64; 2]) -> [f64; 2] {
    let p0 = REFERENCE_VERTICES[v0];
    let p1 = REFERENCE_VERTICES[v1];
    let p2 = REFERENCE_VERTICES[3 - v0 - v1];

    // Affine map p0 + (p1 - p0) x + (p2 - p1) y.
    let col0 = [p1[0] - p0[0], p1[1] - p0[1]];
    let col1 = [p2[0] - p1[0], p2[1] - p1[1]];

    move |point: [f64; 2]| -> [f64; 2] {
        [
            p0[0] + col0[0] * point[0] + col1[0] * point[1],
            p0[1] + col0[1] * point[0] + col1[1] * point[1],
        ]
    }
}

/// Get the next vertex in an anticlockwise direction
pub(crate) fn next_triangle_vertex(index: usize) -> usize {
    (index + 1) % 3
}
