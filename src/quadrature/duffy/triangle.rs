//! Duffy rules for triangles.
use crate::quadrature::{
    duffy::common::{create_triangle_mapper, next_triangle_vertex, transform_coords},
    simplex_rules::gauss_legendre,
    types::{IntervalRule, PanelConnectivity, PanelPairRule, QuadratureError},
};

/// A point pair of one Duffy sub-domain and its Jacobian factor (without `xi^3`).
type PartSample = ([f64; 2], [f64; 2], f64);

/// Sub-domains for identical triangles. Each is used twice, with test and trial swapped.
fn identical_part(part: usize, eta1: f64, eta2: f64, eta3: f64, xi: f64) -> PartSample {
    let eta12 = eta1 * eta2;
    let eta123 = eta12 * eta3;
    let jacobian = eta1 * eta1 * eta2;
    match part {
        0 => (
            [xi, xi * (1.0 - eta1 + eta12)],
            [xi * (1.0 - eta123), xi * (1.0 - eta1)],
            jacobian,
        ),
        1 => (
            [xi, xi * (eta1 - eta12 + eta123)],
            [xi * (1.0 - eta12), xi * (eta1 - eta12)],
            jacobian,
        ),
        _ => (
            [xi * (1.0 - eta123), xi * (eta1 - eta123)],
            [xi, xi * (eta1 - eta12)],
            jacobian,
        ),
    }
}

/// Sub-domains for triangles sharing the edge from Duffy vertex (0, 0) to (1, 0).
fn edge_adjacent_part(part: usize, eta1: f64, eta2: f64, eta3: f64, xi: f64) -> PartSample {
    let eta12 = eta1 * eta2;
    let eta123 = eta12 * eta3;
    let jacobian = eta1 * eta1;
    match part {
        0 => (
            [xi, xi * eta1 * eta3],
            [xi * (1.0 - eta12), xi * (eta1 - eta12)],
            jacobian,
        ),
        1 => (
            [xi, xi * eta1],
            [xi * (1.0 - eta123), xi * (eta12 - eta123)],
            jacobian * eta2,
        ),
        2 => (
            [xi * (1.0 - eta12), xi * (eta1 - eta12)],
            [xi, xi * eta123],
            jacobian * eta2,
        ),
        3 => (
            [xi * (1.0 - eta123), xi * (eta12 - eta123)],
            [xi, xi * eta1],
            jacobian * eta2,
        ),
        _ => (
            [xi * (1.0 - eta123), xi * (eta1 - eta123)],
            [xi, xi * eta12],
            jacobian * eta2,
        ),
    }
}

/// The sub-domain for triangles sharing the Duffy vertex (0, 0), used twice with test and trial swapped.
fn vertex_adjacent_part(_part: usize, eta1: f64, eta2: f64, eta3: f64, xi: f64) -> PartSample {
    ([xi, xi * eta1], [xi * eta2, xi * eta2 * eta3], eta2)
}

/// Tensor the interval rule over (eta1, eta2, eta3, xi) and collect every sub-domain.
fn collect_parts(
    interval_rule: &IntervalRule,
    nparts: usize,
    swapped_copies: bool,
    part: impl Fn(usize, f64, f64, f64, f64) -> PartSample,
) -> (Vec<[f64; 2]>, Vec<[f64; 2]>, Vec<f64>) {
    let n = interval_rule.npoints;
    let copies = if swapped_copies { 2 } else { 1 };
    let capacity = copies * nparts * n * n * n * n;
    let mut test_points = Vec::with_capacity(capacity);
    let mut trial_points = Vec::with_capacity(capacity);
    let mut weights = Vec::with_capacity(capacity);

    let points = &interval_rule.points;
    let w = &interval_rule.weights;
    for i1 in 0..n {
        for i2 in 0..n {
            for i3 in 0..n {
                for i4 in 0..n {
                    let xi = points[i4];
                    let base = w[i1] * w[i2] * w[i3] * w[i4] * xi * xi * xi;
                    for p in 0..nparts {
                        let (test, trial, jacobian) =
                            part(p, points[i1], points[i2], points[i3], xi);
                        test_points.push(test);
                        trial_points.push(trial);
                        weights.push(base * jacobian);
                        if swapped_copies {
                            test_points.push(trial);
                            trial_points.push(test);
                            weights.push(base * jacobian);
                        }
                    }
                }
            }
        }
    }
    (test_points, trial_points, weights)
}

/// Create a Duffy rule for two touching triangles with `npoints` Gauss points per dimension.
///
/// For identical triangles every sample is paired with its mirror image
/// (test and trial exchanged), so integrands that are odd under that
/// exchange integrate to zero exactly.
pub fn triangle_duffy(
    connectivity: &PanelConnectivity,
    npoints: usize,
) -> Result<PanelPairRule, QuadratureError> {
    let rule = gauss_legendre(npoints)?;

    let (mut test_points, mut trial_points, weights) = match connectivity {
        PanelConnectivity::Identical => collect_parts(rule, 3, true, identical_part),
        PanelConnectivity::Edge { .. } => collect_parts(rule, 5, false, edge_adjacent_part),
        PanelConnectivity::Vertex { .. } => collect_parts(rule, 1, true, vertex_adjacent_part),
    };

    let (test_map, trial_map) = match *connectivity {
        PanelConnectivity::Identical => ((0, 1), (0, 1)),
        PanelConnectivity::Edge { test, trial } => (test, trial),
        PanelConnectivity::Vertex { test, trial } => (
            (test, next_triangle_vertex(test)),
            (trial, next_triangle_vertex(trial)),
        ),
    };
    transform_coords(&mut test_points, &create_triangle_mapper(test_map.0, test_map.1));
    transform_coords(
        &mut trial_points,
        &create_triangle_mapper(trial_map.0, trial_map.1),
    );

    Ok(PanelPairRule {
        connectivity: *connectivity,
        test_points,
        trial_points,
        weights,
    })
}
