//! Rules for integrands that are nearly singular at a point in the plane of a panel.
use crate::geometry::Vector3;
use crate::quadrature::{simplex_rules::collapsed_triangle_rule, types::QuadratureError};

/// Relative size below which a sub-triangle is dropped.
const DEGENERATE_TOLERANCE: f64 = 1E-14;

/// Quadrature points and weights on a physical panel.
#[derive(Debug, Clone, Default)]
pub struct PanelRule {
    /// Points on the panel.
    pub points: Vec<Vector3>,
    /// Weights, summing to the panel area.
    pub weights: Vec<f64>,
}

impl PanelRule {
    /// The number of points.
    pub fn npoints(&self) -> usize {
        self.weights.len()
    }
}

/// A rule on the panel `vertices` built from sub-triangles sharing the point `apex`.
///
/// `apex` must lie in the plane of the panel (inside or outside it). The
/// panel is split into the three triangles joining `apex` to its edges,
/// each carrying a collapsed Gauss rule with `npoints` points per direction
/// whose collapsed vertex sits at `apex`. Sub-triangles with the opposite
/// orientation to `normal` get negative weights, so the signed sum covers
/// the panel exactly once. Integrands behaving like `1/|x - apex|` are
/// integrated to full accuracy.
pub fn apex_rule(
    vertices: &[Vector3; 3],
    normal: &Vector3,
    apex: &Vector3,
    npoints: usize,
) -> Result<PanelRule, QuadratureError> {
    let reference = collapsed_triangle_rule(npoints)?;
    let twice_area = normal.dot(&(vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0])));

    let mut rule = PanelRule {
        points: Vec::with_capacity(3 * reference.npoints()),
        weights: Vec::with_capacity(3 * reference.npoints()),
    };
    for i in 0..3 {
        let e1 = vertices[i] - *apex;
        let e2 = vertices[(i + 1) % 3] - *apex;
        let twice_sub_area = normal.dot(&e1.cross(&e2));
        if twice_sub_area.abs() < DEGENERATE_TOLERANCE * twice_area.abs() {
            continue;
        }
        for (p, w) in reference.points.iter().zip(reference.weights.iter()) {
            rule.points.push(*apex + e1 * p[0] + e2 * p[1]);
            rule.weights.push(w * twice_sub_area);
        }
    }
    Ok(rule)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn panel() -> ([Vector3; 3], Vector3) {
        let vertices = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.5, 1.5, 0.0),
        ];
        (vertices, Vector3::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn test_weights_sum_to_area() {
        let (vertices, normal) = panel();
        for apex in [
            Vector3::new(0.7, 0.4, 0.0),
            Vector3::new(3.0, 2.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
        ] {
            let rule = apex_rule(&vertices, &normal, &apex, 5).unwrap();
            let area: f64 = rule.weights.iter().sum();
            assert_relative_eq!(area, 1.5, max_relative = 1E-13);
        }
    }

    #[test]
    fn test_polynomial_moments() {
        // First moments give the centroid, wherever the apex is.
        let (vertices, normal) = panel();
        let centroid = (vertices[0] + vertices[1] + vertices[2]) / 3.0;
        let rule = apex_rule(&vertices, &normal, &Vector3::new(-1.0, 0.5, 0.0), 4).unwrap();
        let mut moment = Vector3::zeros();
        for (p, w) in rule.points.iter().zip(rule.weights.iter()) {
            moment += *p * *w;
        }
        assert_relative_eq!(moment / 1.5, centroid, epsilon = 1E-13);
    }

    #[test]
    fn test_inverse_distance() {
        // The integral of 1/|x| over the right isosceles triangle with legs
        // of length one at the origin is sqrt(2) asinh(1).
        let vertices = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let apex = Vector3::new(0.25, 0.25, 0.0);
        let expected = f64::sqrt(2.0) * f64::asinh(1.0);
        let rule = apex_rule(&vertices, &normal, &vertices[0], 20).unwrap();
        let integral: f64 = rule
            .points
            .iter()
            .zip(rule.weights.iter())
            .map(|(p, w)| w / p.norm())
            .sum();
        assert_relative_eq!(integral, expected, max_relative = 1E-12);

        // A singularity inside the panel is handled as well.
        let fine = apex_rule(&vertices, &normal, &apex, 40).unwrap();
        let coarse = apex_rule(&vertices, &normal, &apex, 30).unwrap();
        let integrate = |rule: &PanelRule| -> f64 {
            rule.points
                .iter()
                .zip(rule.weights.iter())
                .map(|(p, w)| w / (p - apex).norm())
                .sum()
        };
        assert_relative_eq!(integrate(&coarse), integrate(&fine), max_relative = 1E-9);
    }
}
