//! Surfaces, regions and basis-function bookkeeping.
mod builder;
mod panel_pair;
mod surface;
mod vector;

pub use builder::SurfaceBuilder;
pub use panel_pair::{classify_panel_pair, PanelPairClassification};
pub use surface::{RwgEdge, RwgPanel, RwgSurface};
pub use vector::{is_finite, ComplexProducts, ComplexVector3, Vector3};

use crate::traits::MaterialModel;
use crate::types::{PftError, Result};

/// A collection of surfaces separating material regions.
///
/// Current coefficients of all surfaces are stored in one vector; surface
/// `n` owns the coefficients starting at [Geometry::offset]`(n)`, two per
/// edge (electric then magnetic) or one per edge for PEC surfaces.
pub struct Geometry {
    surfaces: Vec<RwgSurface>,
    regions: Vec<Box<dyn MaterialModel>>,
    offsets: Vec<usize>,
}

impl Geometry {
    /// Create a geometry, checking that every surface refers to existing regions.
    pub fn new(surfaces: Vec<RwgSurface>, regions: Vec<Box<dyn MaterialModel>>) -> Result<Self> {
        let mut offsets = Vec::with_capacity(surfaces.len() + 1);
        let mut offset = 0;
        for s in surfaces.iter() {
            for region in std::iter::once(s.exterior_region()).chain(s.interior_region()) {
                if region >= regions.len() {
                    return Err(PftError::RegionOutOfRange(region));
                }
            }
            offsets.push(offset);
            offset += s.num_basis_functions();
        }
        offsets.push(offset);
        Ok(Self {
            surfaces,
            regions,
            offsets,
        })
    }

    /// Number of surfaces.
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// A surface, or None if the index is out of range.
    pub fn surface(&self, index: usize) -> Option<&RwgSurface> {
        self.surfaces.get(index)
    }

    /// A region's material model.
    pub fn region(&self, index: usize) -> &dyn MaterialModel {
        self.regions[index].as_ref()
    }

    /// Number of regions.
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Index of the first coefficient belonging to a surface.
    pub fn offset(&self, surface: usize) -> usize {
        self.offsets[surface]
    }

    /// Total number of current coefficients.
    pub fn num_basis_functions(&self) -> usize {
        self.offsets[self.surfaces.len()]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::materials::{ConstantMaterial, Vacuum};
    use crate::shapes::{regular_sphere, screen_triangles};
    use rlst::c64;

    #[test]
    fn test_offsets() {
        let sphere = regular_sphere(0, 1.0).unwrap();
        let mut screen = screen_triangles(2).unwrap();
        screen.set_regions(0, None);
        screen.set_pec(true);
        let nsphere = sphere.num_basis_functions();
        let nscreen = screen.num_basis_functions();

        let geometry = Geometry::new(
            vec![sphere, screen],
            vec![
                Box::new(Vacuum),
                Box::new(ConstantMaterial::new(c64::new(4.0, 0.1), c64::new(1.0, 0.0))),
            ],
        )
        .unwrap();
        assert_eq!(geometry.offset(0), 0);
        assert_eq!(geometry.offset(1), nsphere);
        assert_eq!(geometry.num_basis_functions(), nsphere + nscreen);
        assert_eq!(nsphere, 24);
    }

    #[test]
    fn test_missing_region() {
        let sphere = regular_sphere(0, 1.0).unwrap();
        assert_eq!(
            Geometry::new(vec![sphere], vec![Box::new(Vacuum)]).err(),
            Some(PftError::RegionOutOfRange(1))
        );
    }
}
