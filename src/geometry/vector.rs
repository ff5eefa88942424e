//! Small fixed-size vectors in three dimensions.
use nalgebra as na;
use rlst::c64;

/// A real vector in three dimensions.
pub type Vector3 = na::Vector3<f64>;

/// A complex vector in three dimensions.
pub type ComplexVector3 = na::Vector3<c64>;

/// Products of a real vector with complex vectors and scalars.
///
/// Products are bilinear: no component is conjugated.
pub trait ComplexProducts {
    /// The vector with complex components.
    fn to_complex(&self) -> ComplexVector3;

    /// The vector scaled by a complex number.
    fn scale_complex(&self, factor: c64) -> ComplexVector3 {
        self.to_complex() * factor
    }

    /// Dot product with a complex vector.
    fn dot_complex(&self, other: &ComplexVector3) -> c64 {
        self.to_complex().dot(other)
    }

    /// Cross product with a complex vector.
    fn cross_complex(&self, other: &ComplexVector3) -> ComplexVector3 {
        self.to_complex().cross(other)
    }
}

impl ComplexProducts for Vector3 {
    fn to_complex(&self) -> ComplexVector3 {
        self.map(c64::from)
    }
}

/// True if every component of a complex vector is finite.
pub fn is_finite(v: &ComplexVector3) -> bool {
    v.iter().all(|z| z.is_finite())
}
