//! Power, force and torque on RWG-discretised surfaces
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod constants;
pub mod geometry;
pub mod materials;
pub mod matrix_elements;
pub mod near_field;
pub mod overlap;
pub mod pft;
pub mod quadrature;
pub mod shapes;
pub mod singular;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;
}
