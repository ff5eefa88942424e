//! Physical and numerical constants shared by the power, force and torque routines.
//!
//! Frequencies are measured in units of `c / length`, where `length` is the
//! mesh length unit (typically one micron). In these units the wavenumber in
//! a medium is `omega * sqrt(eps * mu)`.

/// Impedance of free space in ohms.
pub const ZVAC: f64 = 376.73031346177;

/// Conversion factor from `watt / c` to nanonewtons.
///
/// With the mesh length unit equal to one micron and incident fields in
/// volts per micron, multiplying by this factor yields forces in nanonewtons
/// and torques in nanonewton-microns.
pub const TENTHIRDS: f64 = 10.0 / 3.0;

/// Number of quantities in an equivalence-principle result array.
pub const NUM_EPPFT: usize = 7;

/// Number of quantities in an overlap result array (including scattered power).
pub const NUM_OPFT: usize = 8;

/// Number of overlap integrals between two RWG functions.
pub const NUM_OVERLAPS: usize = 20;

/// Default cubature order for equivalence-principle matrix elements.
pub const DEFAULT_CUBATURE_ORDER: usize = 9;

/// Default number of Gauss points per dimension for singular panel pairs.
pub const DEFAULT_SINGULAR_POINTS: usize = 6;

/// Environment variable that forces cubature-only matrix elements.
pub const FORCE_CUBATURE_ENV: &str = "PFT_FORCE_CUBATURE";

/// Default polynomial order of the rule for potentials at distant points.
pub const DEFAULT_FAR_ORDER: usize = 5;

/// Default number of Gauss points per direction for potentials at nearby points.
pub const DEFAULT_NEAR_POINTS: usize = 10;

/// Points closer to a panel centroid than this many panel radii are nearby.
pub const NEAR_FIELD_RADII: f64 = 4.0;
