//! Type definitions.

/// Errors raised while building surfaces and geometries.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PftError {
    /// A cell refers to a point id that was never added.
    #[error("Cell {cell} refers to unknown point {point}")]
    UnknownPoint {
        /// Id of the offending cell.
        cell: usize,
        /// Id of the missing point.
        point: usize,
    },
    /// A point or cell id was added twice.
    #[error("Duplicate id {0}")]
    DuplicateId(usize),
    /// A triangle has (numerically) zero area.
    #[error("Cell {0} is degenerate")]
    DegenerateCell(usize),
    /// An edge is shared by more than two triangles.
    #[error("Edge ({0}, {1}) is shared by more than two cells")]
    NonManifoldEdge(usize, usize),
    /// A surface refers to a region that does not exist.
    #[error("Region index {0} out of range")]
    RegionOutOfRange(usize),
    /// The surface has no interior edges and carries no basis functions.
    #[error("Surface has no interior edges")]
    EmptySurface,
}

/// Result type.
pub type Result<T> = std::result::Result<T, PftError>;

/// Which side of a surface an equivalence-principle trace is taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The exterior region (outward normal side).
    Exterior,
    /// The interior region.
    Interior,
}
