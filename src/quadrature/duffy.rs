//! Duffy (Sauter-Schwab) rules for pairs of touching triangles.
mod common;
pub mod triangle;
