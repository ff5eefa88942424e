//! Quadrature rules for regular, nearly singular and singular panel integrals.
pub mod apex;
pub mod duffy;
pub mod simplex_rules;
pub mod types;

pub use apex::{apex_rule, PanelRule};
pub use duffy::triangle::triangle_duffy;
pub use simplex_rules::{collapsed_triangle_rule, gauss_legendre, triangle_rule};
pub use types::{
    IntervalRule, PanelConnectivity, PanelPairRule, QuadratureError, TriangleRule,
};
