//! The valley model: stations, per-stage products, and the container
//! the synthesis pipeline populates.

mod model;

pub use model::{AlignmentSummary, CrossSection, FloodplainStation, Station, Valley};
