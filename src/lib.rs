//! Synthetic river valley generator.
//!
//! This crate synthesizes a three-dimensional model of a meandering river
//! valley (centerline, channel cross-sections, banks, floodplain, and
//! terrace edges) from a compact parameter set and a small family of
//! variability functions, emitting a dense boundary point cloud plus
//! summary statistics for external GIS and 3-D tools.

pub mod boundary;
pub mod centerline;
pub mod config;
pub mod export;
pub mod floodplain;
pub mod pipeline;
pub mod section;
pub mod stats;
pub mod valley;
pub mod vary;

pub use boundary::{assemble_boundary, BoundaryIndexTable};
pub use config::{parse_config, parse_config_file, Params, ShapeKind};
pub use pipeline::{synthesize, Pipeline, StageId, SynthesisStage};
pub use stats::ValleyStats;
pub use valley::{AlignmentSummary, Station, Valley};
pub use vary::{CurveId, CurveSet, VaryFn};
