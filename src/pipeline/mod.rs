//! Pipeline module for orchestrating valley synthesis stages.
//!
//! Provides a trait-based architecture for modular synthesis stages that
//! can be composed into a complete valley synthesis pipeline.

mod stage;

pub use stage::{
    synthesize, CenterlineStage, CrossSectionStage, FloodplainStage, Pipeline, PipelineError,
    StageId, StatisticsStage, SynthesisStage,
};
