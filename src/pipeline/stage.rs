//! Synthesis stage trait and pipeline orchestration.

use thiserror::Error;

use crate::centerline::trace_centerline;
use crate::config::Params;
use crate::floodplain::build_floodplain;
use crate::section::generate_sections;
use crate::stats::compute_stats;
use crate::valley::Valley;
use crate::vary::CurveSet;

/// Unique identifier for synthesis stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Centerline tracing and the per-station alignment pass.
    Centerline,
    /// Cross-section generation (requires the completed alignment pass).
    CrossSections,
    /// Floodplain toe/terrace geometry.
    Floodplain,
    /// Summary statistics and covariance structure.
    Statistics,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Centerline => "centerline",
            StageId::CrossSections => "cross-sections",
            StageId::Floodplain => "floodplain",
            StageId::Statistics => "statistics",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Trait for implementing synthesis stages.
///
/// Each stage derives another layer of the valley model from the layers
/// before it. The two-phase shape of the computation (the alignment pass
/// must cover every station before any cross-section can exist) is
/// expressed through stage dependencies rather than fused loops.
pub trait SynthesisStage {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, extending the valley model in place.
    fn execute(&self, valley: &mut Valley) -> Result<(), PipelineError>;
}

/// Orchestrates synthesis stages into a complete run.
pub struct Pipeline {
    stages: Vec<Box<dyn SynthesisStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Creates the standard four-stage pipeline.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(CenterlineStage);
        pipeline.add_stage(CrossSectionStage);
        pipeline.add_stage(FloodplainStage);
        pipeline.add_stage(StatisticsStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: SynthesisStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given valley.
    pub fn run(&self, valley: &mut Valley) -> Result<(), PipelineError> {
        self.run_with_callbacks(valley, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `valley` - The valley to synthesize
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        valley: &mut Valley,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        valley
            .params
            .validate()
            .map_err(|e| PipelineError::InvalidParams(e.to_string()))?;

        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            // Check dependencies
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            on_stage_start(stage.name(), i, total);
            stage.execute(valley)?;
            completed.push(stage.id());
            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Centerline tracing stage.
pub struct CenterlineStage;

impl SynthesisStage for CenterlineStage {
    fn id(&self) -> StageId {
        StageId::Centerline
    }

    fn name(&self) -> &str {
        "centerline"
    }

    fn execute(&self, valley: &mut Valley) -> Result<(), PipelineError> {
        trace_centerline(valley)
            .map_err(|e| PipelineError::StageFailed("centerline".into(), e.to_string()))
    }
}

/// Cross-section generation stage.
pub struct CrossSectionStage;

impl SynthesisStage for CrossSectionStage {
    fn id(&self) -> StageId {
        StageId::CrossSections
    }

    fn name(&self) -> &str {
        "cross-sections"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Centerline]
    }

    fn execute(&self, valley: &mut Valley) -> Result<(), PipelineError> {
        let summary = valley.alignment.ok_or_else(|| {
            PipelineError::MissingDependency("cross-sections".into(), "centerline".into())
        })?;
        let sections = generate_sections(&valley.params, &valley.stations, &summary)
            .map_err(|e| PipelineError::StageFailed("cross-sections".into(), e.to_string()))?;
        valley.sections = Some(sections);
        Ok(())
    }
}

/// Floodplain geometry stage.
pub struct FloodplainStage;

impl SynthesisStage for FloodplainStage {
    fn id(&self) -> StageId {
        StageId::Floodplain
    }

    fn name(&self) -> &str {
        "floodplain"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Centerline]
    }

    fn execute(&self, valley: &mut Valley) -> Result<(), PipelineError> {
        let Valley {
            params,
            curves,
            stations,
            floodplain,
            ..
        } = valley;
        *floodplain = Some(build_floodplain(params, stations, curves));
        Ok(())
    }
}

/// Statistics stage.
pub struct StatisticsStage;

impl SynthesisStage for StatisticsStage {
    fn id(&self) -> StageId {
        StageId::Statistics
    }

    fn name(&self) -> &str {
        "statistics"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Centerline, StageId::Floodplain]
    }

    fn execute(&self, valley: &mut Valley) -> Result<(), PipelineError> {
        valley.stats = Some(compute_stats(&valley.params, &valley.stations));
        Ok(())
    }
}

/// Runs the standard pipeline over fresh parameters and curves.
pub fn synthesize(params: Params, curves: CurveSet) -> Result<Valley, PipelineError> {
    let mut valley = Valley::new(params, curves);
    Pipeline::standard().run(&mut valley)?;
    Ok(valley)
}
