//! Model parameters and the textual configuration reader.

mod parse;

pub use parse::{parse_config, parse_config_file, ParseError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Specific gravity of quartz sediment, used when bankfull depth is
/// derived from the critical-shear inputs.
pub const SEDIMENT_SPECIFIC_GRAVITY: f64 = 2.65;

/// Cross-section shape family, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Elliptical section, symmetric about the centerline.
    SymmetricU,
    /// Curvature-skewed section; bank steepness follows local alignment.
    AsymmetricU,
    /// Triangle / trapezoid / rectangle, by flat-base edge count.
    Polygonal { base_edges: usize },
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::SymmetricU
    }
}

/// Errors raised by parameter validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("station count must be at least 2, got {0}")]
    TooFewStations(usize),
    #[error("cross-section point count must be at least 2, got {0}")]
    TooFewSectionPoints(usize),
    #[error("valley length must be positive, got {0}")]
    NonPositiveLength(f64),
    #[error("valley slope must be positive to derive bankfull depth, got {0}")]
    NonPositiveSlope(f64),
    #[error("polygon base-edge count {0} outside [0, {1}]")]
    BaseEdgesOutOfRange(usize, usize),
}

/// The immutable parameter set driving one synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Datum (thalweg reference) elevation.
    pub datum: f64,
    /// Down-valley length.
    pub length: f64,
    /// Number of longitudinal stations.
    pub n_stations: usize,
    /// Number of lateral points per cross-section.
    pub n_xs_points: usize,
    /// Down-valley bed slope.
    pub valley_slope: f64,
    /// Critical Shields stress for the bed sediment.
    pub critical_shields: f64,
    /// Median grain size.
    pub d50: f64,
    /// Reach bankfull width before the width curve is applied.
    pub bankfull_width: f64,
    /// Lower bound on per-station bankfull width.
    pub min_bankfull_width: f64,
    /// Explicit bankfull depth; derived from shear inputs when absent.
    pub bankfull_depth: Option<f64>,
    /// Lateral distance from bank to floodplain toe.
    pub floodplain_width: f64,
    /// Lateral distance from toe to terrace top.
    pub terrace_width: f64,
    /// Vertical rise from top of bank to the floodplain toe.
    pub toe_height: f64,
    /// Vertical rise from toe to terrace top.
    pub terrace_height: f64,
    /// Extra lateral margin for the outer boundary rows.
    pub boundary_width: f64,
    /// Cross-section shape family.
    pub shape: ShapeKind,
    /// Seed for the shared smoothed-noise stream.
    pub seed: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            datum: 100.0,
            length: 1000.0,
            n_stations: 200,
            n_xs_points: 21,
            valley_slope: 0.002,
            critical_shields: 0.045,
            d50: 0.032,
            bankfull_width: 25.0,
            min_bankfull_width: 8.0,
            bankfull_depth: None,
            floodplain_width: 40.0,
            terrace_width: 15.0,
            toe_height: 0.5,
            terrace_height: 2.0,
            boundary_width: 10.0,
            shape: ShapeKind::SymmetricU,
            seed: 42,
        }
    }
}

impl Params {
    /// Bankfull depth in effect: the explicit value when given, otherwise
    /// the critical-shear relation `τ*c (G − 1) d50 / S`.
    pub fn depth(&self) -> f64 {
        match self.bankfull_depth {
            Some(h) => h,
            None => {
                self.critical_shields * (SEDIMENT_SPECIFIC_GRAVITY - 1.0) * self.d50
                    / self.valley_slope
            }
        }
    }

    /// Station spacing along the valley axis.
    pub fn station_spacing(&self) -> f64 {
        self.length / (self.n_stations - 1) as f64
    }

    /// Total point-cloud size: `N * (M + 6)`.
    pub fn point_count(&self) -> usize {
        self.n_stations * (self.n_xs_points + 6)
    }

    /// Checks the parameter set before any geometry is computed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_stations < 2 {
            return Err(ConfigError::TooFewStations(self.n_stations));
        }
        if self.n_xs_points < 2 {
            return Err(ConfigError::TooFewSectionPoints(self.n_xs_points));
        }
        if self.length <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.length));
        }
        if self.bankfull_depth.is_none() && self.valley_slope <= 0.0 {
            return Err(ConfigError::NonPositiveSlope(self.valley_slope));
        }
        if let ShapeKind::Polygonal { base_edges } = self.shape {
            if base_edges > self.n_xs_points {
                return Err(ConfigError::BaseEdgesOutOfRange(
                    base_edges,
                    self.n_xs_points,
                ));
            }
        }
        Ok(())
    }
}
