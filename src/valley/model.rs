//! Valley and Station data structures.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::Params;
use crate::stats::ValleyStats;
use crate::vary::CurveSet;

/// One sample point along the valley's longitudinal axis.
///
/// Stations are produced once, in increasing index order, and never
/// mutated afterwards: each depends on its predecessor's arc length and on
/// the smoothed-noise stream's running state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Station {
    /// Station index.
    pub index: usize,
    /// Linear (down-valley) position.
    pub linear: f64,
    /// Lateral meander offset of the centerline.
    pub offset: f64,
    /// Arc-length increment from the previous station.
    pub arc_increment: f64,
    /// Cumulative arc length.
    pub arc_length: f64,
    /// Direction cosine dx/ds of the local channel alignment.
    pub dir_x: f64,
    /// Direction cosine dy/ds of the local channel alignment.
    pub dir_y: f64,
    /// Channel-alignment curvature value (curve plus derivative term).
    pub alignment: f64,
    /// Analytic first derivative of the leading alignment term.
    pub align_d1: f64,
    /// Analytic second derivative of the leading alignment term.
    pub align_d2: f64,
    /// Bankfull width.
    pub width: f64,
    /// Bankfull depth.
    pub depth: f64,
    /// Thalweg elevation.
    pub thalweg: f64,
    /// Top-of-bank elevation.
    pub top_of_bank: f64,
}

/// Curvature normalization published by the completed centerline pass.
///
/// The asymmetric cross-section shape cannot be generated until every
/// station's alignment value is known; this summary is the immutable
/// hand-off between the two phases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlignmentSummary {
    /// `1.2 *` the maximum absolute alignment value over all stations.
    pub norm: f64,
}

impl AlignmentSummary {
    /// Maps an alignment value to the curvature ratio `b` in `(0, 1)`:
    /// `0.5` at zero curvature, biased toward 1 for positive values and
    /// toward 0 for negative ones. A zero norm (a perfectly straight
    /// channel) maps everything to `0.5`.
    pub fn ratio(&self, alignment: f64) -> f64 {
        if self.norm == 0.0 {
            return 0.5;
        }
        0.5 * (1.0 + alignment / self.norm)
    }
}

/// The transverse elevation profile at one station, left bank to right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossSection {
    /// Lateral points in world coordinates.
    pub points: Vec<DVec3>,
}

/// Floodplain toe, terrace-top, and outer-boundary points at one station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloodplainStation {
    pub toe_left: DVec3,
    pub toe_right: DVec3,
    pub top_left: DVec3,
    pub top_right: DVec3,
    pub boundary_left: DVec3,
    pub boundary_right: DVec3,
}

/// A synthetic river valley under construction.
///
/// Stages populate the optional fields in dependency order; everything is
/// derived from the parameter set and curve table in a single forward
/// pass per stage and never mutated out of order.
#[derive(Debug, Clone)]
pub struct Valley {
    /// The immutable parameter set.
    pub params: Params,
    /// Named variability curves plus the shared noise stream.
    pub curves: CurveSet,
    /// Stations (populated by the centerline stage).
    pub stations: Vec<Station>,
    /// Curvature normalization (populated by the centerline stage).
    pub alignment: Option<AlignmentSummary>,
    /// Cross-sections per station (populated by the cross-section stage).
    pub sections: Option<Vec<CrossSection>>,
    /// Floodplain geometry per station (populated by the floodplain stage).
    pub floodplain: Option<Vec<FloodplainStation>>,
    /// Summary statistics (populated by the statistics stage).
    pub stats: Option<ValleyStats>,
}

impl Valley {
    /// Creates an empty valley from parameters and curves.
    pub fn new(params: Params, curves: CurveSet) -> Self {
        Self {
            params,
            curves,
            stations: Vec::new(),
            alignment: None,
            sections: None,
            floodplain: None,
            stats: None,
        }
    }

    /// Number of longitudinal stations.
    pub fn n_stations(&self) -> usize {
        self.params.n_stations
    }

    /// Number of lateral points per cross-section.
    pub fn n_xs_points(&self) -> usize {
        self.params.n_xs_points
    }

    /// True once the centerline pass has run.
    pub fn has_centerline(&self) -> bool {
        !self.stations.is_empty() && self.alignment.is_some()
    }

    /// Channel arc length over straight-line valley length, or `None`
    /// before the centerline pass.
    pub fn sinuosity(&self) -> Option<f64> {
        let first = self.stations.first()?;
        let last = self.stations.last()?;
        let run = last.linear - first.linear;
        if run <= 0.0 {
            return None;
        }
        Some(last.arc_length / run)
    }
}
