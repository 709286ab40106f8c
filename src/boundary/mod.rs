//! Boundary assembly: the ordered output point cloud and the companion
//! index table used by downstream GIS tools.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::valley::{CrossSection, FloodplainStation};

/// 1-based offsets into the point cloud, each a fixed linear function of
/// the station count `N` and cross-section point count `M`. Downstream
/// tools read these to pick out the contiguous ranges that form the
/// floodplain boundary polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryIndexTable {
    pub cross_section_start: usize,
    pub cross_section_end: usize,
    pub right_top_start: usize,
    pub right_top_end: usize,
    pub left_top_start: usize,
    pub left_top_end: usize,
    pub right_boundary_start: usize,
    pub right_boundary_end: usize,
    pub left_boundary_start: usize,
    pub left_boundary_end: usize,
    pub left_toe_start: usize,
    pub left_toe_end: usize,
    pub right_toe_start: usize,
    pub right_toe_end: usize,
    pub total_points: usize,
    pub n_stations: usize,
    pub n_xs_points: usize,
}

impl BoundaryIndexTable {
    /// Builds the table for `n` stations of `m` lateral points each.
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            cross_section_start: 1,
            cross_section_end: n * m,
            right_top_start: n * m + 1,
            right_top_end: n * (m + 1),
            left_top_start: n * (m + 1) + 1,
            left_top_end: n * (m + 2),
            right_boundary_start: n * (m + 2) + 1,
            right_boundary_end: n * (m + 3),
            left_boundary_start: n * (m + 3) + 1,
            left_boundary_end: n * (m + 4),
            left_toe_start: n * (m + 4) + 1,
            left_toe_end: n * (m + 5),
            right_toe_start: n * (m + 5) + 1,
            right_toe_end: n * (m + 6),
            total_points: n * (m + 6),
            n_stations: n,
            n_xs_points: m,
        }
    }

    /// The 17 labeled entries, in file order.
    pub fn rows(&self) -> [(&'static str, usize); 17] {
        [
            ("cross_section_start", self.cross_section_start),
            ("cross_section_end", self.cross_section_end),
            ("right_top_start", self.right_top_start),
            ("right_top_end", self.right_top_end),
            ("left_top_start", self.left_top_start),
            ("left_top_end", self.left_top_end),
            ("right_boundary_start", self.right_boundary_start),
            ("right_boundary_end", self.right_boundary_end),
            ("left_boundary_start", self.left_boundary_start),
            ("left_boundary_end", self.left_boundary_end),
            ("left_toe_start", self.left_toe_start),
            ("left_toe_end", self.left_toe_end),
            ("right_toe_start", self.right_toe_start),
            ("right_toe_end", self.right_toe_end),
            ("total_points", self.total_points),
            ("n_stations", self.n_stations),
            ("n_xs_points", self.n_xs_points),
        ]
    }
}

/// Concatenates every per-station point set into the output point cloud.
///
/// Order: all cross-section points column-major (lateral index outer,
/// station inner), then one row per station of right-top, left-top,
/// right-boundary-offset, left-boundary-offset, left-toe, right-toe.
/// The result always holds exactly `N * (M + 6)` points.
pub fn assemble_boundary(
    sections: &[CrossSection],
    floodplain: &[FloodplainStation],
) -> Vec<DVec3> {
    let n = sections.len();
    let m = sections.first().map(|s| s.points.len()).unwrap_or(0);
    let mut points = Vec::with_capacity(n * (m + 6));

    for j in 0..m {
        for section in sections {
            points.push(section.points[j]);
        }
    }
    points.extend(floodplain.iter().map(|f| f.top_right));
    points.extend(floodplain.iter().map(|f| f.top_left));
    points.extend(floodplain.iter().map(|f| f.boundary_right));
    points.extend(floodplain.iter().map(|f| f.boundary_left));
    points.extend(floodplain.iter().map(|f| f.toe_left));
    points.extend(floodplain.iter().map(|f| f.toe_right));

    points
}
