//! Per-station cross-section generation.
//!
//! Three shape families share one lateral grid: `M` points spanning the
//! bankfull width, symmetric about the centerline. Planar coordinates are
//! obtained by projecting each lateral offset through the station's
//! direction cosines, keeping sections perpendicular to the curving
//! centerline. This whole phase is pure given the completed centerline
//! pass, so stations are generated in parallel.

use glam::DVec3;
use rayon::prelude::*;
use thiserror::Error;

use crate::config::{Params, ShapeKind};
use crate::valley::{AlignmentSummary, CrossSection, Station};

/// Errors raised during cross-section generation.
#[derive(Error, Debug)]
pub enum SectionError {
    #[error("polygon base-edge count {0} outside [0, {1}]")]
    BaseEdgesOutOfRange(usize, usize),
}

/// Generates every station's cross-section.
///
/// Requires the completed centerline pass: the asymmetric shape reads the
/// global curvature normalization, which only exists once every station's
/// alignment value is known.
pub fn generate_sections(
    params: &Params,
    stations: &[Station],
    summary: &AlignmentSummary,
) -> Result<Vec<CrossSection>, SectionError> {
    let m = params.n_xs_points;
    if let ShapeKind::Polygonal { base_edges } = params.shape {
        if base_edges > m {
            return Err(SectionError::BaseEdgesOutOfRange(base_edges, m));
        }
    }

    Ok(stations
        .par_iter()
        .map(|st| section_at(params.shape, st, summary, m))
        .collect())
}

/// Builds the cross-section at one station.
pub fn section_at(
    shape: ShapeKind,
    st: &Station,
    summary: &AlignmentSummary,
    m: usize,
) -> CrossSection {
    let elevations = section_elevations(shape, st, summary, m);
    let half = st.width / 2.0;
    let step = st.width / (m - 1) as f64;

    let points = elevations
        .into_iter()
        .enumerate()
        .map(|(j, z)| {
            let lateral = -half + j as f64 * step;
            lateral_point(st, lateral, z)
        })
        .collect();
    CrossSection { points }
}

/// Projects a lateral offset through the station's direction cosines.
fn lateral_point(st: &Station, lateral: f64, z: f64) -> DVec3 {
    DVec3::new(
        st.linear - lateral * st.dir_y,
        st.offset + lateral * st.dir_x,
        z,
    )
}

/// Transverse elevation profile for one station, left bank to right.
pub fn section_elevations(
    shape: ShapeKind,
    st: &Station,
    summary: &AlignmentSummary,
    m: usize,
) -> Vec<f64> {
    match shape {
        ShapeKind::SymmetricU => symmetric_u(st, m),
        ShapeKind::AsymmetricU => asymmetric_u(st, summary, m),
        ShapeKind::Polygonal { base_edges } => polygonal(st, base_edges, m),
    }
}

/// Elliptical section: `top - depth * sqrt(1 - (n / halfWidth)^2)`.
fn symmetric_u(st: &Station, m: usize) -> Vec<f64> {
    let half = st.width / 2.0;
    (0..m)
        .map(|j| {
            let lateral = -half + j as f64 * st.width / (m - 1) as f64;
            let t = (lateral / half).clamp(-1.0, 1.0);
            st.top_of_bank - st.depth * (1.0 - t * t).sqrt()
        })
        .collect()
}

/// Curvature-skewed section.
///
/// The normalized curvature ratio `b` places the deepest point at lateral
/// fraction `b` of the section; the exponent `k` reshapes a half-sine so
/// its minimum lands there. The two sign branches are mirror images and
/// agree exactly at `b = 0.5`, so the profile is continuous through zero
/// curvature.
fn asymmetric_u(st: &Station, summary: &AlignmentSummary, m: usize) -> Vec<f64> {
    let b = summary.ratio(st.alignment);
    let negative = st.alignment < 0.0;
    let k = if negative {
        -std::f64::consts::LN_2 / b.ln()
    } else {
        -std::f64::consts::LN_2 / (1.0 - b).ln()
    };

    (0..m)
        .map(|j| {
            let u = j as f64 / (m - 1) as f64;
            let arg = if negative {
                u.powf(k)
            } else {
                (1.0 - u).powf(k)
            };
            st.top_of_bank - st.depth * (std::f64::consts::PI * arg).sin()
        })
        .collect()
}

/// Triangle / trapezoid / rectangle section.
///
/// `base_edges` flat segments sit at `top - depth`; the remaining
/// segments are split between the two banks and interpolate linearly in
/// lateral index. Endpoints always sit at top-of-bank.
fn polygonal(st: &Station, base_edges: usize, m: usize) -> Vec<f64> {
    let top = st.top_of_bank;
    let base = top - st.depth;

    // Base-edge counts at or beyond m-3 leave no room for slopes on both
    // sides; the section degenerates to a rectangle.
    let n_eff = base_edges.min(m - 1);
    let slope_total = m - 1 - n_eff;
    let left = (slope_total + 1) / 2;
    let base_lo = left;
    let base_hi = left + n_eff;

    (0..m)
        .map(|j| {
            if j == 0 || j == m - 1 {
                top
            } else if j >= base_lo && j <= base_hi {
                base
            } else if j < base_lo {
                top - st.depth * j as f64 / base_lo as f64
            } else {
                top - st.depth * (m - 1 - j) as f64 / (m - 1 - base_hi) as f64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(width: f64, depth: f64, alignment: f64) -> Station {
        Station {
            index: 0,
            linear: 0.0,
            offset: 0.0,
            arc_increment: 1.0,
            arc_length: 0.0,
            dir_x: 1.0,
            dir_y: 0.0,
            alignment,
            align_d1: 0.0,
            align_d2: 0.0,
            width,
            depth,
            thalweg: 0.0,
            top_of_bank: depth,
        }
    }

    #[test]
    fn test_symmetric_endpoints_and_middle() {
        let st = station(10.0, 2.0, 0.0);
        let z = section_elevations(ShapeKind::SymmetricU, &st, &AlignmentSummary { norm: 0.0 }, 11);
        assert!((z[0] - 2.0).abs() < 1e-9);
        assert!((z[10] - 2.0).abs() < 1e-9);
        // Center of the ellipse reaches full depth.
        assert!((z[5] - 0.0).abs() < 1e-9);
        // Symmetric about the centerline.
        for j in 0..11 {
            assert!((z[j] - z[10 - j]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_asymmetric_endpoints_at_top_of_bank() {
        let summary = AlignmentSummary { norm: 1.2 };
        for align in [-1.0, -0.3, 0.0, 0.4, 1.0] {
            let st = station(12.0, 1.5, align);
            let z = section_elevations(ShapeKind::AsymmetricU, &st, &summary, 15);
            assert!((z[0] - st.top_of_bank).abs() < 1e-9);
            assert!((z[14] - st.top_of_bank).abs() < 1e-9);
        }
    }

    #[test]
    fn test_asymmetric_continuous_at_zero_curvature() {
        let summary = AlignmentSummary { norm: 1.2 };
        let eps = 1e-9;
        let below = station(12.0, 1.5, -eps);
        let above = station(12.0, 1.5, eps);
        let z_below = section_elevations(ShapeKind::AsymmetricU, &below, &summary, 21);
        let z_above = section_elevations(ShapeKind::AsymmetricU, &above, &summary, 21);
        for (a, b) in z_below.iter().zip(z_above.iter()) {
            assert!((a - b).abs() < 1e-6, "discontinuity: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_asymmetric_skew_follows_curvature_sign() {
        let summary = AlignmentSummary { norm: 1.2 };
        let m = 21;
        let pos = station(12.0, 1.5, 1.0);
        let neg = station(12.0, 1.5, -1.0);
        let z_pos = section_elevations(ShapeKind::AsymmetricU, &pos, &summary, m);
        let z_neg = section_elevations(ShapeKind::AsymmetricU, &neg, &summary, m);

        let argmin = |z: &[f64]| {
            z.iter()
                .enumerate()
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .unwrap()
                .0
        };
        // Positive curvature pushes the deepest point right of center,
        // negative pushes it left, mirrored.
        assert!(argmin(&z_pos) > m / 2);
        assert!(argmin(&z_neg) < m / 2);
        assert_eq!(argmin(&z_pos), m - 1 - argmin(&z_neg));
    }

    #[test]
    fn test_polygon_triangle_single_apex() {
        let st = station(10.0, 2.0, 0.0);
        let z = section_elevations(
            ShapeKind::Polygonal { base_edges: 0 },
            &st,
            &AlignmentSummary { norm: 0.0 },
            9,
        );
        let apex_count = z.iter().filter(|&&v| (v - 0.0).abs() < 1e-12).count();
        assert_eq!(apex_count, 1);
        assert_eq!(z[0], 2.0);
        assert_eq!(z[8], 2.0);
    }

    #[test]
    fn test_polygon_rectangle_degeneracy() {
        let st = station(10.0, 2.0, 0.0);
        for base_edges in [6, 7, 8, 9] {
            let z = section_elevations(
                ShapeKind::Polygonal { base_edges },
                &st,
                &AlignmentSummary { norm: 0.0 },
                9,
            );
            assert_eq!(z[0], 2.0);
            assert_eq!(z[8], 2.0);
            for v in &z[1..8] {
                assert_eq!(*v, 0.0, "base_edges={}", base_edges);
            }
        }
    }

    #[test]
    fn test_polygon_trapezoid() {
        let st = station(10.0, 2.0, 0.0);
        let z = section_elevations(
            ShapeKind::Polygonal { base_edges: 2 },
            &st,
            &AlignmentSummary { norm: 0.0 },
            9,
        );
        // Flat base of three points, sloped flanks in between.
        assert_eq!(z.iter().filter(|&&v| v == 0.0).count(), 3);
        assert!(z[1] < 2.0 && z[1] > 0.0);
    }

    #[test]
    fn test_base_edges_out_of_range() {
        let params = Params {
            n_xs_points: 9,
            shape: ShapeKind::Polygonal { base_edges: 10 },
            ..Default::default()
        };
        let st = station(10.0, 2.0, 0.0);
        let err = generate_sections(&params, &[st], &AlignmentSummary { norm: 0.0 });
        assert!(matches!(err, Err(SectionError::BaseEdgesOutOfRange(10, 9))));
    }

    #[test]
    fn test_lateral_points_follow_direction_cosines() {
        // A station heading 45 degrees: lateral offsets rotate with it.
        let mut st = station(10.0, 2.0, 0.0);
        let inv = 1.0 / 2.0f64.sqrt();
        st.dir_x = inv;
        st.dir_y = inv;
        let xs = section_at(ShapeKind::SymmetricU, &st, &AlignmentSummary { norm: 0.0 }, 3);

        let left = xs.points[0];
        let right = xs.points[2];
        // Lateral axis is perpendicular to the travel direction.
        let dot = (right.x - left.x) * st.dir_x + (right.y - left.y) * st.dir_y;
        assert!(dot.abs() < 1e-9);
        // And spans the full bankfull width.
        let span = ((right.x - left.x).powi(2) + (right.y - left.y).powi(2)).sqrt();
        assert!((span - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_point_sections_sit_on_banks() {
        let st = station(6.0, 1.0, 0.0);
        for shape in [
            ShapeKind::SymmetricU,
            ShapeKind::Polygonal { base_edges: 0 },
        ] {
            let z = section_elevations(shape, &st, &AlignmentSummary { norm: 0.0 }, 2);
            assert!((z[0] - 1.0).abs() < 1e-9);
            assert!((z[1] - 1.0).abs() < 1e-9);
        }
    }
}
