//! Centerline tracing: station positions, arc length, direction cosines,
//! and the alignment pass that feeds cross-section generation.

use thiserror::Error;

use crate::valley::{AlignmentSummary, Station, Valley};
use crate::vary::{CurveId, StationVars, VaryFn};

/// Errors raised while tracing the centerline.
#[derive(Error, Debug)]
pub enum CenterlineError {
    #[error("zero-length arc increment between stations {0} and {1}")]
    DegenerateStep(usize, usize),
}

/// Traces the centerline and fills every per-station scalar.
///
/// Runs one sequential pass per curve so that smoothed-noise terms see
/// stations in increasing order, then publishes the alignment summary
/// that phase 2 (cross-section generation) requires. The arc-length and
/// direction-cosine recurrences both read station `i - 1`, so this pass
/// cannot be parallelized.
pub fn trace_centerline(valley: &mut Valley) -> Result<(), CenterlineError> {
    let n = valley.params.n_stations;
    let dx = valley.params.station_spacing();
    let depth_bf = valley.params.depth();
    let datum = valley.params.datum;

    // Planform pass: meander offsets over linear position.
    let xs: Vec<f64> = (0..n).map(|i| i as f64 * dx).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| valley.curves.evaluate(CurveId::Meander, StationVars::at(x)))
        .collect();

    // Arc-length recurrence. Station 0 has no predecessor; its increment
    // duplicates the first real one to seed the direction cosines.
    let mut increments = vec![0.0; n];
    for i in 1..n {
        let dxi = xs[i] - xs[i - 1];
        let dyi = ys[i] - ys[i - 1];
        let ds = (dxi * dxi + dyi * dyi).sqrt();
        if ds == 0.0 {
            return Err(CenterlineError::DegenerateStep(i - 1, i));
        }
        increments[i] = ds;
    }
    increments[0] = increments[1];

    let mut arc = vec![0.0; n];
    for i in 1..n {
        arc[i] = arc[i - 1] + increments[i];
    }

    // Backward-difference direction cosines; station 0 reuses station 1's.
    let mut dir = vec![(0.0, 0.0); n];
    for i in 1..n {
        dir[i] = (
            (xs[i] - xs[i - 1]) / increments[i],
            (ys[i] - ys[i - 1]) / increments[i],
        );
    }
    dir[0] = dir[1];

    // Alignment pass over the arc-length angle. The curvature correction
    // comes from the FIRST attached periodic term only, differentiated
    // analytically; the summed multi-term curve supplies the base value.
    let leading = valley.curves.first_term(CurveId::Alignment).copied();
    let mut alignment = vec![(0.0, 0.0, 0.0); n];
    for i in 0..n {
        let vars = StationVars { linear: xs[i], angle: arc[i] };
        let base = valley.curves.evaluate(CurveId::Alignment, vars);
        let (d1, d2) = derivatives(&leading, arc[i]);
        alignment[i] = (base + d2, d1, d2);
    }

    // Width pass over the arc-length angle, floored at the configured
    // minimum.
    let widths: Vec<f64> = (0..n)
        .map(|i| {
            let vars = StationVars { linear: xs[i], angle: arc[i] };
            let w = valley.params.bankfull_width + valley.curves.evaluate(CurveId::Width, vars);
            w.max(valley.params.min_bankfull_width)
        })
        .collect();

    // Thalweg pass over linear position. The bank rim sits at
    // `datum + bankfull depth`, so thalweg undulation shows up as local
    // depth variation.
    let thalweg_vals: Vec<f64> = xs
        .iter()
        .map(|&x| valley.curves.evaluate(CurveId::Thalweg, StationVars::at(x)))
        .collect();

    valley.stations = (0..n)
        .map(|i| Station {
            index: i,
            linear: xs[i],
            offset: ys[i],
            arc_increment: increments[i],
            arc_length: arc[i],
            dir_x: dir[i].0,
            dir_y: dir[i].1,
            alignment: alignment[i].0,
            align_d1: alignment[i].1,
            align_d2: alignment[i].2,
            width: widths[i],
            depth: depth_bf - thalweg_vals[i],
            thalweg: datum + thalweg_vals[i],
            top_of_bank: datum + depth_bf,
        })
        .collect();

    let max_abs = valley
        .stations
        .iter()
        .map(|s| s.alignment.abs())
        .fold(0.0, f64::max);
    valley.alignment = Some(AlignmentSummary { norm: 1.2 * max_abs });

    Ok(())
}

fn derivatives(leading: &Option<VaryFn>, angle: f64) -> (f64, f64) {
    match leading {
        Some(f) => (
            f.d1(angle).unwrap_or(0.0),
            f.d2(angle).unwrap_or(0.0),
        ),
        None => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Params;
    use crate::vary::{CurveSet, VaryFn};

    fn straight_valley(n: usize, length: f64) -> Valley {
        let params = Params {
            n_stations: n,
            length,
            bankfull_depth: Some(1.0),
            datum: 1.0,
            ..Default::default()
        };
        Valley::new(params, CurveSet::new(7))
    }

    #[test]
    fn test_straight_centerline() {
        let mut valley = straight_valley(5, 100.0);
        trace_centerline(&mut valley).unwrap();

        assert_eq!(valley.stations.len(), 5);
        for st in &valley.stations {
            assert_eq!(st.offset, 0.0);
            assert!((st.dir_x - 1.0).abs() < 1e-12);
            assert_eq!(st.dir_y, 0.0);
        }
        // Straight channel: arc length equals linear distance.
        let last = valley.stations.last().unwrap();
        assert!((last.arc_length - 100.0).abs() < 1e-9);
        assert!((valley.sinuosity().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_arc_length_monotone() {
        let mut valley = straight_valley(50, 500.0);
        valley.curves.attach(
            CurveId::Meander,
            VaryFn::Sin { amplitude: 20.0, frequency: 0.05, phase: 0.0 },
        );
        trace_centerline(&mut valley).unwrap();

        for pair in valley.stations.windows(2) {
            assert!(pair[1].arc_length >= pair[0].arc_length);
        }
    }

    #[test]
    fn test_meander_raises_sinuosity() {
        let mut valley = straight_valley(200, 500.0);
        valley.curves.attach(
            CurveId::Meander,
            VaryFn::Sin { amplitude: 30.0, frequency: 0.05, phase: 0.0 },
        );
        trace_centerline(&mut valley).unwrap();
        assert!(valley.sinuosity().unwrap() > 1.0);
    }

    #[test]
    fn test_first_increment_duplicated() {
        let mut valley = straight_valley(4, 30.0);
        trace_centerline(&mut valley).unwrap();
        let s = &valley.stations;
        assert_eq!(s[0].arc_increment, s[1].arc_increment);
        assert_eq!(s[0].arc_length, 0.0);
    }

    #[test]
    fn test_thalweg_and_banks() {
        let mut valley = straight_valley(3, 10.0);
        trace_centerline(&mut valley).unwrap();
        for st in &valley.stations {
            assert_eq!(st.thalweg, 1.0);
            assert_eq!(st.depth, 1.0);
            assert_eq!(st.top_of_bank, 2.0);
        }
    }

    #[test]
    fn test_alignment_summary_scaling() {
        let mut valley = straight_valley(100, 400.0);
        valley.curves.attach(
            CurveId::Alignment,
            VaryFn::Sin { amplitude: 2.0, frequency: 0.1, phase: 0.0 },
        );
        trace_centerline(&mut valley).unwrap();

        let max_abs = valley
            .stations
            .iter()
            .map(|s| s.alignment.abs())
            .fold(0.0, f64::max);
        let summary = valley.alignment.unwrap();
        assert!((summary.norm - 1.2 * max_abs).abs() < 1e-12);
        // The ratio of any observed value stays strictly inside (0, 1).
        for st in &valley.stations {
            let b = summary.ratio(st.alignment);
            assert!(b > 0.0 && b < 1.0);
        }
    }

    #[test]
    fn test_curvature_correction_uses_leading_term() {
        let mut valley = straight_valley(10, 90.0);
        valley.curves.attach(
            CurveId::Alignment,
            VaryFn::Sin { amplitude: 1.0, frequency: 0.2, phase: 0.0 },
        );
        trace_centerline(&mut valley).unwrap();

        for st in &valley.stations {
            let theta = 0.2 * st.arc_length;
            let expected_d2 = -1.0 * 0.2 * 0.2 * theta.sin();
            assert!((st.align_d2 - expected_d2).abs() < 1e-12);
            assert!((st.alignment - (theta.sin() + expected_d2)).abs() < 1e-12);
        }
    }
}
