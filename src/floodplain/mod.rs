//! Floodplain toe, terrace-top, and outer-boundary geometry.

use glam::DVec3;

use crate::config::Params;
use crate::valley::{FloodplainStation, Station};
use crate::vary::{CurveId, CurveSet, StationVars};

/// Builds the floodplain point set for every station.
///
/// The left/right waveforms are evaluated sequentially (their smoothed
/// noise carries running state), then the global extremes of those
/// waveforms and of the bank half-widths become reference constants: every
/// toe is pushed outward far enough that no station's banks can reach it.
pub fn build_floodplain(
    params: &Params,
    stations: &[Station],
    curves: &mut CurveSet,
) -> Vec<FloodplainStation> {
    let left: Vec<f64> = stations
        .iter()
        .map(|st| curves.evaluate(CurveId::FloodplainLeft, StationVars::at(st.linear)))
        .collect();
    let right: Vec<f64> = stations
        .iter()
        .map(|st| curves.evaluate(CurveId::FloodplainRight, StationVars::at(st.linear)))
        .collect();

    let left_max = left.iter().copied().fold(0.0, f64::max);
    let right_max = right.iter().copied().fold(0.0, f64::max);
    let bank_max = stations.iter().map(|s| s.width / 2.0).fold(0.0, f64::max);

    // Boundary rows sit at one absolute lateral extent: the widest
    // terrace top anywhere, padded by the configured boundary width.
    let mut top_extent = 0.0f64;
    let offsets: Vec<(f64, f64)> = stations
        .iter()
        .enumerate()
        .map(|(i, st)| {
            let toe_left = left[i] + params.floodplain_width + left_max + bank_max;
            let toe_right = right[i] + params.floodplain_width + right_max + bank_max;
            let top_left = toe_left + params.terrace_width;
            let top_right = toe_right + params.terrace_width;
            top_extent = top_extent
                .max((st.offset + top_right).abs())
                .max((st.offset - top_left).abs());
            (toe_left, toe_right)
        })
        .collect();
    let boundary_extent = top_extent + params.boundary_width;

    stations
        .iter()
        .zip(offsets)
        .map(|(st, (toe_left, toe_right))| {
            let toe_z = st.top_of_bank + params.toe_height;
            let top_z = toe_z + params.terrace_height;
            FloodplainStation {
                toe_left: DVec3::new(st.linear, st.offset - toe_left, toe_z),
                toe_right: DVec3::new(st.linear, st.offset + toe_right, toe_z),
                top_left: DVec3::new(st.linear, st.offset - toe_left - params.terrace_width, top_z),
                top_right: DVec3::new(st.linear, st.offset + toe_right + params.terrace_width, top_z),
                boundary_left: DVec3::new(st.linear, -boundary_extent, top_z),
                boundary_right: DVec3::new(st.linear, boundary_extent, top_z),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centerline::trace_centerline;
    use crate::valley::Valley;
    use crate::vary::VaryFn;

    fn traced_valley() -> Valley {
        let params = Params {
            n_stations: 20,
            length: 100.0,
            bankfull_depth: Some(1.0),
            datum: 10.0,
            floodplain_width: 5.0,
            terrace_width: 3.0,
            toe_height: 0.5,
            terrace_height: 2.0,
            boundary_width: 4.0,
            ..Default::default()
        };
        let mut valley = Valley::new(params, crate::vary::CurveSet::new(3));
        trace_centerline(&mut valley).unwrap();
        valley
    }

    #[test]
    fn test_elevations_identical_left_right() {
        let mut valley = traced_valley();
        let fp = build_floodplain(&valley.params.clone(), &valley.stations, &mut valley.curves);
        for f in &fp {
            assert_eq!(f.toe_left.z, f.toe_right.z);
            assert_eq!(f.top_left.z, f.top_right.z);
            assert!((f.top_left.z - f.toe_left.z - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_toe_clears_banks_everywhere() {
        let mut valley = traced_valley();
        valley.curves.attach(
            CurveId::FloodplainLeft,
            VaryFn::Sin { amplitude: 2.0, frequency: 0.3, phase: 0.0 },
        );
        let fp = build_floodplain(&valley.params.clone(), &valley.stations, &mut valley.curves);
        for (st, f) in valley.stations.iter().zip(&fp) {
            let half = st.width / 2.0;
            assert!(f.toe_right.y > st.offset + half);
            assert!(f.toe_left.y < st.offset - half);
        }
    }

    #[test]
    fn test_top_outside_toe_by_terrace_width() {
        let mut valley = traced_valley();
        let fp = build_floodplain(&valley.params.clone(), &valley.stations, &mut valley.curves);
        for f in &fp {
            assert!((f.top_right.y - f.toe_right.y - 3.0).abs() < 1e-12);
            assert!((f.toe_left.y - f.top_left.y - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_boundary_rows_constant_extent() {
        let mut valley = traced_valley();
        let fp = build_floodplain(&valley.params.clone(), &valley.stations, &mut valley.curves);
        let extent = fp[0].boundary_right.y;
        for f in &fp {
            assert_eq!(f.boundary_right.y, extent);
            assert_eq!(f.boundary_left.y, -extent);
            // Boundary clears every terrace top by the configured margin.
            assert!(f.boundary_right.y >= f.top_right.y + 4.0 - 1e-12);
        }
    }

    #[test]
    fn test_toe_elevation_above_bank() {
        let mut valley = traced_valley();
        let fp = build_floodplain(&valley.params.clone(), &valley.stations, &mut valley.curves);
        for (st, f) in valley.stations.iter().zip(&fp) {
            assert!((f.toe_left.z - st.top_of_bank - 0.5).abs() < 1e-12);
        }
    }
}
