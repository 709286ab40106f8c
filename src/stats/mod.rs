//! Summary statistics: variability coefficients, standardized covariance
//! structure, channel-slope regression, and sinuosity.

use serde::{Deserialize, Serialize};

use crate::config::Params;
use crate::valley::Station;

/// Mean, standard deviation, and coefficient of variation of one series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub mean: f64,
    pub sd: f64,
    pub cv: f64,
}

/// Sign split of a standardized covariance product series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CovarianceSplit {
    /// Percentage of stations with a positive product.
    pub positive_pct: f64,
    /// Percentage of stations with a negative product.
    pub negative_pct: f64,
}

/// Everything the scalar report carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValleyStats {
    pub width: SeriesSummary,
    pub depth: SeriesSummary,
    /// Width x depth covariance sign split.
    pub width_depth: CovarianceSplit,
    /// Alignment x depth covariance sign split.
    pub alignment_depth: CovarianceSplit,
    /// Regression slope of thalweg elevation on arc length, corrected by
    /// `valley_slope / sinuosity`.
    pub channel_slope: f64,
    /// Regression intercept of thalweg elevation on arc length.
    pub channel_intercept: f64,
    pub sinuosity: f64,
    /// Reach mean bankfull width (`wr`).
    pub reach_width: f64,
    /// Wetted perimeter `wr + 2 hr` (`wp`).
    pub wetted_perimeter: f64,
    /// Hydraulic radius `wr hr / (wr + 2 hr)` (`hres`).
    pub hydraulic_radius: f64,
    /// Bankfull depth in effect (`hr`).
    pub bankfull_depth: f64,
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn std_dev(xs: &[f64], mu: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / xs.len() as f64;
    var.sqrt()
}

fn summarize(xs: &[f64]) -> SeriesSummary {
    let mu = mean(xs);
    let sd = std_dev(xs, mu);
    let cv = if mu != 0.0 { sd / mu } else { 0.0 };
    SeriesSummary { mean: mu, sd, cv }
}

/// Standardizes a series to z-scores. A constant series (zero standard
/// deviation) yields all zeros rather than dividing by zero.
pub fn standardize(xs: &[f64]) -> Vec<f64> {
    let mu = mean(xs);
    let sd = std_dev(xs, mu);
    if sd == 0.0 {
        return vec![0.0; xs.len()];
    }
    xs.iter().map(|x| (x - mu) / sd).collect()
}

/// Counts the signs of the element-wise product of two standardized
/// series. With no nonzero products (a degenerate series) both
/// percentages are zero.
fn covariance_split(za: &[f64], zb: &[f64]) -> CovarianceSplit {
    let mut positive = 0usize;
    let mut negative = 0usize;
    for (a, b) in za.iter().zip(zb.iter()) {
        let p = a * b;
        if p > 0.0 {
            positive += 1;
        } else if p < 0.0 {
            negative += 1;
        }
    }
    let total = positive + negative;
    if total == 0 {
        return CovarianceSplit { positive_pct: 0.0, negative_pct: 0.0 };
    }
    CovarianceSplit {
        positive_pct: 100.0 * positive as f64 / total as f64,
        negative_pct: 100.0 * negative as f64 / total as f64,
    }
}

/// Ordinary-least-squares fit of `y` on `x`. A zero-variance abscissa
/// yields slope 0 with the mean as intercept.
fn linear_regression(x: &[f64], y: &[f64]) -> (f64, f64) {
    let mx = mean(x);
    let my = mean(y);
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        sxx += (xi - mx) * (xi - mx);
        sxy += (xi - mx) * (yi - my);
    }
    if sxx == 0.0 {
        return (0.0, my);
    }
    let slope = sxy / sxx;
    (slope, my - slope * mx)
}

/// Computes the full summary from the finished station arrays.
pub fn compute_stats(params: &Params, stations: &[Station]) -> ValleyStats {
    let widths: Vec<f64> = stations.iter().map(|s| s.width).collect();
    let depths: Vec<f64> = stations.iter().map(|s| s.depth).collect();
    let aligns: Vec<f64> = stations.iter().map(|s| s.alignment).collect();
    let thalwegs: Vec<f64> = stations.iter().map(|s| s.thalweg).collect();
    let arcs: Vec<f64> = stations.iter().map(|s| s.arc_length).collect();

    let zw = standardize(&widths);
    let zd = standardize(&depths);
    let za = standardize(&aligns);

    let sinuosity = match (stations.first(), stations.last()) {
        (Some(first), Some(last)) if last.linear > first.linear => {
            last.arc_length / (last.linear - first.linear)
        }
        _ => 1.0,
    };

    let (ols_slope, channel_intercept) = linear_regression(&arcs, &thalwegs);
    let channel_slope = ols_slope + params.valley_slope / sinuosity;

    let hr = params.depth();
    let wr = mean(&widths);
    let wp = wr + 2.0 * hr;
    let hres = if wp != 0.0 { wr * hr / wp } else { 0.0 };

    ValleyStats {
        width: summarize(&widths),
        depth: summarize(&depths),
        width_depth: covariance_split(&zw, &zd),
        alignment_depth: covariance_split(&za, &zd),
        channel_slope,
        channel_intercept,
        sinuosity,
        reach_width: wr,
        wetted_perimeter: wp,
        hydraulic_radius: hres,
        bankfull_depth: hr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centerline::trace_centerline;
    use crate::valley::Valley;
    use crate::vary::{CurveId, CurveSet, VaryFn};

    #[test]
    fn test_standardize_constant_series() {
        let z = standardize(&[4.0, 4.0, 4.0, 4.0]);
        assert!(z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_standardize_zero_mean_unit_sd() {
        let z = standardize(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(mean(&z).abs() < 1e-12);
        assert!((std_dev(&z, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_split_degenerate() {
        let split = covariance_split(&[0.0, 0.0], &[0.0, 0.0]);
        assert_eq!(split.positive_pct, 0.0);
        assert_eq!(split.negative_pct, 0.0);
    }

    #[test]
    fn test_covariance_split_in_phase() {
        let a = [1.0, -1.0, 1.0, -1.0];
        let split = covariance_split(&a, &a);
        assert_eq!(split.positive_pct, 100.0);
        assert_eq!(split.negative_pct, 0.0);

        let b: Vec<f64> = a.iter().map(|v| -v).collect();
        let split = covariance_split(&a, &b);
        assert_eq!(split.positive_pct, 0.0);
        assert_eq!(split.negative_pct, 100.0);
    }

    #[test]
    fn test_regression_recovers_line() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 7.0).collect();
        let (slope, intercept) = linear_regression(&x, &y);
        assert!((slope - 3.0).abs() < 1e-9);
        assert!((intercept + 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_regression_zero_variance() {
        let (slope, intercept) = linear_regression(&[2.0, 2.0], &[1.0, 3.0]);
        assert_eq!(slope, 0.0);
        assert_eq!(intercept, 2.0);
    }

    #[test]
    fn test_degenerate_valley_stats() {
        // Zero-amplitude functions everywhere: constant width and depth,
        // sinuosity exactly 1, covariance split 0/0.
        let params = Params {
            n_stations: 2,
            n_xs_points: 2,
            length: 2.0,
            datum: 1.0,
            bankfull_depth: Some(1.0),
            ..Default::default()
        };
        let mut valley = Valley::new(params, CurveSet::new(1));
        trace_centerline(&mut valley).unwrap();
        let stats = compute_stats(&valley.params, &valley.stations);

        assert_eq!(stats.sinuosity, 1.0);
        assert_eq!(stats.width_depth.positive_pct, 0.0);
        assert_eq!(stats.width_depth.negative_pct, 0.0);
        assert_eq!(stats.depth.sd, 0.0);
        assert_eq!(stats.bankfull_depth, 1.0);
    }

    #[test]
    fn test_channel_slope_correction() {
        let params = Params {
            n_stations: 100,
            length: 500.0,
            valley_slope: 0.002,
            bankfull_depth: Some(1.0),
            ..Default::default()
        };
        let mut valley = Valley::new(params, CurveSet::new(1));
        trace_centerline(&mut valley).unwrap();
        let stats = compute_stats(&valley.params, &valley.stations);

        // Flat thalweg, straight channel: the correction term is the
        // whole slope.
        assert!((stats.channel_slope - 0.002).abs() < 1e-9);
        assert!((stats.sinuosity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_in_phase_width_depth_covariance() {
        // Width and depth driven by the same waveform covary positively
        // at every station.
        let params = Params {
            n_stations: 80,
            length: 400.0,
            bankfull_width: 20.0,
            min_bankfull_width: 5.0,
            bankfull_depth: Some(2.0),
            ..Default::default()
        };
        let mut valley = Valley::new(params, CurveSet::new(1));
        valley.curves.attach(
            CurveId::Width,
            VaryFn::Sin { amplitude: 3.0, frequency: 0.1, phase: 0.0 },
        );
        // Thalweg low where width is wide: depth = h - thalweg rises with
        // width when the thalweg wave is inverted.
        valley.curves.attach(
            CurveId::Thalweg,
            VaryFn::Sin { amplitude: -0.5, frequency: 0.1, phase: 0.0 },
        );
        trace_centerline(&mut valley).unwrap();
        let stats = compute_stats(&valley.params, &valley.stations);
        assert!(stats.width_depth.positive_pct > stats.width_depth.negative_pct);
    }
}
