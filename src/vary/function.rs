//! Variability function families and named-curve evaluation.

use serde::{Deserialize, Serialize};

use super::noise::{sample_smoothed, Lcg, NoiseState};

/// One term of a variability curve.
///
/// Curves are sums of these terms. The periodic families take the
/// caller-chosen angle variable; `Line` always takes linear position, and
/// `Noise` measures linear position against its wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VaryFn {
    /// `amplitude * sin(frequency * angle + phase)`
    Sin { amplitude: f64, frequency: f64, phase: f64 },
    /// `amplitude * cos(frequency * angle + phase)`
    Cos { amplitude: f64, frequency: f64, phase: f64 },
    /// `amplitude * sin(frequency * angle + phase)^2`
    SinSq { amplitude: f64, frequency: f64, phase: f64 },
    /// `slope * linear + intercept`
    Line { slope: f64, intercept: f64 },
    /// Cosine-eased interpolation of persisted random anchors.
    Noise { amplitude: f64, wavelength: f64 },
}

impl VaryFn {
    /// Returns true for the sine/cosine/squared-sine families.
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            VaryFn::Sin { .. } | VaryFn::Cos { .. } | VaryFn::SinSq { .. }
        )
    }

    /// Analytic first derivative with respect to the angle variable, or
    /// `None` for the non-periodic families.
    pub fn d1(&self, angle: f64) -> Option<f64> {
        match *self {
            VaryFn::Sin { amplitude, frequency, phase } => {
                Some(amplitude * frequency * (frequency * angle + phase).cos())
            }
            VaryFn::Cos { amplitude, frequency, phase } => {
                Some(-amplitude * frequency * (frequency * angle + phase).sin())
            }
            VaryFn::SinSq { amplitude, frequency, phase } => {
                Some(amplitude * frequency * (2.0 * (frequency * angle + phase)).sin())
            }
            VaryFn::Line { .. } | VaryFn::Noise { .. } => None,
        }
    }

    /// Analytic second derivative with respect to the angle variable, or
    /// `None` for the non-periodic families.
    pub fn d2(&self, angle: f64) -> Option<f64> {
        match *self {
            VaryFn::Sin { amplitude, frequency, phase } => {
                Some(-amplitude * frequency * frequency * (frequency * angle + phase).sin())
            }
            VaryFn::Cos { amplitude, frequency, phase } => {
                Some(-amplitude * frequency * frequency * (frequency * angle + phase).cos())
            }
            VaryFn::SinSq { amplitude, frequency, phase } => {
                Some(
                    2.0 * amplitude
                        * frequency
                        * frequency
                        * (2.0 * (frequency * angle + phase)).cos(),
                )
            }
            VaryFn::Line { .. } | VaryFn::Noise { .. } => None,
        }
    }
}

/// The six named curve slots of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveId {
    /// Lateral meander offset of the channel centerline.
    Meander,
    /// Channel-alignment curvature waveform.
    Alignment,
    /// Bankfull width modifier.
    Width,
    /// Thalweg elevation undulation.
    Thalweg,
    /// Left floodplain waveform.
    FloodplainLeft,
    /// Right floodplain waveform.
    FloodplainRight,
}

impl CurveId {
    /// All curve slots, in evaluation order.
    pub const ALL: [CurveId; 6] = [
        CurveId::Meander,
        CurveId::Alignment,
        CurveId::Width,
        CurveId::Thalweg,
        CurveId::FloodplainLeft,
        CurveId::FloodplainRight,
    ];

    /// Returns the configuration key for this slot.
    pub fn name(&self) -> &'static str {
        match self {
            CurveId::Meander => "meander",
            CurveId::Alignment => "alignment",
            CurveId::Width => "width",
            CurveId::Thalweg => "thalweg",
            CurveId::FloodplainLeft => "floodplain_left",
            CurveId::FloodplainRight => "floodplain_right",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Independent variables for one station, as seen by a curve.
#[derive(Debug, Clone, Copy)]
pub struct StationVars {
    /// Linear (down-valley) position.
    pub linear: f64,
    /// Angle argument handed to periodic terms.
    pub angle: f64,
}

impl StationVars {
    /// Both variables equal: the common case for curves evaluated over
    /// linear position.
    pub fn at(x: f64) -> Self {
        Self { linear: x, angle: x }
    }
}

/// All six named curves plus the shared random stream.
///
/// Smoothed-noise anchor state is kept per curve so that curves sharing
/// the stream do not cross-contaminate each other's interpolation. Because
/// the stream itself is shared, evaluation must visit stations in
/// increasing order for every curve carrying a `Noise` term.
#[derive(Debug, Clone)]
pub struct CurveSet {
    terms: [Vec<VaryFn>; 6],
    noise: [NoiseState; 6],
    lcg: Lcg,
}

impl CurveSet {
    /// Creates an empty curve set drawing from a stream seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            terms: std::array::from_fn(|_| Vec::new()),
            noise: std::array::from_fn(|_| NoiseState::default()),
            lcg: Lcg::new(seed),
        }
    }

    /// Appends a term to a curve.
    pub fn attach(&mut self, id: CurveId, f: VaryFn) {
        self.terms[id.index()].push(f);
    }

    /// Returns the terms attached to a curve.
    pub fn terms(&self, id: CurveId) -> &[VaryFn] {
        &self.terms[id.index()]
    }

    /// Returns the first term of a curve, if any.
    pub fn first_term(&self, id: CurveId) -> Option<&VaryFn> {
        self.terms[id.index()].first()
    }

    /// Evaluates a curve at one station, summing every attached term.
    ///
    /// `Noise` terms advance the shared stream; see the type-level note on
    /// evaluation order.
    pub fn evaluate(&mut self, id: CurveId, vars: StationVars) -> f64 {
        let idx = id.index();
        let state = &mut self.noise[idx];
        let lcg = &mut self.lcg;
        let mut total = 0.0;
        for term in &self.terms[idx] {
            total += match *term {
                VaryFn::Sin { amplitude, frequency, phase } => {
                    amplitude * (frequency * vars.angle + phase).sin()
                }
                VaryFn::Cos { amplitude, frequency, phase } => {
                    amplitude * (frequency * vars.angle + phase).cos()
                }
                VaryFn::SinSq { amplitude, frequency, phase } => {
                    let s = (frequency * vars.angle + phase).sin();
                    amplitude * s * s
                }
                VaryFn::Line { slope, intercept } => slope * vars.linear + intercept,
                VaryFn::Noise { amplitude, wavelength } => {
                    sample_smoothed(state, lcg, amplitude, wavelength, vars.linear)
                }
            };
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_curve_evaluates_to_zero() {
        let mut curves = CurveSet::new(1);
        assert_eq!(curves.evaluate(CurveId::Meander, StationVars::at(3.0)), 0.0);
    }

    #[test]
    fn test_sum_of_terms() {
        let mut curves = CurveSet::new(1);
        curves.attach(
            CurveId::Width,
            VaryFn::Sin { amplitude: 2.0, frequency: 1.0, phase: 0.0 },
        );
        curves.attach(CurveId::Width, VaryFn::Line { slope: 0.5, intercept: 1.0 });

        let v = curves.evaluate(CurveId::Width, StationVars::at(PI / 2.0));
        let expected = 2.0 + 0.5 * PI / 2.0 + 1.0;
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_line_uses_linear_not_angle() {
        let mut curves = CurveSet::new(1);
        curves.attach(CurveId::Thalweg, VaryFn::Line { slope: 1.0, intercept: 0.0 });

        let vars = StationVars { linear: 3.0, angle: 100.0 };
        assert_eq!(curves.evaluate(CurveId::Thalweg, vars), 3.0);
    }

    #[test]
    fn test_sin_sq() {
        let mut curves = CurveSet::new(1);
        curves.attach(
            CurveId::Alignment,
            VaryFn::SinSq { amplitude: 3.0, frequency: 1.0, phase: 0.0 },
        );
        let v = curves.evaluate(CurveId::Alignment, StationVars::at(PI / 2.0));
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_noise_state_isolated_per_curve() {
        let mut curves = CurveSet::new(5);
        let noise = VaryFn::Noise { amplitude: 1.0, wavelength: 10.0 };
        curves.attach(CurveId::FloodplainLeft, noise);
        curves.attach(CurveId::FloodplainRight, noise);

        // Seed both curves' anchors at x = 0.
        curves.evaluate(CurveId::FloodplainLeft, StationVars::at(0.0));
        curves.evaluate(CurveId::FloodplainRight, StationVars::at(0.0));

        // The right curve crossing a wavelength boundary redraws ITS
        // anchors; the left curve's interpolation must be unaffected.
        let l1 = curves.evaluate(CurveId::FloodplainLeft, StationVars::at(4.0));
        curves.evaluate(CurveId::FloodplainRight, StationVars::at(10.0));
        let l2 = curves.evaluate(CurveId::FloodplainLeft, StationVars::at(4.0));
        assert_eq!(l1, l2);
    }

    #[test]
    fn test_periodic_derivatives() {
        let f = VaryFn::Sin { amplitude: 2.0, frequency: 3.0, phase: 0.5 };
        let d1 = f.d1(1.0).unwrap();
        let d2 = f.d2(1.0).unwrap();
        assert!((d1 - 2.0 * 3.0 * (3.0f64 + 0.5).cos()).abs() < 1e-12);
        assert!((d2 + 2.0 * 9.0 * (3.0f64 + 0.5).sin()).abs() < 1e-12);

        let line = VaryFn::Line { slope: 1.0, intercept: 0.0 };
        assert!(line.d1(1.0).is_none());
        assert!(line.d2(1.0).is_none());
    }
}
