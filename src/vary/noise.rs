//! Smoothed pseudo-random noise with persistent anchor state.
//!
//! The generator interpolates between two random anchors with a cosine
//! ease, redrawing the pair each time the sample position crosses a
//! wavelength boundary. The anchor pair lives on the owning curve so that
//! several curves can share one random stream without contaminating each
//! other's interpolation state.

/// Linear-congruential generator backing every smoothed-noise term.
///
/// Uses the ANSI C constants. All curves draw from one shared stream, so
/// the order in which curves are evaluated is part of the reproducibility
/// contract.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Creates a generator from a seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Returns the next value in `[0, 1]`.
    pub fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345)
            & 0x7fff_ffff;
        ((self.state >> 16) & 0x7fff) as f64 / 32_767.0
    }
}

/// Interpolation anchors for one curve's smoothed-noise terms.
///
/// `cell` is the index of the wavelength interval the previous sample fell
/// in; a change of cell triggers a fresh anchor draw.
#[derive(Debug, Clone, Default)]
pub struct NoiseState {
    cell: Option<i64>,
    a: f64,
    b: f64,
}

/// Cosine-eased interpolation between two anchors, `t` in `[0, 1]`.
fn ease(p0: f64, p1: f64, t: f64) -> f64 {
    let f = (1.0 - (t * std::f64::consts::PI).cos()) / 2.0;
    p0 * (1.0 - f) + p1 * f
}

/// Samples the smoothed-noise term at linear position `x`.
///
/// Mutates both the per-curve anchor state and the shared generator, which
/// makes sampling order-sensitive: stations must be visited in increasing
/// order for results to be reproducible.
pub fn sample_smoothed(
    state: &mut NoiseState,
    lcg: &mut Lcg,
    amplitude: f64,
    wavelength: f64,
    x: f64,
) -> f64 {
    let phase = x / wavelength;
    let cell = phase.floor() as i64;
    if state.cell != Some(cell) {
        state.a = lcg.next_unit();
        state.b = lcg.next_unit();
        state.cell = Some(cell);
        return 2.0 * state.a * amplitude;
    }
    let t = phase - cell as f64;
    2.0 * amplitude * ease(state.a, state.b, t)
}
