//! One-pole filter for damping and input conditioning.
//!
//! A single-coefficient 6 dB/octave filter with the difference equation
//!
//! ```text
//! y[n] = b0·x[n] + a1·y[n-1]
//! ```
//!
//! where the coefficients come from a pole-matching design rather than the
//! usual `exp` approximation: `nn = 2 − cos(2π·fc/fs)`,
//! `a1 = nn − sqrt(nn² − 1)`, `b0 = 1 − a1`. The high-pass variant subtracts
//! the low-pass output from the input.
//!
//! Used for per-line high-frequency damping inside the feedback delay
//! network and for low/high-cut conditioning on the channel input.

use libm::{cosf, sqrtf};

/// Filter response of a [`OnePole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnePoleKind {
    /// 6 dB/oct low-pass.
    #[default]
    LowPass,
    /// 6 dB/oct high-pass (input minus the low-pass output).
    HighPass,
}

/// One-pole low/high-pass filter.
///
/// # Invariants
///
/// - The cutoff is clamped below Nyquist (0.499·fs) when coefficients are
///   derived, never rejected.
/// - When the input is exactly zero and the state magnitude has decayed
///   below 1e-7, the state snaps to exactly zero so silence stays silence
///   instead of trailing off through the denormal range.
#[derive(Debug, Clone)]
pub struct OnePole {
    kind: OnePoleKind,
    sample_rate: f32,
    cutoff_hz: f32,
    b0: f32,
    a1: f32,
    state: f32,
}

impl OnePole {
    /// Create a filter at the given sample rate and cutoff.
    pub fn new(kind: OnePoleKind, sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            kind,
            sample_rate,
            cutoff_hz,
            b0: 1.0,
            a1: 0.0,
            state: 0.0,
        };
        filter.update();
        filter
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    /// Set the cutoff frequency and re-derive coefficients.
    pub fn set_cutoff_hz(&mut self, hz: f32) {
        self.cutoff_hz = hz;
        self.update();
    }

    /// Update the sample rate and re-derive coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update();
    }

    /// Zero the filter state without touching coefficients.
    pub fn clear(&mut self) {
        self.state = 0.0;
    }

    fn update(&mut self) {
        let mut cutoff = self.cutoff_hz;
        if cutoff >= self.sample_rate * 0.5 {
            cutoff = self.sample_rate * 0.499;
        }

        let x = core::f32::consts::TAU * cutoff / self.sample_rate;
        let nn = 2.0 - cosf(x);
        let alpha = nn - sqrtf(nn * nn - 1.0);

        self.a1 = alpha;
        self.b0 = 1.0 - alpha;
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if input == 0.0 && self.state.abs() < 1e-7 {
            self.state = 0.0;
        } else {
            self.state = self.b0 * input + self.a1 * self.state;
        }

        match self.kind {
            OnePoleKind::LowPass => self.state,
            OnePoleKind::HighPass => input - self.state,
        }
    }

    /// Process a block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
