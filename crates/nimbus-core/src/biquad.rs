//! Second-order IIR filter with nine selectable responses.
//!
//! Coefficients follow the bilinear-transform design with `K = tan(π·fc/fs)`
//! (earlevel formulation). The response set is closed and selected by a
//! runtime tag; there is no dispatch beyond a match in `update`.
//!
//! For the gain-adjustable types (peak and shelves) the boost and cut
//! branches use *swapped* normalization denominators: the cut branch moves
//! the gain-dependent term into the normalization factor, the boost branch
//! does not. This is deliberate — the parameter-to-effect mapping of the
//! whole engine (and every shipped preset) depends on this exact behavior,
//! so both branches are kept as separate formula sets. Do not fold them into
//! one formula with a sign flip.

use libm::{expf, log10f, powf, sinf, sqrtf, tanf};

use core::f32::consts::PI;

/// Filter response selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// 6 dB/oct one-pole low-pass realized in biquad form.
    LowPass6dB,
    /// 6 dB/oct one-pole high-pass realized in biquad form.
    HighPass6dB,
    /// 12 dB/oct low-pass.
    LowPass,
    /// 12 dB/oct high-pass.
    HighPass,
    /// Band-pass.
    BandPass,
    /// Band-reject.
    Notch,
    /// Peaking EQ with adjustable gain and Q.
    Peak,
    /// Low shelf with adjustable gain.
    LowShelf,
    /// High shelf with adjustable gain.
    HighShelf,
}

/// Second-order IIR filter.
///
/// Processing is a direct-form recurrence over the two most recent inputs
/// and outputs. Coefficients are re-derived whenever kind, frequency, gain,
/// Q, or sample rate changes.
///
/// # Example
///
/// ```rust
/// use nimbus_core::{Biquad, FilterKind};
///
/// let mut shelf = Biquad::new(FilterKind::LowShelf, 48000.0);
/// shelf.set_frequency(200.0);
/// shelf.set_gain_db(-6.0);
/// let y = shelf.process(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    kind: FilterKind,
    sample_rate: f32,
    frequency: f32,
    gain_db: f32,
    gain: f32,
    q: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Create a filter of the given kind, defaulting to fs/4 center
    /// frequency, 0 dB gain, and Q = 0.5.
    pub fn new(kind: FilterKind, sample_rate: f32) -> Self {
        let mut filter = Self {
            kind,
            sample_rate,
            frequency: sample_rate * 0.25,
            gain_db: 0.0,
            gain: 1.0,
            q: 0.5,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.update();
        filter
    }

    /// Current response kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Current center/cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set the center/cutoff frequency and re-derive coefficients.
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz;
        self.update();
    }

    /// Update the sample rate and re-derive coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update();
    }

    /// Current gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Current linear gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set the gain in dB, clamped to ±60 dB.
    pub fn set_gain_db(&mut self, db: f32) {
        let db = db.clamp(-60.0, 60.0);
        self.gain_db = db;
        self.gain = powf(10.0, db / 20.0);
        self.update();
    }

    /// Set the linear gain, clamped to [0.001, 1000] (±60 dB).
    pub fn set_gain(&mut self, gain: f32) {
        let gain = gain.clamp(0.001, 1000.0);
        self.gain = gain;
        self.gain_db = log10f(gain) * 20.0;
        self.update();
    }

    /// Current Q factor.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Set the Q factor, floored at 0.001.
    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.001);
        self.update();
    }

    /// Zero the filter state without touching coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Voltage gain of the current coefficients at `freq` Hz.
    ///
    /// Evaluates the squared-magnitude transfer function at
    /// `phi = sin²(2π·f / (2·fs))` and returns its square root, converting
    /// the power gain into a voltage gain.
    pub fn response_at(&self, freq: f32) -> f32 {
        let phi = powf(sinf(2.0 * PI * freq / (2.0 * self.sample_rate)), 2.0);
        let (b0, b1, b2) = (self.b0, self.b1, self.b2);
        let (a1, a2) = (self.a1, self.a2);

        let num = powf(b0 + b1 + b2, 2.0) - 4.0 * (b0 * b1 + 4.0 * b0 * b2 + b1 * b2) * phi
            + 16.0 * b0 * b2 * phi * phi;
        let den = powf(1.0 + a1 + a2, 2.0) - 4.0 * (a1 + 4.0 * a2 + a1 * a2) * phi
            + 16.0 * a2 * phi * phi;

        sqrtf(num / den)
    }

    fn update(&mut self) {
        let fc = self.frequency;
        let fs_inv = 1.0 / self.sample_rate;
        let v = powf(10.0, self.gain_db.abs() / 20.0);
        let k = tanf(PI * fc * fs_inv);
        let q = self.q;
        let sqrt2 = sqrtf(2.0);

        match self.kind {
            FilterKind::LowPass6dB => {
                self.a1 = -expf(-2.0 * PI * fc * fs_inv);
                self.b0 = 1.0 + self.a1;
                self.b1 = 0.0;
                self.b2 = 0.0;
                self.a2 = 0.0;
            }
            FilterKind::HighPass6dB => {
                self.a1 = -expf(-2.0 * PI * fc * fs_inv);
                self.b0 = self.a1;
                self.b1 = -self.a1;
                self.b2 = 0.0;
                self.a2 = 0.0;
            }
            FilterKind::LowPass => {
                let norm = 1.0 / (1.0 + k / q + k * k);
                self.b0 = k * k * norm;
                self.b1 = 2.0 * self.b0;
                self.b2 = self.b0;
                self.a1 = 2.0 * (k * k - 1.0) * norm;
                self.a2 = (1.0 - k / q + k * k) * norm;
            }
            FilterKind::HighPass => {
                let norm = 1.0 / (1.0 + k / q + k * k);
                self.b0 = norm;
                self.b1 = -2.0 * self.b0;
                self.b2 = self.b0;
                self.a1 = 2.0 * (k * k - 1.0) * norm;
                self.a2 = (1.0 - k / q + k * k) * norm;
            }
            FilterKind::BandPass => {
                let norm = 1.0 / (1.0 + k / q + k * k);
                self.b0 = k / q * norm;
                self.b1 = 0.0;
                self.b2 = -self.b0;
                self.a1 = 2.0 * (k * k - 1.0) * norm;
                self.a2 = (1.0 - k / q + k * k) * norm;
            }
            FilterKind::Notch => {
                let norm = 1.0 / (1.0 + k / q + k * k);
                self.b0 = (1.0 + k * k) * norm;
                self.b1 = 2.0 * (k * k - 1.0) * norm;
                self.b2 = self.b0;
                self.a1 = self.b1;
                self.a2 = (1.0 - k / q + k * k) * norm;
            }
            FilterKind::Peak => {
                // Boost and cut keep separate formula sets; the cut branch
                // carries the gain term in the normalization denominator.
                if self.gain_db >= 0.0 {
                    let norm = 1.0 / (1.0 + 1.0 / q * k + k * k);
                    self.b0 = (1.0 + v / q * k + k * k) * norm;
                    self.b1 = 2.0 * (k * k - 1.0) * norm;
                    self.b2 = (1.0 - v / q * k + k * k) * norm;
                    self.a1 = self.b1;
                    self.a2 = (1.0 - 1.0 / q * k + k * k) * norm;
                } else {
                    let norm = 1.0 / (1.0 + v / q * k + k * k);
                    self.b0 = (1.0 + 1.0 / q * k + k * k) * norm;
                    self.b1 = 2.0 * (k * k - 1.0) * norm;
                    self.b2 = (1.0 - 1.0 / q * k + k * k) * norm;
                    self.a1 = self.b1;
                    self.a2 = (1.0 - v / q * k + k * k) * norm;
                }
            }
            FilterKind::LowShelf => {
                if self.gain_db >= 0.0 {
                    let norm = 1.0 / (1.0 + sqrt2 * k + k * k);
                    self.b0 = (1.0 + sqrtf(2.0 * v) * k + v * k * k) * norm;
                    self.b1 = 2.0 * (v * k * k - 1.0) * norm;
                    self.b2 = (1.0 - sqrtf(2.0 * v) * k + v * k * k) * norm;
                    self.a1 = 2.0 * (k * k - 1.0) * norm;
                    self.a2 = (1.0 - sqrt2 * k + k * k) * norm;
                } else {
                    let norm = 1.0 / (1.0 + sqrtf(2.0 * v) * k + v * k * k);
                    self.b0 = (1.0 + sqrt2 * k + k * k) * norm;
                    self.b1 = 2.0 * (k * k - 1.0) * norm;
                    self.b2 = (1.0 - sqrt2 * k + k * k) * norm;
                    self.a1 = 2.0 * (v * k * k - 1.0) * norm;
                    self.a2 = (1.0 - sqrtf(2.0 * v) * k + v * k * k) * norm;
                }
            }
            FilterKind::HighShelf => {
                if self.gain_db >= 0.0 {
                    let norm = 1.0 / (1.0 + sqrt2 * k + k * k);
                    self.b0 = (v + sqrtf(2.0 * v) * k + k * k) * norm;
                    self.b1 = 2.0 * (k * k - v) * norm;
                    self.b2 = (v - sqrtf(2.0 * v) * k + k * k) * norm;
                    self.a1 = 2.0 * (k * k - 1.0) * norm;
                    self.a2 = (1.0 - sqrt2 * k + k * k) * norm;
                } else {
                    let norm = 1.0 / (v + sqrtf(2.0 * v) * k + k * k);
                    self.b0 = (1.0 + sqrt2 * k + k * k) * norm;
                    self.b1 = 2.0 * (k * k - 1.0) * norm;
                    self.b2 = (1.0 - sqrt2 * k + k * k) * norm;
                    self.a1 = 2.0 * (k * k - v) * norm;
                    self.a2 = (v - sqrtf(2.0 * v) * k + k * k) * norm;
                }
            }
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let y = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.y2 = self.y1;
        self.x1 = input;
        self.y1 = y;
        y
    }

    /// Process a block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
