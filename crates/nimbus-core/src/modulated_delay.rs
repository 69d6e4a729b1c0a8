//! Plain fractional delay with LFO-modulated tap position.
//!
//! No feedback — the output is just the delayed sample, read through a
//! two-tap linear interpolator whose position drifts with a sine LFO. Used
//! for pre-delay and for the per-line timing jitter of the feedback network.
//!
//! The LFO is recomputed once every [`MODULATION_UPDATE_RATE`] samples
//! rather than per sample; the read pointers stay fixed between updates.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use libm::sinf;

/// Samples between LFO recomputations.
pub const MODULATION_UPDATE_RATE: u64 = 8;

/// Delay buffer capacity: 2 seconds at the 192 kHz reference rate. This
/// bounds the maximum supported delay at any realistic sample rate.
pub const DELAY_BUFFER_SIZE: usize = 192_000 * 2;

/// Modulated fractional delay without feedback.
#[derive(Debug, Clone)]
pub struct ModulatedDelay {
    buffer: Vec<f32>,
    write_index: usize,
    read_index_a: usize,
    read_index_b: usize,
    samples_processed: u64,

    mod_phase: f32,
    gain_a: f32,
    gain_b: f32,

    /// Nominal delay in samples.
    pub sample_delay: usize,
    /// Modulation depth in samples.
    pub mod_amount: f32,
    /// Modulation rate in cycles per sample.
    pub mod_rate: f32,
}

impl ModulatedDelay {
    /// Create a delay with a deterministic initial LFO phase in [0, 1).
    ///
    /// Callers that own several instances should hand each a distinct phase
    /// so their modulation never lines up.
    pub fn new(initial_phase: f32) -> Self {
        let mut delay = Self {
            buffer: vec![0.0; DELAY_BUFFER_SIZE],
            write_index: 0,
            read_index_a: 0,
            read_index_b: 0,
            samples_processed: 0,
            mod_phase: initial_phase.rem_euclid(1.0),
            gain_a: 0.0,
            gain_b: 0.0,
            sample_delay: 100,
            mod_amount: 0.0,
            mod_rate: 0.0,
        };
        delay.update();
        delay
    }

    /// Process a block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        let len = self.buffer.len();
        for sample in buffer.iter_mut() {
            if self.samples_processed >= MODULATION_UPDATE_RATE {
                self.update();
                self.samples_processed = 0;
            }

            self.buffer[self.write_index] = *sample;
            *sample = self.buffer[self.read_index_a] * self.gain_a
                + self.buffer[self.read_index_b] * self.gain_b;

            self.write_index += 1;
            self.read_index_a += 1;
            self.read_index_b += 1;
            if self.write_index >= len {
                self.write_index -= len;
            }
            if self.read_index_a >= len {
                self.read_index_a -= len;
            }
            if self.read_index_b >= len {
                self.read_index_b -= len;
            }
            self.samples_processed += 1;
        }
    }

    /// Zero-fill the buffer; pointer state is untouched.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    fn update(&mut self) {
        self.mod_phase += self.mod_rate * MODULATION_UPDATE_RATE as f32;
        if self.mod_phase > 1.0 {
            self.mod_phase = self.mod_phase.rem_euclid(1.0);
        }

        let lfo = sinf(self.mod_phase * core::f32::consts::TAU);
        let total_delay = self.sample_delay as f32 + self.mod_amount * lfo;

        let delay_a = total_delay as usize;
        let delay_b = delay_a + 1;
        let partial = total_delay - delay_a as f32;

        self.gain_a = 1.0 - partial;
        self.gain_b = partial;

        let len = self.buffer.len();
        self.read_index_a = (self.write_index + len - delay_a % len) % len;
        self.read_index_b = (self.write_index + len - delay_b % len) % len;
    }
}
