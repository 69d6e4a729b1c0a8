//! Multi-tap delay producing a dense early-reflection cluster.
//!
//! Up to [`MAX_TAPS`] read taps over one delay buffer. Tap gains, signs and
//! sub-sample position jitter are drawn from the seeded vector generator;
//! tap count, total length and decay are runtime parameters. Positions are
//! rescaled proportionally when count or length changes, so the cluster
//! always spans the configured length.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::math::db_to_gain;
use crate::rand_seq;
use libm::{expf, sqrtf};

/// Maximum number of active taps.
pub const MAX_TAPS: usize = 256;

/// Delay buffer capacity: 2 seconds at the 192 kHz reference rate.
pub const DELAY_BUFFER_SIZE: usize = 192_000 * 2;

const SEED_VALUE_COUNT: usize = MAX_TAPS * 3;

/// Seeded multi-tap delay.
#[derive(Debug, Clone)]
pub struct MultitapDelay {
    buffer: Vec<f32>,
    tap_gains: [f32; MAX_TAPS],
    tap_positions: [f32; MAX_TAPS],
    seed_values: Vec<f32>,

    write_index: usize,
    seed: u32,
    cross_seed: f32,
    count: usize,
    length_samples: f32,
    decay: f32,
}

impl MultitapDelay {
    /// Create a multi-tap delay with default settings (1 tap, 1000 samples).
    pub fn new() -> Self {
        let mut delay = Self {
            buffer: vec![0.0; DELAY_BUFFER_SIZE],
            tap_gains: [0.0; MAX_TAPS],
            tap_positions: [0.0; MAX_TAPS],
            seed_values: vec![0.0; SEED_VALUE_COUNT],
            write_index: 0,
            seed: 0,
            cross_seed: 0.0,
            count: 1,
            length_samples: 1000.0,
            decay: 1.0,
        };
        delay.update_seeds();
        delay
    }

    /// Reseed and redraw every tap's gain, sign, and position jitter.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.update_seeds();
    }

    /// Change the cross-seed blend and redraw the taps.
    pub fn set_cross_seed(&mut self, cross_seed: f32) {
        self.cross_seed = cross_seed;
        self.update_seeds();
    }

    /// Set the number of active taps (clamped to 1..=[`MAX_TAPS`]).
    pub fn set_tap_count(&mut self, count: usize) {
        self.count = count.clamp(1, MAX_TAPS);
    }

    /// Set the total cluster length in samples (floored at 10).
    pub fn set_tap_length(&mut self, length_samples: usize) {
        self.length_samples = length_samples.max(10) as f32;
    }

    /// Set the decay blend in [0, 1]: 0 keeps every tap at full level,
    /// 1 applies the full exponential envelope.
    pub fn set_tap_decay(&mut self, decay: f32) {
        self.decay = decay;
    }

    /// Process a block in place.
    pub fn process_block(&mut self, block: &mut [f32]) {
        let len = self.buffer.len();
        let length_scaler = self.length_samples / self.count as f32;
        // Loudness normalization: denser clusters and stronger decay would
        // otherwise change the perceived level.
        let total_gain = 3.0 / sqrtf(1.0 + self.count as f32) * (1.0 + self.decay * 2.0);

        for sample in block.iter_mut() {
            self.buffer[self.write_index] = *sample;
            let mut acc = 0.0f32;

            for tap in 0..self.count {
                let offset = self.tap_positions[tap] * length_scaler;
                let decay_effective =
                    expf(-offset / self.length_samples * 3.3) * self.decay + (1.0 - self.decay);
                let read_index = (self.write_index + len - offset as usize % len) % len;

                acc += self.buffer[read_index] * self.tap_gains[tap] * decay_effective * total_gain;
            }

            *sample = acc;
            self.write_index = (self.write_index + 1) % len;
        }
    }

    /// Zero-fill the buffer; tap layout is untouched.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    fn update_taps(&mut self) {
        let mut draws = self.seed_values.iter();
        let mut next = || *draws.next().unwrap_or(&0.0);

        for i in 0..MAX_TAPS {
            let sign = if next() < 0.5 { 1.0 } else { -1.0 };
            self.tap_gains[i] = db_to_gain(-20.0 + next() * 20.0) * sign;
            self.tap_positions[i] = i as f32 + next();
        }
    }

    fn update_seeds(&mut self) {
        rand_seq::generate_cross_into(self.seed, self.cross_seed, &mut self.seed_values);
        self.update_taps();
    }
}

impl Default for MultitapDelay {
    fn default() -> Self {
        Self::new()
    }
}
