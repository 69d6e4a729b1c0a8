//! Feedback all-pass filter with an LFO-modulated fractional delay tap.
//!
//! The workhorse of the diffuser chain. Runs in one of two modes:
//!
//! - **Unmodulated**: integer tap, classic all-pass recurrence.
//! - **Modulated**: the tap position drifts with a sine LFO, recomputed every
//!   [`MODULATION_UPDATE_RATE`](crate::modulated_delay::MODULATION_UPDATE_RATE)
//!   samples, read through two-tap linear interpolation (or the floor tap
//!   alone when interpolation is disabled).
//!
//! The recurrence in both modes:
//!
//! ```text
//! buf_out = buffer[read]
//! in'     = input + buf_out·feedback
//! output  = buf_out − in'·feedback
//! buffer[write] = in'
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::modulated_delay::MODULATION_UPDATE_RATE;
use libm::sinf;

/// Buffer capacity: 100 ms at the 192 kHz reference rate. The tap delay is
/// clamped two samples short of this on every LFO update, so an over-range
/// delay plus modulation reads a shortened tap instead of leaving the
/// buffer.
pub const DELAY_BUFFER_SIZE: usize = 19_200;

/// Modulated all-pass stage.
#[derive(Debug, Clone)]
pub struct ModulatedAllpass {
    buffer: Vec<f32>,
    index: usize,
    samples_processed: u64,

    mod_phase: f32,
    delay_a: usize,
    delay_b: usize,
    gain_a: f32,
    gain_b: f32,

    /// Nominal delay in samples.
    pub sample_delay: usize,
    /// All-pass feedback coefficient.
    pub feedback: f32,
    /// Modulation depth in samples. Clamped below `sample_delay` when the
    /// LFO is evaluated so the effective delay can never go negative.
    pub mod_amount: f32,
    /// Modulation rate in cycles per sample.
    pub mod_rate: f32,

    /// Use two-tap interpolation for fractional delays.
    pub interpolation_enabled: bool,
    /// Run the LFO; when false the integer path is used.
    pub modulation_enabled: bool,
}

impl ModulatedAllpass {
    /// Create a stage with a deterministic initial LFO phase in [0, 1).
    pub fn new(initial_phase: f32) -> Self {
        let mut stage = Self {
            buffer: vec![0.0; DELAY_BUFFER_SIZE],
            index: DELAY_BUFFER_SIZE - 1,
            samples_processed: 0,
            mod_phase: initial_phase.rem_euclid(1.0),
            delay_a: 0,
            delay_b: 0,
            gain_a: 0.0,
            gain_b: 0.0,
            sample_delay: 100,
            feedback: 0.5,
            mod_amount: 0.0,
            mod_rate: 0.0,
            interpolation_enabled: true,
            modulation_enabled: true,
        };
        stage.update();
        stage
    }

    /// Process a block in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        if self.modulation_enabled {
            self.process_modulated(buffer);
        } else {
            self.process_unmodulated(buffer);
        }
    }

    /// Zero-fill the buffer; pointer state is untouched.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    fn process_unmodulated(&mut self, block: &mut [f32]) {
        let len = self.buffer.len();
        let delay = self.sample_delay.min(len - 1);
        let mut delayed_index = (self.index + len - delay) % len;

        for sample in block.iter_mut() {
            let buf_out = self.buffer[delayed_index];
            let in_val = *sample + buf_out * self.feedback;

            self.buffer[self.index] = in_val;
            *sample = buf_out - in_val * self.feedback;

            self.index += 1;
            delayed_index += 1;
            if self.index >= len {
                self.index -= len;
            }
            if delayed_index >= len {
                delayed_index -= len;
            }
            self.samples_processed += 1;
        }
    }

    fn process_modulated(&mut self, block: &mut [f32]) {
        let len = self.buffer.len();

        for sample in block.iter_mut() {
            if self.samples_processed >= MODULATION_UPDATE_RATE {
                self.update();
                self.samples_processed = 0;
            }

            let buf_out = if self.interpolation_enabled {
                let idx_a = (self.index + len - self.delay_a) % len;
                let idx_b = (self.index + len - self.delay_b) % len;
                self.buffer[idx_a] * self.gain_a + self.buffer[idx_b] * self.gain_b
            } else {
                let idx_a = (self.index + len - self.delay_a) % len;
                self.buffer[idx_a]
            };

            let in_val = *sample + buf_out * self.feedback;
            self.buffer[self.index] = in_val;
            *sample = buf_out - in_val * self.feedback;

            self.index += 1;
            if self.index >= len {
                self.index -= len;
            }
            self.samples_processed += 1;
        }
    }

    fn update(&mut self) {
        self.mod_phase += self.mod_rate * MODULATION_UPDATE_RATE as f32;
        if self.mod_phase > 1.0 {
            self.mod_phase = self.mod_phase.rem_euclid(1.0);
        }

        let lfo = sinf(self.mod_phase * core::f32::consts::TAU);

        // Never modulate past the nominal delay into negative territory.
        if self.mod_amount >= self.sample_delay as f32 {
            self.mod_amount = self.sample_delay as f32 - 1.0;
        }

        let mut total_delay = self.sample_delay as f32 + self.mod_amount * lfo;
        if total_delay <= 0.0 {
            total_delay = 1.0;
        }
        // Both interpolation taps (floor and floor + 1) must stay inside
        // the ring buffer.
        let max_delay = (DELAY_BUFFER_SIZE - 2) as f32;
        if total_delay > max_delay {
            total_delay = max_delay;
        }

        self.delay_a = total_delay as usize;
        self.delay_b = self.delay_a + 1;

        let partial = total_delay - self.delay_a as f32;
        self.gain_a = 1.0 - partial;
        self.gain_b = partial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response_starts_with_negative_feedback_term() {
        let mut ap = ModulatedAllpass::new(0.0);
        ap.sample_delay = 10;
        ap.feedback = 0.5;
        ap.modulation_enabled = false;

        let mut block = [0.0f32; 32];
        block[0] = 1.0;
        ap.process_block(&mut block);

        // First output: buf_out = 0, in' = 1, y = -0.5.
        assert!((block[0] - (-0.5)).abs() < 1e-6);
        // Delayed impulse arrives after sample_delay samples:
        // y = 1 - 0.5·0.5 = 0.75.
        assert!((block[10] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn energy_stays_bounded_for_stable_feedback() {
        let mut ap = ModulatedAllpass::new(0.3);
        ap.sample_delay = 300;
        ap.feedback = 0.7;
        ap.mod_amount = 20.0;
        ap.mod_rate = 0.002;

        for _ in 0..500 {
            let mut block = [0.1f32; 64];
            ap.process_block(&mut block);
            for &s in &block {
                assert!(s.is_finite());
                assert!(s.abs() < 10.0, "all-pass output diverged: {s}");
            }
        }
    }

    #[test]
    fn modulation_depth_clamped_below_delay() {
        let mut ap = ModulatedAllpass::new(0.0);
        ap.sample_delay = 20;
        ap.mod_amount = 100.0; // exceeds the nominal delay
        ap.mod_rate = 0.01;

        for _ in 0..50 {
            let mut block = [0.5f32; 64];
            ap.process_block(&mut block);
            for &s in &block {
                assert!(s.is_finite());
            }
        }
        assert!(ap.mod_amount < 20.0);
    }

    #[test]
    fn delay_at_buffer_capacity_stays_in_bounds() {
        // A nominal delay at full buffer capacity plus positive modulation
        // must clamp to the buffer, not wrap or index past it.
        let mut ap = ModulatedAllpass::new(0.25);
        ap.sample_delay = DELAY_BUFFER_SIZE;
        ap.mod_amount = 480.0;
        ap.mod_rate = 0.01;
        ap.feedback = 0.7;

        let mut block = [0.0f32; 256];
        block[0] = 1.0;
        ap.process_block(&mut block);
        assert!(block.iter().all(|s| s.is_finite()));
        assert!(ap.delay_b < DELAY_BUFFER_SIZE);

        ap.modulation_enabled = false;
        let mut more = [0.5f32; 256];
        ap.process_block(&mut more);
        assert!(more.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn interpolation_disabled_uses_floor_tap() {
        let run = |interp: bool| -> [f32; 128] {
            let mut ap = ModulatedAllpass::new(0.37);
            ap.sample_delay = 40;
            ap.mod_amount = 5.0;
            ap.mod_rate = 0.005;
            ap.interpolation_enabled = interp;
            let mut block = [0.0f32; 128];
            block[0] = 1.0;
            ap.process_block(&mut block);
            block
        };

        let smooth = run(true);
        let stepped = run(false);
        assert_ne!(smooth, stepped, "interpolation flag must change the output");
    }

    #[test]
    fn clear_preserves_pointer_state() {
        let mut ap = ModulatedAllpass::new(0.0);
        ap.sample_delay = 15;
        ap.modulation_enabled = false;

        let mut block = [1.0f32; 64];
        ap.process_block(&mut block);
        ap.clear();

        // Cleared buffer, zero input: output must be exactly silent.
        let mut silent = [0.0f32; 64];
        ap.process_block(&mut silent);
        assert!(silent.iter().all(|&s| s == 0.0));
    }
}
