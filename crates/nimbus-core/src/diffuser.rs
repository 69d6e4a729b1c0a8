//! Series all-pass diffuser with seeded per-stage detuning.
//!
//! Chains up to [`MAX_STAGE_COUNT`] modulated all-pass stages. Each stage is
//! individually detuned from the seeded vector generator so that no two
//! stages share a delay length or modulation trajectory — identical stages
//! in series produce periodic comb resonances, detuned ones a smooth smear.
//!
//! Per reseed, 3 values per stage are drawn from one cross-seeded vector:
//! delay scale (log-spaced, 0.1x–1.0x of the nominal delay), modulation
//! amount jitter and modulation rate jitter (both +/-15%).

use crate::modulated_allpass::ModulatedAllpass;
use crate::rand_seq;
use libm::powf;

/// Maximum number of all-pass stages in the chain.
pub const MAX_STAGE_COUNT: usize = 12;

const SEED_VALUE_COUNT: usize = MAX_STAGE_COUNT * 3;

/// Chain of detuned modulated all-pass stages.
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    stages: [ModulatedAllpass; MAX_STAGE_COUNT],
    sample_rate: f32,
    delay_samples: usize,
    mod_amount: f32,
    mod_rate_hz: f32,
    seed: u32,
    cross_seed: f32,
    seed_values: [f32; SEED_VALUE_COUNT],

    /// Number of active stages, 1..=[`MAX_STAGE_COUNT`].
    pub active_stages: usize,
}

impl AllpassDiffuser {
    /// Create a diffuser at the given sample rate.
    ///
    /// Stage LFO phases are spread deterministically across [0, 1) so the
    /// stages never modulate in unison.
    pub fn new(sample_rate: f32) -> Self {
        let stages = core::array::from_fn(|i| {
            ModulatedAllpass::new(0.01 + 0.98 * i as f32 / MAX_STAGE_COUNT as f32)
        });

        let mut diffuser = Self {
            stages,
            sample_rate,
            delay_samples: 100,
            mod_amount: 0.0,
            mod_rate_hz: 0.0,
            seed: 23456,
            cross_seed: 0.0,
            seed_values: [0.0; SEED_VALUE_COUNT],
            active_stages: 1,
        };
        diffuser.update_seeds();
        diffuser
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Update the sample rate; per-stage modulation rates are re-derived.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_mod_rate(self.mod_rate_hz);
    }

    /// Reseed and re-derive every per-stage parameter.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.update_seeds();
    }

    /// Change the cross-seed blend and re-derive every per-stage parameter.
    pub fn set_cross_seed(&mut self, cross_seed: f32) {
        self.cross_seed = cross_seed;
        self.update_seeds();
    }

    /// Whether stage modulation is running.
    pub fn modulation_enabled(&self) -> bool {
        self.stages[0].modulation_enabled
    }

    /// Enable or disable modulation on every stage.
    pub fn set_modulation_enabled(&mut self, enabled: bool) {
        for stage in &mut self.stages {
            stage.modulation_enabled = enabled;
        }
    }

    /// Enable or disable fractional-tap interpolation on every stage.
    pub fn set_interpolation_enabled(&mut self, enabled: bool) {
        for stage in &mut self.stages {
            stage.interpolation_enabled = enabled;
        }
    }

    /// Set the nominal stage delay; each stage gets a log-spaced share.
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples;
        self.update_stage_delays();
    }

    /// Set the all-pass feedback on every stage.
    pub fn set_feedback(&mut self, feedback: f32) {
        for stage in &mut self.stages {
            stage.feedback = feedback;
        }
    }

    /// Set the modulation depth in samples, jittered +/-15% per stage.
    pub fn set_mod_amount(&mut self, amount: f32) {
        self.mod_amount = amount;
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.mod_amount = amount * (0.85 + 0.3 * self.seed_values[MAX_STAGE_COUNT + i]);
        }
    }

    /// Set the modulation rate in Hz, jittered +/-15% per stage and
    /// converted to cycles per sample.
    pub fn set_mod_rate(&mut self, rate_hz: f32) {
        self.mod_rate_hz = rate_hz;
        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.mod_rate = rate_hz * (0.85 + 0.3 * self.seed_values[MAX_STAGE_COUNT * 2 + i])
                / self.sample_rate;
        }
    }

    /// Process a block in place through the active stages in series.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        let active = self.active_stages.clamp(1, MAX_STAGE_COUNT);
        for stage in &mut self.stages[..active] {
            stage.process_block(buffer);
        }
    }

    /// Zero every stage buffer.
    pub fn clear(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
    }

    fn update_stage_delays(&mut self) {
        for (i, stage) in self.stages.iter_mut().enumerate() {
            let r = self.seed_values[i];
            let scale = powf(10.0, r) * 0.1; // log-spaced 0.1 .. 1.0
            stage.sample_delay = (self.delay_samples as f32 * scale) as usize;
        }
    }

    fn update_seeds(&mut self) {
        rand_seq::generate_cross_into(self.seed, self.cross_seed, &mut self.seed_values);
        self.update_stage_delays();
        self.set_mod_amount(self.mod_amount);
        self.set_mod_rate(self.mod_rate_hz);
    }
}
