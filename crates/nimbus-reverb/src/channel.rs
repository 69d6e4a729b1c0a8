//! Full mono reverb processor: early reflections plus the late network.
//!
//! One channel owns the input conditioning filters, pre-delay, multi-tap
//! early reflections, early diffuser, and twelve feedback delay lines. The
//! stereo controller runs two of these with decorrelated seeds; the
//! channel's side decides how the shared cross-seed parameter maps to its
//! own cross-seed value, which is what makes the two channels diverge.

use libm::sqrtf;
use nimbus_core::{
    AllpassDiffuser, ModulatedDelay, MultitapDelay, OnePole, OnePoleKind, db_to_gain, rand_seq,
};

use crate::BLOCK_SIZE;
use crate::delay_line::DelayLine;
use crate::params::Parameter;

/// Delay lines owned by a channel; `LateLineCount` selects how many are
/// summed into the output.
pub const TOTAL_LINE_COUNT: usize = 12;

const LINE_SEED_COUNT: usize = TOTAL_LINE_COUNT * 3;

/// Which side of the stereo pair a channel renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSide {
    /// Left channel: cross-seed `1 − 0.5·x`.
    Left,
    /// Right channel: cross-seed `0.5·x`.
    Right,
}

/// Mono reverb channel.
#[derive(Debug, Clone)]
pub struct ReverbChannel {
    params_scaled: [f32; Parameter::COUNT],
    sample_rate: f32,

    pre_delay: ModulatedDelay,
    multitap: MultitapDelay,
    diffuser: AllpassDiffuser,
    lines: [DelayLine; TOTAL_LINE_COUNT],
    line_seeds: [f32; LINE_SEED_COUNT],
    high_pass: OnePole,
    low_pass: OnePole,

    delay_line_seed: u32,
    post_diffusion_seed: u32,

    line_count: usize,
    low_cut_enabled: bool,
    high_cut_enabled: bool,
    multitap_enabled: bool,
    diffuser_enabled: bool,
    dry_out: f32,
    early_out: f32,
    line_out: f32,
    cross_seed: f32,
    side: ChannelSide,
}

impl ReverbChannel {
    /// Create a channel for one side of the stereo pair.
    pub fn new(sample_rate: f32, side: ChannelSide) -> Self {
        let lines = core::array::from_fn(|i| {
            DelayLine::new(sample_rate, i as f32 / TOTAL_LINE_COUNT as f32)
        });

        let mut channel = Self {
            params_scaled: [0.0; Parameter::COUNT],
            sample_rate,
            pre_delay: ModulatedDelay::new(0.0),
            multitap: MultitapDelay::new(),
            diffuser: AllpassDiffuser::new(sample_rate),
            lines,
            line_seeds: [0.0; LINE_SEED_COUNT],
            high_pass: OnePole::new(OnePoleKind::HighPass, sample_rate, 20.0),
            low_pass: OnePole::new(OnePoleKind::LowPass, sample_rate, 20000.0),
            delay_line_seed: 0,
            post_diffusion_seed: 0,
            line_count: 8,
            low_cut_enabled: false,
            high_cut_enabled: false,
            multitap_enabled: false,
            diffuser_enabled: false,
            dry_out: 0.0,
            early_out: 0.0,
            line_out: 0.0,
            cross_seed: 0.0,
            side,
        };
        channel.diffuser.set_interpolation_enabled(true);
        channel.set_sample_rate(sample_rate);
        channel
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate. This is a discontinuity: every parameter is
    /// reapplied against the new rate and all buffers are cleared.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.high_pass.set_sample_rate(sample_rate);
        self.low_pass.set_sample_rate(sample_rate);
        self.diffuser.set_sample_rate(sample_rate);
        for line in &mut self.lines {
            line.set_sample_rate(sample_rate);
        }

        self.reapply_all_params();
        self.clear();
        self.update_lines();
    }

    fn reapply_all_params(&mut self) {
        for param in Parameter::ALL {
            let scaled = self.params_scaled[param.index()];
            self.set_parameter(param, scaled);
        }
    }

    /// Apply one parameter. `scaled` is the engine-unit value produced by
    /// [`crate::params::scale`], not the normalized one.
    pub fn set_parameter(&mut self, param: Parameter, scaled: f32) {
        self.params_scaled[param.index()] = scaled;

        match param {
            Parameter::Interpolation => {
                for line in &mut self.lines {
                    line.set_interpolation_enabled(scaled >= 0.5);
                }
            }
            Parameter::LowCutEnabled => {
                self.low_cut_enabled = scaled >= 0.5;
                if self.low_cut_enabled {
                    self.high_pass.clear();
                }
            }
            Parameter::HighCutEnabled => {
                self.high_cut_enabled = scaled >= 0.5;
                if self.high_cut_enabled {
                    self.low_pass.clear();
                }
            }
            Parameter::InputMix => {
                // Applied by the controller before the channels run.
            }
            Parameter::LowCut => self.high_pass.set_cutoff_hz(scaled),
            Parameter::HighCut => self.low_pass.set_cutoff_hz(scaled),
            Parameter::DryOut => self.dry_out = Self::level_gain(scaled),
            Parameter::EarlyOut => self.early_out = Self::level_gain(scaled),
            Parameter::LateOut => self.line_out = Self::level_gain(scaled),

            Parameter::TapEnabled => {
                let enabled = scaled >= 0.5;
                if enabled != self.multitap_enabled {
                    self.multitap.clear();
                }
                self.multitap_enabled = enabled;
            }
            Parameter::TapCount => self.multitap.set_tap_count(scaled as usize),
            Parameter::TapDecay => self.multitap.set_tap_decay(scaled),
            Parameter::TapPredelay => {
                self.pre_delay.sample_delay = self.ms_to_samples(scaled) as usize;
            }
            Parameter::TapLength => {
                let samples = self.ms_to_samples(scaled) as usize;
                self.multitap.set_tap_length(samples);
            }

            Parameter::EarlyDiffuseEnabled => {
                let enabled = scaled >= 0.5;
                if enabled != self.diffuser_enabled {
                    self.diffuser.clear();
                }
                self.diffuser_enabled = enabled;
            }
            Parameter::EarlyDiffuseCount => self.diffuser.active_stages = scaled as usize,
            Parameter::EarlyDiffuseDelay => {
                let samples = self.ms_to_samples(scaled) as usize;
                self.diffuser.set_delay(samples);
            }
            Parameter::EarlyDiffuseModAmount => {
                self.diffuser.set_modulation_enabled(scaled > 0.5);
                let amount = self.ms_to_samples(scaled);
                self.diffuser.set_mod_amount(amount);
            }
            Parameter::EarlyDiffuseFeedback => self.diffuser.set_feedback(scaled),
            Parameter::EarlyDiffuseModRate => self.diffuser.set_mod_rate(scaled),

            Parameter::LateMode => {
                for line in &mut self.lines {
                    line.tap_post_diffuser = scaled >= 0.5;
                }
            }
            Parameter::LateLineCount => {
                self.line_count = (scaled as usize).clamp(1, TOTAL_LINE_COUNT);
            }
            Parameter::LateDiffuseEnabled => {
                let enabled = scaled >= 0.5;
                for line in &mut self.lines {
                    if enabled != line.diffuser_enabled {
                        line.clear_diffuser_buffer();
                    }
                    line.diffuser_enabled = enabled;
                }
            }
            Parameter::LateDiffuseCount => {
                for line in &mut self.lines {
                    line.set_diffuser_stages(scaled as usize);
                }
            }
            Parameter::LateDiffuseDelay => {
                let samples = self.ms_to_samples(scaled) as usize;
                for line in &mut self.lines {
                    line.set_diffuser_delay(samples);
                }
            }
            Parameter::LateDiffuseFeedback => {
                for line in &mut self.lines {
                    line.set_diffuser_feedback(scaled);
                }
            }
            Parameter::LateLineSize
            | Parameter::LateLineModAmount
            | Parameter::LateDiffuseModAmount
            | Parameter::LateLineDecay
            | Parameter::LateLineModRate
            | Parameter::LateDiffuseModRate => self.update_lines(),

            Parameter::EqLowShelfEnabled => {
                for line in &mut self.lines {
                    line.low_shelf_enabled = scaled >= 0.5;
                }
            }
            Parameter::EqHighShelfEnabled => {
                for line in &mut self.lines {
                    line.high_shelf_enabled = scaled >= 0.5;
                }
            }
            Parameter::EqLowpassEnabled => {
                for line in &mut self.lines {
                    line.cutoff_enabled = scaled >= 0.5;
                }
            }
            Parameter::EqLowFreq => {
                for line in &mut self.lines {
                    line.set_low_shelf_frequency(scaled);
                }
            }
            Parameter::EqHighFreq => {
                for line in &mut self.lines {
                    line.set_high_shelf_frequency(scaled);
                }
            }
            Parameter::EqCutoff => {
                for line in &mut self.lines {
                    line.set_cutoff_frequency(scaled);
                }
            }
            Parameter::EqLowGain => {
                for line in &mut self.lines {
                    line.set_low_shelf_gain(scaled);
                }
            }
            Parameter::EqHighGain => {
                for line in &mut self.lines {
                    line.set_high_shelf_gain(scaled);
                }
            }

            Parameter::EqCrossSeed => {
                self.cross_seed = match self.side {
                    ChannelSide::Left => 1.0 - 0.5 * scaled,
                    ChannelSide::Right => 0.5 * scaled,
                };
                self.multitap.set_cross_seed(self.cross_seed);
                self.diffuser.set_cross_seed(self.cross_seed);
                self.update_lines();
                self.update_post_diffusion();
            }

            Parameter::SeedTap => self.multitap.set_seed(scaled as u32),
            Parameter::SeedDiffusion => self.diffuser.set_seed(scaled as u32),
            Parameter::SeedDelay => {
                self.delay_line_seed = scaled as u32;
                self.update_lines();
            }
            Parameter::SeedPostDiffusion => {
                self.post_diffusion_seed = scaled as u32;
                self.update_post_diffusion();
            }
        }
    }

    /// Process one block of at most [`BLOCK_SIZE`] samples.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let len = input.len();
        debug_assert!(len <= BLOCK_SIZE);
        debug_assert_eq!(len, output.len());

        let mut temp = [0.0f32; BLOCK_SIZE];
        let mut early = [0.0f32; BLOCK_SIZE];
        let mut line_out = [0.0f32; BLOCK_SIZE];
        let mut line_sum = [0.0f32; BLOCK_SIZE];

        let temp = &mut temp[..len];
        temp.copy_from_slice(input);

        if self.low_cut_enabled {
            self.high_pass.process_block(temp);
        }
        if self.high_cut_enabled {
            self.low_pass.process_block(temp);
        }

        // Snap tiny residuals to exact zero. Values deep in the denormal
        // range were causing severe CPU spikes inside the feedback network.
        for sample in temp.iter_mut() {
            if *sample * *sample < 1e-9 {
                *sample = 0.0;
            }
        }

        self.pre_delay.process_block(temp);
        if self.multitap_enabled {
            self.multitap.process_block(temp);
        }
        if self.diffuser_enabled {
            self.diffuser.process_block(temp);
        }

        early[..len].copy_from_slice(temp);

        for line in &mut self.lines[..self.line_count] {
            line.process(temp, &mut line_out[..len]);
            for (sum, &y) in line_sum[..len].iter_mut().zip(&line_out[..len]) {
                *sum += y;
            }
        }

        let per_line_gain = 1.0 / sqrtf(self.line_count as f32);
        for i in 0..len {
            output[i] = self.dry_out * input[i]
                + self.early_out * early[i]
                + self.line_out * line_sum[i] * per_line_gain;
        }
    }

    /// Clear every buffer in the channel.
    pub fn clear(&mut self) {
        self.low_pass.clear();
        self.high_pass.clear();
        self.pre_delay.clear();
        self.multitap.clear();
        self.diffuser.clear();
        for line in &mut self.lines {
            line.clear();
        }
    }

    fn level_gain(db: f32) -> f32 {
        if db <= -30.0 { 0.0 } else { db_to_gain(db) }
    }

    fn ms_to_samples(&self, ms: f32) -> f32 {
        ms / 1000.0 * self.sample_rate
    }

    fn update_lines(&mut self) {
        let scaled = |p: Parameter| self.params_scaled[p.index()];

        let line_delay_samples = self.ms_to_samples(scaled(Parameter::LateLineSize));
        let line_decay_samples = self.ms_to_samples(scaled(Parameter::LateLineDecay) * 1000.0);
        let line_mod_amount = self.ms_to_samples(scaled(Parameter::LateLineModAmount));
        let line_mod_rate = scaled(Parameter::LateLineModRate);
        let diffuser_mod_amount = self.ms_to_samples(scaled(Parameter::LateDiffuseModAmount));
        let diffuser_mod_rate = scaled(Parameter::LateDiffuseModRate);
        let sample_rate = self.sample_rate;

        rand_seq::generate_cross_into(self.delay_line_seed, self.cross_seed, &mut self.line_seeds);

        for (i, line) in self.lines.iter_mut().enumerate() {
            let mod_amount = line_mod_amount * (0.7 + 0.3 * self.line_seeds[i]);
            let mod_rate = line_mod_rate * (0.7 + 0.3 * self.line_seeds[TOTAL_LINE_COUNT + i])
                / sample_rate;

            let mut delay_samples =
                (0.5 + self.line_seeds[TOTAL_LINE_COUNT * 2 + i]) * line_delay_samples;
            // A short delay with deep modulation could take the effective
            // delay negative; hold two samples of margin.
            if delay_samples < mod_amount + 2.0 {
                delay_samples = mod_amount + 2.0;
            }

            // The decay parameter is the T60 time: derive the gain that
            // loses 60 dB after decay/delay trips around the loop.
            let db_after_one_pass = delay_samples / line_decay_samples * -60.0;

            line.set_delay(delay_samples as usize);
            line.set_feedback(db_to_gain(db_after_one_pass));
            line.set_line_mod_amount(mod_amount);
            line.set_line_mod_rate(mod_rate);
            line.set_diffuser_mod_amount(diffuser_mod_amount);
            line.set_diffuser_mod_rate(diffuser_mod_rate);
        }
    }

    fn update_post_diffusion(&mut self) {
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.set_diffuser_seed(self.post_diffusion_seed * (i as u32 + 1), self.cross_seed);
        }
    }
}
