//! Stereo controller: two decorrelated channels behind one parameter bank.
//!
//! The controller owns the normalized parameter values, scales each change
//! once, and forwards the scaled value to both channels. `process` accepts
//! buffers of any length and splits them into [`BLOCK_SIZE`] chunks, so
//! hosts never need to care about the engine's internal block length.
//!
//! Parameter changes apply between `process` calls; within one call the
//! settings are fixed. Everything here is single-threaded and performs no
//! allocation after construction.

use crate::BLOCK_SIZE;
use crate::channel::{ChannelSide, ReverbChannel};
use crate::params::{self, Parameter};

/// Stereo reverb controller.
#[derive(Debug, Clone)]
pub struct ReverbController {
    sample_rate: f32,
    channel_left: ReverbChannel,
    channel_right: ReverbChannel,
    parameters: [f32; Parameter::COUNT],
}

impl ReverbController {
    /// Create a controller at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            channel_left: ReverbChannel::new(sample_rate, ChannelSide::Left),
            channel_right: ReverbChannel::new(sample_rate, ChannelSide::Right),
            parameters: [0.0; Parameter::COUNT],
        }
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate. Reapplies every parameter and clears all
    /// buffers on both channels.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.channel_left.set_sample_rate(sample_rate);
        self.channel_right.set_sample_rate(sample_rate);
    }

    /// Set a parameter from its normalized value in [0, 1].
    ///
    /// The value is clamped, stored, scaled once, and forwarded to both
    /// channels.
    pub fn set_parameter(&mut self, param: Parameter, value: f32) {
        let value = value.clamp(0.0, 1.0);
        self.parameters[param.index()] = value;
        let scaled = params::scale(param, value);
        self.channel_left.set_parameter(param, scaled);
        self.channel_right.set_parameter(param, scaled);
    }

    /// Normalized value of one parameter.
    pub fn parameter(&self, param: Parameter) -> f32 {
        self.parameters[param.index()]
    }

    /// All normalized parameter values in index order.
    pub fn parameters(&self) -> &[f32; Parameter::COUNT] {
        &self.parameters
    }

    /// Scaled (engine-unit) value of one parameter.
    pub fn scaled_parameter(&self, param: Parameter) -> f32 {
        params::scale(param, self.parameters[param.index()])
    }

    /// Clear all buffers on both channels.
    pub fn clear_buffers(&mut self) {
        self.channel_left.clear();
        self.channel_right.clear();
    }

    /// Process stereo buffers of arbitrary (equal) length.
    pub fn process(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        debug_assert_eq!(in_l.len(), in_r.len());
        debug_assert_eq!(in_l.len(), out_l.len());
        debug_assert_eq!(in_l.len(), out_r.len());

        let mut offset = 0;
        let total = in_l.len();
        while offset < total {
            let chunk = (total - offset).min(BLOCK_SIZE);
            self.process_chunk(
                &in_l[offset..offset + chunk],
                &in_r[offset..offset + chunk],
                &mut out_l[offset..offset + chunk],
                &mut out_r[offset..offset + chunk],
            );
            offset += chunk;
        }
    }

    fn process_chunk(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        let len = in_l.len();
        let mut left_in = [0.0f32; BLOCK_SIZE];
        let mut right_in = [0.0f32; BLOCK_SIZE];

        let input_mix = self.scaled_parameter(Parameter::InputMix);
        let cm = input_mix * 0.5;
        let cmi = 1.0 - cm;

        for i in 0..len {
            left_in[i] = in_l[i] * cmi + in_r[i] * cm;
            right_in[i] = in_r[i] * cmi + in_l[i] * cm;
        }

        self.channel_left.process(&left_in[..len], out_l);
        self.channel_right.process(&right_in[..len], out_r);
    }
}
