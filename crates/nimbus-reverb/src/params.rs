//! Parameter enumeration, scaling, and display formatting.
//!
//! Every control the engine exposes is one of 45 stable parameters. Hosts
//! hold normalized values in [0, 1]; [`scale`] maps them to engine units
//! (Hz, dB, ms, counts, seeds) with per-parameter response curves, and
//! [`format`] renders them for display. Both are pure functions of the
//! normalized value, so automation and preset storage never need the
//! engine's state.
//!
//! The discriminant order is a stable external contract: presets are stored
//! as plain 45-element arrays indexed by it.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use libm::floorf;
use nimbus_core::{resp_1dec, resp_2dec, resp_3dec, resp_3oct, resp_4oct};

/// Engine control parameter. All 45 values are normalized to [0, 1] on the
/// host side; see [`scale`] for the engine-unit mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Parameter {
    Interpolation,
    LowCutEnabled,
    HighCutEnabled,
    InputMix,
    LowCut,
    HighCut,
    DryOut,
    EarlyOut,
    LateOut,

    TapEnabled,
    TapCount,
    TapDecay,
    TapPredelay,
    TapLength,

    EarlyDiffuseEnabled,
    EarlyDiffuseCount,
    EarlyDiffuseDelay,
    EarlyDiffuseModAmount,
    EarlyDiffuseFeedback,
    EarlyDiffuseModRate,

    LateMode,
    LateLineCount,
    LateDiffuseEnabled,
    LateDiffuseCount,
    LateLineSize,
    LateLineModAmount,
    LateDiffuseDelay,
    LateDiffuseModAmount,
    LateLineDecay,
    LateLineModRate,
    LateDiffuseFeedback,
    LateDiffuseModRate,

    EqLowShelfEnabled,
    EqHighShelfEnabled,
    EqLowpassEnabled,
    EqLowFreq,
    EqHighFreq,
    EqCutoff,
    EqLowGain,
    EqHighGain,
    EqCrossSeed,

    SeedTap,
    SeedDiffusion,
    SeedDelay,
    SeedPostDiffusion,
}

impl Parameter {
    /// Number of parameters.
    pub const COUNT: usize = 45;

    /// All parameters in index order.
    pub const ALL: [Parameter; Self::COUNT] = [
        Parameter::Interpolation,
        Parameter::LowCutEnabled,
        Parameter::HighCutEnabled,
        Parameter::InputMix,
        Parameter::LowCut,
        Parameter::HighCut,
        Parameter::DryOut,
        Parameter::EarlyOut,
        Parameter::LateOut,
        Parameter::TapEnabled,
        Parameter::TapCount,
        Parameter::TapDecay,
        Parameter::TapPredelay,
        Parameter::TapLength,
        Parameter::EarlyDiffuseEnabled,
        Parameter::EarlyDiffuseCount,
        Parameter::EarlyDiffuseDelay,
        Parameter::EarlyDiffuseModAmount,
        Parameter::EarlyDiffuseFeedback,
        Parameter::EarlyDiffuseModRate,
        Parameter::LateMode,
        Parameter::LateLineCount,
        Parameter::LateDiffuseEnabled,
        Parameter::LateDiffuseCount,
        Parameter::LateLineSize,
        Parameter::LateLineModAmount,
        Parameter::LateDiffuseDelay,
        Parameter::LateDiffuseModAmount,
        Parameter::LateLineDecay,
        Parameter::LateLineModRate,
        Parameter::LateDiffuseFeedback,
        Parameter::LateDiffuseModRate,
        Parameter::EqLowShelfEnabled,
        Parameter::EqHighShelfEnabled,
        Parameter::EqLowpassEnabled,
        Parameter::EqLowFreq,
        Parameter::EqHighFreq,
        Parameter::EqCutoff,
        Parameter::EqLowGain,
        Parameter::EqHighGain,
        Parameter::EqCrossSeed,
        Parameter::SeedTap,
        Parameter::SeedDiffusion,
        Parameter::SeedDelay,
        Parameter::SeedPostDiffusion,
    ];

    /// Stable index of this parameter.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parameter for a stable index, if in range.
    pub fn from_index(index: usize) -> Option<Parameter> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Interpolation => "Interpolation",
            Parameter::LowCutEnabled => "Low Cut On",
            Parameter::HighCutEnabled => "High Cut On",
            Parameter::InputMix => "Input Mix",
            Parameter::LowCut => "Low Cut",
            Parameter::HighCut => "High Cut",
            Parameter::DryOut => "Dry Out",
            Parameter::EarlyOut => "Early Out",
            Parameter::LateOut => "Late Out",
            Parameter::TapEnabled => "Taps On",
            Parameter::TapCount => "Tap Count",
            Parameter::TapDecay => "Tap Decay",
            Parameter::TapPredelay => "Predelay",
            Parameter::TapLength => "Tap Length",
            Parameter::EarlyDiffuseEnabled => "Early Diffuse On",
            Parameter::EarlyDiffuseCount => "Early Diffuse Count",
            Parameter::EarlyDiffuseDelay => "Early Diffuse Delay",
            Parameter::EarlyDiffuseModAmount => "Early Diffuse Mod",
            Parameter::EarlyDiffuseFeedback => "Early Diffuse Feedback",
            Parameter::EarlyDiffuseModRate => "Early Diffuse Rate",
            Parameter::LateMode => "Late Mode",
            Parameter::LateLineCount => "Line Count",
            Parameter::LateDiffuseEnabled => "Late Diffuse On",
            Parameter::LateDiffuseCount => "Late Diffuse Count",
            Parameter::LateLineSize => "Line Size",
            Parameter::LateLineModAmount => "Line Mod",
            Parameter::LateDiffuseDelay => "Late Diffuse Delay",
            Parameter::LateDiffuseModAmount => "Late Diffuse Mod",
            Parameter::LateLineDecay => "Line Decay",
            Parameter::LateLineModRate => "Line Rate",
            Parameter::LateDiffuseFeedback => "Late Diffuse Feedback",
            Parameter::LateDiffuseModRate => "Late Diffuse Rate",
            Parameter::EqLowShelfEnabled => "Low Shelf On",
            Parameter::EqHighShelfEnabled => "High Shelf On",
            Parameter::EqLowpassEnabled => "Lowpass On",
            Parameter::EqLowFreq => "Low Shelf Freq",
            Parameter::EqHighFreq => "High Shelf Freq",
            Parameter::EqCutoff => "Lowpass Freq",
            Parameter::EqLowGain => "Low Shelf Gain",
            Parameter::EqHighGain => "High Shelf Gain",
            Parameter::EqCrossSeed => "Cross Seed",
            Parameter::SeedTap => "Tap Seed",
            Parameter::SeedDiffusion => "Diffusion Seed",
            Parameter::SeedDelay => "Delay Seed",
            Parameter::SeedPostDiffusion => "Post Diffusion Seed",
        }
    }
}

/// Map a normalized value in [0, 1] to the parameter's engine units.
///
/// Booleans threshold at 0.5; seeds map to integers 0..=999; frequency and
/// time parameters use the logarithmic response curves from
/// [`nimbus_core::math`] for more resolution at the low end.
pub fn scale(param: Parameter, value: f32) -> f32 {
    match param {
        Parameter::Interpolation
        | Parameter::LowCutEnabled
        | Parameter::HighCutEnabled
        | Parameter::TapEnabled
        | Parameter::EarlyDiffuseEnabled
        | Parameter::LateMode
        | Parameter::LateDiffuseEnabled
        | Parameter::EqLowShelfEnabled
        | Parameter::EqHighShelfEnabled
        | Parameter::EqLowpassEnabled => {
            if value < 0.5 { 0.0 } else { 1.0 }
        }

        Parameter::InputMix
        | Parameter::TapDecay
        | Parameter::EarlyDiffuseFeedback
        | Parameter::LateDiffuseFeedback
        | Parameter::EqCrossSeed => value,

        Parameter::SeedTap
        | Parameter::SeedDiffusion
        | Parameter::SeedDelay
        | Parameter::SeedPostDiffusion => floorf(value * 999.999),

        Parameter::LowCut => 20.0 + resp_4oct(value) * 980.0,
        Parameter::HighCut | Parameter::EqHighFreq | Parameter::EqCutoff => {
            400.0 + resp_4oct(value) * 19600.0
        }

        Parameter::DryOut | Parameter::EarlyOut | Parameter::LateOut => -30.0 + value * 30.0,

        Parameter::TapCount => floorf(1.0 + value * 255.0),
        Parameter::TapPredelay => resp_1dec(value) * 500.0,
        Parameter::TapLength => 10.0 + value * 990.0,

        Parameter::EarlyDiffuseCount | Parameter::LateLineCount => floorf(1.0 + value * 11.999),
        Parameter::LateDiffuseCount => floorf(1.0 + value * 7.999),

        Parameter::EarlyDiffuseDelay | Parameter::LateDiffuseDelay => 10.0 + value * 90.0,

        Parameter::EarlyDiffuseModAmount
        | Parameter::LateLineModAmount
        | Parameter::LateDiffuseModAmount => value * 2.5,

        Parameter::EarlyDiffuseModRate
        | Parameter::LateLineModRate
        | Parameter::LateDiffuseModRate => resp_2dec(value) * 5.0,

        Parameter::LateLineSize => 20.0 + resp_2dec(value) * 980.0,
        Parameter::LateLineDecay => 0.05 + resp_3dec(value) * 59.95,

        Parameter::EqLowFreq => 20.0 + resp_3oct(value) * 980.0,
        Parameter::EqLowGain | Parameter::EqHighGain => -20.0 + value * 20.0,
    }
}

/// Render a normalized value for display ("1200 Hz", "-6.5 dB", "ENABLED").
pub fn format(param: Parameter, value: f32) -> String {
    let s = scale(param, value);

    match param {
        Parameter::Interpolation
        | Parameter::LowCutEnabled
        | Parameter::HighCutEnabled
        | Parameter::TapEnabled
        | Parameter::EarlyDiffuseEnabled
        | Parameter::LateDiffuseEnabled
        | Parameter::EqLowShelfEnabled
        | Parameter::EqHighShelfEnabled
        | Parameter::EqLowpassEnabled => {
            if s >= 1.0 {
                String::from("ENABLED")
            } else {
                String::from("DISABLED")
            }
        }

        Parameter::LateMode => {
            if s >= 1.0 {
                String::from("POST")
            } else {
                String::from("PRE")
            }
        }

        Parameter::InputMix
        | Parameter::TapDecay
        | Parameter::EarlyDiffuseFeedback
        | Parameter::LateDiffuseFeedback
        | Parameter::EqCrossSeed
        | Parameter::EarlyDiffuseModAmount
        | Parameter::LateLineModAmount
        | Parameter::LateDiffuseModAmount => format!("{}%", (s * 100.0) as i32),

        Parameter::SeedTap
        | Parameter::SeedDiffusion
        | Parameter::SeedDelay
        | Parameter::SeedPostDiffusion => format!("{:03}", s as i32),

        Parameter::LowCut
        | Parameter::HighCut
        | Parameter::EqLowFreq
        | Parameter::EqHighFreq
        | Parameter::EqCutoff => format!("{} Hz", s as i32),

        Parameter::DryOut | Parameter::EarlyOut | Parameter::LateOut => {
            if s <= -30.0 {
                String::from("MUTED")
            } else {
                format!("{s:.1} dB")
            }
        }

        Parameter::TapCount
        | Parameter::EarlyDiffuseCount
        | Parameter::LateLineCount
        | Parameter::LateDiffuseCount => format!("{}", s as i32),

        Parameter::TapPredelay
        | Parameter::TapLength
        | Parameter::EarlyDiffuseDelay
        | Parameter::LateLineSize
        | Parameter::LateDiffuseDelay => format!("{} ms", s as i32),

        Parameter::LateLineDecay => {
            if s < 1.0 {
                format!("{} ms", (s * 1000.0) as i32)
            } else if s < 10.0 {
                format!("{s:.2} sec")
            } else {
                format!("{s:.1} sec")
            }
        }

        Parameter::EarlyDiffuseModRate
        | Parameter::LateLineModRate
        | Parameter::LateDiffuseModRate => format!("{s:.2} Hz"),

        Parameter::EqLowGain | Parameter::EqHighGain => format!("{s:.1} dB"),
    }
}
