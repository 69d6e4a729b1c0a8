//! Factory programs.
//!
//! A preset is a full bank of 45 normalized values in parameter-index
//! order. Applying one sets every parameter, then re-runs the sample-rate
//! setup and clears all buffers, so the engine starts the new program from
//! silence.

use crate::controller::ReverbController;
use crate::params::Parameter;

/// A named factory program.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Display name.
    pub name: &'static str,
    /// Normalized values in [`Parameter`] index order.
    pub values: [f32; Parameter::COUNT],
}

impl Preset {
    /// Apply this program: every parameter, then sample-rate setup and a
    /// full buffer clear.
    pub fn apply(&self, reverb: &mut ReverbController) {
        for (param, &value) in Parameter::ALL.iter().zip(self.values.iter()) {
            reverb.set_parameter(*param, value);
        }
        let sample_rate = reverb.sample_rate();
        reverb.set_sample_rate(sample_rate);
        reverb.clear_buffers();
    }
}

/// Dense, dark plate with a single long late line and heavy late diffusion.
pub const DARK_PLATE: Preset = Preset {
    name: "Dark Plate",
    values: [
        1.0,                // Interpolation
        1.0,                // LowCutEnabled
        0.0,                // HighCutEnabled
        0.2346999943256378, // InputMix
        0.6399999856948853, // LowCut
        0.2933000028133392, // HighCut
        0.8705999851226807, // DryOut
        0.0,                // EarlyOut
        0.6613999605178833, // LateOut
        0.0,                // TapEnabled
        0.1959999948740005, // TapCount
        1.0,                // TapDecay
        0.0,                // TapPredelay
        0.9866999983787537, // TapLength
        0.0,                // EarlyDiffuseEnabled
        0.2960000038146973, // EarlyDiffuseCount
        0.3066999912261963, // EarlyDiffuseDelay
        0.143899992108345,  // EarlyDiffuseModAmount
        0.7706999778747559, // EarlyDiffuseFeedback
        0.2466999888420105, // EarlyDiffuseModRate
        1.0,                // LateMode
        1.0,                // LateLineCount
        1.0,                // LateDiffuseEnabled
        0.4879999756813049, // LateDiffuseCount
        0.4693999886512756, // LateLineSize
        0.2719999849796295, // LateLineModAmount
        0.239999994635582,  // LateDiffuseDelay
        0.1467999964952469, // LateDiffuseModAmount
        0.6345999836921692, // LateLineDecay
        0.2292999923229218, // LateLineModRate
        0.8506999611854553, // LateDiffuseFeedback
        0.1666999906301498, // LateDiffuseModRate
        0.0,                // EqLowShelfEnabled
        1.0,                // EqHighShelfEnabled
        0.0,                // EqLowpassEnabled
        0.3879999816417694, // EqLowFreq
        0.5133999586105347, // EqHighFreq
        0.9759999513626099, // EqCutoff
        0.5559999942779541, // EqLowGain
        0.7680000066757202, // EqHighGain
        0.0,                // EqCrossSeed
        0.3339999914169312, // SeedTap
        0.1850000023841858, // SeedDiffusion
        0.2180999964475632, // SeedDelay
        0.3652999997138977, // SeedPostDiffusion
    ],
};

/// Tight ambience with early reflections and a short, bright tail.
pub const SMALL_ROOM: Preset = Preset {
    name: "Small Room",
    values: [
        1.0,  // Interpolation
        1.0,  // LowCutEnabled
        1.0,  // HighCutEnabled
        0.0,  // InputMix
        0.35, // LowCut
        0.85, // HighCut
        0.9,  // DryOut
        0.75, // EarlyOut
        0.55, // LateOut
        1.0,  // TapEnabled
        0.25, // TapCount
        0.6,  // TapDecay
        0.05, // TapPredelay
        0.12, // TapLength
        1.0,  // EarlyDiffuseEnabled
        0.45, // EarlyDiffuseCount
        0.2,  // EarlyDiffuseDelay
        0.3,  // EarlyDiffuseModAmount
        0.55, // EarlyDiffuseFeedback
        0.3,  // EarlyDiffuseModRate
        0.0,  // LateMode
        0.4,  // LateLineCount
        1.0,  // LateDiffuseEnabled
        0.35, // LateDiffuseCount
        0.25, // LateLineSize
        0.2,  // LateLineModAmount
        0.2,  // LateDiffuseDelay
        0.2,  // LateDiffuseModAmount
        0.25, // LateLineDecay
        0.3,  // LateLineModRate
        0.6,  // LateDiffuseFeedback
        0.3,  // LateDiffuseModRate
        0.0,  // EqLowShelfEnabled
        1.0,  // EqHighShelfEnabled
        1.0,  // EqLowpassEnabled
        0.4,  // EqLowFreq
        0.7,  // EqHighFreq
        0.8,  // EqCutoff
        0.6,  // EqLowGain
        0.85, // EqHighGain
        0.4,  // EqCrossSeed
        0.5,  // SeedTap
        0.5,  // SeedDiffusion
        0.5,  // SeedDelay
        0.5,  // SeedPostDiffusion
    ],
};

/// All factory programs.
pub const ALL: [&Preset; 2] = [&DARK_PLATE, &SMALL_ROOM];

/// Look up a program by name, case-insensitively.
pub fn find(name: &str) -> Option<&'static Preset> {
    ALL.iter()
        .copied()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}
