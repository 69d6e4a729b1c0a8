//! Helpers shared by the subcommands.

use nimbus_reverb::{Parameter, ReverbController, presets::Preset};

/// Look up a parameter by its display label, ignoring case, spaces,
/// hyphens, and underscores ("line-decay" matches "Line Decay").
pub fn find_parameter(name: &str) -> Option<Parameter> {
    let wanted = normalize(name);
    Parameter::ALL
        .iter()
        .copied()
        .find(|p| normalize(p.label()) == wanted)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Look up a preset by name, with a helpful error listing the options.
pub fn find_preset(name: &str) -> anyhow::Result<&'static Preset> {
    nimbus_reverb::presets::find(name).ok_or_else(|| {
        let names: Vec<&str> = nimbus_reverb::presets::ALL.iter().map(|p| p.name).collect();
        anyhow::anyhow!("unknown preset '{}' (available: {})", name, names.join(", "))
    })
}

/// Parse a "name=value" override and apply it.
pub fn apply_override(reverb: &mut ReverbController, spec: &str) -> anyhow::Result<()> {
    let (name, value) = spec
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid override '{}' (expected name=value)", spec))?;
    let param = find_parameter(name)
        .ok_or_else(|| anyhow::anyhow!("unknown parameter '{}'", name))?;
    let value: f32 = value
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid value '{}' for '{}'", value, name))?;
    anyhow::ensure!(
        (0.0..=1.0).contains(&value),
        "value for '{}' must be in [0, 1], got {}",
        name,
        value
    );
    reverb.set_parameter(param, value);
    Ok(())
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 { -120.0 } else { 20.0 * linear.log10() }
}
