//! Preset listing command.

use clap::Args;
use nimbus_reverb::presets;

#[derive(Args)]
pub struct PresetsArgs {}

pub fn run(_args: PresetsArgs) -> anyhow::Result<()> {
    println!("Factory presets:");
    for preset in presets::ALL {
        println!("  {}", preset.name);
    }
    Ok(())
}
