//! Parameter bank listing command.

use clap::Args;
use nimbus_reverb::{Parameter, ReverbController, params};

use super::common::{apply_override, find_preset};

#[derive(Args)]
pub struct ParamsArgs {
    /// Preset whose values to show
    #[arg(short, long, default_value = "Dark Plate")]
    preset: String,

    /// Parameter override as "name=value" with a normalized value in [0, 1]
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let mut reverb = ReverbController::new(48000.0);
    let preset = find_preset(&args.preset)?;
    preset.apply(&mut reverb);
    for spec in &args.overrides {
        apply_override(&mut reverb, spec)?;
    }

    println!("Preset: {}\n", preset.name);
    println!("{:<24} {:>10}   {}", "Parameter", "Normalized", "Value");
    for param in Parameter::ALL {
        let value = reverb.parameter(param);
        println!(
            "{:<24} {:>10.4}   {}",
            param.label(),
            value,
            params::format(param, value)
        );
    }

    Ok(())
}
