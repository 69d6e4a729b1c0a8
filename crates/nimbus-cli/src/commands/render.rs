//! Offline rendering command.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use nimbus_reverb::ReverbController;

use super::common::{apply_override, find_preset, linear_to_db, peak, rms};
use crate::wav;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Input WAV file; omit to render a unit impulse
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Preset to start from
    #[arg(short, long, default_value = "Dark Plate")]
    preset: String,

    /// Parameter override as "name=value" with a normalized value in [0, 1]
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    /// Sample rate when rendering an impulse (ignored with --input)
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Reverb tail appended after the input, in seconds
    #[arg(long, default_value = "4.0")]
    tail: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "bit depth must be 16, 24, or 32"
    );
    anyhow::ensure!(args.tail >= 0.0, "tail must not be negative");

    // Source material: an input file, or a unit impulse at the requested rate.
    let (mut in_l, mut in_r, sample_rate) = match &args.input {
        Some(path) => {
            println!("Reading {}...", path.display());
            let src = wav::read_stereo(path)?;
            println!(
                "  {} samples, {} Hz, {:.2}s",
                src.left.len(),
                src.sample_rate,
                src.left.len() as f32 / src.sample_rate as f32
            );
            (src.left, src.right, src.sample_rate)
        }
        None => {
            println!("Rendering impulse response at {} Hz", args.sample_rate);
            let impulse = vec![1.0f32];
            (impulse.clone(), impulse, args.sample_rate)
        }
    };

    let tail_samples = (args.tail * sample_rate as f32) as usize;
    in_l.resize(in_l.len() + tail_samples, 0.0);
    in_r.resize(in_r.len() + tail_samples, 0.0);
    let total = in_l.len();

    let mut reverb = ReverbController::new(sample_rate as f32);
    let preset = find_preset(&args.preset)?;
    println!("Applying preset: {}", preset.name);
    preset.apply(&mut reverb);
    for spec in &args.overrides {
        apply_override(&mut reverb, spec)?;
    }
    tracing::debug!("render: {} samples at {} Hz", total, sample_rate);

    let mut out_l = vec![0.0f32; total];
    let mut out_r = vec![0.0f32; total];

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    // Feed the controller in one-second slices so the bar stays live.
    let slice = sample_rate as usize;
    let mut offset = 0;
    while offset < total {
        let n = (total - offset).min(slice);
        reverb.process(
            &in_l[offset..offset + n],
            &in_r[offset..offset + n],
            &mut out_l[offset..offset + n],
            &mut out_r[offset..offset + n],
        );
        offset += n;
        pb.set_position(offset as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Left:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&out_l)),
        linear_to_db(peak(&out_l))
    );
    println!(
        "  Right: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&out_r)),
        linear_to_db(peak(&out_r))
    );

    println!("\nWriting {}...", args.output.display());
    wav::write_stereo(&args.output, &out_l, &out_r, sample_rate, args.bit_depth)?;
    println!("Done!");

    Ok(())
}
