//! Ember command-line front end.
//!
//! Renders the built-in demo scene and writes a binary PPM. Run with
//! `--direct` for the single-ray deterministic mode.

mod demo;

use anyhow::{bail, Context, Result};
use ember_renderer::{
    render_direct_to_file, render_stochastic_to_file, ConsoleProgress, RenderConfig,
};
use std::path::PathBuf;

struct Args {
    direct: bool,
    samples: u32,
    output: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        direct: false,
        samples: 16,
        output: PathBuf::from("output.ppm"),
    };

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--direct" => args.direct = true,
            "--spp" => {
                let value = argv.next().context("--spp needs a value")?;
                args.samples = value.parse().context("--spp expects a positive integer")?;
            }
            "-o" | "--output" => {
                args.output = PathBuf::from(argv.next().context("-o needs a path")?);
            }
            other => bail!("unknown argument: {other} (expected --direct, --spp N, -o PATH)"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = RenderConfig::default().with_samples(args.samples);
    let scene = demo::DemoScene::new();
    let progress = ConsoleProgress;

    log::info!(
        "ember: {}x{}, mode = {}",
        config.width,
        config.height,
        if args.direct { "direct" } else { "stochastic" }
    );

    let start = std::time::Instant::now();
    if args.direct {
        render_direct_to_file(&scene, &config, &progress, &args.output)
    } else {
        render_stochastic_to_file(&scene, &config, &progress, &args.output)
    }
    .with_context(|| format!("rendering to {}", args.output.display()))?;
    log::info!("rendered in {:.2?}", start.elapsed());

    println!("Saved {}", args.output.display());
    Ok(())
}
