mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use config::Config;
use image_effect::{EFFECT_NAMES, Effect, ImageEffect, load_image, save_image};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(&args) {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logger(verbose: bool) {
    use std::io::Write;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn run(args: &Args) -> Result<()> {
    if args.list {
        for name in EFFECT_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    // clap enforces these unless `--list` is given
    let (Some(input), Some(name), Some(output)) = (&args.input, &args.effect, &args.output)
    else {
        anyhow::bail!("INPUT, EFFECT and --output are required");
    };

    let config = Config::load(args.config.as_ref()).context("load config failed")?;
    let params = args.effect_params(&config)?;
    let effect = ImageEffect::from_name(name, &params)?;

    let image = load_image(input)?;
    let image = effect
        .apply(&image)
        .with_context(|| format!("apply `{}` failed", effect.name()))?;
    save_image(&image, output)?;

    info!(
        "{} -> {} ({})",
        input.display(),
        output.display(),
        effect.name()
    );

    Ok(())
}
