use crate::config::{Config, EffectDefaults};
use anyhow::{Context, Result};
use clap::Parser;
use image_effect::{
    EffectParams,
    filter_effect::{TemperatureKind, TintColor},
    stylized_effect::SobelMode,
};
use std::{path::PathBuf, str::FromStr};

/// Apply an image filter or stylization effect to an image file.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgfx")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    pub input: Option<PathBuf>,

    /// Effect name, see `--list`.
    #[arg(value_name = "EFFECT", required_unless_present = "list")]
    pub effect: Option<String>,

    /// Output image path; the format follows the extension.
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "list")]
    pub output: Option<PathBuf>,

    /// Effect strength, 0.0 leaves color filters as a no-op.
    #[arg(short, long, value_name = "FLOAT")]
    pub intensity: Option<f32>,

    /// Channel kept by the `color` effect.
    #[arg(short, long, value_name = "COLOR")]
    pub color: Option<TintColor>,

    /// Direction of the `temperature` effect: warm or cold.
    #[arg(short, long, value_name = "KIND")]
    pub temperature: Option<TemperatureKind>,

    /// Kernel size of the blur effects.
    #[arg(short, long, visible_alias = "radius", value_name = "INT")]
    pub kernel_size: Option<u32>,

    /// Gaussian sigma for `gaussian` and `sketch`.
    #[arg(long, value_name = "FLOAT")]
    pub sigma: Option<f32>,

    /// Range sigma of the bilateral blur.
    #[arg(long, value_name = "FLOAT")]
    pub sigma_color: Option<f32>,

    /// Spatial sigma of the bilateral blur.
    #[arg(long, value_name = "FLOAT")]
    pub sigma_space: Option<f32>,

    /// Lower hysteresis threshold of `contour`.
    #[arg(long, value_name = "FLOAT")]
    pub low_threshold: Option<f32>,

    /// Upper hysteresis threshold of `contour`.
    #[arg(long, value_name = "FLOAT")]
    pub high_threshold: Option<f32>,

    /// Gradient reported by `sobel`: magnitude, horizontal or vertical.
    #[arg(long, value_name = "MODE")]
    pub sobel_mode: Option<SobelMode>,

    /// Config file, defaults to `imgfx.toml` in the user config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the supported effect names and exit.
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command line values win, `config` fills in whatever was not given.
    pub fn effect_params(&self, config: &Config) -> Result<EffectParams> {
        let defaults = match &self.effect {
            Some(effect) => config.defaults_for(effect),
            None => EffectDefaults::default(),
        };

        Ok(EffectParams::new()
            .with_intensity(self.intensity.or(defaults.intensity))
            .with_color(or_parse(self.color, defaults.color.as_deref(), "color")?)
            .with_temperature(or_parse(
                self.temperature,
                defaults.temperature.as_deref(),
                "temperature",
            )?)
            .with_kernel_size(self.kernel_size.or(defaults.kernel_size))
            .with_sigma(self.sigma.or(defaults.sigma))
            .with_sigma_color(self.sigma_color.or(defaults.sigma_color))
            .with_sigma_space(self.sigma_space.or(defaults.sigma_space))
            .with_low_threshold(self.low_threshold.or(defaults.low_threshold))
            .with_high_threshold(self.high_threshold.or(defaults.high_threshold))
            .with_sobel_mode(or_parse(self.sobel_mode, defaults.mode.as_deref(), "mode")?))
    }
}

fn or_parse<T>(value: Option<T>, fallback: Option<&str>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.is_some() {
        return Ok(value);
    }

    fallback
        .map(|text| {
            text.parse::<T>()
                .with_context(|| format!("invalid `{key}` value in config: {text}"))
        })
        .transpose()
}
