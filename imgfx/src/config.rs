use anyhow::{Context, Result};
use derivative::Derivative;
use image_effect::canonical_name;
use log::debug;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

pub const CONFIG_FILE_NAME: &str = "imgfx.toml";

/// Defaults read from `imgfx.toml`, keyed by effect name:
///
/// ```toml
/// [effects.gaussian]
/// kernel_size = 7
/// sigma = 1.5
///
/// [effects.sobel]
/// mode = "horizontal"
/// ```
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub effects: BTreeMap<String, EffectDefaults>,
}

#[derive(Serialize, Deserialize, Derivative, Debug, Clone, PartialEq)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct EffectDefaults {
    pub intensity: Option<f32>,
    pub color: Option<String>,
    pub temperature: Option<String>,
    pub kernel_size: Option<u32>,
    pub sigma: Option<f32>,
    pub sigma_color: Option<f32>,
    pub sigma_space: Option<f32>,
    pub low_threshold: Option<f32>,
    pub high_threshold: Option<f32>,
    pub mode: Option<String>,
}

impl Config {
    /// Load `path` if given, otherwise the per-user config file when it exists.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.clone(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("read config file {} failed", path.display()))?;

        let mut config = Self::parse(&text)
            .with_context(|| format!("parse config file {} failed", path.display()))?;
        config.config_path = Some(path);

        debug!("{config:?}");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;

        let mut seen = BTreeMap::new();
        for name in config.effects.keys() {
            let Some(canonical) = canonical_name(name) else {
                anyhow::bail!("unknown effect section `[effects.{name}]`");
            };

            if let Some(previous) = seen.insert(canonical, name) {
                anyhow::bail!(
                    "sections `[effects.{previous}]` and `[effects.{name}]` both configure `{canonical}`"
                );
            }
        }

        Ok(config)
    }

    /// Defaults for `effect`, matched by canonical name so aliases share a section.
    pub fn defaults_for(&self, effect: &str) -> EffectDefaults {
        let Some(canonical) = canonical_name(effect) else {
            return EffectDefaults::default();
        };

        self.effects
            .iter()
            .find(|(name, _)| canonical_name(name) == Some(canonical))
            .map(|(_, defaults)| defaults.clone())
            .unwrap_or_default()
    }
}

fn default_config_path() -> Option<PathBuf> {
    AppDirs::new(Some("imgfx"), true).map(|dirs| dirs.config_dir.join(CONFIG_FILE_NAME))
}
