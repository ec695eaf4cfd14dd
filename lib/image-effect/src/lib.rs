pub mod base_effect;
pub mod blur_effect;
pub mod filter_effect;
pub mod io;
pub mod params;
pub mod planes;
pub mod stylized_effect;

pub use io::{load_image, save_image};
pub use params::EffectParams;

use image::DynamicImage;
use std::path::PathBuf;

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Unsupported effect: {0}")]
    UnsupportedEffect(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Failed to decode image {}: {source}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode image {}: {source}", path.display())]
    EncodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub trait Effect {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage>;
}

/// Canonical names accepted by [`ImageEffect::from_name`].
pub const EFFECT_NAMES: [&str; 13] = [
    "sepia",
    "negative",
    "grayscale",
    "color",
    "temperature",
    "sketch",
    "contour",
    "sobel",
    "emboss",
    "gaussian",
    "median",
    "box",
    "bilateral",
];

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Base effects
    Negative,
    Grayscale,

    // Filter effects
    Sepia(filter_effect::SepiaConfig),
    Color(filter_effect::ColorConfig),
    Temperature(filter_effect::TemperatureConfig),

    // Stylized effects
    Sketch(stylized_effect::SketchConfig),
    Contour(stylized_effect::ContourConfig),
    Sobel(stylized_effect::SobelConfig),
    Emboss(stylized_effect::EmbossConfig),

    // Blur effects
    GaussianBlur(blur_effect::GaussianBlurConfig),
    MedianBlur(blur_effect::MedianBlurConfig),
    BoxBlur(blur_effect::BoxBlurConfig),
    BilateralBlur(blur_effect::BilateralBlurConfig),
}

impl ImageEffect {
    /// Build an effect from its CLI name, filling the config from `params`.
    pub fn from_name(name: &str, params: &EffectParams) -> ImageEffectResult<Self> {
        params.validate()?;

        let key = normalize(name);
        let Some(canonical) = canonical_name(&key) else {
            return Err(ImageEffectError::UnsupportedEffect(name.to_string()));
        };

        let effect = match canonical {
            "sepia" => ImageEffect::Sepia(params.sepia()),
            "negative" => ImageEffect::Negative,
            "grayscale" => ImageEffect::Grayscale,
            "color" => ImageEffect::Color(params.color(key.parse().ok())?),
            "temperature" => ImageEffect::Temperature(params.temperature(key.parse().ok())?),
            "sketch" => ImageEffect::Sketch(params.sketch()?),
            "contour" => ImageEffect::Contour(params.contour()?),
            "sobel" => ImageEffect::Sobel(params.sobel()),
            "emboss" => ImageEffect::Emboss(params.emboss()),
            "gaussian" => ImageEffect::GaussianBlur(params.gaussian_blur()?),
            "median" => ImageEffect::MedianBlur(params.median_blur()?),
            "box" => ImageEffect::BoxBlur(params.box_blur()?),
            _ => ImageEffect::BilateralBlur(params.bilateral_blur()?),
        };

        if params.intensity.is_some() && !effect.uses_intensity() {
            log::warn!("`{}` ignores the intensity parameter", effect.name());
        }

        log::debug!("selected effect: {effect:?}");
        Ok(effect)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageEffect::Negative => "negative",
            ImageEffect::Grayscale => "grayscale",
            ImageEffect::Sepia(_) => "sepia",
            ImageEffect::Color(_) => "color",
            ImageEffect::Temperature(_) => "temperature",
            ImageEffect::Sketch(_) => "sketch",
            ImageEffect::Contour(_) => "contour",
            ImageEffect::Sobel(_) => "sobel",
            ImageEffect::Emboss(_) => "emboss",
            ImageEffect::GaussianBlur(_) => "gaussian",
            ImageEffect::MedianBlur(_) => "median",
            ImageEffect::BoxBlur(_) => "box",
            ImageEffect::BilateralBlur(_) => "bilateral",
        }
    }

    pub fn uses_intensity(&self) -> bool {
        matches!(
            self,
            ImageEffect::Sepia(_)
                | ImageEffect::Color(_)
                | ImageEffect::Temperature(_)
                | ImageEffect::Sketch(_)
                | ImageEffect::Sobel(_)
                | ImageEffect::Emboss(_)
        )
    }
}

impl Effect for ImageEffect {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(image.clone());
        }

        match self {
            // Base effects
            ImageEffect::Negative => base_effect::negative(image),
            ImageEffect::Grayscale => base_effect::grayscale(image),

            // Filter effects
            ImageEffect::Sepia(config) => config.apply(image),
            ImageEffect::Color(config) => config.apply(image),
            ImageEffect::Temperature(config) => config.apply(image),

            // Stylized effects
            ImageEffect::Sketch(config) => config.apply(image),
            ImageEffect::Contour(config) => config.apply(image),
            ImageEffect::Sobel(config) => config.apply(image),
            ImageEffect::Emboss(config) => config.apply(image),

            // Blur effects
            ImageEffect::GaussianBlur(config) => config.apply(image),
            ImageEffect::MedianBlur(config) => config.apply(image),
            ImageEffect::BoxBlur(config) => config.apply(image),
            ImageEffect::BilateralBlur(config) => config.apply(image),
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

/// Map an effect name or alias to one of [`EFFECT_NAMES`].
///
/// Color names (`cyan`) resolve to `color`, `warm`/`cold` to `temperature`.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let canonical = match normalize(name).as_str() {
        "sepia" => "sepia",
        "negative" | "invert" => "negative",
        "grayscale" | "greyscale" | "gray" | "grey" => "grayscale",
        "color" | "colour" | "red" | "green" | "blue" | "yellow" | "cyan" | "magenta" => "color",
        "temperature" | "warm" | "cold" | "cool" => "temperature",
        "sketch" | "pencil-sketch" => "sketch",
        "contour" | "contouring" => "contour",
        "sobel" => "sobel",
        "emboss" => "emboss",
        "gaussian" | "gaussian-blur" => "gaussian",
        "median" | "median-blur" => "median",
        "box" | "box-blur" => "box",
        "bilateral" | "bilateral-blur" => "bilateral",
        _ => return None,
    };

    Some(canonical)
}

/// Apply the effect called `name` to `image`, returning a new image.
pub fn apply(
    image: &DynamicImage,
    name: &str,
    params: &EffectParams,
) -> ImageEffectResult<DynamicImage> {
    ImageEffect::from_name(name, params)?.apply(image)
}
