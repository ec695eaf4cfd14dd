//! Optional effect parameters as supplied by the command line or a config file.
//!
//! Every field is optional; an unset field leaves the effect's own default in place.

use crate::{
    ImageEffectError, ImageEffectResult,
    blur_effect::{BilateralBlurConfig, BoxBlurConfig, GaussianBlurConfig, MedianBlurConfig},
    filter_effect::{ColorConfig, SepiaConfig, TemperatureConfig, TemperatureKind, TintColor},
    stylized_effect::{ContourConfig, EmbossConfig, SketchConfig, SobelConfig, SobelMode},
};
use derive_setters::Setters;

#[derive(Debug, Clone, Default, PartialEq, Setters)]
#[setters(prefix = "with_")]
pub struct EffectParams {
    pub intensity: Option<f32>,
    pub color: Option<TintColor>,
    pub temperature: Option<TemperatureKind>,
    pub kernel_size: Option<u32>,
    pub sigma: Option<f32>,
    pub sigma_color: Option<f32>,
    pub sigma_space: Option<f32>,
    pub low_threshold: Option<f32>,
    pub high_threshold: Option<f32>,
    pub sobel_mode: Option<SobelMode>,
}

fn set<C, T>(config: C, value: Option<T>, setter: fn(C, T) -> C) -> C {
    match value {
        Some(value) => setter(config, value),
        None => config,
    }
}

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that hold regardless of the selected effect.
    pub fn validate(&self) -> ImageEffectResult<()> {
        if let Some(intensity) = self.intensity {
            if !intensity.is_finite() || intensity < 0.0 {
                return Err(ImageEffectError::InvalidParameter(format!(
                    "intensity must be a non-negative number, got {intensity}"
                )));
            }
        }

        let floats = [
            ("sigma", self.sigma),
            ("sigma-color", self.sigma_color),
            ("sigma-space", self.sigma_space),
            ("low-threshold", self.low_threshold),
            ("high-threshold", self.high_threshold),
        ];

        for (name, value) in floats {
            match value {
                Some(value) if !value.is_finite() => {
                    return Err(ImageEffectError::InvalidParameter(format!(
                        "{name} must be finite, got {value}"
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn sepia(&self) -> SepiaConfig {
        set(SepiaConfig::new(), self.intensity, SepiaConfig::with_intensity)
    }

    /// `preset` wins over the `color` field; it comes from names like `cyan`.
    pub fn color(&self, preset: Option<TintColor>) -> ImageEffectResult<ColorConfig> {
        let Some(color) = preset.or(self.color) else {
            return Err(ImageEffectError::InvalidParameter(
                "the color effect needs a color: red, green, blue, yellow, cyan or magenta"
                    .to_string(),
            ));
        };

        Ok(set(
            ColorConfig::new(color),
            self.intensity,
            ColorConfig::with_intensity,
        ))
    }

    pub fn temperature(
        &self,
        preset: Option<TemperatureKind>,
    ) -> ImageEffectResult<TemperatureConfig> {
        let Some(kind) = preset.or(self.temperature) else {
            return Err(ImageEffectError::InvalidParameter(
                "the temperature effect needs a temperature: warm or cold".to_string(),
            ));
        };

        Ok(set(
            TemperatureConfig::new(kind),
            self.intensity,
            TemperatureConfig::with_intensity,
        ))
    }

    pub fn sketch(&self) -> ImageEffectResult<SketchConfig> {
        let config = set(SketchConfig::new(), self.intensity, SketchConfig::with_intensity);
        let config = set(config, self.sigma, SketchConfig::with_sigma);
        config.validate()?;
        Ok(config)
    }

    pub fn contour(&self) -> ImageEffectResult<ContourConfig> {
        let config = set(
            ContourConfig::new(),
            self.low_threshold,
            ContourConfig::with_low_threshold,
        );
        let config = set(config, self.high_threshold, ContourConfig::with_high_threshold);
        config.validate()?;
        Ok(config)
    }

    pub fn sobel(&self) -> SobelConfig {
        let config = set(SobelConfig::new(), self.intensity, SobelConfig::with_intensity);
        set(config, self.sobel_mode, SobelConfig::with_mode)
    }

    pub fn emboss(&self) -> EmbossConfig {
        set(EmbossConfig::new(), self.intensity, EmbossConfig::with_strength)
    }

    pub fn gaussian_blur(&self) -> ImageEffectResult<GaussianBlurConfig> {
        let config = set(
            GaussianBlurConfig::new(),
            self.kernel_size,
            GaussianBlurConfig::with_kernel_size,
        );
        let config = set(config, self.sigma, GaussianBlurConfig::with_sigma);
        config.validate()?;
        Ok(config)
    }

    pub fn median_blur(&self) -> ImageEffectResult<MedianBlurConfig> {
        let config = set(
            MedianBlurConfig::new(),
            self.kernel_size,
            MedianBlurConfig::with_kernel_size,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn box_blur(&self) -> ImageEffectResult<BoxBlurConfig> {
        let config = set(
            BoxBlurConfig::new(),
            self.kernel_size,
            BoxBlurConfig::with_kernel_size,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn bilateral_blur(&self) -> ImageEffectResult<BilateralBlurConfig> {
        let config = set(
            BilateralBlurConfig::new(),
            self.kernel_size,
            BilateralBlurConfig::with_kernel_size,
        );
        let config = set(config, self.sigma_color, BilateralBlurConfig::with_sigma_color);
        let config = set(config, self.sigma_space, BilateralBlurConfig::with_sigma_space);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_intensity_rejected() {
        let params = EffectParams::new().with_intensity(Some(-0.5));
        assert!(matches!(
            params.validate(),
            Err(ImageEffectError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_nan_sigma_rejected() {
        let params = EffectParams::new().with_sigma(Some(f32::NAN));
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_preset_color_overrides_field() {
        let params = EffectParams::new().with_color(Some(TintColor::Red));
        let config = params.color(Some(TintColor::Blue)).unwrap();
        assert_eq!(config.color(), TintColor::Blue);

        let config = params.color(None).unwrap();
        assert_eq!(config.color(), TintColor::Red);
    }

    #[test]
    fn test_even_gaussian_kernel_rejected() {
        let params = EffectParams::new().with_kernel_size(Some(4));
        assert!(params.gaussian_blur().is_err());
        assert!(params.median_blur().is_err());
        assert!(params.box_blur().is_ok());
    }

    #[test]
    fn test_contour_thresholds_ordered() {
        let params = EffectParams::new()
            .with_low_threshold(Some(120.0))
            .with_high_threshold(Some(60.0));
        assert!(params.contour().is_err());
    }
}
