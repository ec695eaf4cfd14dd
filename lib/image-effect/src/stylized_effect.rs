use crate::{
    Effect, ImageEffectError, ImageEffectResult, base_effect,
    planes::{Planes, sample_clamped},
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use imageproc::{
    edges::canny,
    filter::gaussian_blur_f32,
    gradients::{horizontal_sobel, vertical_sobel},
};
use std::{fmt, str::FromStr};

/// Sobel gradient magnitude of a plane, unclamped.
fn gradient_magnitude(plane: &GrayImage) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let gx = horizontal_sobel(plane);
    let gy = vertical_sobel(plane);

    ImageBuffer::from_fn(plane.width(), plane.height(), |x, y| {
        let dx = gx.get_pixel(x, y)[0] as f32;
        let dy = gy.get_pixel(x, y)[0] as f32;
        Luma([(dx * dx + dy * dy).sqrt()])
    })
}

/// Pencil sketch configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SketchConfig {
    /// Stroke strength, multiplies the edge response
    #[derivative(Default(value = "1.0"))]
    intensity: f32,

    /// Gaussian blur applied before edge extraction
    #[derivative(Default(value = "1.0"))]
    sigma: f32,
}

impl SketchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "sketch sigma must be greater than 0, got {}",
                self.sigma
            )));
        }

        Ok(())
    }
}

impl Effect for SketchConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;

        let gray = base_effect::to_gray(image);
        let blurred = gaussian_blur_f32(&gray, self.sigma);
        let magnitude = gradient_magnitude(&blurred);

        let sketch = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let edge = (magnitude.get_pixel(x, y)[0] * self.intensity).clamp(0.0, 255.0);
            Luma([255 - edge.round() as u8])
        });

        Ok(DynamicImage::ImageLuma8(sketch))
    }
}

/// Contour (Canny boundary map) configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContourConfig {
    #[derivative(Default(value = "50.0"))]
    low_threshold: f32,

    #[derivative(Default(value = "100.0"))]
    high_threshold: f32,
}

impl ContourConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        let valid = |t: f32| t.is_finite() && t >= 0.0;

        if !valid(self.low_threshold) || !valid(self.high_threshold) {
            return Err(ImageEffectError::InvalidParameter(
                "contour thresholds must be non-negative numbers".to_string(),
            ));
        }

        if self.low_threshold > self.high_threshold {
            return Err(ImageEffectError::InvalidParameter(format!(
                "low threshold {} is above high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }

        Ok(())
    }
}

impl Effect for ContourConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;

        let gray = base_effect::to_gray(image);
        let edges = canny(&gray, self.low_threshold, self.high_threshold);
        Ok(DynamicImage::ImageLuma8(edges))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SobelMode {
    Magnitude,
    Horizontal,
    Vertical,
}

impl fmt::Display for SobelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SobelMode::Magnitude => "magnitude",
            SobelMode::Horizontal => "horizontal",
            SobelMode::Vertical => "vertical",
        };
        f.write_str(name)
    }
}

impl FromStr for SobelMode {
    type Err = ImageEffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnitude" | "global" => Ok(SobelMode::Magnitude),
            "horizontal" | "x" => Ok(SobelMode::Horizontal),
            "vertical" | "y" => Ok(SobelMode::Vertical),
            other => Err(ImageEffectError::InvalidParameter(format!(
                "unknown sobel mode: {other}"
            ))),
        }
    }
}

/// Sobel edge detection configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SobelConfig {
    #[derivative(Default(value = "SobelMode::Magnitude"))]
    mode: SobelMode,

    #[derivative(Default(value = "1.0"))]
    intensity: f32,
}

impl SobelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn plane(&self, plane: &GrayImage) -> GrayImage {
        let to_u8 = |v: f32| (v * self.intensity).round().clamp(0.0, 255.0) as u8;

        match self.mode {
            SobelMode::Magnitude => {
                let magnitude = gradient_magnitude(plane);
                GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
                    Luma([to_u8(magnitude.get_pixel(x, y)[0])])
                })
            }
            SobelMode::Horizontal | SobelMode::Vertical => {
                let gradient = if self.mode == SobelMode::Horizontal {
                    horizontal_sobel(plane)
                } else {
                    vertical_sobel(plane)
                };
                GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
                    Luma([to_u8((gradient.get_pixel(x, y)[0] as f32).abs())])
                })
            }
        }
    }
}

impl Effect for SobelConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        Ok(Planes::split(image).map(|plane| self.plane(plane)).merge())
    }
}

/// Directional emboss kernel; its response is offset to mid gray.
pub const EMBOSS_KERNEL: [[i32; 3]; 3] = [[-2, -1, 0], [-1, 0, 1], [0, 1, 2]];

/// Emboss effect configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct EmbossConfig {
    #[derivative(Default(value = "1.0"))]
    strength: f32,
}

impl EmbossConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn plane(&self, plane: &GrayImage) -> GrayImage {
        GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
            let mut sum = 0i32;

            for (ky, row) in EMBOSS_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let px = x as i64 + kx as i64 - 1;
                    let py = y as i64 + ky as i64 - 1;
                    sum += sample_clamped(plane, px, py) as i32 * weight;
                }
            }

            let val = 128.0 + sum as f32 * self.strength;
            Luma([val.round().clamp(0.0, 255.0) as u8])
        })
    }
}

impl Effect for EmbossConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        Ok(Planes::split(image).map(|plane| self.plane(plane)).merge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn flat(value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([value, value, value])))
    }

    /// Dark left half, bright right half.
    fn step() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }))
    }

    #[test]
    fn test_emboss_flat_is_mid_gray() {
        let out = EmbossConfig::new().apply(&flat(77)).unwrap();
        assert!(out.to_rgb8().pixels().all(|p| p.0 == [128, 128, 128]));
    }

    #[test]
    fn test_emboss_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 50])));
        let out = EmbossConfig::new().apply(&img).unwrap();
        assert_eq!(out.as_rgba8().unwrap().get_pixel(1, 1), &Rgba([128, 128, 128, 50]));
    }

    #[test]
    fn test_sobel_flat_is_black() {
        let out = SobelConfig::new().apply(&flat(200)).unwrap();
        assert!(out.to_rgb8().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_sobel_finds_vertical_step() {
        let out = SobelConfig::new().apply(&step()).unwrap().to_rgb8();
        assert_eq!(out.get_pixel(8, 8)[0], 255);
        assert_eq!(out.get_pixel(2, 8)[0], 0);
        assert_eq!(out.get_pixel(13, 8)[0], 0);

        let vertical = SobelConfig::new()
            .with_mode(SobelMode::Vertical)
            .apply(&step())
            .unwrap()
            .to_rgb8();
        assert!(vertical.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_sobel_horizontal_mode_and_intensity() {
        let out = SobelConfig::new()
            .with_mode(SobelMode::Horizontal)
            .apply(&step())
            .unwrap()
            .to_rgb8();
        assert_eq!(out.get_pixel(8, 8)[0], 255);
        assert_eq!(out.get_pixel(2, 8)[0], 0);

        // |gx| = 4 * 255 on both sides of the step
        let scaled = SobelConfig::new()
            .with_mode(SobelMode::Horizontal)
            .with_intensity(0.1)
            .apply(&step())
            .unwrap()
            .to_rgb8();
        assert_eq!(scaled.get_pixel(7, 8)[0], 102);
        assert_eq!(scaled.get_pixel(8, 8)[0], 102);
    }

    #[test]
    fn test_emboss_strength_scales_response() {
        // kernel response across the step is 3 * 255
        let out = EmbossConfig::new().with_strength(0.05).apply(&step()).unwrap().to_rgb8();
        assert_eq!(out.get_pixel(8, 8)[0], 166);
        assert_eq!(out.get_pixel(2, 8)[0], 128);

        let full = EmbossConfig::new().apply(&step()).unwrap().to_rgb8();
        assert_eq!(full.get_pixel(8, 8)[0], 255);

        let none = EmbossConfig::new().with_strength(0.0).apply(&step()).unwrap().to_rgb8();
        assert!(none.pixels().all(|p| p.0 == [128, 128, 128]));
    }

    /// Black and white halves joined by a mid-gray column at x = 7.
    fn ramp() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, _| match x {
            0..=6 => Rgb([0, 0, 0]),
            7 => Rgb([128, 128, 128]),
            _ => Rgb([255, 255, 255]),
        }))
    }

    #[test]
    fn test_sketch_flat_is_white() {
        let out = SketchConfig::new().apply(&flat(0)).unwrap();
        let gray = out.as_luma8().unwrap();
        assert!(gray.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_sketch_draws_dark_strokes_on_edges() {
        let out = SketchConfig::new().apply(&step()).unwrap();
        let gray = out.as_luma8().unwrap();
        assert!(gray.get_pixel(8, 8)[0] < 128);
        assert_eq!(gray.get_pixel(0, 8)[0], 255);
    }

    #[test]
    fn test_contour_is_binary() {
        let out = ContourConfig::new().apply(&ramp()).unwrap();
        let gray = out.as_luma8().unwrap();

        assert!(gray.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(gray.pixels().any(|p| p[0] == 255));
        assert_eq!(gray.get_pixel(2, 8)[0], 0);
    }

    #[test]
    fn test_sketch_rejects_zero_sigma() {
        let result = SketchConfig::new().with_sigma(0.0).apply(&flat(1));
        assert!(matches!(result, Err(ImageEffectError::InvalidParameter(_))));
    }
}
