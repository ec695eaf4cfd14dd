use crate::{
    Effect, ImageEffectError, ImageEffectResult,
    planes::{Planes, sample_clamped},
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::median_filter;

fn check_kernel_size(effect: &str, kernel_size: u32, odd: bool) -> ImageEffectResult<()> {
    if kernel_size == 0 || (odd && kernel_size % 2 == 0) {
        let expected = if odd { "an odd number" } else { "at least 1" };
        return Err(ImageEffectError::InvalidParameter(format!(
            "{effect} kernel size must be {expected}, got {kernel_size}"
        )));
    }

    Ok(())
}

/// Normalized `kernel_size`-tap Gaussian weights centered on the middle tap.
pub fn gaussian_kernel(kernel_size: u32, sigma: f32) -> Vec<f32> {
    let center = (kernel_size as f64 - 1.0) / 2.0;
    let denominator = 2.0 * (sigma as f64).powi(2);

    let weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / denominator).exp()
        })
        .collect();

    let total: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / total) as f32).collect()
}

/// Gaussian blur configuration
///
/// The window is exactly `kernel_size` wide in both directions.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "5"))]
    kernel_size: u32,

    /// 0 derives sigma from the kernel size
    #[derivative(Default(value = "0.0"))]
    sigma: f32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        check_kernel_size("gaussian", self.kernel_size, true)?;

        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "gaussian sigma must be 0 or positive, got {}",
                self.sigma
            )));
        }

        Ok(())
    }

    pub fn effective_sigma(&self) -> f32 {
        if self.sigma > 0.0 {
            self.sigma
        } else {
            0.3 * ((self.kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        }
    }

    // Horizontal then vertical pass in f32, rounded once at the end
    fn plane(plane: &GrayImage, kernel: &[f32]) -> GrayImage {
        let (width, height) = plane.dimensions();
        let radius = (kernel.len() / 2) as i64;

        let mut rows = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let value: f32 = kernel
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        w * sample_clamped(plane, x as i64 + i as i64 - radius, y as i64) as f32
                    })
                    .sum();
                rows.push(value);
            }
        }

        GrayImage::from_fn(width, height, |x, y| {
            let value: f32 = kernel
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let sy = (y as i64 + i as i64 - radius).clamp(0, height as i64 - 1) as u32;
                    w * rows[(sy * width + x) as usize]
                })
                .sum();

            Luma([value.round().clamp(0.0, 255.0) as u8])
        })
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;

        let sigma = self.effective_sigma();
        log::debug!("gaussian blur {0}x{0} with sigma {sigma}", self.kernel_size);

        let kernel = gaussian_kernel(self.kernel_size, sigma);
        Ok(Planes::split(image)
            .map(|plane| Self::plane(plane, &kernel))
            .merge())
    }
}

/// Median blur configuration (using imageproc)
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct MedianBlurConfig {
    #[derivative(Default(value = "5"))]
    kernel_size: u32,
}

impl MedianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        check_kernel_size("median", self.kernel_size, true)
    }
}

impl Effect for MedianBlurConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;

        let radius = self.kernel_size / 2;
        Ok(Planes::split(image)
            .map(|plane| median_filter(plane, radius, radius))
            .merge())
    }
}

/// Box blur configuration (manual implementation)
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BoxBlurConfig {
    #[derivative(Default(value = "5"))]
    kernel_size: u32,
}

impl BoxBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        check_kernel_size("box", self.kernel_size, false)
    }

    fn plane(&self, plane: &GrayImage) -> GrayImage {
        let size = self.kernel_size as i64;
        let start = -(size / 2);
        let end = start + size - 1;
        let count = (size * size) as f64;

        GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
            let mut sum = 0u64;

            for dy in start..=end {
                for dx in start..=end {
                    sum += sample_clamped(plane, x as i64 + dx, y as i64 + dy) as u64;
                }
            }

            Luma([(sum as f64 / count).round().clamp(0.0, 255.0) as u8])
        })
    }
}

impl Effect for BoxBlurConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;
        Ok(Planes::split(image).map(|plane| self.plane(plane)).merge())
    }
}

/// Bilateral blur configuration (manual implementation)
///
/// Smooths while keeping edges: a neighbour's weight falls off both with its
/// distance and with how different its color is from the center pixel.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BilateralBlurConfig {
    /// Diameter of the pixel neighbourhood
    #[derivative(Default(value = "5"))]
    kernel_size: u32,

    #[derivative(Default(value = "75.0"))]
    sigma_color: f32,

    #[derivative(Default(value = "75.0"))]
    sigma_space: f32,
}

impl BilateralBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageEffectResult<()> {
        check_kernel_size("bilateral", self.kernel_size, false)?;

        for (name, sigma) in [
            ("sigma-color", self.sigma_color),
            ("sigma-space", self.sigma_space),
        ] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(ImageEffectError::InvalidParameter(format!(
                    "bilateral {name} must be greater than 0, got {sigma}"
                )));
            }
        }

        Ok(())
    }

    fn filter(&self, planes: &[GrayImage]) -> Vec<GrayImage> {
        let Some(first) = planes.first() else {
            return vec![];
        };
        let (width, height) = first.dimensions();
        let radius = (self.kernel_size / 2) as i64;

        // Coefficients in f64: 2 * sigma^2 underflows f32 for tiny sigmas
        let color_denominator = 2.0 * (self.sigma_color as f64).powi(2);
        let space_denominator = 2.0 * (self.sigma_space as f64).powi(2);

        // Color distance is the L1 distance summed over all planes
        let max_distance = 255 * planes.len();
        let color_weights: Vec<f32> = (0..=max_distance)
            .map(|d| {
                let d = d as f64;
                (-(d * d) / color_denominator).exp() as f32
            })
            .collect();

        let mut offsets = vec![];
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let r2 = dx * dx + dy * dy;
                if r2 <= radius * radius {
                    let weight = (-(r2 as f64) / space_denominator).exp() as f32;
                    offsets.push((dx, dy, weight));
                }
            }
        }

        let mut output = vec![GrayImage::new(width, height); planes.len()];
        let mut sums = vec![0.0f32; planes.len()];

        for y in 0..height {
            for x in 0..width {
                let center: Vec<u8> = planes.iter().map(|p| p.get_pixel(x, y)[0]).collect();
                let mut weight_sum = 0.0;
                sums.iter_mut().for_each(|s| *s = 0.0);

                for &(dx, dy, space_weight) in &offsets {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    let distance: usize = planes
                        .iter()
                        .zip(&center)
                        .map(|(p, &c)| sample_clamped(p, nx, ny).abs_diff(c) as usize)
                        .sum();

                    let weight = space_weight * color_weights[distance];
                    weight_sum += weight;
                    for (sum, plane) in sums.iter_mut().zip(planes) {
                        *sum += weight * sample_clamped(plane, nx, ny) as f32;
                    }
                }

                for (out, sum) in output.iter_mut().zip(&sums) {
                    let value = (sum / weight_sum).round().clamp(0.0, 255.0) as u8;
                    out.put_pixel(x, y, Luma([value]));
                }
            }
        }

        output
    }
}

impl Effect for BilateralBlurConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        self.validate()?;

        let mut planes = Planes::split(image);
        planes.color = self.filter(&planes.color);
        Ok(planes.merge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn noisy() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(9, 9, |x, y| {
            if (x, y) == (4, 4) {
                Rgb([255, 255, 255])
            } else {
                Rgb([10, 20, 30])
            }
        }))
    }

    fn flat() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(7, 5, Rgb([60, 90, 120])))
    }

    #[test]
    fn test_blurs_keep_flat_images() {
        let img = flat();

        let effects: Vec<Box<dyn Effect>> = vec![
            Box::new(MedianBlurConfig::new()),
            Box::new(BoxBlurConfig::new()),
            Box::new(BilateralBlurConfig::new()),
        ];

        for effect in effects {
            assert_eq!(effect.apply(&img).unwrap(), img);
        }
    }

    #[test]
    fn test_median_removes_single_outlier() {
        let out = MedianBlurConfig::new().with_kernel_size(3).apply(&noisy()).unwrap();
        assert_eq!(out.as_rgb8().unwrap().get_pixel(4, 4), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_box_blur_averages_window() {
        let out = BoxBlurConfig::new().with_kernel_size(3).apply(&noisy()).unwrap();
        let pixel = out.as_rgb8().unwrap().get_pixel(4, 4);
        // (8 * 10 + 255) / 9 = 37.2
        assert_eq!(pixel[0], 37);
        assert_eq!(out.as_rgb8().unwrap().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_gaussian_spreads_bright_pixel() {
        let out = GaussianBlurConfig::new().apply(&noisy()).unwrap();
        let out = out.as_rgb8().unwrap();
        assert!(out.get_pixel(4, 4)[0] < 255);
        assert!(out.get_pixel(4, 5)[0] > 10);
    }

    #[test]
    fn test_gaussian_sigma_from_kernel_size() {
        let config = GaussianBlurConfig::new().with_kernel_size(5);
        assert!((config.effective_sigma() - 1.1).abs() < 1e-6);

        let config = config.with_sigma(2.5);
        assert_eq!(config.effective_sigma(), 2.5);
    }

    #[test]
    fn test_bilateral_preserves_strong_edge() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(10, 4, |x, _| {
            if x < 5 { Rgb([0, 0, 0]) } else { Rgb([250, 250, 250]) }
        }));
        let out = BilateralBlurConfig::new()
            .with_sigma_color(10.0)
            .apply(&img)
            .unwrap();

        assert_eq!(out, img);
    }

    #[test]
    fn test_gaussian_keeps_flat_image() {
        let img = flat();
        for kernel_size in [1, 3, 5, 9] {
            let out = GaussianBlurConfig::new()
                .with_kernel_size(kernel_size)
                .apply(&img)
                .unwrap();
            assert_eq!(out, img, "kernel size {kernel_size}");
        }
    }

    #[test]
    fn test_gaussian_window_is_bounded_by_kernel_size() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(31, 31, |x, y| {
            if (x, y) == (15, 15) { Luma([255]) } else { Luma([0]) }
        }));

        let small = GaussianBlurConfig::new()
            .with_kernel_size(3)
            .with_sigma(3.0)
            .apply(&img)
            .unwrap();
        let small = small.as_luma8().unwrap();
        assert!(small.get_pixel(15, 16)[0] > 0);
        assert_eq!(small.get_pixel(15, 18)[0], 0);
        assert_eq!(small.get_pixel(18, 15)[0], 0);

        let large = GaussianBlurConfig::new()
            .with_kernel_size(31)
            .with_sigma(3.0)
            .apply(&img)
            .unwrap();
        assert!(large.as_luma8().unwrap().get_pixel(15, 18)[0] > 0);
    }

    #[test]
    fn test_gaussian_kernel_is_normalized() {
        let kernel = gaussian_kernel(7, 1.5);
        assert_eq!(kernel.len(), 7);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert_eq!(kernel[0], kernel[6]);
        assert!(kernel[3] > kernel[2]);

        // sigma so small that 2 * sigma^2 is 0 in f32
        let kernel = gaussian_kernel(3, 1e-30);
        assert_eq!(kernel, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_box_blur_huge_kernel_on_tiny_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([255])));
        let out = BoxBlurConfig::new().with_kernel_size(4200).apply(&img).unwrap();
        assert_eq!(out.as_luma8().unwrap().get_pixel(0, 0), &Luma([255]));
    }

    #[test]
    fn test_bilateral_tiny_sigmas_keep_flat_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([200, 200, 200])));

        for config in [
            BilateralBlurConfig::new().with_sigma_color(1e-30),
            BilateralBlurConfig::new().with_sigma_space(1e-30),
        ] {
            assert_eq!(config.apply(&img).unwrap(), img);
        }
    }

    #[test]
    fn test_kernel_size_validation() {
        assert!(GaussianBlurConfig::new().with_kernel_size(2).validate().is_err());
        assert!(MedianBlurConfig::new().with_kernel_size(0).validate().is_err());
        assert!(BoxBlurConfig::new().with_kernel_size(4).validate().is_ok());
        assert!(BilateralBlurConfig::new().with_sigma_space(0.0).validate().is_err());
    }
}
