use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, RgbaImage};
use std::{fmt, str::FromStr};

/// 3x3 matrix applied to the RGB channels of each pixel.
pub type ColorMatrix = [[f32; 3]; 3];

pub const SEPIA_MATRIX: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Run `f` over the RGB channels of every pixel, then blend the result
/// back into the original by `intensity`. Alpha is untouched.
fn map_rgb(
    image: &DynamicImage,
    intensity: f32,
    f: impl Fn([u8; 3]) -> [f32; 3],
) -> DynamicImage {
    let mut rgba: RgbaImage = image.to_rgba8();
    let intensity = intensity.clamp(0.0, 1.0);

    for pixel in rgba.pixels_mut() {
        let filtered = f([pixel[0], pixel[1], pixel[2]]);
        for i in 0..3 {
            let original = pixel[i] as f32;
            let value = original * (1.0 - intensity) + filtered[i] * intensity;
            pixel[i] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(rgba)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).into_rgb8())
    }
}

pub fn transform(matrix: &ColorMatrix, rgb: [u8; 3]) -> [f32; 3] {
    let [r, g, b] = rgb.map(|v| v as f32);
    matrix.map(|row| row[0] * r + row[1] * g + row[2] * b)
}

/// Sepia tone configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SepiaConfig {
    #[derivative(Default(value = "1.0"))]
    intensity: f32,
}

impl SepiaConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SepiaConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        Ok(map_rgb(image, self.intensity, |rgb| {
            transform(&SEPIA_MATRIX, rgb)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
}

impl TintColor {
    pub const ALL: [TintColor; 6] = [
        TintColor::Red,
        TintColor::Green,
        TintColor::Blue,
        TintColor::Yellow,
        TintColor::Cyan,
        TintColor::Magenta,
    ];

    /// Channel mask matrix keeping the channels that make up this color.
    pub fn matrix(&self) -> ColorMatrix {
        let (r, g, b) = match self {
            TintColor::Red => (1.0, 0.0, 0.0),
            TintColor::Green => (0.0, 1.0, 0.0),
            TintColor::Blue => (0.0, 0.0, 1.0),
            TintColor::Yellow => (1.0, 1.0, 0.0),
            TintColor::Cyan => (0.0, 1.0, 1.0),
            TintColor::Magenta => (1.0, 0.0, 1.0),
        };

        [[r, 0.0, 0.0], [0.0, g, 0.0], [0.0, 0.0, b]]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TintColor::Red => "red",
            TintColor::Green => "green",
            TintColor::Blue => "blue",
            TintColor::Yellow => "yellow",
            TintColor::Cyan => "cyan",
            TintColor::Magenta => "magenta",
        }
    }
}

impl fmt::Display for TintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TintColor {
    type Err = ImageEffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        TintColor::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| ImageEffectError::InvalidParameter(format!("unknown color: {s}")))
    }
}

/// Color channel filter configuration
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorConfig {
    color: TintColor,
    intensity: f32,
}

impl ColorConfig {
    pub fn new(color: TintColor) -> Self {
        Self {
            color,
            intensity: 1.0,
        }
    }

    pub fn color(&self) -> TintColor {
        self.color
    }
}

impl Effect for ColorConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        let matrix = self.color.matrix();
        Ok(map_rgb(image, self.intensity, |rgb| transform(&matrix, rgb)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureKind {
    Warm,
    Cold,
}

impl fmt::Display for TemperatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureKind::Warm => f.write_str("warm"),
            TemperatureKind::Cold => f.write_str("cold"),
        }
    }
}

impl FromStr for TemperatureKind {
    type Err = ImageEffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warm" => Ok(TemperatureKind::Warm),
            "cold" | "cool" => Ok(TemperatureKind::Cold),
            other => Err(ImageEffectError::InvalidParameter(format!(
                "unknown temperature: {other}"
            ))),
        }
    }
}

const CURVE_X: [f32; 4] = [0.0, 64.0, 128.0, 255.0];
const INCREASE_Y: [f32; 4] = [0.0, 75.0, 155.0, 255.0];
const DECREASE_Y: [f32; 4] = [0.0, 45.0, 95.0, 255.0];

/// 256-entry lookup table from the cubic through `(CURVE_X[i], ys[i])`.
pub fn curve_lut(ys: &[f32; 4]) -> [u8; 256] {
    let mut lut = [0u8; 256];

    for (x, entry) in lut.iter_mut().enumerate() {
        let x = x as f32;
        let mut y = 0.0;

        // Lagrange form
        for i in 0..4 {
            let mut term = ys[i];
            for j in 0..4 {
                if i != j {
                    term *= (x - CURVE_X[j]) / (CURVE_X[i] - CURVE_X[j]);
                }
            }
            y += term;
        }

        *entry = y.round().clamp(0.0, 255.0) as u8;
    }

    lut
}

pub fn increase_lut() -> [u8; 256] {
    curve_lut(&INCREASE_Y)
}

pub fn decrease_lut() -> [u8; 256] {
    curve_lut(&DECREASE_Y)
}

/// Color temperature configuration
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct TemperatureConfig {
    kind: TemperatureKind,
    intensity: f32,
}

impl TemperatureConfig {
    pub fn new(kind: TemperatureKind) -> Self {
        Self {
            kind,
            intensity: 1.0,
        }
    }

    pub fn kind(&self) -> TemperatureKind {
        self.kind
    }
}

impl Effect for TemperatureConfig {
    fn apply(&self, image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
        let (increase, decrease) = (increase_lut(), decrease_lut());
        let (red, blue) = match self.kind {
            TemperatureKind::Warm => (increase, decrease),
            TemperatureKind::Cold => (decrease, increase),
        };

        Ok(map_rgb(image, self.intensity, |[r, g, b]| {
            [red[r as usize] as f32, g as f32, blue[b as usize] as f32]
        }))
    }
}
