//! Channel planes.
//!
//! Spatial filters run on one 8-bit channel at a time. `Planes` splits an image into
//! its color planes (1 for gray, 3 for RGB) plus an optional alpha plane and merges
//! them back into the same layout afterwards.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

#[derive(Debug, Clone)]
pub struct Planes {
    pub color: Vec<GrayImage>,
    pub alpha: Option<GrayImage>,
}

impl Planes {
    pub fn split(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let has_alpha = image.color().has_alpha();

        if image.color().has_color() {
            let rgba = image.to_rgba8();
            let plane = |c: usize| GrayImage::from_fn(width, height, |x, y| {
                Luma([rgba.get_pixel(x, y)[c]])
            });

            Self {
                color: vec![plane(0), plane(1), plane(2)],
                alpha: has_alpha.then(|| plane(3)),
            }
        } else {
            let luma_alpha = image.to_luma_alpha8();
            let plane = |c: usize| GrayImage::from_fn(width, height, |x, y| {
                Luma([luma_alpha.get_pixel(x, y)[c]])
            });

            Self {
                color: vec![plane(0)],
                alpha: has_alpha.then(|| plane(1)),
            }
        }
    }

    pub fn map(self, f: impl Fn(&GrayImage) -> GrayImage) -> Self {
        Self {
            color: self.color.iter().map(f).collect(),
            alpha: self.alpha,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.color
            .first()
            .map(|plane| plane.dimensions())
            .unwrap_or((0, 0))
    }

    pub fn merge(self) -> DynamicImage {
        let (width, height) = self.dimensions();
        let sample = |plane: &GrayImage, x: u32, y: u32| plane.get_pixel(x, y)[0];

        match (self.color.as_slice(), &self.alpha) {
            ([r, g, b], Some(a)) => DynamicImage::ImageRgba8(ImageBuffer::from_fn(
                width,
                height,
                |x, y| {
                    Rgba([
                        sample(r, x, y),
                        sample(g, x, y),
                        sample(b, x, y),
                        sample(a, x, y),
                    ])
                },
            )),
            ([r, g, b], None) => DynamicImage::ImageRgb8(ImageBuffer::from_fn(
                width,
                height,
                |x, y| Rgb([sample(r, x, y), sample(g, x, y), sample(b, x, y)]),
            )),
            ([l], Some(a)) => DynamicImage::ImageLumaA8(ImageBuffer::from_fn(
                width,
                height,
                |x, y| LumaA([sample(l, x, y), sample(a, x, y)]),
            )),
            ([l, ..], _) => DynamicImage::ImageLuma8(l.clone()),
            ([], _) => DynamicImage::ImageLuma8(GrayImage::new(0, 0)),
        }
    }
}

/// Clamp-to-edge sample of `plane` at a signed position.
pub fn sample_clamped(plane: &GrayImage, x: i64, y: i64) -> u8 {
    let x = x.clamp(0, plane.width() as i64 - 1) as u32;
    let y = y.clamp(0, plane.height() as i64 - 1) as u32;
    plane.get_pixel(x, y)[0]
}
