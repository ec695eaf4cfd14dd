use crate::ImageEffectResult;
use image::{DynamicImage, GrayImage, Luma};

/// Invert every color channel, leaving alpha alone.
pub fn negative(image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
    let mut result = image.clone();
    result.invert();
    Ok(result)
}

/// Convert to a single-channel image using BT.601 luma.
pub fn grayscale(image: &DynamicImage) -> ImageEffectResult<DynamicImage> {
    Ok(DynamicImage::ImageLuma8(to_gray(image)))
}

/// Human perception: 0.299*R + 0.587*G + 0.114*B
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

pub(crate) fn to_gray(image: &DynamicImage) -> GrayImage {
    if !image.color().has_color() {
        return image.to_luma8();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let pixel = rgb.get_pixel(x, y);
        Luma([luminance(pixel[0], pixel[1], pixel[2])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_negative_keeps_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40]));
        let out = negative(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(out.to_rgba8().get_pixel(0, 0), &Rgba([245, 235, 225, 40]));
    }

    #[test]
    fn test_grayscale_single_channel() {
        let img = RgbImage::from_pixel(3, 3, Rgb([200, 100, 50]));
        let out = grayscale(&DynamicImage::ImageRgb8(img)).unwrap();

        assert_eq!(out.color().channel_count(), 1);
        assert_eq!(out.as_luma8().unwrap().get_pixel(1, 1)[0], luminance(200, 100, 50));
    }

    #[test]
    fn test_grayscale_of_gray_is_identity() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([x as u8 * 60]));
        let out = grayscale(&DynamicImage::ImageLuma8(img.clone())).unwrap();
        assert_eq!(out.as_luma8().unwrap(), &img);
    }

    #[test]
    fn test_luminance_primaries() {
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
    }
}
