use crate::{ImageEffectError, ImageEffectResult};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::path::Path;

/// Decode the image at `path`, sniffing the format from its content.
pub fn load_image(path: impl AsRef<Path>) -> ImageEffectResult<DynamicImage> {
    let path = path.as_ref();
    let decode_failure = |source: ImageError| ImageEffectError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .map_err(|e| decode_failure(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_failure(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_failure)?;

    log::debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image)
}

/// Encode `image` to `path`; the format follows the file extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> ImageEffectResult<()> {
    let path = path.as_ref();
    let encode_failure = |source: ImageError| ImageEffectError::EncodeFailure {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(encode_failure)?;

    // JPEG has no alpha channel
    let result = if format == ImageFormat::Jpeg && image.color().has_alpha() {
        log::debug!("dropping alpha channel for {}", path.display());
        let flattened = if image.color().has_color() {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            DynamicImage::ImageLuma8(image.to_luma8())
        };
        flattened.save_with_format(path, format)
    } else {
        image.save_with_format(path, format)
    };

    result.map_err(encode_failure)
}
