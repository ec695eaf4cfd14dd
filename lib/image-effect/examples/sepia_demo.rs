/// Sepia tone effect example
/// Demonstrates vintage sepia effect at a few intensities
use image_effect::{Effect, ImageEffect, filter_effect::SepiaConfig, load_image, save_image};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = load_image("data/test.png")?;

    for intensity in [0.3, 0.6, 1.0] {
        let effect = ImageEffect::Sepia(SepiaConfig::new().with_intensity(intensity));
        let output = output_dir.join(format!("sepia_{intensity}.png"));
        save_image(&effect.apply(&img)?, &output)?;

        println!("✓ Sepia {intensity}: {}", output.display());
    }

    Ok(())
}
