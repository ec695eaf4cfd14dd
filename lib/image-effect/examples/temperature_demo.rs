use image_effect::{
    Effect, ImageEffect,
    filter_effect::{TemperatureConfig, TemperatureKind},
    load_image, save_image,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = load_image("data/test.png")?;

    for kind in [TemperatureKind::Warm, TemperatureKind::Cold] {
        let effect = ImageEffect::Temperature(TemperatureConfig::new(kind));
        let output = output_dir.join(format!("temperature_{kind}.png"));
        save_image(&effect.apply(&img)?, &output)?;

        println!("✓ Temperature {kind}: {}", output.display());
    }

    Ok(())
}
