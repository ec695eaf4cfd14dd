/// Runs every effect with its defaults and reports the time each one takes.
use image_effect::{
    EFFECT_NAMES, EffectParams,
    filter_effect::{TemperatureKind, TintColor},
    load_image, save_image,
};
use std::{path::Path, time::Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = load_image("data/test.png")?;
    let params = EffectParams::new()
        .with_color(Some(TintColor::Magenta))
        .with_temperature(Some(TemperatureKind::Warm));

    println!("{:<12} {:>10}", "effect", "time");
    for name in EFFECT_NAMES {
        let start = Instant::now();
        let out = image_effect::apply(&img, name, &params)?;
        let elapsed = start.elapsed();

        save_image(&out, output_dir.join(format!("{name}.png")))?;
        println!("{name:<12} {elapsed:>10.2?}");
    }

    Ok(())
}
