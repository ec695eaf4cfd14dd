use image::{Rgba, RgbaImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("data")?;

    // 800x600 colorful gradient
    let img = RgbaImage::from_fn(800, 600, |x, y| {
        Rgba([
            (x * 255 / 800) as u8,
            (y * 255 / 600) as u8,
            ((x + y) * 255 / 1400) as u8,
            255,
        ])
    });

    img.save("data/test.png")?;
    println!("Created data/test.png");

    Ok(())
}
