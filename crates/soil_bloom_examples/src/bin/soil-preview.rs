use soil_bloom::prelude::*;
use soil_bloom_examples::{demo_image, init_tracing, load_pixel_buffer, load_settings, PngCanvas};
use tracing::info;

// Usage: soil-preview [image.png] [settings.ron]
fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let image_path = args.next();
    let settings = match args.next() {
        Some(path) => load_settings(path)?,
        None => SoilSettings::new().with_shape(SoilShape::Square),
    };

    // Fall back to a generated image so the example runs without assets.
    let dots = match image_path {
        Some(path) => {
            let buffer = load_pixel_buffer(&path)?;
            info!("Previewing {} ({}x{}).", path, buffer.width(), buffer.height());
            preview(&buffer, &settings)
        }
        None => preview(&demo_image(640, 480)?, &settings),
    };
    info!("{} preview dots.", dots.len());

    let mut canvas = PngCanvas::new(640, 480, [18, 18, 22]);
    canvas.draw_preview(&dots, settings.shape, [235, 225, 200]);
    canvas.save("soil-preview.png")?;

    Ok(())
}
