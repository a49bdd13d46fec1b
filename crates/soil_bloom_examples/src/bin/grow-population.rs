use glam::Vec2;
use soil_bloom::prelude::*;
use soil_bloom_examples::{demo_image, init_tracing, load_pixel_buffer, Camera, PngCanvas};
use tracing::info;

const CANVAS: (u32, u32) = (1200, 800);
const TICKS: u32 = 360;

// Usage: grow-population [species] [image.png]
fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let species: Species = match args.next() {
        Some(name) => name.parse()?,
        None => Species::Ring,
    };

    let config = SessionConfig::new()
        .with_canvas_size(Vec2::new(CANVAS.0 as f32, CANVAS.1 as f32))
        .with_species(species)
        .with_seed(2025);
    let mut session = Session::new(config)?;

    let mut events = VecSink::new();
    match args.next() {
        Some(path) => session.load_image_with_events(&load_pixel_buffer(path)?, &mut events)?,
        None => session.load_image_with_events(&demo_image(640, 480)?, &mut events)?,
    }
    session.set_settings(SoilSettings::new().with_spacing(5).with_dot_size(10.0))?;
    session.generate_with_events(&mut events)?;
    for event in events.as_slice() {
        info!("{:?}", event);
    }

    // Tilt the camera down a little before growing.
    session.begin_drag(Vec2::ZERO);
    session.drag_to(Vec2::new(60.0, -90.0));
    session.end_drag();

    // Scripted pointer: a slow sweep left to right across the upper half.
    for frame in 0..TICKS {
        let t = frame as f32 / TICKS as f32;
        let pointer = Vec2::new(
            (t * 2.0 - 1.0) * CANVAS.0 as f32 * 0.5,
            -(t * std::f32::consts::PI).sin() * CANVAS.1 as f32 * 0.3,
        );
        session.tick(pointer);
    }

    let state = session.interaction();
    info!(
        "After {} ticks: wind {:.3}, lift {:.3}, contraction {:.3}.",
        session.tick_count(),
        state.wind,
        state.vertical_influence,
        state.contraction
    );

    let camera = Camera::from_interaction(state, CANVAS);
    let mut canvas = PngCanvas::new(CANVAS.0, CANVAS.1, [12, 14, 20]).with_camera(camera);
    session.display(&mut canvas);
    canvas.save(format!("grow-population-{species}.png"))?;

    Ok(())
}
