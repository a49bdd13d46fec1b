use std::time::Duration;

use criterion::{Criterion, Throughput};
use soil_bloom::luma::LumaGrid;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Radial brightness falloff, bright in the middle.
pub fn radial_image(size: u32) -> LumaGrid {
    let half = size as f32 * 0.5;
    let result = LumaGrid::from_fn(size, size, |x, y| {
        let dx = x as f32 - half;
        let dy = y as f32 - half;
        (255.0 * (1.0 - (dx * dx + dy * dy).sqrt() / half)).max(0.0)
    });
    match result {
        Ok(grid) => grid,
        Err(err) => panic!("bench image: {err}"),
    }
}
