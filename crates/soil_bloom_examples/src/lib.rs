#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    demo_image, init_tracing, load_pixel_buffer, load_settings, Camera, PngCanvas,
};
