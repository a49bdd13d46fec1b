use std::thread;
use std::time::Duration;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use soil_bloom::prelude::*;
use soil_bloom::sampling::rand_range;
use soil_bloom_examples::{demo_image, init_tracing};
use tracing::info;

const VIDEO: Vec2 = Vec2::new(640.0, 480.0);
const FRAMES: u32 = 180;

/// Synthetic hand circling the frame, closing into a fist every other second.
fn observation(frame: u32, rng: &mut StdRng) -> HandObservation {
    let angle = frame as f32 * 0.05;
    let knuckle = VIDEO * 0.5 + Vec2::new(angle.cos() * 180.0, angle.sin() * 120.0);
    let jitter = Vec2::new(rand_range(rng, -2.0, 2.0), rand_range(rng, -2.0, 2.0));
    let knuckle = knuckle + jitter;
    let wrist = knuckle + Vec2::new(0.0, 60.0);
    let fist = (frame / 60) % 2 == 1;
    let tip = if fist {
        knuckle + Vec2::new(0.0, 20.0)
    } else {
        knuckle - Vec2::new(0.0, 70.0)
    };
    HandObservation::new(
        HandLandmarks::new(wrist.extend(0.0), knuckle.extend(0.0), tip.extend(0.0)),
        VIDEO,
    )
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut session = Session::new(SessionConfig::new().with_species(Species::Core))?;
    session.load_image(&demo_image(320, 240)?)?;
    session.generate()?;

    // The gesture model runs at its own pace on another thread.
    let sender = session.hand_sender();
    let producer = thread::spawn(move || {
        let mut rng = StdRng::seed_from_u64(7);
        for frame in 0..FRAMES {
            // Drop out for a while to exercise the mouse fallback.
            if (90..130).contains(&frame) {
                if frame == 90 && !sender.lost() {
                    break;
                }
            } else if !sender.observe(observation(frame, &mut rng)) {
                break;
            }
            thread::sleep(Duration::from_millis(33));
        }
    });

    let mouse = Vec2::new(-200.0, 150.0);
    for _ in 0..FRAMES * 2 {
        if let Some(pointer) = session.tick(mouse) {
            let s = session.interaction();
            if session.tick_count() % 15 == 0 {
                info!(
                    "tick {:>4} {:?}: pos ({:7.1}, {:7.1}) wind {:+.3} lift {:.3} contraction {:.3} fist {}",
                    session.tick_count(),
                    pointer.source,
                    pointer.position.x,
                    pointer.position.y,
                    s.wind,
                    s.vertical_influence,
                    s.contraction,
                    s.is_fist_like
                );
            }
        }
        thread::sleep(Duration::from_millis(16));
    }

    if producer.join().is_err() {
        anyhow::bail!("gesture producer panicked");
    }
    let grown = session
        .population()
        .map_or(0, |p| p.iter().filter(|c| c.is_visible()).count());
    info!("{} creatures visible at the end of the replay.", grown);
    Ok(())
}
