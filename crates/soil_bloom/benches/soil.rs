mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use soil_bloom::soil::{generate, preview, SoilSettings};

const IMAGE_SIZES: [u32; 3] = [256, 512, 1024];
const SPACINGS: [u32; 3] = [2, 6, 12];

fn soil_preview_benches(c: &mut Criterion) {
    for &size in &IMAGE_SIZES {
        let image = common::radial_image(size);
        let mut group = c.benchmark_group(format!("soil/preview/{size}px"));

        for &spacing in &SPACINGS {
            let settings = SoilSettings::new().with_spacing(spacing);
            let expected = preview(&image, &settings).len();
            group.throughput(common::elements_throughput(expected));

            group.bench_with_input(BenchmarkId::from_parameter(spacing), &spacing, |b, _| {
                b.iter(|| {
                    let dots = preview(&image, &settings);
                    black_box(dots.len());
                });
            });
        }

        group.finish();
    }
}

fn soil_generate_benches(c: &mut Criterion) {
    for &size in &IMAGE_SIZES {
        let image = common::radial_image(size);
        let mut group = c.benchmark_group(format!("soil/generate/{size}px"));

        for &spacing in &SPACINGS {
            let settings = SoilSettings::new().with_spacing(spacing);
            let mut rng_est = StdRng::seed_from_u64(0x5011 ^ spacing as u64);
            let expected = generate(&image, &settings, &mut rng_est).len();
            group.throughput(common::elements_throughput(expected));

            let mut rng = StdRng::seed_from_u64(0xB100 ^ spacing as u64);
            group.bench_with_input(BenchmarkId::from_parameter(spacing), &spacing, |b, _| {
                b.iter(|| {
                    let field = generate(&image, &settings, &mut rng);
                    black_box(field.len());
                });
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = soil_preview_benches, soil_generate_benches
}
criterion_main!(benches);
