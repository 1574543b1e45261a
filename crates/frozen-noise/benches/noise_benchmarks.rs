use criterion::{Criterion, black_box, criterion_group, criterion_main};
use frozen_noise::*;
use glam::IVec3;

fn bench_improved_noise_sample(c: &mut Criterion) {
    let noise = ImprovedNoise::new(&mut XoroshiroRandom::new(42));
    c.bench_function("improved_noise_sample", |bencher| {
        bencher.iter(|| black_box(noise.noise(black_box(12.3), black_box(-4.5), black_box(67.8))))
    });
}

fn bench_field_sample(c: &mut Criterion) {
    let field = NoiseField::new(42);
    c.bench_function("field_sample", |bencher| {
        bencher.iter(|| {
            black_box(field.sample(NoiseVariant::Xoroshiro, black_box(1.25), 0.0, 3.5))
        })
    });
}

fn bench_snapshot_sample_vec3(c: &mut Criterion) {
    let bundle = NoiseField::new(42).snapshot();
    c.bench_function("snapshot_sample_vec3", |bencher| {
        bencher.iter(|| {
            black_box(bundle.sample_vec3(NoiseVariant::Xoroshiro, black_box(0.5), 0.35, 0.5))
        })
    });
}

fn bench_disk_scan_sampling(c: &mut Criterion) {
    let noise = ImprovedNoise::new(&mut LegacyRandom::new(42));
    c.bench_function("disk_scan_sampling_r10", |bencher| {
        bencher.iter(|| {
            let mut total = 0.0;
            for x in -10..=10 {
                for z in -10..=10 {
                    total += sample_at(&noise, IVec3::new(x, 64, z), 0.05, false, false);
                }
            }
            black_box(total)
        })
    });
}

fn bench_reseed(c: &mut Criterion) {
    let field = NoiseField::new(0);
    let mut seed = 0i64;
    c.bench_function("reseed", |bencher| {
        bencher.iter(|| {
            seed += 1;
            black_box(field.set_seed(seed))
        })
    });
}

criterion_group!(
    benches,
    bench_improved_noise_sample,
    bench_field_sample,
    bench_snapshot_sample_vec3,
    bench_disk_scan_sampling,
    bench_reseed,
);
criterion_main!(benches);
