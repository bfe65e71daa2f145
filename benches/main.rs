use criterion::{black_box, criterion_group, criterion_main, Criterion};
use micro_hit::{HighPassCascade, HitDetector, BLOCK_SIZE};

fn noise_block(seed: u32) -> [f32; BLOCK_SIZE] {
    let mut state = seed;
    let mut block = [0.0; BLOCK_SIZE];
    for sample in block.iter_mut() {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        *sample = (state >> 8) as f32 / (1 << 24) as f32 - 0.5;
    }
    block
}

fn detector_benchmarks(c: &mut Criterion) {
    let input = noise_block(1);
    let mut output = [0.0; BLOCK_SIZE];

    let mut detector = HitDetector::new();
    c.bench_function("Detector, one block", |b| {
        b.iter(|| detector.process(black_box(&input), &mut output))
    });

    let mut cascade = HighPassCascade::new();
    c.bench_function("High-pass cascade, one block", |b| {
        b.iter(|| cascade.sum_of_squares(black_box(&input[..])))
    });
}

criterion_group!(benches, detector_benchmarks);
criterion_main!(benches);
