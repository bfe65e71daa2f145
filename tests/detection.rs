use micro_hit::{HitDetector, BLOCK_SIZE};

const SAMPLE_RATE: f32 = 44100.0;
const SILENCE: [f32; BLOCK_SIZE] = [0.0; BLOCK_SIZE];

/// An exponentially decaying 3 kHz tone starting at the first sample,
/// split into `block_count` blocks.
fn drum_hit(amplitude: f32, block_count: usize) -> Vec<[f32; BLOCK_SIZE]> {
    let decay_samples = 150.0;
    let frequency = 3000.0;
    (0..block_count)
        .map(|block_index| {
            let mut block = [0.0; BLOCK_SIZE];
            for (i, sample) in block.iter_mut().enumerate() {
                let t = (block_index * BLOCK_SIZE + i) as f32;
                let envelope = amplitude * (-t / decay_samples).exp();
                *sample = envelope * (2.0 * std::f32::consts::PI * frequency * t / SAMPLE_RATE).sin();
            }
            block
        })
        .collect()
}

fn settle(detector: &mut HitDetector) {
    for _ in 0..2000 {
        assert!(!detector.process_block(&SILENCE));
    }
}

#[test]
fn silence_never_triggers() {
    let mut detector = HitDetector::new();
    let mut output = [1.0; BLOCK_SIZE];
    for _ in 0..5000 {
        assert!(!detector.process(&SILENCE, &mut output));
    }
    assert_eq!(detector.current_rms(), 0.0);
    assert_eq!(detector.noise_floor(), 0.0);
    assert_eq!(detector.pending_hits(), 0);
    assert!(detector.poll_hit().is_none());
    assert_eq!(output, SILENCE);
}

#[test]
fn single_hit_spanning_several_blocks() {
    let mut detector = HitDetector::new();
    settle(&mut detector);

    let expected_block = detector.block_count();
    let fired: Vec<bool> = drum_hit(0.8, 8)
        .iter()
        .map(|block| detector.process_block(block))
        .collect();
    assert_eq!(fired.iter().filter(|fired| **fired).count(), 1);
    assert!(fired[0]);

    for _ in 0..50 {
        assert!(!detector.process_block(&SILENCE));
    }
    assert!(detector.is_ready());

    let hit = detector.poll_hit().unwrap();
    assert_eq!(hit.block, expected_block);
    assert_eq!(hit.loudness_db, -11);
    assert!(hit.level_db() < -11.0);
    assert_eq!(hit.loudness_db, hit.level_db().trunc() as i32);
    assert_eq!(detector.last_hit_loudness_db(), Some(-11));
    assert!(detector.poll_hit().is_none());
}

#[test]
fn queue_overflow_keeps_latest_four() {
    let mut detector = HitDetector::new();
    settle(&mut detector);

    let mut hit_blocks = Vec::new();
    for amplitude in [0.8, 0.4, 0.2, 0.1, 0.05].iter() {
        hit_blocks.push(detector.block_count());
        for block in drum_hit(*amplitude, 8).iter() {
            detector.process_block(block);
        }
        for _ in 0..40 {
            detector.process_block(&SILENCE);
        }
    }
    assert_eq!(detector.pending_hits(), 4);
    // The oldest hit was dropped through the regular dequeue path.
    assert_eq!(detector.last_hit_loudness_db(), Some(-11));

    let drained: Vec<(u64, i32)> = std::iter::from_fn(|| detector.poll_hit())
        .map(|hit| (hit.block, hit.loudness_db))
        .collect();
    let expected: Vec<(u64, i32)> = hit_blocks[1..]
        .iter()
        .cloned()
        .zip([-17, -23, -29, -35].iter().cloned())
        .collect();
    assert_eq!(drained, expected);

    assert!(detector.poll_hit().is_none());
    assert_eq!(detector.last_hit_loudness_db(), Some(-35));
}

#[test]
fn output_is_input() {
    let mut detector = HitDetector::new();
    let mut output = [0.0; BLOCK_SIZE];
    for block in drum_hit(0.9, 16).iter() {
        detector.process(block, &mut output);
        assert_eq!(&output, block);
    }
}

#[test]
fn low_frequency_boom_is_ignored() {
    let mut detector = HitDetector::new();
    settle(&mut detector);

    // A 40 Hz swell is removed by the high-pass filter.
    for block_index in 0..200 {
        let mut block = [0.0; BLOCK_SIZE];
        for (i, sample) in block.iter_mut().enumerate() {
            let t = (block_index * BLOCK_SIZE + i) as f32;
            let fade_in = (t / 8000.0).min(1.0);
            *sample = 0.5 * fade_in * (2.0 * std::f32::consts::PI * 40.0 * t / SAMPLE_RATE).sin();
        }
        detector.process_block(&block);
    }
    assert_eq!(detector.pending_hits(), 0);
}
