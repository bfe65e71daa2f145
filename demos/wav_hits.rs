use std::convert::TryInto;
use std::env;

use dev_helpers::{hit_to_string, read_wav};
use log::info;
use micro_hit::{HitDetector, BLOCK_SIZE};

fn main() {
    env_logger::init();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: wav_hits <file.wav>");
            return;
        }
    };
    let wav = match read_wav(&path) {
        Ok(wav) => wav,
        Err(error) => {
            eprintln!("Failed to read {}: {}", path, error);
            return;
        }
    };
    info!(
        "Read {} samples, {} channel(s) at {} Hz",
        wav.samples.len(),
        wav.channel_count,
        wav.sample_rate
    );

    let mut detector = HitDetector::new();
    let sample_rate = wav.sample_rate as f32;
    let mut hit_count = 0;
    for chunk in wav.first_channel().chunks_exact(BLOCK_SIZE) {
        let block: &[f32; BLOCK_SIZE] = match chunk.try_into() {
            Ok(block) => block,
            Err(_) => break,
        };
        detector.process_block(block);
        while let Some(hit) = detector.poll_hit() {
            hit_count += 1;
            println!("{}", hit_to_string(HitDetector::block_time(hit.block, sample_rate), hit.loudness_db));
        }
    }
    println!("{} hits in {} blocks", hit_count, detector.block_count());
}
