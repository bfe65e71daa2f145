use std::convert::TryInto;
use std::thread;
use std::time::{Duration, Instant};

use dev_helpers::rtrb;
use dev_helpers::{hit_to_string, push_or_log, AudioEngine, AudioProcessor};
use micro_hit::common::F32ArrayExt;
use micro_hit::{Hit, HitDetector, BLOCK_SIZE};

const SAMPLE_RATE: f32 = 44100.0;
const RUN_TIME: Duration = Duration::from_secs(60);

enum DetectorMessage {
    Hit(Hit),
    InputLevel(f32),
}

struct HitProcessor {
    detector: HitDetector,
}

impl AudioProcessor<DetectorMessage> for HitProcessor {
    fn process(
        &mut self,
        in_buffer: &[f32],
        out_buffer: &mut [f32],
        _: usize,
        to_main_thread: &mut rtrb::Producer<DetectorMessage>,
        _: &mut rtrb::Consumer<DetectorMessage>,
    ) -> bool {
        // Keep the speakers silent to avoid feedback into the microphone.
        for sample in out_buffer.iter_mut() {
            *sample = 0.;
        }

        for chunk in in_buffer.chunks_exact(BLOCK_SIZE) {
            if let Ok(block) = chunk.try_into() {
                self.detector.process_block(block);
            }
        }
        while let Some(hit) = self.detector.poll_hit() {
            push_or_log(to_main_thread, DetectorMessage::Hit(hit), "hit");
        }
        push_or_log(
            to_main_thread,
            DetectorMessage::InputLevel(in_buffer.peak_level_db()),
            "input level",
        );
        true
    }
}

fn main() {
    env_logger::init();

    let processor = HitProcessor {
        detector: HitDetector::new(),
    };
    let mut audio_engine = match AudioEngine::new(SAMPLE_RATE, BLOCK_SIZE as u32, processor) {
        Ok(engine) => engine,
        Err(error) => {
            eprintln!("Failed to start audio engine: {}", error);
            return;
        }
    };
    println!("Listening for hits...");

    let poll_interval_ms = 30;
    let mut input_level_db = f32::NEG_INFINITY;
    let start = Instant::now();
    while start.elapsed() < RUN_TIME {
        thread::sleep(Duration::from_millis(poll_interval_ms));

        while let Ok(message) = audio_engine.from_audio_thread.pop() {
            match message {
                DetectorMessage::Hit(hit) => {
                    let time_s = HitDetector::block_time(hit.block, SAMPLE_RATE);
                    println!("{} (input peak {:.1} dB)", hit_to_string(time_s, hit.loudness_db), input_level_db);
                }
                DetectorMessage::InputLevel(level) => input_level_db = level,
            }
        }
    }
    let _ = audio_engine.stop();
}
