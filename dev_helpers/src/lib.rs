mod audio;
mod wav;

pub use audio::AudioEngine;
pub use audio::AudioProcessor;
pub use audio::push_or_log;
pub use rtrb;
pub use wav::read_wav;
pub use wav::WavData;

/// Formats a hit as a line with its time and loudness, followed by a bar
/// with one mark per 3 dB above -60 dB.
pub fn hit_to_string(time_s: f64, loudness_db: i32) -> String {
    let bar_length = ((loudness_db + 60).max(0) / 3) as usize;
    format!("{:9.3} s | {:4} dB | {}", time_s, loudness_db, "#".repeat(bar_length))
}
