//! A real time transient ("hit") detector for streaming audio, suitable for
//! picking up percussive onsets such as drum hits in a live signal.
//!
//! The detector runs inline in an audio signal path, one block of
//! [BLOCK_SIZE] samples at a time, and never alters the audio passed
//! through it. Per block it
//! * high-pass filters the input with two cascaded second order sections
//!   (4th order, corner around 1 kHz), removing low frequency booms that
//!   would otherwise look like transients,
//! * computes the RMS level over two blocks, overlapping consecutive windows by 50%,
//! * updates an adaptive noise floor estimate,
//! * fires a hit when the rising slope of the RMS level stands out from its
//!   running statistics while the level is well above the noise floor.
//!
//! Detected hits are buffered in a small queue holding at most
//! [PEAK_QUEUE_CAPACITY] hits and retrieved with [HitDetector::poll_hit].
//!
//! Features
//! * `no_std`, no allocations and no locking. Suitable for real time audio threads.
//! * One detector per channel. [HitDetectorBank] runs independent detectors on planar multi channel input.
//!
//! # Example
//!
//! ```
//! use micro_hit::{HitDetector, BLOCK_SIZE};
//!
//! let mut detector = HitDetector::new();
//! let mut output = [0.0; BLOCK_SIZE];
//!
//! // Let the noise floor settle on silence.
//! let silence = [0.0; BLOCK_SIZE];
//! for _ in 0..2000 {
//!     detector.process(&silence, &mut output);
//! }
//!
//! // A loud, bright block.
//! let mut input = [0.0; BLOCK_SIZE];
//! for (i, sample) in input.iter_mut().enumerate() {
//!     *sample = if i % 2 == 0 { 0.5 } else { -0.5 };
//! }
//! detector.process(&input, &mut output);
//! assert_eq!(input, output);
//!
//! // Drain the detected hits between processing calls.
//! while let Some(hit) = detector.poll_hit() {
//!     println!("Hit in block {} at {} dB", hit.block, hit.loudness_db);
//!     assert_eq!(hit.block, 2000);
//! }
//! ```

#![cfg_attr(not(test), no_std)]

mod bank;
pub mod common;
mod detector;
mod error;
mod filter;
mod noise_floor;
mod options;
mod peak_queue;
mod rms;

pub use bank::HitDetectorBank;
pub use detector::{ArmState, HitDetector, SlopeStatistics};
pub use error::BlockSizeError;
pub use filter::{FilterSection, HighPassCascade};
pub use noise_floor::NoiseFloor;
pub use options::DetectorOptions;
pub use peak_queue::{loudness_db, Hit, Peak, PeakQueue, PEAK_QUEUE_CAPACITY};
pub use rms::OverlappedRms;

/// The number of samples per processed block (one render quantum).
pub const BLOCK_SIZE: usize = 128;
