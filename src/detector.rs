use core::convert::TryInto;

use log::{debug, trace};
use num_traits::Float;

use crate::error::BlockSizeError;
use crate::filter::HighPassCascade;
use crate::noise_floor::NoiseFloor;
use crate::options::DetectorOptions;
use crate::peak_queue::{Hit, Peak, PeakQueue};
use crate::rms::OverlappedRms;
use crate::BLOCK_SIZE;

/// Exponential running mean and variance of the positive RMS slope.
#[derive(Clone, Copy, Debug)]
pub struct SlopeStatistics {
    mean: f32,
    variance: f32,
    std_dev: f32,
    smoothing: f32,
    min_variance_cap: f32,
}

impl SlopeStatistics {
    pub fn new(initial_variance: f32, smoothing: f32, min_variance_cap: f32) -> Self {
        SlopeStatistics {
            mean: 0.0,
            variance: initial_variance,
            std_dev: Float::sqrt(initial_variance),
            smoothing,
            min_variance_cap,
        }
    }

    /// Folds in a new slope value. `deviation` is the slope minus the mean
    /// before this update. Its square is capped at twice the current variance
    /// (and at least `min_variance_cap`) so the large deviation caused by a
    /// hit does not blow up the variance.
    pub fn update(&mut self, slope: f32, deviation: f32) {
        let weight = 1.0 - self.smoothing;
        self.mean = self.smoothing * self.mean + weight * slope;
        let cap = Float::max(2.0 * self.variance, self.min_variance_cap);
        let deviation_sq = Float::min(deviation * deviation, cap);
        self.variance = self.smoothing * self.variance + weight * deviation_sq;
        self.std_dev = Float::sqrt(self.variance);
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn variance(&self) -> f32 {
        self.variance
    }

    pub fn std_dev(&self) -> f32 {
        self.std_dev
    }
}

/// Hysteresis state of the hit detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmState {
    /// A new hit may fire.
    Ready,
    /// A hit fired and the slope has not yet returned near its mean.
    Suppressed,
}

/// Detects percussive onsets in a single channel of audio, processed in
/// blocks of [BLOCK_SIZE] samples.
///
/// Per block, the input is high-pass filtered, the RMS level of the last two
/// blocks is computed and the noise floor is updated. A hit fires when the
/// positive RMS slope exceeds its running mean by `sigma_multiple` standard
/// deviations while the RMS level is `sensitivity` times above the noise
/// floor. No further hit fires until the slope falls back within one standard
/// deviation of its mean. Hits are queued and retrieved with [HitDetector::poll_hit].
///
/// Processing never allocates, blocks or modifies the audio passed through it.
#[derive(Clone, Debug)]
pub struct HitDetector {
    options: DetectorOptions,
    cascade: HighPassCascade,
    rms: OverlappedRms,
    noise_floor: NoiseFloor,
    slope_stats: SlopeStatistics,
    state: ArmState,
    prev_rms: f32,
    block_count: u64,
    queue: PeakQueue,
}

impl HitDetector {
    pub fn new() -> Self {
        HitDetector::from_options(DetectorOptions::default())
    }

    pub fn from_options(options: DetectorOptions) -> Self {
        options.validate();
        HitDetector {
            options,
            cascade: HighPassCascade::new(),
            rms: OverlappedRms::new(BLOCK_SIZE),
            noise_floor: NoiseFloor::new(
                options.initial_noise_floor,
                options.floor_drop,
                options.floor_rise,
            ),
            slope_stats: SlopeStatistics::new(
                options.initial_variance,
                options.stats_smoothing,
                options.min_variance_cap,
            ),
            state: ArmState::Ready,
            prev_rms: 0.0,
            block_count: 0,
            queue: PeakQueue::new(),
        }
    }

    /// Copies `input` to `output` unchanged and runs detection on `input`.
    /// Returns true if a hit fired in this block.
    pub fn process(&mut self, input: &[f32; BLOCK_SIZE], output: &mut [f32; BLOCK_SIZE]) -> bool {
        output.copy_from_slice(input);
        self.process_block(input)
    }

    /// Like [HitDetector::process], for buffers whose length is only known at run time.
    pub fn process_slice(&mut self, input: &[f32], output: &mut [f32]) -> Result<bool, BlockSizeError> {
        BlockSizeError::check(BLOCK_SIZE, input.len(), output.len())?;
        let input: &[f32; BLOCK_SIZE] = input.try_into().map_err(|_| BlockSizeError::Input {
            expected: BLOCK_SIZE,
            actual: input.len(),
        })?;
        output.copy_from_slice(input);
        Ok(self.process_block(input))
    }

    /// Runs detection on a block without producing output.
    /// Returns true if a hit fired in this block.
    pub fn process_block(&mut self, block: &[f32; BLOCK_SIZE]) -> bool {
        let sum_sq = self.cascade.sum_of_squares(block);
        let rms = self.rms.process(sum_sq);
        self.noise_floor.update(rms);
        let fired = self.detect(rms);
        self.block_count += 1;
        fired
    }

    fn detect(&mut self, rms: f32) -> bool {
        let slope = Float::max(rms - self.prev_rms, 0.0);
        self.prev_rms = rms;
        let deviation = slope - self.slope_stats.mean();
        let std_dev = self.slope_stats.std_dev();

        let mut fired = false;
        match self.state {
            ArmState::Ready => {
                if deviation > self.options.sigma_multiple * std_dev
                    && rms > self.options.sensitivity * self.noise_floor.level()
                {
                    self.fire(rms);
                    self.state = ArmState::Suppressed;
                    fired = true;
                }
            }
            ArmState::Suppressed => {
                if deviation < std_dev {
                    trace!("Re-armed at block {}", self.block_count);
                    self.state = ArmState::Ready;
                }
            }
        }

        self.slope_stats.update(slope, deviation);
        fired
    }

    fn fire(&mut self, rms: f32) {
        debug!("Hit at block {}, rms {}", self.block_count, rms);
        let evicted = self.queue.push(Peak {
            block: self.block_count,
            rms,
        });
        if let Some(hit) = evicted {
            debug!("Hit queue full, dropped hit at block {}", hit.block);
        }
    }

    /// Removes and returns the oldest detected hit not yet retrieved.
    pub fn poll_hit(&mut self) -> Option<Hit> {
        self.queue.pop()
    }

    /// The loudness of the most recently dequeued hit, including hits
    /// dropped because the queue was full. `None` until a hit has been dequeued.
    pub fn last_hit_loudness_db(&self) -> Option<i32> {
        self.queue.last_loudness_db()
    }

    /// The number of queued hits.
    pub fn pending_hits(&self) -> usize {
        self.queue.len()
    }

    /// The number of processed blocks. A hit detected in the next block
    /// gets this value as its block index.
    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// The RMS level computed for the latest block.
    pub fn current_rms(&self) -> f32 {
        self.prev_rms
    }

    pub fn noise_floor(&self) -> f32 {
        self.noise_floor.level()
    }

    pub fn slope_mean(&self) -> f32 {
        self.slope_stats.mean()
    }

    pub fn slope_std_dev(&self) -> f32 {
        self.slope_stats.std_dev()
    }

    pub fn state(&self) -> ArmState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ArmState::Ready
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// The start time in seconds of the block with the given index.
    pub fn block_time(block: u64, sample_rate: f32) -> f64 {
        (block as f64) * (BLOCK_SIZE as f64) / (sample_rate as f64)
    }
}

impl Default for HitDetector {
    fn default() -> Self {
        HitDetector::new()
    }
}
