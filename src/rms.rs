use num_traits::Float;

/// Computes the RMS level over windows of two blocks that overlap by 50%.
/// Only the squared sum of the previous block is kept, so consecutive calls
/// give a smoothed envelope without buffering samples.
#[derive(Clone, Copy, Debug)]
pub struct OverlappedRms {
    prev_sum_sq: f32,
    window_size: f32,
}

impl OverlappedRms {
    pub fn new(block_size: usize) -> Self {
        if block_size == 0 {
            panic!("Block size must be greater than 0")
        }
        OverlappedRms {
            prev_sum_sq: 0.0,
            window_size: (2 * block_size) as f32,
        }
    }

    /// Takes the sum of squares of the current block and returns the RMS
    /// level of the window made up of the previous and current block.
    pub fn process(&mut self, sum_sq: f32) -> f32 {
        let rms = Float::sqrt((sum_sq + self.prev_sum_sq) / self.window_size);
        self.prev_sum_sq = sum_sq;
        rms
    }

    pub fn prev_sum_sq(&self) -> f32 {
        self.prev_sum_sq
    }
}
