use core::convert::TryInto;

use crate::detector::HitDetector;
use crate::error::BlockSizeError;
use crate::options::DetectorOptions;
use crate::peak_queue::Hit;
use crate::BLOCK_SIZE;

/// One independent [HitDetector] per channel of a planar multi channel
/// signal. Channels are never mixed; each gets its own hits.
#[derive(Clone, Debug)]
pub struct HitDetectorBank<const N: usize> {
    detectors: [HitDetector; N],
}

impl<const N: usize> HitDetectorBank<N> {
    pub fn new() -> Self {
        HitDetectorBank::from_options(DetectorOptions::default())
    }

    pub fn from_options(options: DetectorOptions) -> Self {
        if N == 0 {
            panic!("A detector bank must have at least one channel")
        }
        HitDetectorBank {
            detectors: core::array::from_fn(|_| HitDetector::from_options(options)),
        }
    }

    /// Processes one block per channel. `input` and `output` hold `N`
    /// consecutive blocks of [BLOCK_SIZE] samples, channel 0 first.
    /// The input is copied to the output unchanged. Returns, per channel,
    /// whether a hit fired.
    pub fn process_planar(&mut self, input: &[f32], output: &mut [f32]) -> Result<[bool; N], BlockSizeError> {
        BlockSizeError::check(N * BLOCK_SIZE, input.len(), output.len())?;
        output.copy_from_slice(input);

        let mut fired = [false; N];
        for ((detector, channel), fired) in self
            .detectors
            .iter_mut()
            .zip(input.chunks_exact(BLOCK_SIZE))
            .zip(fired.iter_mut())
        {
            let block: &[f32; BLOCK_SIZE] = channel.try_into().map_err(|_| BlockSizeError::Input {
                expected: N * BLOCK_SIZE,
                actual: input.len(),
            })?;
            *fired = detector.process_block(block);
        }
        Ok(fired)
    }

    /// Removes and returns the oldest pending hit of `channel`.
    pub fn poll_hit(&mut self, channel: usize) -> Option<Hit> {
        self.detectors[channel].poll_hit()
    }

    pub fn detector(&self, channel: usize) -> &HitDetector {
        &self.detectors[channel]
    }

    pub fn channel_count(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for HitDetectorBank<N> {
    fn default() -> Self {
        HitDetectorBank::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_independent() {
        let mut bank = HitDetectorBank::<2>::new();
        let silence = [0.0; 2 * BLOCK_SIZE];
        let mut output = [0.0; 2 * BLOCK_SIZE];
        for _ in 0..2000 {
            assert_eq!(bank.process_planar(&silence, &mut output), Ok([false, false]));
        }

        let mut input = [0.0; 2 * BLOCK_SIZE];
        for (i, sample) in input[BLOCK_SIZE..].iter_mut().enumerate() {
            *sample = if i % 2 == 0 { 0.5 } else { -0.5 };
        }
        assert_eq!(bank.process_planar(&input, &mut output), Ok([false, true]));
        assert_eq!(input, output);

        assert!(bank.poll_hit(0).is_none());
        assert_eq!(bank.poll_hit(1).map(|hit| hit.block), Some(2000));
        assert_eq!(bank.detector(0).block_count(), 2001);
    }

    #[test]
    fn test_wrong_planar_length() {
        let mut bank = HitDetectorBank::<2>::new();
        let input = [0.0; BLOCK_SIZE];
        let mut output = [0.0; BLOCK_SIZE];
        assert_eq!(
            bank.process_planar(&input, &mut output),
            Err(BlockSizeError::Input {
                expected: 2 * BLOCK_SIZE,
                actual: BLOCK_SIZE
            })
        );
    }
}
