use thiserror::Error;

/// Returned when a buffer passed to a detector does not hold the expected
/// number of samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BlockSizeError {
    #[error("input buffer holds {actual} samples, expected {expected}")]
    Input { expected: usize, actual: usize },
    #[error("output buffer holds {actual} samples, expected {expected}")]
    Output { expected: usize, actual: usize },
}

impl BlockSizeError {
    pub(crate) fn check(expected: usize, input: usize, output: usize) -> Result<(), Self> {
        if input != expected {
            return Err(BlockSizeError::Input {
                expected,
                actual: input,
            });
        }
        if output != expected {
            return Err(BlockSizeError::Output {
                expected,
                actual: output,
            });
        }
        Ok(())
    }
}
