use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of hits held by a [PeakQueue].
pub const PEAK_QUEUE_CAPACITY: usize = 4;

/// A detected hit as stored in the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// The index of the block the hit was detected in.
    pub block: u64,
    /// The RMS level of the block the hit was detected in.
    pub rms: f32,
}

/// A hit retrieved from the queue.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    pub block: u64,
    pub rms: f32,
    /// The RMS level in dB relative to 1, truncated toward zero.
    /// See [loudness_db].
    pub loudness_db: i32,
}

impl Hit {
    fn from_peak(peak: Peak) -> Self {
        Hit {
            block: peak.block,
            rms: peak.rms,
            loudness_db: loudness_db(peak.rms),
        }
    }

    /// The RMS level in dB relative to 1, without rounding.
    pub fn level_db(&self) -> f32 {
        20.0 * Float::log10(self.rms)
    }
}

/// Converts an RMS level to dB relative to 1, truncated toward zero, so
/// -26.9 dB is reported as -26. The integer precision is part of the hit
/// reporting contract. A level of zero saturates to `i32::MIN`.
pub fn loudness_db(rms: f32) -> i32 {
    Float::trunc(20.0 * Float::log10(rms)) as i32
}

/// A fixed capacity FIFO of detected hits, oldest first.
///
/// Pushing to a full queue first pops the oldest hit through [PeakQueue::pop],
/// so an evicted hit updates the last loudness exactly like a hit retrieved
/// by the caller.
#[derive(Clone, Debug)]
pub struct PeakQueue {
    peaks: [Peak; PEAK_QUEUE_CAPACITY],
    len: usize,
    last_loudness_db: Option<i32>,
}

impl PeakQueue {
    pub fn new() -> Self {
        PeakQueue {
            peaks: [Peak::default(); PEAK_QUEUE_CAPACITY],
            len: 0,
            last_loudness_db: None,
        }
    }

    /// Appends a peak. If the queue is full, the oldest hit is popped
    /// first and returned.
    pub fn push(&mut self, peak: Peak) -> Option<Hit> {
        let evicted = if self.is_full() { self.pop() } else { None };
        self.peaks[self.len] = peak;
        self.len += 1;
        evicted
    }

    /// Removes and returns the oldest hit, if any. Updates the last loudness
    /// when a hit is returned and leaves it untouched otherwise.
    pub fn pop(&mut self) -> Option<Hit> {
        if self.len == 0 {
            return None;
        }
        let hit = Hit::from_peak(self.peaks[0]);
        self.peaks.copy_within(1..self.len, 0);
        self.len -= 1;
        self.last_loudness_db = Some(hit.loudness_db);
        Some(hit)
    }

    /// The loudness of the most recently popped hit, `None` if no hit has been popped yet.
    pub fn last_loudness_db(&self) -> Option<i32> {
        self.last_loudness_db
    }

    /// The queued peaks, oldest first.
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == PEAK_QUEUE_CAPACITY
    }
}

impl Default for PeakQueue {
    fn default() -> Self {
        PeakQueue::new()
    }
}
