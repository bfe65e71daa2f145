//! C ABI for hosting hit detectors in an audio worklet. Each detector is
//! referred to by a handle returned from `hit_detector_create`.

#[macro_use]
extern crate lazy_static;

use std::sync::{Mutex, MutexGuard};

use log::warn;
use micro_hit::{HitDetector, BLOCK_SIZE};

/// Returned by `hit_detector_get_rms` before any hit has been dequeued.
const NO_LOUDNESS_DB: i32 = -100;

struct DetectorRegistry {
    detectors: Vec<Option<HitDetector>>,
}

impl DetectorRegistry {
    // Slots of destroyed detectors are not reused, so a stale handle can
    // never reach a newer detector.
    fn insert(&mut self, detector: HitDetector) -> u32 {
        self.detectors.push(Some(detector));
        self.detectors.len() as u32
    }

    fn get_mut(&mut self, handle: u32) -> Option<&mut HitDetector> {
        let index = (handle as usize).checked_sub(1)?;
        self.detectors.get_mut(index)?.as_mut()
    }

    fn remove(&mut self, handle: u32) -> Option<HitDetector> {
        let index = (handle as usize).checked_sub(1)?;
        self.detectors.get_mut(index)?.take()
    }
}

lazy_static! {
    static ref REGISTRY: Mutex<DetectorRegistry> = Mutex::new(DetectorRegistry { detectors: Vec::new() });
}

fn registry() -> MutexGuard<'static, DetectorRegistry> {
    // A panic while holding the lock leaves the registry itself consistent.
    REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[no_mangle]
pub extern "C" fn allocate_f32_array(size: usize) -> *mut f32 {
    let mut buf = Vec::<f32>::with_capacity(size);
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    ptr as *mut f32
}

/// Frees an array returned by `allocate_f32_array`.
///
/// # Safety
/// `ptr` must be null or have been returned by `allocate_f32_array(size)`
/// with the same `size`, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn free_f32_array(ptr: *mut f32, size: usize) {
    if ptr.is_null() {
        return;
    }
    drop(Vec::from_raw_parts(ptr, 0, size))
}

/// Creates a detector and returns its handle. Handles are never 0.
#[no_mangle]
pub extern "C" fn hit_detector_create() -> u32 {
    registry().insert(HitDetector::new())
}

#[no_mangle]
pub extern "C" fn hit_detector_destroy(handle: u32) {
    if registry().remove(handle).is_none() {
        warn!("Tried to destroy unknown hit detector {}", handle);
    }
}

/// Copies `channel_count` planar blocks of 128 samples from `input_ptr` to
/// `output_ptr` and runs detection on the first channel. Returns false if
/// nothing was processed.
///
/// # Safety
/// Unless null, `input_ptr` must be valid for reads and `output_ptr` valid
/// for writes of `channel_count * 128` samples, and the two regions must
/// not overlap.
#[no_mangle]
pub unsafe extern "C" fn hit_detector_process(
    handle: u32,
    input_ptr: *const f32,
    output_ptr: *mut f32,
    channel_count: u32,
) -> bool {
    if input_ptr.is_null() || output_ptr.is_null() || channel_count == 0 {
        return false;
    }
    let mut registry = registry();
    let detector = match registry.get_mut(handle) {
        Some(detector) => detector,
        None => return false,
    };

    let sample_count = (channel_count as usize) * BLOCK_SIZE;
    let input: &[f32] = std::slice::from_raw_parts(input_ptr, sample_count);
    let output: &mut [f32] = std::slice::from_raw_parts_mut(output_ptr, sample_count);

    output[BLOCK_SIZE..].copy_from_slice(&input[BLOCK_SIZE..]);
    detector
        .process_slice(&input[..BLOCK_SIZE], &mut output[..BLOCK_SIZE])
        .is_ok()
}

/// Dequeues the oldest pending hit and returns its block index, or 0 if
/// there is none. After a non-zero result, `hit_detector_get_rms` returns
/// the loudness of that hit.
#[no_mangle]
pub extern "C" fn hit_detector_get_hit(handle: u32) -> f64 {
    registry()
        .get_mut(handle)
        .and_then(|detector| detector.poll_hit())
        .map(|hit| hit.block as f64)
        .unwrap_or(0.0)
}

/// The loudness in integer dB of the last dequeued hit.
#[no_mangle]
pub extern "C" fn hit_detector_get_rms(handle: u32) -> i32 {
    registry()
        .get_mut(handle)
        .and_then(|detector| detector.last_hit_loudness_db())
        .unwrap_or(NO_LOUDNESS_DB)
}

/// The RMS level of the latest processed block.
#[no_mangle]
pub extern "C" fn hit_detector_current_rms(handle: u32) -> f32 {
    registry()
        .get_mut(handle)
        .map(|detector| detector.current_rms())
        .unwrap_or(0.0)
}
