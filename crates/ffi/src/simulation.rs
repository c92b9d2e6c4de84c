use paper_burn_core::{PaperBurn, SpeedMultiplier};

use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, with_effect_mut};
use crate::instance::{validate_viewport, PaperBurnInstance};

/// Advance the effect by one frame of `dt` seconds at `speed` (clamped to
/// `[0.1, 5.0]`, non-finite means 1.0).
///
/// Thread-safe: acquires the write lock.
///
/// If `ptr` is null or `dt` is non-finite or negative this function is a no-op.
#[no_mangle]
pub extern "C" fn paper_burn_update(ptr: *const PaperBurnInstance, dt: f32, speed: f32) {
    if !dt.is_finite() || dt < 0.0 {
        return;
    }

    // Silently ignore errors for void-returning function
    let _ = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_effect_mut(instance, |effect| {
            effect.update(dt, SpeedMultiplier::new(speed));
        })
    });
}

/// Restart the burn on a fresh sheet.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `ptr` is null
/// - `LockPoisoned` if the internal lock is poisoned
#[no_mangle]
pub extern "C" fn paper_burn_reset(ptr: *const PaperBurnInstance) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_effect_mut(instance, PaperBurn::reset)
    })
}

/// Re-fit the paper to a new host surface size.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `ptr` is null
/// - `InvalidParameter` if either dimension is zero
/// - `LockPoisoned` if the internal lock is poisoned
#[no_mangle]
pub extern "C" fn paper_burn_resize(
    ptr: *const PaperBurnInstance,
    width: u32,
    height: u32,
) -> PaperBurnErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let viewport = validate_viewport(width, height)?;
        with_effect_mut(instance, |effect| effect.resize(viewport))?;
        Ok::<(), DefaultPaperBurnError>(())
    })
}
