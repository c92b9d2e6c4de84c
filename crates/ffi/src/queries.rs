use paper_burn_core::{BlendMode, DrawCommand, EffectPhase, EffectStats, PaperBurn};
use std::ptr;

use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_effect};
use crate::instance::PaperBurnInstance;

/// Blend mode for fills that follow a `SetBlendMode` command.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiBlendMode {
    /// Source-over alpha blending.
    Normal = 0,
    /// `dst + src * alpha`, saturating.
    Additive = 1,
}

impl From<BlendMode> for FfiBlendMode {
    fn from(mode: BlendMode) -> Self {
        match mode {
            BlendMode::Normal => Self::Normal,
            BlendMode::Additive => Self::Additive,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDrawCommandKind {
    /// Only `blend` is meaningful.
    SetBlendMode = 0,
    /// Rectangle and colour fields are meaningful.
    FillRect = 1,
}

/// Flattened draw command.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiDrawCommand {
    pub kind: FfiDrawCommandKind,
    pub blend: FfiBlendMode,
    /// Top-left corner in viewport pixels, may be negative.
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<DrawCommand> for FfiDrawCommand {
    fn from(command: DrawCommand) -> Self {
        match command {
            DrawCommand::SetBlendMode(mode) => Self {
                kind: FfiDrawCommandKind::SetBlendMode,
                blend: mode.into(),
                x: 0,
                y: 0,
                w: 0,
                h: 0,
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            DrawCommand::FillRect { rect, color } => Self {
                kind: FfiDrawCommandKind::FillRect,
                blend: FfiBlendMode::Normal,
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
                r: color.r,
                g: color.g,
                b: color.b,
                a: color.a,
            },
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEffectPhase {
    FadingIn = 0,
    Burning = 1,
    Dormant = 2,
}

impl From<EffectPhase> for FfiEffectPhase {
    fn from(phase: EffectPhase) -> Self {
        match phase {
            EffectPhase::FadingIn => Self::FadingIn,
            EffectPhase::Burning => Self::Burning,
            EffectPhase::Dormant => Self::Dormant,
        }
    }
}

/// FFI-friendly snapshot of the effect's state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FfiEffectStats {
    /// Effect clock in seconds since the last reset.
    pub elapsed: f32,
    pub phase: FfiEffectPhase,
    pub live_particles: usize,
    /// Spawns refused because the pool was full.
    pub dropped_particles: u64,
    /// Cells above the burn threshold.
    pub hot_cells: usize,
    pub fire_mass: f32,
    /// Fractions of cells with any burn / ash (0.0 - 1.0).
    pub burned_fraction: f32,
    pub ash_fraction: f32,
    pub cycles_completed: u64,
}

impl From<EffectStats> for FfiEffectStats {
    fn from(stats: EffectStats) -> Self {
        Self {
            elapsed: stats.elapsed,
            phase: stats.phase.into(),
            live_particles: stats.live_particles,
            dropped_particles: stats.dropped_particles,
            hot_cells: stats.hot_cells,
            fire_mass: stats.fire_mass,
            burned_fraction: stats.burned_fraction,
            ash_fraction: stats.ash_fraction,
            cycles_completed: stats.cycles_completed,
        }
    }
}

#[no_mangle]
/// Build the current frame and return a borrowed pointer to its draw commands.
///
/// Commands are in painter's order. The buffer is reused between calls, so
/// the pointer is valid until the next `paper_burn_render` on this instance.
/// **DO NOT FREE THIS POINTER**.
///
/// Returns
/// - `Ok` (0) with the array in `out_array` and its length in `out_len`
/// - `NullPointer` if `ptr`, `out_len` or `out_array` is null
/// - `LockPoisoned` if an internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_len` and `out_array` must be valid, non-null pointers to writable memory.
pub unsafe extern "C" fn paper_burn_render(
    ptr: *const PaperBurnInstance,
    out_len: *mut usize,
    out_array: *mut *const FfiDrawCommand,
) -> PaperBurnErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultPaperBurnError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut commands = instance
            .commands
            .lock()
            .map_err(|_| DefaultPaperBurnError::lock_poisoned("commands"))?;
        commands.clear();

        with_effect(instance, |effect| {
            commands.extend(effect.render().into_iter().map(FfiDrawCommand::from));
        })?;

        unsafe {
            *out_len = commands.len();
            *out_array = commands.as_ptr();
        }
        Ok::<(), DefaultPaperBurnError>(())
    });

    // Set to null on error (per documentation contract)
    if result != PaperBurnErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[no_mangle]
/// Write the current lifecycle phase to `out_phase`.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_phase` must be a valid, non-null pointer to writable memory.
pub unsafe extern "C" fn paper_burn_get_phase(
    ptr: *const PaperBurnInstance,
    out_phase: *mut FfiEffectPhase,
) -> PaperBurnErrorCode {
    if out_phase.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_phase"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let phase = with_effect(instance, |effect| effect.phase())?;
        unsafe {
            *out_phase = phase.into();
        }
        Ok::<(), DefaultPaperBurnError>(())
    })
}

#[no_mangle]
/// Fill `out_stats` with a snapshot of the effect's state.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `paper_burn_new` or null.
/// - `out_stats` must be a valid, non-null pointer to writable memory.
pub unsafe extern "C" fn paper_burn_get_stats(
    ptr: *const PaperBurnInstance,
    out_stats: *mut FfiEffectStats,
) -> PaperBurnErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_effect(instance, PaperBurn::stats)?;
        unsafe {
            *out_stats = stats.into();
        }
        Ok::<(), DefaultPaperBurnError>(())
    })
}

#[no_mangle]
/// Number of live particles, or 0 if `ptr` is null.
pub extern "C" fn paper_burn_particle_count(ptr: *const PaperBurnInstance) -> usize {
    instance_from_ptr(ptr)
        .and_then(|instance| with_effect(instance, |effect| effect.particles().len()))
        .unwrap_or(0)
}
