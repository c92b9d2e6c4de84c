use paper_burn_core::{EffectConfig, PaperBurn, ParticleParams, Viewport};
use std::ptr;
use std::sync::{Mutex, RwLock};

use crate::error::{DefaultPaperBurnError, PaperBurnErrorCode};
use crate::helpers::{track_error, track_result};
use crate::queries::FfiDrawCommand;

/// C-compatible effect configuration.
///
/// Obtain defaults from `paper_burn_default_config()` and override fields as
/// needed. All sizes are in pixels except `grid_size` (cells per side).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperBurnConfig {
    /// Host surface size.
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Paper sheet size.
    pub paper_width: u32,
    pub paper_height: u32,
    /// Grid resolution, 3 to 4096.
    pub grid_size: u32,
    /// Maximum live particles, 1 to 1000000.
    pub particle_capacity: u32,
    /// Seconds for the paper to fade in.
    pub paper_appear_time: f32,
    /// Seconds of burn plus cooldown before the effect may cycle.
    pub total_burn_time: f32,
    pub cooldown: f32,
    /// Random seed; 0 seeds from OS entropy.
    pub seed: u64,
}

impl Default for PaperBurnConfig {
    fn default() -> Self {
        let config = EffectConfig::default();
        Self {
            viewport_width: 1920,
            viewport_height: 1080,
            paper_width: config.paper_width,
            paper_height: config.paper_height,
            grid_size: config.grid_width as u32,
            particle_capacity: config.particles.capacity as u32,
            paper_appear_time: config.paper_appear_time,
            total_burn_time: config.total_burn_time,
            cooldown: config.cooldown,
            seed: 0,
        }
    }
}

impl PaperBurnConfig {
    fn to_effect_config(self) -> EffectConfig {
        let base = EffectConfig::with_grid_size(self.grid_size as usize);
        EffectConfig {
            paper_width: self.paper_width,
            paper_height: self.paper_height,
            paper_appear_time: self.paper_appear_time,
            total_burn_time: self.total_burn_time,
            cooldown: self.cooldown,
            particles: ParticleParams {
                capacity: self.particle_capacity as usize,
                ..base.particles
            },
            ..base
        }
    }
}

/// Reject a zero-sized host surface.
pub(crate) fn validate_viewport(width: u32, height: u32) -> Result<Viewport, DefaultPaperBurnError> {
    if width == 0 || height == 0 {
        return Err(DefaultPaperBurnError::invalid_parameter(format!(
            "Viewport must be non-empty, got {width}x{height}"
        )));
    }
    Ok(Viewport::new(width, height))
}

/// The paper burn effect behind an opaque C handle.
///
/// # Thread Safety
/// The effect sits behind an `RwLock`: queries take the read lock, while
/// `paper_burn_update`, `paper_burn_reset` and `paper_burn_resize` take the
/// write lock. Handles may be shared between a game thread and a render
/// thread.
///
/// # Usage
/// ```cpp
/// PaperBurnConfig config = paper_burn_default_config();
/// config.viewport_width = 1280;
/// config.viewport_height = 720;
///
/// PaperBurnInstance* effect = nullptr;
/// if (paper_burn_new(&config, &effect) != Ok) {
///     fprintf(stderr, "%s\n", paper_burn_get_last_error());
///     return;
/// }
///
/// // Per frame
/// paper_burn_update(effect, delta_seconds, 1.0f);
/// uintptr_t len = 0;
/// const FfiDrawCommand* commands = nullptr;
/// paper_burn_render(effect, &len, &commands);
/// for (uintptr_t i = 0; i < len; i++) {
///     draw(commands[i]);
/// }
///
/// paper_burn_destroy(effect);
/// ```
pub struct PaperBurnInstance {
    pub(crate) effect: RwLock<PaperBurn>,
    /// Draw commands of the latest `paper_burn_render`, reused across frames.
    pub(crate) commands: Mutex<Vec<FfiDrawCommand>>,
}

impl PaperBurnInstance {
    /// Builds an instance from a C configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty viewport and `InvalidConfig`
    /// when the core rejects the configuration.
    pub(crate) fn new(config: &PaperBurnConfig) -> Result<Box<Self>, DefaultPaperBurnError> {
        let viewport = validate_viewport(config.viewport_width, config.viewport_height)?;
        let effect_config = config.to_effect_config();

        let effect = if config.seed == 0 {
            PaperBurn::from_entropy(effect_config, viewport)?
        } else {
            PaperBurn::seeded(effect_config, viewport, config.seed)?
        };

        // Sized only once the config is known to be in range: backdrop,
        // paper texels, one rect per cell, particles, 3 blend switches
        let limits = effect.config();
        let command_capacity = 1
            + effect.texture().len()
            + limits.grid_width * limits.grid_height
            + limits.particles.capacity
            + 3;

        Ok(Box::new(Self {
            effect: RwLock::new(effect),
            commands: Mutex::new(Vec::with_capacity(command_capacity)),
        }))
    }
}

/// Default configuration: 1920x1080 viewport, 600x800 paper, 80x80 grid,
/// 1000 particles, entropy seed.
#[no_mangle]
pub extern "C" fn paper_burn_default_config() -> PaperBurnConfig {
    PaperBurnConfig::default()
}

/// Create a new effect and return it via out-parameter.
///
/// - `config`: configuration to use, or null for `paper_burn_default_config()`.
/// - `out_instance`: receives the instance on success, null on failure.
///
/// Returns
/// - `Ok` (0) on success
/// - `NullPointer` if `out_instance` is null
/// - `InvalidParameter` if the viewport is empty
/// - `InvalidConfig` if the grid, paper, timing or capacity values are out of
///   range (grid sides 3..=4096, paper sides up to 8192 px, 1..=1000000
///   particles)
///
/// # Safety
///
/// - `config` must be null or point to a valid `PaperBurnConfig`.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `paper_burn_destroy`
///   exactly once.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_new(
    config: *const PaperBurnConfig,
    out_instance: *mut *mut PaperBurnInstance,
) -> PaperBurnErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultPaperBurnError::null_pointer("out_instance"));
    }

    let config = unsafe { config.as_ref() }.copied().unwrap_or_default();

    match track_result(PaperBurnInstance::new(&config)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            PaperBurnErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy an effect previously created by `paper_burn_new`.
///
/// A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `paper_burn_new` and not freed already.
/// - The caller must not use the pointer again afterwards.
#[no_mangle]
pub unsafe extern "C" fn paper_burn_destroy(ptr: *mut PaperBurnInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `paper_burn_new` and not yet freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
