//! C interface to the paper burn effect
//!
//! Every fallible call returns a [`PaperBurnErrorCode`]; details of the last
//! failure on the calling thread are available from
//! [`paper_burn_get_last_error`]. The header `PaperBurnFFI.h` is generated at
//! the workspace root by the build script.

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{paper_burn_get_last_error, paper_burn_get_last_error_code, PaperBurnErrorCode};
pub use instance::{
    paper_burn_default_config, paper_burn_destroy, paper_burn_new, PaperBurnConfig,
    PaperBurnInstance,
};
pub use queries::{
    paper_burn_get_phase, paper_burn_get_stats, paper_burn_particle_count, paper_burn_render,
    FfiBlendMode, FfiDrawCommand, FfiDrawCommandKind, FfiEffectPhase, FfiEffectStats,
};
pub use simulation::{paper_burn_reset, paper_burn_resize, paper_burn_update};
