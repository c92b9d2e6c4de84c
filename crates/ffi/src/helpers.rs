use crate::error::{with_last_error_mut, DefaultPaperBurnError, PaperBurnError, PaperBurnErrorCode};
use crate::instance::PaperBurnInstance;
use paper_burn_core::PaperBurn;
use std::ffi::CString;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl PaperBurnError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl PaperBurnError) -> PaperBurnErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PaperBurnErrorCode::Ok;
    });
}

/// Record the error side of `result` (or clear on success) and pass it on as a code.
pub(crate) fn track_result<T, E: PaperBurnError>(result: Result<T, E>) -> Result<T, PaperBurnErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run an FFI body and collapse its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> PaperBurnErrorCode
where
    F: FnOnce() -> Result<(), DefaultPaperBurnError>,
{
    match track_result(f()) {
        Ok(()) => PaperBurnErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow the instance behind an FFI handle.
///
/// The caller guarantees `ptr` is null or came from `paper_burn_new` and has
/// not been destroyed.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const PaperBurnInstance,
) -> Result<&'a PaperBurnInstance, DefaultPaperBurnError> {
    // SAFETY: non-null handles are live boxes created by `paper_burn_new`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultPaperBurnError::null_pointer("ptr"))
}

/// Run `f` under the effect's read lock.
pub(crate) fn with_effect<F, T>(instance: &PaperBurnInstance, f: F) -> Result<T, DefaultPaperBurnError>
where
    F: FnOnce(&PaperBurn) -> T,
{
    let effect = instance
        .effect
        .read()
        .map_err(|_| DefaultPaperBurnError::lock_poisoned("effect"))?;
    Ok(f(&effect))
}

/// Run `f` under the effect's write lock.
pub(crate) fn with_effect_mut<F, T>(
    instance: &PaperBurnInstance,
    f: F,
) -> Result<T, DefaultPaperBurnError>
where
    F: FnOnce(&mut PaperBurn) -> T,
{
    let mut effect = instance
        .effect
        .write()
        .map_err(|_| DefaultPaperBurnError::lock_poisoned("effect"))?;
    Ok(f(&mut effect))
}
