use paper_burn_core::ConfigError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - the code returned to the caller
/// - `msg()` - diagnostic text, readable through `paper_burn_get_last_error`
pub(crate) trait PaperBurnError {
    fn code(&self) -> PaperBurnErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `PaperBurnError` for the FFI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultPaperBurnError {
    code: PaperBurnErrorCode,
    msg: String,
}

impl DefaultPaperBurnError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PaperBurnErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"effect"`, `"commands"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: PaperBurnErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for an effect configuration rejected by the core.
    pub fn invalid_config(error: &ConfigError) -> Self {
        Self {
            code: PaperBurnErrorCode::InvalidConfig,
            msg: format!("Invalid effect configuration: {error}"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: PaperBurnErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl PaperBurnError for DefaultPaperBurnError {
    fn code(&self) -> PaperBurnErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<ConfigError> for DefaultPaperBurnError {
    fn from(error: ConfigError) -> Self {
        Self::invalid_config(&error)
    }
}

/// FFI error codes returned by paper burn functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperBurnErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Effect configuration rejected (grid too small, empty paper, zero capacity).
    InvalidConfig = 3,

    /// Invalid parameter passed to function.
    InvalidParameter = 4,
}

impl From<DefaultPaperBurnError> for PaperBurnErrorCode {
    fn from(error: DefaultPaperBurnError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The CString is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, PaperBurnErrorCode)> = const { RefCell::new((None, PaperBurnErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PaperBurnErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PaperBurnErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// PaperBurnInstance* effect = nullptr;
/// PaperBurnErrorCode err = paper_burn_new(&config, &effect);
/// if (err != Ok) {
///     const char* error = paper_burn_get_last_error();
///     if (error) {
///         printf("Paper burn creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn paper_burn_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn paper_burn_get_last_error_code() -> PaperBurnErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
