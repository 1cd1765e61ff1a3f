//! Error reporting for the C API.
//!
//! Failures are recorded as [`CommandError`]s (stable code + message) in a
//! per-thread slot that every exported call clears on entry. An init failure
//! has no handle to hang off, so it is also kept process-wide until the next
//! successful `flickrer_init`.

use std::cell::RefCell;
use std::ffi::{c_char, CString};

use flickrer_core::CommandError;
use parking_lot::Mutex;

/// A required pointer argument was null
pub const E_NULL_ARG: &str = "E_NULL_ARG";
/// An argument was not valid UTF-8 or not the expected JSON
pub const E_INVALID_ARG: &str = "E_INVALID_ARG";
/// The call panicked; the handle should be considered unusable
pub const E_PANIC: &str = "E_PANIC";

/// C-string copy of a [`CommandError`], owned by the thread that reads it.
struct StoredError {
    code: CString,
    message: CString,
}

impl StoredError {
    fn new(err: &CommandError) -> Self {
        Self {
            code: CString::new(err.code.as_str()).unwrap_or_default(),
            message: CString::new(err.message.replace('\0', " ")).unwrap_or_default(),
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<StoredError>> = const { RefCell::new(None) };
}

static INIT_ERROR: Mutex<Option<CommandError>> = Mutex::new(None);

/// Record `err` as the calling thread's last error.
pub fn record(err: CommandError) {
    tracing::warn!(code = %err.code, "FFI call failed: {}", err.message);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(StoredError::new(&err)));
}

/// Record an argument or runtime failure raised by the FFI layer itself.
pub fn fail(code: &str, message: impl Into<String>) {
    record(CommandError {
        code: code.to_string(),
        message: message.into(),
    });
}

pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Record a failed `flickrer_init`, visible from every thread.
pub fn record_init_failure(err: CommandError) {
    *INIT_ERROR.lock() = Some(err.clone());
    record(err);
}

pub fn clear_init_failure() {
    *INIT_ERROR.lock() = None;
}

/// Run `f` on the thread's last error, falling back to a pending init
/// failure. The fallback is copied into the thread slot so pointers handed
/// out stay valid until the next call on this thread.
fn with_last_error<R>(f: impl FnOnce(Option<&StoredError>) -> R) -> R {
    LAST_ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            if let Some(err) = INIT_ERROR.lock().as_ref() {
                *slot = Some(StoredError::new(err));
            }
        }
        f(slot.as_ref())
    })
}

pub fn last_error_message_ptr() -> *const c_char {
    with_last_error(|err| err.map_or(std::ptr::null(), |e| e.message.as_ptr()))
}

pub fn last_error_code_ptr() -> *const c_char {
    with_last_error(|err| err.map_or(std::ptr::null(), |e| e.code.as_ptr()))
}
