//! Flickrer FFI - C ABI over the photo feed core.
//!
//! # Usage
//!
//! 1. `flickrer_init()` creates a handle
//! 2. `flickrer_feed_subscribe()` registers the snapshot callback; it fires
//!    once immediately and then after every change to the feed
//! 3. `flickrer_feed_*` functions change filters and start fetches
//! 4. `flickrer_shutdown()` frees the handle
//!
//! # Error Handling
//!
//! Functions return `0` on success and `-1` on error; `flickrer_init`
//! returns null. `flickrer_last_error()` and `flickrer_last_error_code()`
//! describe the failure. Fetch failures are not errors at this level: they
//! show up in the snapshot's `error` field.
//!
//! # Memory Management
//!
//! - Strings written to `out_json` and returned by `flickrer_version()`
//!   must be freed with `flickrer_free_string()`
//! - Error strings are owned by the library

mod error;
mod feed;
mod handle;

use error::{
    clear_init_failure, clear_last_error, fail, last_error_code_ptr, last_error_message_ptr,
    record_init_failure, E_INVALID_ARG, E_PANIC,
};
use flickrer_core::CommandError;
use handle::FlickrerHandle;
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

pub use feed::*;
pub use handle::SnapshotCallback;

/// Optional string argument: null means "use the default".
unsafe fn optional_arg(ptr: *const c_char, name: &str) -> Result<Option<String>, CommandError> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| Some(s.to_string()))
        .map_err(|_| CommandError {
            code: E_INVALID_ARG.to_string(),
            message: format!("{} is not valid UTF-8", name),
        })
}

/// Create a feed handle.
///
/// - `data_dir`: directory holding `Config/settings.json` and `Logs/`;
///   null uses the platform data directory
/// - `api_key`: overrides the key from the settings file; null or empty
///   keeps it
///
/// # Returns
/// A handle, or null when the settings cannot be loaded or no API key is
/// configured (see `flickrer_last_error`).
///
/// # Safety
/// Both arguments must be null or valid null-terminated UTF-8 strings.
#[no_mangle]
pub unsafe extern "C" fn flickrer_init(
    data_dir: *const c_char,
    api_key: *const c_char,
) -> *mut FlickrerHandle {
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let data_dir = optional_arg(data_dir, "data_dir")?.map(PathBuf::from);
        let api_key = optional_arg(api_key, "api_key")?;
        FlickrerHandle::new(data_dir, api_key.as_deref()).map_err(CommandError::from)
    }));

    match result {
        Ok(Ok(handle)) => {
            clear_init_failure();
            tracing::info!("Flickrer FFI initialized");
            Box::into_raw(Box::new(handle))
        }
        Ok(Err(err)) => {
            record_init_failure(err);
            std::ptr::null_mut()
        }
        Err(_) => {
            record_init_failure(CommandError {
                code: E_PANIC.to_string(),
                message: "panic during initialization".to_string(),
            });
            std::ptr::null_mut()
        }
    }
}

/// Free a handle. In-flight fetches are abandoned and no further
/// snapshots are delivered.
///
/// # Safety
/// `handle` must be null or a pointer from `flickrer_init` that has not
/// been freed yet. Must not be called from inside the snapshot callback.
#[no_mangle]
pub unsafe extern "C" fn flickrer_shutdown(handle: *mut FlickrerHandle) {
    clear_last_error();

    if handle.is_null() {
        return;
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        drop(Box::from_raw(handle));
        tracing::info!("Flickrer FFI shutdown");
    }));

    if result.is_err() {
        fail(E_PANIC, "panic during shutdown");
    }
}

/// Message of the last failure on this thread, or of a failed
/// `flickrer_init` that no successful init has followed.
///
/// Null if there is none. Valid until the next call on this thread.
#[no_mangle]
pub extern "C" fn flickrer_last_error() -> *const c_char {
    last_error_message_ptr()
}

/// Stable code of the same failure (`E_NULL_ARG`, `E_INVALID_ARG`,
/// `E_PANIC`, `E_CONFIG`, `E_IO`, ...), or null.
#[no_mangle]
pub extern "C" fn flickrer_last_error_code() -> *const c_char {
    last_error_code_ptr()
}

/// Free a string returned by the library.
///
/// # Safety
/// `s` must be null or a string from `flickrer_feed_snapshot_json` or
/// `flickrer_version` that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn flickrer_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Library version; free with `flickrer_free_string()`.
#[no_mangle]
pub extern "C" fn flickrer_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION"))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}
