//! Feed API.
//!
//! Fetch functions return as soon as the fetch is spawned; results arrive
//! through the snapshot callback and `flickrer_feed_snapshot_json`.

use crate::error::{clear_last_error, fail, record, E_INVALID_ARG, E_NULL_ARG, E_PANIC};
use crate::handle::{FlickrerHandle, SnapshotCallback};
use flickrer_core::CommandError;
use std::ffi::{c_char, c_void, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Borrow a required string argument, recording why it is unusable.
unsafe fn arg_str<'a>(ptr: *const c_char, name: &str) -> Option<&'a str> {
    if ptr.is_null() {
        fail(E_NULL_ARG, format!("{} is null", name));
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            fail(E_INVALID_ARG, format!("{} is not valid UTF-8", name));
            None
        }
    }
}

/// Helper to allocate a C string from Rust string.
fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Shared body of every exported function: null check, panic guard.
unsafe fn with_handle<F>(handle: *mut FlickrerHandle, name: &str, f: F) -> i32
where
    F: FnOnce(&FlickrerHandle) -> i32,
{
    clear_last_error();

    let result = catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            fail(E_NULL_ARG, "handle is null");
            return -1;
        }
        f(&*handle)
    }));

    result.unwrap_or_else(|_| {
        fail(E_PANIC, format!("panic in {}", name));
        -1
    })
}

/// Fetch a page of photos for the current filters.
///
/// # Safety
/// `handle` must be a valid pointer from `flickrer_init`.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_fetch_photos(handle: *mut FlickrerHandle, page: u32) -> i32 {
    with_handle(handle, "flickrer_feed_fetch_photos", |handle| {
        let _rt = handle.runtime.enter();
        handle.core.store().spawn_fetch_photos(page);
        0
    })
}

/// Fetch the page after the current one.
///
/// # Safety
/// `handle` must be a valid pointer from `flickrer_init`.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_fetch_next_page(handle: *mut FlickrerHandle) -> i32 {
    with_handle(handle, "flickrer_feed_fetch_next_page", |handle| {
        let store = handle.core.store();
        let page = store.snapshot().next_page();
        let _rt = handle.runtime.enter();
        store.spawn_fetch_photos(page);
        0
    })
}

/// Fetch the tag list of one photo.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `photo_id` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_fetch_tags(
    handle: *mut FlickrerHandle,
    photo_id: *const c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_fetch_tags", |handle| {
        let Some(photo_id) = arg_str(photo_id, "photo_id") else {
            return -1;
        };
        let _rt = handle.runtime.enter();
        handle.core.store().spawn_fetch_tags(photo_id);
        0
    })
}

/// Clear filters and reload the first page.
///
/// # Safety
/// `handle` must be a valid pointer from `flickrer_init`.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_refresh(handle: *mut FlickrerHandle) -> i32 {
    with_handle(handle, "flickrer_feed_refresh", |handle| {
        let _rt = handle.runtime.enter();
        handle.core.store().spawn_refresh();
        0
    })
}

/// Set the search text. Does not fetch.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `query` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_set_text(
    handle: *mut FlickrerHandle,
    query: *const c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_set_text", |handle| {
        let Some(query) = arg_str(query, "query") else {
            return -1;
        };
        handle.core.store().set_text(query);
        0
    })
}

/// Replace the tag filter with a JSON array of strings. Does not fetch.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `tags_json` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_set_selected_tags(
    handle: *mut FlickrerHandle,
    tags_json: *const c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_set_selected_tags", |handle| {
        let Some(json) = arg_str(tags_json, "tags_json") else {
            return -1;
        };
        match serde_json::from_str::<Vec<String>>(json) {
            Ok(tags) => {
                handle.core.store().set_selected_tags(tags);
                0
            }
            Err(e) => {
                fail(E_INVALID_ARG, format!("tags_json is not an array of strings: {}", e));
                -1
            }
        }
    })
}

/// Filter by a single tag, clearing the search text. Does not fetch.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `tag` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_select_tag(
    handle: *mut FlickrerHandle,
    tag: *const c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_select_tag", |handle| {
        let Some(tag) = arg_str(tag, "tag") else {
            return -1;
        };
        handle.core.store().select_tag(tag);
        0
    })
}

/// Toggle the expanded flag of a photo.
///
/// # Returns
/// - `1` if the photo is now expanded
/// - `0` if it is now collapsed or not in the feed
/// - `-1` on error
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `photo_id` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_expand_image(
    handle: *mut FlickrerHandle,
    photo_id: *const c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_expand_image", |handle| {
        let Some(photo_id) = arg_str(photo_id, "photo_id") else {
            return -1;
        };
        let state = handle.core.store().expand_image(photo_id);
        let expanded = state.photo(photo_id).is_some_and(|photo| photo.expanded);
        i32::from(expanded)
    })
}

/// Get the current snapshot as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `out_json` must be a valid pointer; the string written to it must be
///   freed with `flickrer_free_string`.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_snapshot_json(
    handle: *mut FlickrerHandle,
    out_json: *mut *mut c_char,
) -> i32 {
    with_handle(handle, "flickrer_feed_snapshot_json", |handle| {
        if out_json.is_null() {
            fail(E_NULL_ARG, "out_json is null");
            return -1;
        }
        match handle.snapshot_json() {
            Ok(json) => {
                *out_json = string_to_cstr(&json);
                0
            }
            Err(e) => {
                record(CommandError::from(e));
                -1
            }
        }
    })
}

/// Receive every published snapshot through `callback`.
///
/// The current snapshot is delivered once before this function returns, so
/// a late subscriber never starts blank. Registering again replaces the
/// previous callback.
///
/// # Callback context
/// The callback runs on the thread that published the snapshot (usually a
/// runtime worker) while the store holds its publish lock. It must not call
/// any `flickrer_*` function taking this handle: doing so deadlocks. Copy
/// the JSON and hand it to your own thread instead.
///
/// # Safety
/// - `handle` must be a valid pointer from `flickrer_init`.
/// - `callback` must be a valid function pointer.
/// - `user_data` must stay valid, and usable from any thread, until
///   `flickrer_feed_unsubscribe` or `flickrer_shutdown`.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_subscribe(
    handle: *mut FlickrerHandle,
    callback: SnapshotCallback,
    user_data: *mut c_void,
) -> i32 {
    with_handle(handle, "flickrer_feed_subscribe", |handle| {
        handle.listener.attach(callback, user_data, || match handle.snapshot_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to serialize initial snapshot: {}", e);
                None
            }
        });
        tracing::debug!("Snapshot callback registered");
        0
    })
}

/// Stop delivering snapshots.
///
/// # Returns
/// - `1` if a callback was removed
/// - `0` if none was registered
/// - `-1` on error
///
/// # Safety
/// `handle` must be a valid pointer from `flickrer_init`. Must not be called
/// from inside the snapshot callback.
#[no_mangle]
pub unsafe extern "C" fn flickrer_feed_unsubscribe(handle: *mut FlickrerHandle) -> i32 {
    with_handle(handle, "flickrer_feed_unsubscribe", |handle| {
        i32::from(handle.listener.detach())
    })
}
