//! C ABI for the per-thread error context buffer.
//!
//! Exposes the functions declared in `include/errstr.h`. The printf-style
//! `errstrf` / `verrstrf` entry points live in the header as inline
//! wrappers: they render with `vsnprintf` and hand the result to
//! [`errstr_prepend`].
//!
//! No function here fails or unwinds. A NULL message counts as a
//! formatting failure and prepends the fallback text.

use errstr::FORMAT_ERROR_TEXT;
use libc::{c_char, c_int, size_t};
use std::ffi::CStr;
use tracing::trace;

/// Length of the calling thread's message in bytes.
#[unsafe(no_mangle)]
pub extern "C" fn errstr_length() -> size_t {
    errstr::length()
}

/// NUL-terminated message of the calling thread.
///
/// Never NULL. Valid until the next `errstr_prepend` or `errstr_clear` on
/// the calling thread, or until that thread exits.
#[unsafe(no_mangle)]
pub extern "C" fn errstr_location() -> *const c_char {
    errstr::contents_ptr().cast()
}

/// Forget the calling thread's message.
#[unsafe(no_mangle)]
pub extern "C" fn errstr_clear() {
    errstr::clear();
}

/// Non-zero when the calling thread has a message.
#[unsafe(no_mangle)]
pub extern "C" fn errstr_present() -> c_int {
    c_int::from(errstr::has_content())
}

/// Prepend an already formatted message. Returns the new length.
///
/// Invalid UTF-8 is replaced with U+FFFD. NULL prepends the fallback text.
///
/// # Safety
///
/// `msg` must be NULL or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn errstr_prepend(msg: *const c_char) -> size_t {
    if msg.is_null() {
        trace!("NULL message prepended");
        return errstr::prepend_str(FORMAT_ERROR_TEXT);
    }

    // SAFETY: the caller guarantees a valid NUL-terminated string.
    let text = unsafe { CStr::from_ptr(msg) };
    errstr::prepend_str(&text.to_string_lossy())
}
