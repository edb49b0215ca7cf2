//! Per-thread error buffer.
//!
//! Each thread owns one [`ErrorBuffer`], allocated on the first prepend and
//! dropped by the thread-local destructor when the thread exits. Threads
//! never share a buffer, so no locking is involved.
//!
//! Every function here is infallible. When the buffer is missing,
//! unreachable (thread teardown) or already borrowed, readers report an
//! empty message and writers leave the buffer untouched.

use crate::buffer::{BufferLimits, ErrorBuffer};
use crate::render::{render, render_str};
use core::fmt;
use std::cell::RefCell;
use tracing::{trace, warn};

thread_local! {
    static ERRSTR: RefCell<Option<ErrorBuffer>> = const { RefCell::new(None) };
}

/// Returned by [`contents_ptr`] while no buffer exists.
static EMPTY: [u8; 1] = [0];

/// Run `f` against this thread's buffer, if one exists and is reachable.
fn with_buffer<R>(f: impl FnOnce(&ErrorBuffer) -> R) -> Option<R> {
    ERRSTR
        .try_with(|cell| {
            let guard = cell.try_borrow().ok()?;
            guard.as_ref().map(f)
        })
        .ok()
        .flatten()
}

/// Length of this thread's message in bytes. Never allocates.
pub fn length() -> usize {
    with_buffer(ErrorBuffer::len).unwrap_or(0)
}

/// Whether this thread has a non-empty message.
pub fn has_content() -> bool {
    length() > 0
}

/// Capacity of this thread's buffer, 0 before the first prepend.
pub fn capacity() -> usize {
    with_buffer(ErrorBuffer::capacity).unwrap_or(0)
}

/// Borrow this thread's message for the duration of `f`.
///
/// `f` sees `""` when no message exists. Prepending from inside `f` is a
/// no-op.
pub fn with_contents<R>(f: impl FnOnce(&str) -> R) -> R {
    if ERRSTR.try_with(|_| ()).is_err() {
        return f("");
    }

    // Reachable: checked above, and nothing on this thread runs in between.
    ERRSTR.with(|cell| {
        let guard = cell.try_borrow().ok();
        let text = guard
            .as_ref()
            .and_then(|buf| Option::as_ref(buf))
            .map_or("", ErrorBuffer::as_str);
        f(text)
    })
}

/// Owned copy of this thread's message.
pub fn contents() -> String {
    with_contents(str::to_owned)
}

/// NUL-terminated message for C callers.
///
/// The pointer stays valid until the next [`prepend`] or [`clear`] on this
/// thread, or until the thread exits. Points to an empty string while no
/// buffer exists.
pub fn contents_ptr() -> *const u8 {
    with_buffer(|buf| buf.as_bytes_with_nul().as_ptr()).unwrap_or(EMPTY.as_ptr())
}

/// Forget this thread's message. The allocation is kept for reuse.
pub fn clear() {
    let _ = ERRSTR.try_with(|cell| {
        if let Ok(mut guard) = cell.try_borrow_mut() {
            if let Some(buf) = guard.as_mut() {
                buf.clear();
            }
        }
    });
}

/// Render `args` and prepend the result to this thread's message.
///
/// Returns the new message length. Messages that cannot be rendered are
/// replaced by [`FORMAT_ERROR_TEXT`](crate::consts::FORMAT_ERROR_TEXT).
/// Rendering happens before the buffer is borrowed, so `Display` impls
/// may prepend themselves.
pub fn prepend(args: fmt::Arguments<'_>) -> usize {
    let rendered = render(args, BufferLimits::DEFAULT.max_capacity());
    prepend_rendered(rendered.as_str())
}

/// Prepend preformatted `text` to this thread's message.
pub fn prepend_str(text: &str) -> usize {
    let rendered = render_str(text, BufferLimits::DEFAULT.max_capacity());
    prepend_rendered(rendered.as_str())
}

fn prepend_rendered(text: &str) -> usize {
    ERRSTR
        .try_with(|cell| {
            let Ok(mut guard) = cell.try_borrow_mut() else {
                warn!("error buffer is borrowed, prepend dropped");
                return length_of(cell);
            };

            if guard.is_none() {
                match ErrorBuffer::try_new(BufferLimits::DEFAULT) {
                    Ok(buf) => {
                        trace!(capacity = buf.capacity(), "error buffer allocated");
                        *guard = Some(buf);
                    }
                    Err(err) => {
                        warn!(%err, "error buffer unavailable, prepend dropped");
                        return 0;
                    }
                }
            }

            guard.as_mut().map_or(0, |buf| buf.prepend_str(text))
        })
        .unwrap_or(0)
}

/// Length as seen by a reader while a writer could not borrow.
fn length_of(cell: &RefCell<Option<ErrorBuffer>>) -> usize {
    cell.try_borrow()
        .ok()
        .and_then(|guard| guard.as_ref().map(ErrorBuffer::len))
        .unwrap_or(0)
}
