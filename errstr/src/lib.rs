//! # errstr
//!
//! Per-thread error context accumulator. Callers prepend formatted
//! messages onto a bounded text buffer owned by the current thread,
//! building a causal chain that reads outermost context first:
//!
//! ```rust
//! errstr::clear();
//! errstr::errstr!("{}", "file not found");
//! errstr::errstr!("{}: ", "open failed");
//! errstr::errstr!("config load failed: ");
//! assert_eq!(
//!     errstr::contents(),
//!     "config load failed: open failed: file not found"
//! );
//! ```
//!
//! ## Guarantees
//!
//! - **Isolation**: every thread owns its buffer; nothing is locked.
//! - **Bounded**: a buffer starts at [`DEFAULT_CAPACITY`] bytes and never
//!   grows past [`MAX_CAPACITY`]. Once full, the newest context wins and
//!   the oldest tail is dropped.
//! - **Infallible**: no operation returns an error or panics. Unrenderable
//!   messages become [`FORMAT_ERROR_TEXT`]; allocation failure degrades to
//!   truncation, or to a no-op if the buffer was never allocated.
//! - **Cleanup**: the buffer is freed when its thread exits.
//!
//! ## Module Structure
//!
//! - [`local`] - the per-thread buffer and its operations
//! - [`buffer`] - the right-aligned [`ErrorBuffer`] engine
//! - [`render`] - bounded rendering of `format_args!`
//! - [`consts`] - build-time limits
//! - [`error`] - construction errors
//! - [`prelude`] - common re-exports

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod consts;
pub mod error;
pub mod local;
mod macros;
pub mod prelude;
pub mod render;

pub use buffer::{BufferLimits, ErrorBuffer};
pub use consts::{DEFAULT_CAPACITY, FORMAT_ERROR_TEXT, MAX_CAPACITY};
pub use error::{BufferError, BufferResult};
pub use local::{
    capacity, clear, contents, contents_ptr, has_content, length, prepend, prepend_str,
    with_contents,
};

/// Initialize a `tracing` subscriber that shows buffer growth, truncation
/// and fallback events. Filtered through `RUST_LOG`; repeated calls are
/// ignored.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
