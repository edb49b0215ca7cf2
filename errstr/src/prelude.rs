//! Prelude module for common re-exports.
//!
//! ```rust
//! use errstr::prelude::*;
//!
//! clear();
//! errstr!("{}", "disk full");
//! assert!(has_content());
//! ```

// ─── Per-thread operations ──────────────────────────────────────────
pub use crate::local::{clear, contents, has_content, length, prepend, prepend_str, with_contents};

// ─── Macros ─────────────────────────────────────────────────────────
pub use crate::{errstr, errstr_exit, errstr_return};

// ─── Standalone buffer ──────────────────────────────────────────────
pub use crate::buffer::{BufferLimits, ErrorBuffer};
pub use crate::error::{BufferError, BufferResult};

// ─── Limits ─────────────────────────────────────────────────────────
pub use crate::consts::{DEFAULT_CAPACITY, FORMAT_ERROR_TEXT, MAX_CAPACITY};
