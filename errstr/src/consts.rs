//! Build-time buffer limits for the errstr workspace.
//!
//! Single source of truth for buffer sizes and the fallback text.
//! Sizes ending in `_BUF_SIZE` include the trailing NUL byte; sizes ending
//! in `_CAPACITY` count message bytes only.

use static_assertions::const_assert;

/// Size of a freshly allocated per-thread buffer, terminator included.
pub const DEFAULT_BUF_SIZE: usize = 256;

/// Upper bound on a per-thread buffer, terminator included.
///
/// Matches glibc `BUFSIZ`. Unbounded nesting of prepends never grows a
/// buffer past this size.
pub const MAX_BUF_SIZE: usize = 8192;

/// Message capacity of a freshly allocated buffer.
pub const DEFAULT_CAPACITY: usize = DEFAULT_BUF_SIZE - 1;

/// Largest message capacity a buffer may grow to.
pub const MAX_CAPACITY: usize = MAX_BUF_SIZE - 1;

/// Bound of the stack scratch area a message is rendered into.
pub const SCRATCH_CAPACITY: usize = MAX_CAPACITY;

/// Text prepended in place of a message that could not be rendered.
pub const FORMAT_ERROR_TEXT: &str = "(format error) ";

const_assert!(MAX_BUF_SIZE >= DEFAULT_BUF_SIZE);
const_assert!(DEFAULT_BUF_SIZE > 0);
const_assert!(FORMAT_ERROR_TEXT.len() <= DEFAULT_CAPACITY);
