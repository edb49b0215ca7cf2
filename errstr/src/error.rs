//! Error types for buffer construction and growth.
//!
//! None of these cross the prepend/read/clear surface: those operations
//! degrade instead of failing. They are returned by constructors and used
//! internally to decide between growing and truncating.

use thiserror::Error;

/// Errors that can occur while allocating or configuring an error buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Storage could not be obtained from the allocator
    #[error("Failed to allocate error buffer storage: {requested} bytes")]
    AllocationFailed {
        /// Requested storage size in bytes, terminator included
        requested: usize,
    },

    /// Initial capacity larger than the maximum capacity
    #[error("Invalid buffer limits: initial capacity {initial} exceeds maximum {max}")]
    InvalidLimits {
        /// Requested initial capacity
        initial: usize,
        /// Requested maximum capacity
        max: usize,
    },

    /// Maximum capacity larger than the rendering scratch area
    #[error("Maximum capacity {max} exceeds render scratch capacity {scratch}")]
    LimitsExceedScratch {
        /// Requested maximum capacity
        max: usize,
        /// Scratch capacity the renderer is built with
        scratch: usize,
    },
}

/// Result type for buffer construction and growth
pub type BufferResult<T> = Result<T, BufferError>;
