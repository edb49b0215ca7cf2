//! Right-aligned error context buffer.
//!
//! Content grows leftwards: every prepend lands directly in front of the
//! existing message, so the buffer reads outermost context first and the
//! innermost cause last.
//!
//! ```text
//!  storage: [ free ............ | content ............ | \0 ]
//!            0          capacity - length        capacity
//! ```
//!
//! ## Overflow policy
//!
//! When a prepend does not fit the free space the buffer first grows, up
//! to [`BufferLimits::max_capacity`]. If the message still does not fit
//! (limit reached or allocation failed) the newest text wins: the prepend
//! is clipped to the full capacity and the oldest content is dropped from
//! the tail. Every cut lands on a UTF-8 char boundary, so the content is
//! always a valid `&str`.

use crate::consts::{DEFAULT_CAPACITY, MAX_CAPACITY, SCRATCH_CAPACITY};
use crate::error::{BufferError, BufferResult};
use crate::render::render;
use core::fmt;
use tracing::{debug, warn};

/// Capacity bounds of an [`ErrorBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    initial_capacity: usize,
    max_capacity: usize,
}

impl BufferLimits {
    /// Limits used by the per-thread buffer.
    pub const DEFAULT: Self = Self {
        initial_capacity: DEFAULT_CAPACITY,
        max_capacity: MAX_CAPACITY,
    };

    /// Validate and build limits.
    ///
    /// # Errors
    ///
    /// - [`BufferError::InvalidLimits`] if `initial_capacity > max_capacity`
    /// - [`BufferError::LimitsExceedScratch`] if `max_capacity` is larger
    ///   than the render scratch area
    pub const fn new(initial_capacity: usize, max_capacity: usize) -> BufferResult<Self> {
        if initial_capacity > max_capacity {
            return Err(BufferError::InvalidLimits {
                initial: initial_capacity,
                max: max_capacity,
            });
        }
        if max_capacity > SCRATCH_CAPACITY {
            return Err(BufferError::LimitsExceedScratch {
                max: max_capacity,
                scratch: SCRATCH_CAPACITY,
            });
        }
        Ok(Self {
            initial_capacity,
            max_capacity,
        })
    }

    /// Capacity allocated up front.
    #[inline]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Capacity the buffer never grows past.
    #[inline]
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Bounded, right-aligned message buffer.
pub struct ErrorBuffer {
    /// `capacity` message bytes followed by one NUL byte.
    storage: Vec<u8>,
    capacity: usize,
    length: usize,
    limits: BufferLimits,
}

impl ErrorBuffer {
    /// Allocate an empty buffer at `limits.initial_capacity()`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] if the allocator refuses
    /// the request.
    pub fn try_new(limits: BufferLimits) -> BufferResult<Self> {
        let capacity = limits.initial_capacity;
        Ok(Self {
            storage: allocate_storage(capacity)?,
            capacity,
            length: 0,
            limits,
        })
    }

    /// Message length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the buffer holds no message.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Usable capacity of the current allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Limits this buffer was built with.
    #[inline]
    pub fn limits(&self) -> BufferLimits {
        self.limits
    }

    /// Bytes that can be prepended without growing or truncating.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity - self.length
    }

    #[inline]
    fn start(&self) -> usize {
        self.capacity - self.length
    }

    /// Message bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[self.start()..self.capacity]
    }

    /// Message bytes followed by the NUL terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.storage[self.start()..]
    }

    /// Message text.
    pub fn as_str(&self) -> &str {
        // Only whole `&str`s are copied in and every cut is char aligned.
        debug_assert!(core::str::from_utf8(self.as_bytes()).is_ok());
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Drop the message, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.length = 0;
    }

    /// Render `args` and prepend the result. Returns the new length.
    ///
    /// Unrenderable messages are replaced by
    /// [`FORMAT_ERROR_TEXT`](crate::consts::FORMAT_ERROR_TEXT).
    pub fn prepend_fmt(&mut self, args: fmt::Arguments<'_>) -> usize {
        let rendered = render(args, self.limits.max_capacity);
        self.prepend_str(rendered.as_str())
    }

    /// Prepend `text` in front of the current message. Returns the new
    /// length.
    pub fn prepend_str(&mut self, text: &str) -> usize {
        let mut text = text;

        if text.len() > self.free() {
            let wanted = (text.len() + self.length).min(self.limits.max_capacity);
            if wanted > self.capacity {
                if let Err(err) = self.grow(wanted) {
                    warn!(%err, "error buffer growth failed, truncating instead");
                }
            }

            if text.len() > self.capacity {
                let cut = floor_char_boundary(text.as_bytes(), self.capacity);
                debug!(
                    dropped = text.len() - cut,
                    "prepended message clipped to buffer capacity"
                );
                text = &text[..cut];
            }

            let room = self.capacity - text.len();
            if room < self.length {
                self.truncate_oldest(room);
            }
        }

        let end = self.start();
        let begin = end - text.len();
        self.storage[begin..end].copy_from_slice(text.as_bytes());
        self.length += text.len();
        self.length
    }

    /// Reallocate to `capacity`, moving the message to its new right-aligned
    /// position. Never shrinks.
    fn grow(&mut self, capacity: usize) -> BufferResult<()> {
        if capacity <= self.capacity {
            return Ok(());
        }

        let mut storage = allocate_storage(capacity)?;
        storage[capacity - self.length..capacity].copy_from_slice(self.as_bytes());

        debug!(from = self.capacity, to = capacity, "error buffer grown");
        self.storage = storage;
        self.capacity = capacity;
        Ok(())
    }

    /// Keep at most `keep` bytes of the newest content, dropping the tail.
    fn truncate_oldest(&mut self, keep: usize) {
        let start = self.start();
        let kept = floor_char_boundary(self.as_bytes(), keep);

        self.storage
            .copy_within(start..start + kept, self.capacity - kept);
        debug!(
            dropped = self.length - kept,
            "oldest error context dropped to make room"
        );
        self.length = kept;
    }
}

impl fmt::Display for ErrorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ErrorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBuffer")
            .field("capacity", &self.capacity)
            .field("length", &self.length)
            .field("contents", &self.as_str())
            .finish()
    }
}

/// Zeroed storage for `capacity` message bytes plus the terminator.
fn allocate_storage(capacity: usize) -> BufferResult<Vec<u8>> {
    let requested = capacity + 1;
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(requested)
        .map_err(|_| BufferError::AllocationFailed { requested })?;
    storage.resize(requested, 0);
    Ok(storage)
}

/// Largest char boundary of UTF-8 `bytes` at or below `index`.
fn floor_char_boundary(bytes: &[u8], index: usize) -> usize {
    if index >= bytes.len() {
        return bytes.len();
    }
    // Continuation bytes look like 0b10xx_xxxx.
    (0..=index)
        .rev()
        .find(|&i| bytes[i] & 0xC0 != 0x80)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FORMAT_ERROR_TEXT;

    fn small(initial: usize, max: usize) -> ErrorBuffer {
        ErrorBuffer::try_new(BufferLimits::new(initial, max).unwrap()).unwrap()
    }

    #[test]
    fn new_buffer_is_empty_and_terminated() {
        let buf = ErrorBuffer::try_new(BufferLimits::DEFAULT).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), DEFAULT_CAPACITY);
        assert_eq!(buf.as_str(), "");
        assert_eq!(buf.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn prepend_builds_chain() {
        let mut buf = ErrorBuffer::try_new(BufferLimits::DEFAULT).unwrap();
        assert_eq!(buf.prepend_fmt(format_args!("{}", "file not found")), 14);
        buf.prepend_fmt(format_args!("{}: ", "open failed"));
        buf.prepend_fmt(format_args!("config load failed: "));
        assert_eq!(
            buf.as_str(),
            "config load failed: open failed: file not found"
        );
        assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = small(4, 64);
        buf.prepend_str("0123456789");
        let grown = buf.capacity();
        assert_eq!(grown, 10);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), grown);

        buf.prepend_str("short");
        assert_eq!(buf.capacity(), grown);
        assert_eq!(buf.as_str(), "short");
    }

    #[test]
    fn grows_to_exact_need() {
        let mut buf = small(4, 64);
        buf.prepend_str("abc");
        buf.prepend_str("0123456");
        assert_eq!(buf.capacity(), 10);
        assert_eq!(buf.as_str(), "0123456abc");
    }

    #[test]
    fn growth_clamped_to_max() {
        let mut buf = small(4, 16);
        buf.prepend_str("0123456789");
        buf.prepend_str("abcdefghij");
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.len(), 16);
        // Newest text first, oldest tail dropped.
        assert_eq!(buf.as_str(), "abcdefghij012345");
    }

    #[test]
    fn oversize_prepend_is_clipped() {
        let mut buf = small(8, 8);
        buf.prepend_str("old");
        buf.prepend_str("0123456789");
        assert_eq!(buf.as_str(), "01234567");
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut buf = small(6, 6);
        buf.prepend_str("ééé");
        assert_eq!(buf.len(), 6);

        buf.prepend_str("a");
        // Five bytes of room: only two whole 'é' survive.
        assert_eq!(buf.as_str(), "aéé");
        assert_eq!(buf.len(), 5);

        buf.prepend_str("xy");
        // Four bytes of room, cut falls inside the second 'é'.
        assert_eq!(buf.as_str(), "xyaé");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn repeated_prepends_stay_bounded() {
        let mut buf = small(4, 32);
        for i in 0..1000 {
            let len = buf.prepend_fmt(format_args!("ctx{i:04}: "));
            assert!(len <= 32);
        }
        assert!(buf.as_str().starts_with("ctx0999: "));
        assert_eq!(buf.capacity(), 32);
    }

    #[test]
    fn fallback_text_prepended_on_render_failure() {
        let mut buf = small(64, 64);
        buf.prepend_str("inner");
        let long = "x".repeat(65);
        let len = buf.prepend_fmt(format_args!("{long}"));
        assert_eq!(len, FORMAT_ERROR_TEXT.len() + "inner".len());
        assert_eq!(buf.as_str(), "(format error) inner");
    }

    #[test]
    fn zero_capacity_buffer_drops_everything() {
        let mut buf = small(0, 0);
        assert_eq!(buf.prepend_str("anything"), 0);
        assert_eq!(buf.as_str(), "");
    }

    #[test]
    fn invalid_limits_rejected() {
        assert_eq!(
            BufferLimits::new(10, 5),
            Err(BufferError::InvalidLimits { initial: 10, max: 5 })
        );
        assert!(matches!(
            BufferLimits::new(0, SCRATCH_CAPACITY + 1),
            Err(BufferError::LimitsExceedScratch { .. })
        ));
        assert_eq!(BufferLimits::default(), BufferLimits::DEFAULT);
    }

    #[test]
    fn limits_are_reported_back() {
        let limits = BufferLimits::new(16, 128).unwrap();
        assert_eq!(limits.initial_capacity(), 16);
        assert_eq!(limits.max_capacity(), 128);

        let mut buf = ErrorBuffer::try_new(limits).unwrap();
        assert_eq!(buf.capacity(), limits.initial_capacity());
        buf.prepend_str(&"g".repeat(100));
        // Growth changes the allocation, not the limits.
        assert_eq!(buf.limits(), limits);
        assert_eq!(buf.capacity(), 100);

        let defaults = ErrorBuffer::try_new(BufferLimits::DEFAULT).unwrap();
        assert_eq!(defaults.limits().initial_capacity(), DEFAULT_CAPACITY);
        assert_eq!(defaults.limits().max_capacity(), MAX_CAPACITY);
    }

    #[test]
    fn floor_char_boundary_steps_back() {
        let bytes = "aé".as_bytes();
        assert_eq!(floor_char_boundary(bytes, 0), 0);
        assert_eq!(floor_char_boundary(bytes, 1), 1);
        assert_eq!(floor_char_boundary(bytes, 2), 1);
        assert_eq!(floor_char_boundary(bytes, 3), 3);
        assert_eq!(floor_char_boundary(bytes, 10), 3);
    }
}
