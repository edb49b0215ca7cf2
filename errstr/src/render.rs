//! Bounded message rendering.
//!
//! Formats `fmt::Arguments` into a fixed-size stack scratch area. Output
//! that does not fit, or a `Display` impl that reports `fmt::Error`, yields
//! [`Rendered::Fallback`] instead of an error.

use crate::consts::{FORMAT_ERROR_TEXT, SCRATCH_CAPACITY};
use core::fmt::{self, Write};
use tracing::warn;

/// Scratch storage a message is rendered into.
pub type Scratch = heapless::String<SCRATCH_CAPACITY>;

/// Outcome of rendering a message.
#[derive(Debug, Clone)]
pub enum Rendered {
    /// Message rendered within bounds.
    Text(Scratch),
    /// Message could not be rendered; [`FORMAT_ERROR_TEXT`] stands in.
    Fallback,
}

impl Rendered {
    /// Text to prepend.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text.as_str(),
            Self::Fallback => FORMAT_ERROR_TEXT,
        }
    }

    /// Whether the fallback text was substituted.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Render `args` into the scratch area, accepting at most `bound` bytes.
///
/// `bound` is clamped to [`SCRATCH_CAPACITY`].
pub fn render(args: fmt::Arguments<'_>, bound: usize) -> Rendered {
    // Literal-only messages skip the formatting machinery.
    if let Some(literal) = args.as_str() {
        return render_str(literal, bound);
    }

    let mut scratch = Scratch::new();
    if scratch.write_fmt(args).is_err() {
        warn!(bound, "message rendering failed or overflowed scratch, using fallback");
        return Rendered::Fallback;
    }
    if scratch.len() > bound {
        warn!(
            len = scratch.len(),
            bound, "rendered message exceeds buffer limit, using fallback"
        );
        return Rendered::Fallback;
    }
    Rendered::Text(scratch)
}

/// Render a preformatted string under the same bounds as [`render`].
pub fn render_str(text: &str, bound: usize) -> Rendered {
    let mut scratch = Scratch::new();
    if text.len() > bound || scratch.push_str(text).is_err() {
        warn!(
            len = text.len(),
            bound, "message exceeds buffer limit, using fallback"
        );
        return Rendered::Fallback;
    }
    Rendered::Text(scratch)
}
