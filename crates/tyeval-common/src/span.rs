//! Source locations for diagnostics and expression nodes.
//!
//! A [`TextRange`] is a half-open byte range `[start, end)`. It is the unit
//! every diagnostic and every expression node is anchored to; the evaluator
//! never deals in line/column positions directly.

use serde::{Deserialize, Serialize};

/// A byte range into a single source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl TextRange {
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        TextRange { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn at(pos: u32) -> Self {
        TextRange {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
