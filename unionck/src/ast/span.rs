//! Source location tracking
//!
//! Spans are byte offsets into the source file the snapshot was taken from.
//! The checker never reads source text itself; spans only travel through to
//! diagnostics and fix edits.

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

/// A byte range in the checked source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Reject spans that end before they start or run past `source_len`
    pub fn validate(self, source_len: Option<usize>) -> Result<()> {
        if self.end < self.start {
            return Err(CheckError::malformed(
                format!("span {self} ends before it starts"),
                None,
            ));
        }
        match source_len {
            Some(len) if self.end > len => Err(CheckError::malformed(
                format!("span {self} runs past the end of the source ({len} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
