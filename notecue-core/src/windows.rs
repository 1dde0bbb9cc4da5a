//! Boundary windows derived from termination cues

use crate::error::{Result, SpanError};

/// A contiguous token window `[start, end)` produced by [`windows`].
///
/// A cue found inside a window only qualifies annotations inside the same
/// window; the termination cue that opened the next window cuts its reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Index of the first token covered.
    pub start: usize,
    /// Index one past the last token covered.
    pub end: usize,
}

/// Partitions `[0, token_count)` into contiguous windows, opening a new
/// window at every start in `boundary_starts`.
///
/// The first window always starts at token 0 and the last always ends at
/// `token_count`, so the windows cover the document exactly once. A start
/// closes the window before it and opens the one after it, which places a
/// termination token itself in the following window. Duplicate starts are
/// collapsed, so every returned window is non-empty.
///
/// With no starts the whole document is a single window; an empty document
/// yields no windows at all. A start at or past `token_count` is rejected
/// with [`SpanError::InvalidSpanOrder`].
pub fn windows(
    token_count: usize,
    boundary_starts: impl IntoIterator<Item = usize>,
) -> Result<Vec<Window>> {
    let mut starts = vec![0];
    for start in boundary_starts {
        if start >= token_count {
            return Err(SpanError::InvalidSpanOrder { position: start });
        }
        starts.push(start);
    }
    if token_count == 0 {
        return Ok(Vec::new());
    }
    starts.sort_unstable();
    starts.dedup();
    starts.push(token_count);

    Ok(starts
        .windows(2)
        .map(|pair| Window {
            start: pair[0],
            end: pair[1],
        })
        .collect())
}
