//! Span geometry for qualifier detection in clinical text
//!
//! This crate implements the pure algorithmic layer shared by the notecue
//! annotation components: half-open token spans, the boundary windows
//! derived from termination cues, ordered span consumption with
//! second-chance carry-over, and overlap filtering.
//!
//! Everything here operates on token indices only. Documents, matchers and
//! the concrete clinical components live in `notecue-engine`; keeping this
//! layer free of them makes the window algebra easy to test in isolation.
//!
//! # Example
//!
//! ```rust
//! use notecue_core::{consume, windows, Span};
//!
//! // A termination cue at token 6 opens a second window there.
//! let windows = windows(10, [6]).unwrap();
//! assert_eq!(windows.len(), 2);
//! assert_eq!((windows[0].start, windows[0].end), (0, 6));
//! assert_eq!((windows[1].start, windows[1].end), (6, 10));
//!
//! // Spans overlapping the first window are consumed by it.
//! let pool = vec![Span::new(4, 7), Span::new(8, 9)];
//! let (matched, rest) = consume(pool, |s| s.overlaps(windows[0].start, windows[0].end), None);
//! assert_eq!(matched, vec![Span::new(4, 7)]);
//! assert_eq!(rest, vec![Span::new(8, 9)]);
//! ```

#![warn(missing_docs)]

mod consume;
mod error;
mod filter;
mod span;
mod windows;

pub use consume::consume;
pub use error::{Result, SpanError};
pub use filter::{filter_overlaps, filter_overlaps_discarding};
pub use span::{spans_with_label, Labeled, Span, Spanned};
pub use windows::{windows, Window};
