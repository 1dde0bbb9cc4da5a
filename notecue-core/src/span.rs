//! Token-index spans and inclusion tests

/// A contiguous half-open range `[start, end)` of token indices.
///
/// Spans never shrink or grow once attached to an annotation; qualifier
/// flags are carried next to the span, not inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Index of the first token covered.
    pub start: usize,
    /// Index one past the last token covered.
    pub end: usize,
}

impl Span {
    /// Creates a span over `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the span covers no tokens.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Full containment: the span lies entirely inside `[start, end)`.
    pub fn is_within(&self, start: usize, end: usize) -> bool {
        self.start >= start && self.end <= end
    }

    /// Start-token test: the span's first token lies inside `[start, end)`.
    pub fn starts_within(&self, start: usize, end: usize) -> bool {
        start <= self.start && self.start < end
    }

    /// Overlap test: the span shares at least one token with `[start, end)`.
    ///
    /// An empty span covers no tokens, so it overlaps nothing.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !self.is_empty() && self.start < end && self.end > start
    }

    /// True when `index` falls inside the span.
    pub fn contains_token(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

/// Extent seam for annotation types that carry a span.
pub trait Spanned {
    /// The token range covered.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Category seam for annotation types that carry a label.
pub trait Labeled {
    /// The category name of the annotation.
    fn label(&self) -> &str;
}

/// Returns references to the spans whose category equals `label`, keeping
/// the original order.
pub fn spans_with_label<'a, T: Labeled>(spans: &'a [T], label: &str) -> Vec<&'a T> {
    spans.iter().filter(|s| s.label() == label).collect()
}
