//! Overlap filtering over span collections

use crate::span::Spanned;
use std::cmp::Reverse;

/// Removes overlapping spans, keeping the longest one of each overlapping
/// group; see [`filter_overlaps_discarding`] for the discarded side.
pub fn filter_overlaps<T: Spanned>(spans: Vec<T>) -> Vec<T> {
    filter_overlaps_discarding(spans).0
}

/// Removes overlapping spans, returning `(kept, discarded)`.
///
/// Candidates are ranked by length, longest first, with ties going to the
/// earlier span (and to pool order when spans are identical). A candidate
/// overlapping an already kept span is discarded. Both sides come back in
/// document order.
pub fn filter_overlaps_discarding<T: Spanned>(spans: Vec<T>) -> (Vec<T>, Vec<T>) {
    let mut ranked: Vec<(usize, T)> = spans.into_iter().enumerate().collect();
    ranked.sort_by_key(|(index, s)| (Reverse(s.span().len()), s.span().start, *index));

    let mut kept: Vec<(usize, T)> = Vec::new();
    let mut discarded: Vec<(usize, T)> = Vec::new();
    'candidates: for (index, candidate) in ranked {
        for (_, winner) in &kept {
            let w = winner.span();
            if candidate.span().overlaps(w.start, w.end) {
                discarded.push((index, candidate));
                continue 'candidates;
            }
        }
        kept.push((index, candidate));
    }

    kept.sort_by_key(|(index, s)| (s.span().start, s.span().end, *index));
    discarded.sort_by_key(|(index, s)| (s.span().start, s.span().end, *index));
    (
        kept.into_iter().map(|(_, s)| s).collect(),
        discarded.into_iter().map(|(_, s)| s).collect(),
    )
}
