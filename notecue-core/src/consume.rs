//! Ordered span consumption with second-chance carry-over

/// Splits `pool` into the items matching `predicate` and the rest, keeping
/// the original order on both sides.
///
/// `second_chance` is the matched output of the previous window: items in
/// it that also satisfy the current predicate are appended after the items
/// taken from the pool. A span crossing the boundary between two windows
/// is consumed from the pool by the first one and re-offered to the
/// second, so it can still pick up cues found there.
pub fn consume<T, F>(
    pool: Vec<T>,
    predicate: F,
    second_chance: Option<Vec<T>>,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> bool,
{
    let mut matched = Vec::new();
    let mut remaining = Vec::new();
    for item in pool {
        if predicate(&item) {
            matched.push(item);
        } else {
            remaining.push(item);
        }
    }
    if let Some(previous) = second_chance {
        matched.extend(previous.into_iter().filter(|item| predicate(item)));
    }
    (matched, remaining)
}

#[cfg(test)]
mod tests {
    use super::consume;
    use crate::Span;

    #[test]
    fn test_partition_preserves_order() {
        let pool = vec![1, 5, 2, 6, 3];
        let (matched, rest) = consume(pool, |n| *n < 4, None);
        assert_eq!(matched, vec![1, 2, 3]);
        assert_eq!(rest, vec![5, 6]);
    }

    #[test]
    fn test_everything_matching_leaves_nothing() {
        let (matched, rest) = consume(vec![1, 2], |_| true, None);
        assert_eq!(matched, vec![1, 2]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_second_chance_is_refiltered_and_appended() {
        let pool = vec![Span::new(6, 7)];
        let previous = vec![Span::new(3, 5), Span::new(4, 7)];
        // Window [6, 10): only the span reaching past token 6 re-enters.
        let (matched, rest) = consume(pool, |s| s.overlaps(6, 10), Some(previous));
        assert_eq!(matched, vec![Span::new(6, 7), Span::new(4, 7)]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_second_chance_never_returns_to_the_pool() {
        let previous = vec![Span::new(0, 1)];
        let (matched, rest) = consume(Vec::new(), |s: &Span| s.overlaps(5, 10), Some(previous));
        assert!(matched.is_empty());
        assert!(rest.is_empty());
    }
}
