//! Inclusive character spans and the overlap algebra used to reconcile entities.
//!
//! Every span in this crate is measured in characters (Unicode scalar values)
//! and is **inclusive** at both ends: `"Alice"` at the start of a sentence is
//! `Span { start: 0, end: 4 }`. Two spans that merely touch overlap:
//!
//! ```text
//!   a: [0 ..... 4]
//!   b:         [4 ..... 9]      overlaps(a, b) == true
//!   c:           [5 ... 9]      overlaps(a, c) == false
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive character interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// First character of the span.
    pub start: usize,
    /// Last character of the span (inclusive).
    pub end: usize,
}

impl Span {
    /// Create a span. `end` is clamped up to `start` so the invariant
    /// `start <= end` always holds.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Build an inclusive span from a half-open `[start, end)` range.
    ///
    /// Returns `None` for empty ranges, which have no inclusive form.
    #[must_use]
    pub fn from_exclusive(start: usize, end: usize) -> Option<Self> {
        if end > start {
            Some(Self { start, end: end - 1 })
        } else {
            None
        }
    }

    /// Exclusive end offset (`end + 1`).
    #[must_use]
    pub fn end_exclusive(&self) -> usize {
        self.end + 1
    }

    /// Number of characters covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Spans always cover at least one character.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True unless one span lies entirely before the other.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.start > other.end || other.start > self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Free-function form of [`Span::overlaps`].
#[must_use]
pub fn overlaps(a: &Span, b: &Span) -> bool {
    a.overlaps(b)
}

/// Greedy non-overlapping selection.
///
/// Spans are stably sorted descending by `(start, end)`, then each span is
/// kept if it overlaps none of the spans kept so far. Equal spans keep their
/// input order, so the first duplicate wins.
#[must_use]
pub fn select_largest_non_overlapping(spans: &[Span]) -> Vec<Span> {
    let mut ordered = spans.to_vec();
    ordered.sort_by(|a, b| b.cmp(a));

    let mut selected: Vec<Span> = Vec::new();
    for span in ordered {
        if !selected.iter().any(|kept| kept.overlaps(&span)) {
            selected.push(span);
        }
    }
    selected
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_span() -> impl Strategy<Value = Span> {
        (0usize..100, 0usize..20).prop_map(|(s, len)| Span::new(s, s + len))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_span(), b in arb_span()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn overlap_is_reflexive(a in arb_span()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn selection_is_pairwise_disjoint(spans in prop::collection::vec(arb_span(), 0..30)) {
            let selected = select_largest_non_overlapping(&spans);
            for i in 0..selected.len() {
                for j in (i + 1)..selected.len() {
                    prop_assert!(!selected[i].overlaps(&selected[j]));
                }
            }
        }

        #[test]
        fn selection_is_maximal(spans in prop::collection::vec(arb_span(), 0..30)) {
            let selected = select_largest_non_overlapping(&spans);
            for span in &spans {
                let kept = selected.contains(span);
                let blocked = selected.iter().any(|s| s.overlaps(span));
                prop_assert!(kept || blocked, "{} was discarded without a conflict", span);
            }
        }
    }
}
