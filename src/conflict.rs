//! Merging two entity lists without introducing overlaps.
//!
//! One list is the base and is kept whole; entities from the other list
//! survive only if they touch none of the base entities. Which list is the
//! base is decided by the overwrite flag.

use crate::entity::EntityRecord;

/// Merge `current` (existing annotations) with `candidate` (fresh output).
///
/// With `overwrite` the candidate list is the base; otherwise the current
/// list is. The result is the base in input order followed by the
/// surviving entities of the other list in input order.
#[must_use]
pub fn resolve(
    current: Vec<EntityRecord>,
    candidate: Vec<EntityRecord>,
    overwrite: bool,
) -> Vec<EntityRecord> {
    let (mut base, other) = if overwrite {
        (candidate, current)
    } else {
        (current, candidate)
    };

    let survivors: Vec<EntityRecord> = other
        .into_iter()
        .filter(|o| base.iter().all(|b| !o.overlaps(b)))
        .collect();

    base.extend(survivors);
    base
}
