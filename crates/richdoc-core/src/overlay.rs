//! Attribute range overlay.
//!
//! Tracks which [`TagId`]s cover which character ranges, independently of the
//! text itself. Each tag owns a normalized set of ranges: sorted by start,
//! pairwise disjoint, never empty, with adjacent ranges merged. Edits to the
//! text are mirrored here through [`RangeOverlay::shift_for_insert`] and
//! [`RangeOverlay::shift_for_delete`], which keep every range anchored to the
//! characters it was covering.

use crate::position::CharRange;
use crate::tags::TagId;
use std::collections::BTreeMap;

/// Range overlay - manages attribute ranges per tag.
///
/// Uses sorted vectors with binary search per tag. Point query complexity is
/// O(t log n) for t tags; add/remove are O(n) in the tag's range count.
pub struct RangeOverlay {
    /// Normalized range set per tag. Tags with no ranges are not stored.
    ranges: BTreeMap<TagId, Vec<CharRange>>,
}

impl RangeOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    /// Add `range` to `tag`'s coverage.
    ///
    /// Overlapping or adjacent ranges of the same tag are merged. Empty and
    /// inverted ranges are no-ops.
    pub fn add(&mut self, tag: TagId, range: CharRange) {
        if range.is_empty() {
            return;
        }

        let set = self.ranges.entry(tag).or_default();
        let mut merged = range;

        // First range that could overlap or touch the new one.
        let idx = set.partition_point(|r| r.end < merged.start);
        while idx < set.len() && set[idx].start <= merged.end {
            merged.start = merged.start.min(set[idx].start);
            merged.end = merged.end.max(set[idx].end);
            set.remove(idx);
        }
        set.insert(idx, merged);
    }

    /// Remove `range` from `tag`'s coverage.
    ///
    /// Stored ranges partially covered by `range` are clipped; ranges fully
    /// inside it disappear. Empty and inverted ranges are no-ops.
    pub fn remove(&mut self, tag: TagId, range: CharRange) {
        if range.is_empty() {
            return;
        }

        let mut now_empty = false;
        if let Some(set) = self.ranges.get_mut(&tag) {
            let mut result = Vec::with_capacity(set.len() + 1);
            for r in set.drain(..) {
                if r.end <= range.start || r.start >= range.end {
                    result.push(r);
                    continue;
                }
                if r.start < range.start {
                    result.push(CharRange::new(r.start, range.start));
                }
                if r.end > range.end {
                    result.push(CharRange::new(range.end, r.end));
                }
            }
            now_empty = result.is_empty();
            *set = result;
        }
        if now_empty {
            self.ranges.remove(&tag);
        }
    }

    /// Drop every range of `tag`. Returns whether the tag had any coverage.
    pub fn remove_tag(&mut self, tag: TagId) -> bool {
        self.ranges.remove(&tag).is_some()
    }

    /// All tags covering `pos`, in id order.
    pub fn tags_at(&self, pos: usize) -> Vec<TagId> {
        let mut result = Vec::new();
        for (&tag, set) in &self.ranges {
            let idx = set.partition_point(|r| r.end <= pos);
            if idx < set.len() && set[idx].contains(pos) {
                result.push(tag);
            }
        }
        result
    }

    /// Whether `tag` covers `pos`.
    pub fn contains(&self, tag: TagId, pos: usize) -> bool {
        let Some(set) = self.ranges.get(&tag) else {
            return false;
        };
        let idx = set.partition_point(|r| r.end <= pos);
        idx < set.len() && set[idx].contains(pos)
    }

    /// The normalized range set of `tag` (empty slice if uncovered).
    pub fn ranges_of(&self, tag: TagId) -> &[CharRange] {
        self.ranges.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(tag, ranges)` pairs in tag id order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &[CharRange])> {
        self.ranges.iter().map(|(&tag, set)| (tag, set.as_slice()))
    }

    /// Iterate over tags that currently cover at least one character.
    pub fn tags(&self) -> impl Iterator<Item = TagId> + '_ {
        self.ranges.keys().copied()
    }

    /// Number of tags with at least one range.
    pub fn tag_count(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of stored ranges across all tags.
    pub fn range_count(&self) -> usize {
        self.ranges.values().map(Vec::len).sum()
    }

    /// Whether no tag covers any character.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Clear all coverage.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Update offsets for an insertion of `delta` characters at `pos`.
    ///
    /// Ranges strictly containing the insertion point grow; ranges starting
    /// at or after it shift right. A range whose start or end sits exactly at
    /// `pos` does not absorb the new text.
    pub fn shift_for_insert(&mut self, pos: usize, delta: usize) {
        if delta == 0 {
            return;
        }

        for set in self.ranges.values_mut() {
            for range in set.iter_mut() {
                if range.start >= pos {
                    range.start += delta;
                    range.end += delta;
                } else if range.end > pos {
                    // Range spans insertion point, extend end position
                    range.end += delta;
                }
            }
        }
    }

    /// Update offsets for a deletion of the text in `range`.
    ///
    /// Ranges after the deletion shift left, ranges fully inside it are
    /// dropped, and ranges straddling either edge are clipped.
    pub fn shift_for_delete(&mut self, range: CharRange) {
        if range.is_empty() {
            return;
        }
        let delta = range.len();

        let mut dead_tags = Vec::new();
        for (&tag, set) in self.ranges.iter_mut() {
            set.retain_mut(|r| {
                if r.end <= range.start {
                    // Range is before deletion range, unaffected
                    true
                } else if r.start >= range.end {
                    // Range is after deletion range, move forward
                    r.start -= delta;
                    r.end -= delta;
                    true
                } else if r.start >= range.start && r.end <= range.end {
                    // Range is completely within deletion range, drop it
                    false
                } else if r.start < range.start && r.end > range.end {
                    // Range spans deletion range, shrink
                    r.end -= delta;
                    true
                } else if r.start < range.start {
                    // Range partially in deletion range (end part)
                    r.end = range.start;
                    true
                } else {
                    // Range partially in deletion range (start part)
                    r.start = range.start;
                    r.end -= delta;
                    true
                }
            });

            // Deleting a gap can leave two ranges touching.
            coalesce(set);

            if set.is_empty() {
                dead_tags.push(tag);
            }
        }
        for tag in dead_tags {
            self.ranges.remove(&tag);
        }
    }
}

impl Default for RangeOverlay {
    fn default() -> Self {
        Self::new()
    }
}

fn coalesce(set: &mut Vec<CharRange>) {
    set.dedup_by(|next, prev| {
        if prev.end >= next.start {
            prev.end = prev.end.max(next.end);
            true
        } else {
            false
        }
    });
}
