//! View range calculation: scroll offset → index window over the flat list.

use alloc::vec::Vec;
use core::cmp;

use crate::fenwick::HeightSums;
use crate::flat::FlatList;
use crate::key::ElementKey;
use crate::model::ElementModel;
use crate::{ViewRange, ViewportKind};

/// Heights of the flat list in index order: cached measurements, or the average for
/// elements not measured yet.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeightIndex {
    sizes: Vec<u32>,
    sums: HeightSums,
}

impl HeightIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rebuild<K: ElementKey, T>(
        flat: &FlatList<K>,
        model: &ElementModel<K, T>,
        average: u32,
    ) -> Self {
        let sizes: Vec<u32> = flat
            .keys()
            .iter()
            .map(|key| model.get(key).and_then(|e| e.height).unwrap_or(average))
            .collect();
        let sums = HeightSums::from_heights(&sizes);
        Self { sizes, sums }
    }

    pub(crate) fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Records a measurement.
    pub(crate) fn set(&mut self, index: usize, height: u32) {
        let Some(cur) = self.sizes.get_mut(index) else {
            return;
        };
        let old = core::mem::replace(cur, height);
        self.sums.replace(index, old, height);
    }

    pub(crate) fn height(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    pub(crate) fn total(&self) -> u64 {
        self.sums.total()
    }

    /// Top offset of the element at `index`.
    pub(crate) fn offset_of(&self, index: usize) -> u64 {
        self.sums.offset_of(index)
    }

    /// Heights of everything before and after `range`.
    pub(crate) fn filler_heights(&self, range: ViewRange) -> (u64, u64) {
        let before = self.sums.offset_of(range.from);
        let after = self.total().saturating_sub(self.sums.offset_of(range.to));
        (before, after)
    }

    /// Index of the element spanning `scroll_top` (clamped to the last element).
    pub(crate) fn row_index_at_scroll_top(&self, scroll_top: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        self.sums.index_at_offset(scroll_top).min(n - 1)
    }
}

/// Number of elements to materialize for a viewport.
///
/// The viewport covers half of the range, a quarter is kept on either side. Trees multiply by
/// `2 * (divisor / 2)` and never go below `divisor`, so range diffing always has room to
/// insert and remove. Returns `0` when either height is zero.
pub fn calculate_view_range_size(
    kind: ViewportKind,
    viewport_height: u32,
    average_height: u32,
    divisor: usize,
) -> usize {
    if viewport_height == 0 || average_height == 0 {
        return 0;
    }
    let rows = viewport_height.div_ceil(average_height) as usize;
    match kind {
        ViewportKind::Table => rows.saturating_mul(2),
        ViewportKind::Tree => {
            let divisor = divisor.max(2);
            cmp::max(rows.saturating_mul(2 * (divisor / 2)), divisor)
        }
    }
}

/// The window of `size` elements around `index`: a quarter before, the rest after. A window
/// truncated by the end of the list slides back so the whole size is used when possible.
pub fn calculate_view_range_for_index(index: usize, size: usize, len: usize) -> ViewRange {
    if len == 0 || size == 0 {
        return ViewRange::EMPTY;
    }
    let index = index.min(len - 1);
    let mut from = index.saturating_sub(size / 4);
    let to = cmp::min(from.saturating_add(size), len);
    if to - from < size {
        from = to.saturating_sub(size);
    }
    ViewRange::new(from, to)
}
