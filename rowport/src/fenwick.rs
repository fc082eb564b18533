use alloc::vec::Vec;

/// Binary indexed tree over element heights in flat-list order.
///
/// Offsets are `u64` (a million rows of a few thousand pixels still fit); heights are `u32`.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeightSums {
    // 1-based: node `i` covers the `lowest_bit(i)` heights ending at element `i - 1`.
    nodes: Vec<u64>,
    total: u64,
    top_bit: usize,
}

impl HeightSums {
    pub(crate) fn from_heights(heights: &[u32]) -> Self {
        let len = heights.len();
        let mut nodes = Vec::with_capacity(len + 1);
        nodes.push(0u64);
        nodes.extend(heights.iter().map(|&h| h as u64));
        // Linear build: push every node's sum into its parent.
        for i in 1..=len {
            let parent = i + lowest_bit(i);
            if parent <= len {
                nodes[parent] = nodes[parent].saturating_add(nodes[i]);
            }
        }
        let total = heights
            .iter()
            .fold(0u64, |acc, &h| acc.saturating_add(h as u64));
        let top_bit = if len == 0 { 0 } else { 1 << len.ilog2() };
        Self {
            nodes,
            total,
            top_bit,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Replaces the height of element `index`, given its previous height.
    pub(crate) fn replace(&mut self, index: usize, old: u32, new: u32) {
        if index >= self.len() || old == new {
            return;
        }
        let grow = new > old;
        let diff = new.abs_diff(old) as u64;
        self.total = apply(self.total, grow, diff);
        let mut i = index + 1;
        while i < self.nodes.len() {
            debug_assert!(grow || self.nodes[i] >= diff, "height sums underflow at {i}");
            self.nodes[i] = apply(self.nodes[i], grow, diff);
            i += lowest_bit(i);
        }
    }

    /// Combined height of the first `count` elements, i.e. the top offset of element `count`.
    pub(crate) fn offset_of(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.nodes[i]);
            i -= lowest_bit(i);
        }
        sum
    }

    /// Number of leading elements that end at or above `offset`, which is the index of the
    /// element spanning `offset` (`len()` past the end).
    pub(crate) fn index_at_offset(&self, offset: u64) -> usize {
        let mut remaining = offset;
        let mut pos = 0usize;
        let mut step = self.top_bit;
        while step > 0 {
            let next = pos + step;
            if next <= self.len() && self.nodes[next] <= remaining {
                remaining -= self.nodes[next];
                pos = next;
            }
            step /= 2;
        }
        pos
    }
}

fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn apply(value: u64, grow: bool, diff: u64) -> u64 {
    if grow {
        value.saturating_add(diff)
    } else {
        value.saturating_sub(diff)
    }
}
