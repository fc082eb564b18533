#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

/// Range size policy of the consumer widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewportKind {
    /// `ceil(viewport / average) * 2`.
    #[default]
    Table,
    /// `ceil(viewport / average) * 2 * (divisor / 2)`, at least `divisor`.
    Tree,
}

/// Who caused a structural change. Only user-triggered changes are animated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    User,
    #[default]
    Program,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationKind {
    /// Grow from zero height to the natural height.
    Show,
    /// Shrink to zero height, then detach.
    Hide,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationState {
    #[default]
    Idle,
    Showing,
    Hiding,
}

/// Whether the renderer may reconcile right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderState {
    #[default]
    Idle,
    /// At least one animation is running; render requests are deferred.
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationId(pub u64);

/// A half-open interval `[from, to)` over flat list indexes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewRange {
    pub from: usize,
    pub to: usize, // exclusive
}

impl ViewRange {
    pub const EMPTY: ViewRange = ViewRange { from: 0, to: 0 };

    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "ViewRange: from > to ({from} > {to})");
        Self {
            from,
            to: to.max(from),
        }
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    pub fn contains(&self, index: usize) -> bool {
        self.from <= index && index < self.to
    }

    /// `self − other`: at most one part before and one part after `other`.
    ///
    /// Empty parts are returned as empty ranges.
    pub fn subtract(&self, other: ViewRange) -> [ViewRange; 2] {
        if self.is_empty() {
            return [ViewRange::EMPTY; 2];
        }
        if other.is_empty() || other.to <= self.from || other.from >= self.to {
            return [*self, ViewRange::EMPTY];
        }
        let before = if other.from > self.from {
            ViewRange::new(self.from, other.from)
        } else {
            ViewRange::EMPTY
        };
        let after = if other.to < self.to {
            ViewRange::new(other.to, self.to)
        } else {
            ViewRange::EMPTY
        };
        [before, after]
    }

    /// Joins two overlapping or touching ranges.
    pub fn union(&self, other: ViewRange) -> Option<ViewRange> {
        if self.is_empty() {
            return Some(other);
        }
        if other.is_empty() {
            return Some(*self);
        }
        if other.from > self.to || self.from > other.to {
            return None;
        }
        Some(ViewRange {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        })
    }

    pub fn iter(&self) -> core::ops::Range<usize> {
        self.from..self.to
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMarker {
    /// Selected, neither neighbor selected.
    Single,
    /// Selected, only the successor selected.
    Top,
    /// Selected, both neighbors selected.
    Middle,
    /// Selected, only the predecessor selected.
    Bottom,
}

/// Transient visual state of a materialized element.
///
/// A removed-then-reinserted DOM node loses all of this, so the projector re-applies it
/// whenever an element is (re)materialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementMarkers {
    pub selection: Option<SelectionMarker>,
    pub checked: bool,
    pub children_checked: bool,
    /// First element of the rendered range.
    pub first: bool,
    /// Last element of the rendered range.
    pub last: bool,
}

/// Measured extent of a materialized element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub height: u32,
    pub width: u32,
}
