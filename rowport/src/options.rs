use alloc::sync::Arc;

use crate::{ViewRange, ViewportKind};

/// A callback fired after a reconciliation changed the materialized range.
pub type RenderedCallback = Arc<dyn Fn(ViewRange) + Send + Sync>;

/// How checking an element affects its relatives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CheckPropagation {
    /// Check states are independent; parents only get the `children_checked` style hook.
    #[default]
    None,
    /// Checking or unchecking an element applies the same state to all its descendants.
    Children,
    /// Like `Children`; additionally a parent is checked iff all of its children are.
    ChildrenAndParents,
}

/// Configuration for [`crate::Viewport`].
///
/// Cheap to clone; the callback lives in an `Arc`.
#[derive(Clone)]
pub struct ViewportOptions {
    pub kind: ViewportKind,

    /// When disabled every visible element is materialized (`[0, len)`). Only acceptable for
    /// small collections.
    pub virtual_scrolling: bool,

    /// Height assumed for elements that have not been measured yet. Also drives the view
    /// range size.
    pub average_element_height: u32,

    /// Tree range size granularity; the tree range never gets smaller than this.
    pub view_range_divisor: usize,

    /// Animate user-triggered structural changes inside the rendered range.
    pub animate: bool,

    /// Batches larger than this are never animated. `None` uses the view range size.
    pub max_animated_batch: Option<usize>,

    pub multi_select: bool,

    pub check_propagation: CheckPropagation,

    pub on_rendered: Option<RenderedCallback>,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self::table()
    }
}

impl ViewportOptions {
    pub fn table() -> Self {
        Self {
            kind: ViewportKind::Table,
            virtual_scrolling: true,
            average_element_height: 30,
            view_range_divisor: 4,
            animate: true,
            max_animated_batch: None,
            multi_select: true,
            check_propagation: CheckPropagation::None,
            on_rendered: None,
        }
    }

    pub fn tree() -> Self {
        Self {
            kind: ViewportKind::Tree,
            multi_select: false,
            check_propagation: CheckPropagation::Children,
            ..Self::table()
        }
    }

    pub fn with_kind(mut self, kind: ViewportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_virtual_scrolling(mut self, virtual_scrolling: bool) -> Self {
        self.virtual_scrolling = virtual_scrolling;
        self
    }

    pub fn with_average_element_height(mut self, height: u32) -> Self {
        self.average_element_height = height;
        self
    }

    pub fn with_view_range_divisor(mut self, divisor: usize) -> Self {
        self.view_range_divisor = divisor;
        self
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_max_animated_batch(mut self, max: Option<usize>) -> Self {
        self.max_animated_batch = max;
        self
    }

    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    pub fn with_check_propagation(mut self, check_propagation: CheckPropagation) -> Self {
        self.check_propagation = check_propagation;
        self
    }

    pub fn with_on_rendered(
        mut self,
        on_rendered: Option<impl Fn(ViewRange) + Send + Sync + 'static>,
    ) -> Self {
        self.on_rendered = on_rendered.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for ViewportOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportOptions")
            .field("kind", &self.kind)
            .field("virtual_scrolling", &self.virtual_scrolling)
            .field("average_element_height", &self.average_element_height)
            .field("view_range_divisor", &self.view_range_divisor)
            .field("animate", &self.animate)
            .field("max_animated_batch", &self.max_animated_batch)
            .field("multi_select", &self.multi_select)
            .field("check_propagation", &self.check_propagation)
            .finish_non_exhaustive()
    }
}
