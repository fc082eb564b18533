use alloc::vec::Vec;

use crate::AnimationState;

/// A row (table) or node (tree) of the hierarchical model.
///
/// Elements are owned by the [`crate::ElementModel`]; structural flags are maintained by the
/// viewport and exposed read-only. The payload `T` is what the DOM adapter renders.
#[derive(Clone, Debug)]
pub struct Element<K, T> {
    pub(crate) key: K,
    pub(crate) parent: Option<K>,
    pub(crate) children: Vec<K>,
    pub(crate) child_index: usize,
    pub(crate) level: usize,
    pub(crate) expanded: bool,
    pub(crate) expanded_lazy: bool,
    /// Inserted while the parent was lazily expanded; shown even though the parent is only
    /// partially expanded.
    pub(crate) lazy_added: bool,
    pub(crate) filter_match: bool,
    pub(crate) filter_accepted: bool,
    pub(crate) height: Option<u32>,
    pub(crate) width: Option<u32>,
    pub(crate) attached: bool,
    pub(crate) checked: bool,
    pub(crate) children_checked: bool,
    pub(crate) group_boundary: bool,
    pub(crate) animation: AnimationState,
    pub(crate) data: T,
}

impl<K, T> Element<K, T> {
    pub(crate) fn from_spec(spec: ElementSpec<K, T>) -> Self {
        Self {
            key: spec.key,
            parent: spec.parent,
            children: Vec::new(),
            child_index: 0,
            level: 0,
            expanded: spec.expanded,
            expanded_lazy: false,
            lazy_added: false,
            filter_match: true,
            filter_accepted: true,
            height: None,
            width: None,
            attached: false,
            checked: spec.checked,
            children_checked: false,
            group_boundary: spec.group_boundary,
            animation: AnimationState::Idle,
            data: spec.data,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn parent(&self) -> Option<&K> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[K] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Position among the parent's children (or among the roots).
    pub fn child_index(&self) -> usize {
        self.child_index
    }

    /// Depth in the hierarchy; roots are level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_expanded_lazy(&self) -> bool {
        self.expanded_lazy
    }

    /// Own filter predicate result.
    pub fn filter_match(&self) -> bool {
        self.filter_match
    }

    /// Own predicate result or an accepted descendant.
    pub fn is_filter_accepted(&self) -> bool {
        self.filter_accepted
    }

    /// Cached measured height, `None` until measured (or after invalidation).
    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Some but not all descendants are checked.
    pub fn is_children_checked(&self) -> bool {
        self.children_checked
    }

    /// Aggregate/group rows interrupt selection border collapsing.
    pub fn is_group_boundary(&self) -> bool {
        self.group_boundary
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub(crate) fn invalidate_extent(&mut self) {
        self.height = None;
        self.width = None;
    }
}

/// Describes an element to insert: its id, payload and parent reference.
#[derive(Clone, Debug)]
pub struct ElementSpec<K, T> {
    pub key: K,
    pub parent: Option<K>,
    pub data: T,
    pub expanded: bool,
    pub checked: bool,
    pub group_boundary: bool,
    /// Position among the siblings; appended when `None` (or out of bounds).
    pub child_index: Option<usize>,
}

impl<K, T> ElementSpec<K, T> {
    pub fn new(key: K, data: T) -> Self {
        Self {
            key,
            parent: None,
            data,
            expanded: false,
            checked: false,
            group_boundary: false,
            child_index: None,
        }
    }

    pub fn with_parent(mut self, parent: K) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_group_boundary(mut self, group_boundary: bool) -> Self {
        self.group_boundary = group_boundary;
        self
    }

    pub fn with_child_index(mut self, child_index: usize) -> Self {
        self.child_index = Some(child_index);
        self
    }
}
