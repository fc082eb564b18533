//! Selection and check state, and their projection onto materialized elements.

use alloc::vec::Vec;

use crate::error::{Result, StructuralError};
use crate::key::{ElementKey, KeyMap, KeySet};
use crate::options::CheckPropagation;
use crate::{DomAdapter, ElementMarkers, SelectionMarker, ViewRange, Viewport};

/// Selected ids in selection order, plus the markers last applied to each materialized
/// element.
#[derive(Clone, Debug)]
pub(crate) struct Selection<K> {
    order: Vec<K>,
    set: KeySet<K>,
    applied: KeyMap<K, ElementMarkers>,
}

impl<K: ElementKey> Selection<K> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            set: KeySet::new(),
            applied: KeyMap::new(),
        }
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.order
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.set.contains(key)
    }

    fn insert(&mut self, key: K) -> bool {
        if !self.set.insert(key.clone()) {
            return false;
        }
        self.order.push(key);
        true
    }

    /// Returns whether anything was deselected.
    pub(crate) fn remove_all(&mut self, keys: &[K]) -> bool {
        let mut changed = false;
        for key in keys {
            changed |= self.set.remove(key);
        }
        if changed {
            let set = &self.set;
            self.order.retain(|k| set.contains(k));
        }
        changed
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        for key in self.order.drain(len.min(self.order.len())..) {
            self.set.remove(&key);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.set.clear();
    }

    pub(crate) fn forget_markers(&mut self, key: &K) {
        self.applied.remove(key);
    }

    pub(crate) fn forget_all_markers(&mut self) {
        self.applied.clear();
    }
}

impl<K: ElementKey, T, D: DomAdapter<K, T>> Viewport<K, T, D> {
    pub fn selected_elements(&self) -> &[K] {
        self.selection.keys()
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selection.contains(key)
    }

    /// Replaces the selection. Unknown and filtered-out ids are skipped; without
    /// multi-selection only the first remaining id is kept.
    pub fn select_elements(&mut self, keys: impl IntoIterator<Item = K>) {
        self.selection.clear();
        self.extend_selection(keys);
    }

    /// Adds to the selection (replaces it without multi-selection).
    pub fn add_to_selection(&mut self, keys: impl IntoIterator<Item = K>) {
        if !self.options.multi_select {
            self.selection.clear();
        }
        self.extend_selection(keys);
    }

    fn extend_selection(&mut self, keys: impl IntoIterator<Item = K>) {
        let multi = self.options.multi_select;
        for key in keys {
            if !self.model.get(&key).is_some_and(|e| e.filter_accepted) {
                continue;
            }
            if !multi && !self.selection.keys().is_empty() {
                break;
            }
            self.selection.insert(key);
        }
        rtrace!(selected = self.selection.keys().len(), "selection changed");
        self.project_markers();
    }

    pub fn deselect_elements(&mut self, keys: &[K]) {
        if self.selection.remove_all(keys) {
            self.project_markers();
        }
    }

    /// Selects every visible element. Ignored without multi-selection.
    pub fn select_all(&mut self) {
        if !self.options.multi_select {
            return;
        }
        let keys = self.flat.keys().to_vec();
        self.select_elements(keys);
    }

    pub fn deselect_all(&mut self) {
        if self.selection.keys().is_empty() {
            return;
        }
        self.selection.clear();
        self.project_markers();
    }

    /// Checked ids in pre-order.
    pub fn checked_elements(&self) -> Vec<K> {
        self.model
            .pre_order_keys()
            .into_iter()
            .filter(|k| self.model.get(k).is_some_and(|e| e.checked))
            .collect()
    }

    pub fn is_checked(&self, key: &K) -> bool {
        self.model.get(key).is_some_and(|e| e.checked)
    }

    /// Sets the check state of `keys`, propagating per [`CheckPropagation`].
    pub fn check_elements(&mut self, keys: &[K], checked: bool) -> Result<(), K> {
        if let Some(unknown) = keys.iter().find(|k| !self.model.contains(k)) {
            return Err(StructuralError::UnknownElement {
                element: unknown.clone(),
            });
        }
        let propagation = self.options.check_propagation;
        for key in keys {
            let targets = match propagation {
                CheckPropagation::None => alloc::vec![key.clone()],
                CheckPropagation::Children | CheckPropagation::ChildrenAndParents => {
                    self.model.subtree_keys(key)
                }
            };
            for target in &targets {
                if let Some(element) = self.model.get_mut(target) {
                    element.checked = checked;
                }
            }
            if propagation == CheckPropagation::ChildrenAndParents {
                for ancestor in self.model.ancestor_keys(key) {
                    let all = self
                        .model
                        .children(&ancestor)
                        .iter()
                        .all(|c| self.model.get(c).is_some_and(|e| e.checked));
                    if let Some(element) = self.model.get_mut(&ancestor) {
                        element.checked = all;
                    }
                }
            }
        }
        rdebug!(count = keys.len(), checked, ?propagation, "check_elements");
        self.recompute_check_state();
        self.project_markers();
        Ok(())
    }

    /// Recomputes the `children_checked` hook: some but not all descendants are checked.
    pub(crate) fn recompute_check_state(&mut self) {
        let order = self.model.pre_order_keys();
        // (descendants, checked descendants)
        let mut counts: KeyMap<K, (usize, usize)> = KeyMap::new();
        for key in order.iter().rev() {
            let mut total = 0usize;
            let mut checked = 0usize;
            for child in self.model.children(key) {
                let (t, c) = counts.get(child).copied().unwrap_or((0, 0));
                let own = self.model.get(child).is_some_and(|e| e.checked);
                total += t + 1;
                checked += c + usize::from(own);
            }
            counts.insert(key.clone(), (total, checked));
            if let Some(element) = self.model.get_mut(key) {
                element.children_checked = checked > 0 && checked < total;
            }
        }
    }

    /// Applies markers to every materialized element whose markers changed since they were
    /// last applied.
    pub(crate) fn project_markers(&mut self) {
        let rendered = self.rendered;
        for index in rendered.iter() {
            let Some(key) = self.flat.get(index) else {
                continue;
            };
            let markers = self.markers_at(index, rendered);
            if self.selection.applied.get(key) == Some(&markers) {
                continue;
            }
            self.dom.apply_markers(key, &markers);
            self.selection.applied.insert(key.clone(), markers);
        }
    }

    /// Markers of the element at flat index `index`, given the rendered range.
    pub fn markers_at(&self, index: usize, rendered: ViewRange) -> ElementMarkers {
        let Some(key) = self.flat.get(index) else {
            return ElementMarkers::default();
        };
        let element = self.model.get(key);
        let selection = self
            .selection
            .contains(key)
            .then(|| self.selection_marker(index));
        ElementMarkers {
            selection,
            checked: element.is_some_and(|e| e.checked),
            children_checked: element.is_some_and(|e| e.children_checked),
            first: index == rendered.from,
            last: rendered.to > 0 && index == rendered.to - 1,
        }
    }

    fn selection_marker(&self, index: usize) -> SelectionMarker {
        let linked = |other: Option<usize>| {
            let Some(other) = other else {
                return false;
            };
            let (Some(a), Some(b)) = (self.flat.get(index), self.flat.get(other)) else {
                return false;
            };
            self.selection.contains(b) && !self.is_group_boundary(a) && !self.is_group_boundary(b)
        };
        let prev = linked(index.checked_sub(1));
        let next = linked(Some(index + 1));
        match (prev, next) {
            (false, false) => SelectionMarker::Single,
            (false, true) => SelectionMarker::Top,
            (true, true) => SelectionMarker::Middle,
            (true, false) => SelectionMarker::Bottom,
        }
    }

    fn is_group_boundary(&self, key: &K) -> bool {
        self.model.get(key).is_some_and(|e| e.group_boundary)
    }
}
