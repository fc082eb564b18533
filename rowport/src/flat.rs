use alloc::vec::Vec;

use crate::element::Element;
use crate::filter::FilterSet;
use crate::key::{ElementKey, KeyMap};
use crate::model::ElementModel;

/// The pre-order, filter- and expansion-aware flattening of the model (`visible_flat`), with
/// an id → index map for membership tests.
#[derive(Clone, Debug)]
pub struct FlatList<K> {
    keys: Vec<K>,
    index: KeyMap<K, usize>,
}

impl<K: ElementKey> Default for FlatList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ElementKey> FlatList<K> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            index: KeyMap::new(),
        }
    }

    pub(crate) fn from_keys(keys: Vec<K>) -> Self {
        let mut index = KeyMap::new();
        for (i, k) in keys.iter().enumerate() {
            index.insert(k.clone(), i);
        }
        Self { keys, index }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

/// Filter evaluation result: elements whose acceptance flipped.
#[derive(Clone, Debug)]
pub(crate) struct FilterOutcome<K> {
    pub(crate) newly_hidden: Vec<K>,
    pub(crate) newly_shown: Vec<K>,
}

impl<K> FilterOutcome<K> {
    pub(crate) fn is_empty(&self) -> bool {
        self.newly_hidden.is_empty() && self.newly_shown.is_empty()
    }
}

/// Re-evaluates filter acceptance.
///
/// With `apply_filters`, the predicates run for `changed` (every element when `None`). Then
/// acceptance is propagated bottom-up: an element is accepted if its own predicate passes or
/// at least one descendant is accepted. Elements whose acceptance flipped lose their cached
/// extent.
pub(crate) fn update_filtered_elements<K: ElementKey, T>(
    model: &mut ElementModel<K, T>,
    filters: &FilterSet<K, T>,
    apply_filters: bool,
    changed: Option<&[K]>,
) -> FilterOutcome<K> {
    if apply_filters {
        match changed {
            Some(keys) => {
                for key in keys {
                    if let Some(element) = model.get_mut(key) {
                        element.filter_match = filters.accepts(element);
                    }
                }
            }
            None => {
                for element in model.elements_mut() {
                    element.filter_match = filters.accepts(element);
                }
            }
        }
    }

    let order = model.pre_order_keys();
    let mut outcome = FilterOutcome {
        newly_hidden: Vec::new(),
        newly_shown: Vec::new(),
    };

    // Reverse pre-order visits every child before its parent.
    for key in order.iter().rev() {
        let descendant_accepted = model
            .children(key)
            .iter()
            .any(|c| model.get(c).is_some_and(|c| c.filter_accepted));
        let Some(element) = model.get_mut(key) else {
            continue;
        };
        let accepted = element.filter_match || descendant_accepted;
        if accepted == element.filter_accepted {
            continue;
        }
        element.filter_accepted = accepted;
        element.invalidate_extent();
        if accepted {
            outcome.newly_shown.push(key.clone());
        } else {
            outcome.newly_hidden.push(key.clone());
        }
    }

    if !outcome.is_empty() {
        rdebug!(
            hidden = outcome.newly_hidden.len(),
            shown = outcome.newly_shown.len(),
            "update_filtered_elements"
        );
    }
    outcome
}

/// Computes `visible_flat`: pre-order, an element is pushed if it is accepted by the filter
/// (which includes having an accepted descendant); children follow only when it is expanded.
pub(crate) fn compute_visible_elements<K: ElementKey, T>(
    model: &ElementModel<K, T>,
) -> FlatList<K> {
    let mut out = Vec::new();
    let mut stack: Vec<&K> = model.roots().iter().rev().collect();

    while let Some(key) = stack.pop() {
        let Some(element) = model.get(key) else {
            continue;
        };
        if !element.filter_accepted {
            continue;
        }
        out.push(key.clone());
        if !element.expanded {
            continue;
        }
        for child in element.children.iter().rev() {
            if model.get(child).is_some_and(|c| shown_under(element, c)) {
                stack.push(child);
            }
        }
    }

    FlatList::from_keys(out)
}

fn shown_under<K, T>(parent: &Element<K, T>, child: &Element<K, T>) -> bool {
    !parent.expanded_lazy || child.lazy_added
}
