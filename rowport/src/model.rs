use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::mem;

use crate::element::{Element, ElementSpec};
use crate::error::{Result, StructuralError};
use crate::key::{ElementKey, KeyMap, KeySet};

/// The hierarchical element model: root sequence plus an id → element map.
///
/// The map is the only owner of elements; parent/child links are stored as ids.
#[derive(Clone, Debug)]
pub struct ElementModel<K, T> {
    roots: Vec<K>,
    elements: KeyMap<K, Element<K, T>>,
}

impl<K: ElementKey, T> Default for ElementModel<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ElementKey, T> ElementModel<K, T> {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            elements: KeyMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.elements.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&Element<K, T>> {
        self.elements.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut Element<K, T>> {
        self.elements.get_mut(key)
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element<K, T>> {
        self.elements.values_mut()
    }

    pub fn roots(&self) -> &[K] {
        &self.roots
    }

    /// Children of `key`; empty for leaves and unknown keys.
    pub fn children(&self, key: &K) -> &[K] {
        self.elements
            .get(key)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestor ids of `key`, nearest first.
    pub fn ancestor_keys(&self, key: &K) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = self.elements.get(key).and_then(|e| e.parent.clone());
        while let Some(parent) = cur {
            cur = self.elements.get(&parent).and_then(|e| e.parent.clone());
            out.push(parent);
            if out.len() > self.elements.len() {
                debug_assert!(false, "ancestor chain of {key:?} does not terminate");
                break;
            }
        }
        out
    }

    /// `key` followed by all its descendants, in pre-order.
    pub fn subtree_keys(&self, key: &K) -> Vec<K> {
        let mut out = Vec::new();
        if !self.elements.contains_key(key) {
            return out;
        }
        self.walk_pre_order(vec![key.clone()], |k| out.push(k.clone()));
        out
    }

    /// All element ids in pre-order (ignoring expansion and filter state).
    pub fn pre_order_keys(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.elements.len());
        let stack = self.roots.iter().rev().cloned().collect();
        self.walk_pre_order(stack, |k| out.push(k.clone()));
        out
    }

    fn walk_pre_order(&self, mut stack: Vec<K>, mut f: impl FnMut(&K)) {
        while let Some(key) = stack.pop() {
            let Some(element) = self.elements.get(&key) else {
                continue;
            };
            f(&key);
            stack.extend(element.children.iter().rev().cloned());
        }
    }

    /// Links a flat list of elements carrying parent ids into the hierarchy.
    ///
    /// Parents may be existing elements or members of the same batch (in any order). The
    /// model is left untouched when any reference cannot be resolved.
    pub(crate) fn insert(&mut self, specs: Vec<ElementSpec<K, T>>) -> Result<Vec<K>, K> {
        let mut batch: KeyMap<K, Option<K>> = KeyMap::new();
        for spec in &specs {
            if self.elements.contains_key(&spec.key)
                || batch
                    .insert(spec.key.clone(), spec.parent.clone())
                    .is_some()
            {
                return Err(StructuralError::DuplicateElement {
                    element: spec.key.clone(),
                });
            }
        }

        for spec in &specs {
            let Some(parent) = &spec.parent else {
                continue;
            };
            let mut cur = parent.clone();
            let mut steps = 0usize;
            loop {
                if self.elements.contains_key(&cur) {
                    break;
                }
                match batch.get(&cur) {
                    Some(None) => break,
                    Some(Some(next)) if steps <= batch.len() => {
                        steps += 1;
                        cur = next.clone();
                    }
                    _ => {
                        return Err(StructuralError::UnresolvedParent {
                            element: spec.key.clone(),
                            parent: parent.clone(),
                        });
                    }
                }
            }
        }

        let mut links = Vec::with_capacity(specs.len());
        for spec in specs {
            let lazy_added = spec
                .parent
                .as_ref()
                .and_then(|p| self.elements.get(p))
                .is_some_and(|p| p.expanded && p.expanded_lazy);
            links.push((spec.key.clone(), spec.parent.clone(), spec.child_index));
            let mut element = Element::from_spec(spec);
            element.lazy_added = lazy_added;
            self.elements.insert(element.key.clone(), element);
        }

        let mut inserted = Vec::with_capacity(links.len());
        for (key, parent, child_index) in links {
            if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
                match child_index {
                    Some(i) if i < siblings.len() => siblings.insert(i, key.clone()),
                    _ => siblings.push(key.clone()),
                }
            }
            inserted.push(key);
        }

        self.rebuild_tree_structure()?;
        Ok(inserted)
    }

    /// Removes the given elements with their subtrees. Returns every removed id in pre-order.
    pub(crate) fn remove(&mut self, keys: &[K]) -> Result<Vec<K>, K> {
        if let Some(unknown) = keys.iter().find(|k| !self.elements.contains_key(*k)) {
            return Err(StructuralError::UnknownElement {
                element: unknown.clone(),
            });
        }

        let mut removed = Vec::new();
        for key in keys {
            if !self.elements.contains_key(key) {
                // Already removed as part of an earlier subtree.
                continue;
            }
            let subtree = self.subtree_keys(key);
            let parent = self.elements.get(key).and_then(|e| e.parent.clone());
            if let Some(siblings) = self.siblings_mut(parent.as_ref()) {
                siblings.retain(|k| k != key);
            }
            for k in &subtree {
                self.elements.remove(k);
            }
            removed.extend(subtree);
        }

        self.rebuild_tree_structure()?;
        Ok(removed)
    }

    pub(crate) fn clear(&mut self) -> Vec<K> {
        let removed = self.pre_order_keys();
        self.roots.clear();
        self.elements.clear();
        removed
    }

    /// Reorders the children of `parent` (the roots when `None`).
    pub(crate) fn sort_children(
        &mut self,
        parent: Option<&K>,
        mut cmp: impl FnMut(&Element<K, T>, &Element<K, T>) -> Ordering,
    ) -> Result<(), K> {
        if let Some(p) = parent.filter(|p| !self.elements.contains_key(*p)) {
            return Err(StructuralError::UnknownElement { element: p.clone() });
        }
        let mut siblings = match self.siblings_mut(parent) {
            Some(siblings) => mem::take(siblings),
            None => return Ok(()),
        };
        siblings.sort_by(|a, b| match (self.elements.get(a), self.elements.get(b)) {
            (Some(a), Some(b)) => cmp(a, b),
            _ => Ordering::Equal,
        });
        if let Some(slot) = self.siblings_mut(parent) {
            *slot = siblings;
        }
        self.rebuild_tree_structure()
    }

    /// Recomputes parent links, child indexes and levels from the child sequences.
    ///
    /// Fails when an element is not reachable from the roots (its parent reference cannot be
    /// resolved) or when a child id has no element.
    pub fn rebuild_tree_structure(&mut self) -> Result<(), K> {
        let mut visited: KeySet<K> = KeySet::new();
        let mut stack: Vec<K> = Vec::with_capacity(self.roots.len());

        for (i, key) in self.roots.iter().enumerate() {
            let Some(element) = self.elements.get_mut(key) else {
                return Err(StructuralError::UnknownElement {
                    element: key.clone(),
                });
            };
            element.parent = None;
            element.child_index = i;
            element.level = 0;
            stack.push(key.clone());
        }

        while let Some(key) = stack.pop() {
            if !visited.insert(key.clone()) {
                return Err(StructuralError::DuplicateElement { element: key });
            }
            let (children, level) = match self.elements.get(&key) {
                Some(e) => (e.children.clone(), e.level),
                None => continue,
            };
            for (i, child) in children.iter().enumerate() {
                let Some(element) = self.elements.get_mut(child) else {
                    return Err(StructuralError::UnresolvedParent {
                        element: child.clone(),
                        parent: key.clone(),
                    });
                };
                element.parent = Some(key.clone());
                element.child_index = i;
                element.level = level + 1;
                stack.push(child.clone());
            }
        }

        if visited.len() != self.elements.len() {
            if let Some(orphan) = self.elements.values().find(|e| !visited.contains(&e.key)) {
                rwarn!(element = ?orphan.key, "rebuild_tree_structure: unreachable element");
                return Err(StructuralError::UnresolvedParent {
                    element: orphan.key.clone(),
                    parent: orphan.parent.clone().unwrap_or_else(|| orphan.key.clone()),
                });
            }
        }
        Ok(())
    }

    fn siblings_mut(&mut self, parent: Option<&K>) -> Option<&mut Vec<K>> {
        match parent {
            Some(p) => self.elements.get_mut(p).map(|e| &mut e.children),
            None => Some(&mut self.roots),
        }
    }
}
