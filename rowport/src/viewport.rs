use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::batch::Animations;
use crate::element::{Element, ElementSpec};
use crate::error::{Result, StructuralError};
use crate::filter::FilterSet;
use crate::flat::{FlatList, compute_visible_elements, update_filtered_elements};
use crate::key::ElementKey;
use crate::model::ElementModel;
use crate::range::{HeightIndex, calculate_view_range_size};
use crate::selection::Selection;
use crate::{
    Align, DomAdapter, RenderState, ScrollState, Trigger, ViewRange, ViewportOptions,
    ViewportState,
};

/// A headless viewport over a flat or hierarchical element collection.
///
/// The viewport owns the element model and decides which contiguous slice of the visible
/// elements is materialized through the [`DomAdapter`]. It never reads layout on its own; the
/// host reports geometry (`set_viewport_height`, `set_scroll_top`) and the adapter reports
/// element extents when asked.
///
/// Every structural operation runs to completion: the model, the flat list and the
/// materialized range are consistent again when it returns. Only re-renders requested while
/// an animation is in flight are deferred until the last animation finishes.
pub struct Viewport<K, T, D> {
    pub(crate) options: ViewportOptions,
    pub(crate) model: ElementModel<K, T>,
    pub(crate) filters: FilterSet<K, T>,
    pub(crate) flat: FlatList<K>,
    pub(crate) heights: HeightIndex,
    pub(crate) dom: D,

    pub(crate) scroll_top: u64,
    pub(crate) viewport_height: u32,
    pub(crate) view_range_size: usize,
    pub(crate) rendered: ViewRange,
    pub(crate) fillers: Option<(u64, u64)>,

    /// Forces the next render to rebuild the whole range (element order changed).
    pub(crate) dirty: bool,
    pub(crate) render_pending: bool,
    pub(crate) animations: Animations<K>,
    pub(crate) selection: Selection<K>,
}

impl<K: ElementKey, T, D: DomAdapter<K, T>> Viewport<K, T, D> {
    pub fn new(options: ViewportOptions, dom: D) -> Self {
        rdebug!(
            kind = ?options.kind,
            virtual_scrolling = options.virtual_scrolling,
            average_element_height = options.average_element_height,
            "Viewport::new"
        );
        Self {
            options,
            model: ElementModel::new(),
            filters: FilterSet::new(),
            flat: FlatList::new(),
            heights: HeightIndex::new(),
            dom,
            scroll_top: 0,
            viewport_height: 0,
            view_range_size: 0,
            rendered: ViewRange::EMPTY,
            fillers: None,
            dirty: false,
            render_pending: false,
            animations: Animations::new(),
            selection: Selection::new(),
        }
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Applies new options. Geometry-relevant changes rebuild the height index; toggling
    /// virtual scrolling rebuilds the whole range.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ViewportOptions)) -> Result<(), K> {
        let mut next = self.options.clone();
        f(&mut next);

        let prev = core::mem::replace(&mut self.options, next);
        if prev.average_element_height != self.options.average_element_height {
            self.rebuild_heights();
            self.update_fillers();
        }
        if prev.virtual_scrolling != self.options.virtual_scrolling {
            self.dirty = true;
        }
        if prev.multi_select && !self.options.multi_select {
            self.selection.truncate(1);
            self.project_markers();
        }
        self.update_view_range_size();
        self.render_viewport()
    }

    pub fn model(&self) -> &ElementModel<K, T> {
        &self.model
    }

    pub fn element(&self, key: &K) -> Option<&Element<K, T>> {
        self.model.get(key)
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn filters(&self) -> &FilterSet<K, T> {
        &self.filters
    }

    pub fn visible_flat(&self) -> &FlatList<K> {
        &self.flat
    }

    /// Ids of all elements currently shown (filter- and expansion-aware), in display order.
    pub fn visible_elements(&self) -> &[K] {
        self.flat.keys()
    }

    pub fn view_range_rendered(&self) -> ViewRange {
        self.rendered
    }

    /// Ids of the materialized elements, in display order.
    pub fn rendered_elements(&self) -> &[K] {
        &self.flat.keys()[self.rendered.from..self.rendered.to]
    }

    pub fn view_range_size(&self) -> usize {
        self.view_range_size
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Scrollable height of the content: measured heights plus the average for the rest.
    pub fn total_height(&self) -> u64 {
        self.heights.total()
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.total_height()
            .saturating_sub(self.viewport_height as u64)
    }

    /// Heights of the placeholders before and after the rendered range.
    pub fn filler_heights(&self) -> (u64, u64) {
        self.heights.filler_heights(self.rendered)
    }

    /// Cached or estimated height of a visible element.
    pub fn element_height(&self, key: &K) -> Option<u32> {
        self.flat.index_of(key).and_then(|i| self.heights.height(i))
    }

    /// Top offset of a visible element within the scrollable content.
    pub fn element_offset(&self, key: &K) -> Option<u64> {
        self.flat.index_of(key).map(|i| self.heights.offset_of(i))
    }

    /// The visible element spanning content offset `offset` (the last one past the end).
    pub fn element_at_offset(&self, offset: u64) -> Option<&K> {
        if self.flat.is_empty() {
            return None;
        }
        self.flat.get(self.heights.row_index_at_scroll_top(offset))
    }

    /// Widest measured element, e.g. for a horizontal scrollbar in a tree.
    pub fn max_element_width(&self) -> u32 {
        self.flat
            .keys()
            .iter()
            .filter_map(|k| self.model.get(k).and_then(|e| e.width))
            .max()
            .unwrap_or(0)
    }

    pub fn render_state(&self) -> RenderState {
        if self.animations.is_empty() {
            RenderState::Idle
        } else {
            RenderState::Blocked
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) -> Result<(), K> {
        if self.viewport_height == height {
            return Ok(());
        }
        rtrace!(height, "set_viewport_height");
        self.viewport_height = height;
        self.update_view_range_size();
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
        self.render_viewport()
    }

    pub fn set_scroll_top(&mut self, scroll_top: u64) -> Result<(), K> {
        self.scroll_top = scroll_top.min(self.max_scroll_top());
        self.render_viewport()
    }

    pub fn set_viewport_and_scroll(&mut self, height: u32, scroll_top: u64) -> Result<(), K> {
        self.viewport_height = height;
        self.update_view_range_size();
        self.set_scroll_top(scroll_top)
    }

    pub(crate) fn update_view_range_size(&mut self) {
        self.view_range_size = calculate_view_range_size(
            self.options.kind,
            self.viewport_height,
            self.options.average_element_height,
            self.options.view_range_divisor,
        );
    }

    pub(crate) fn rebuild_heights(&mut self) {
        self.heights =
            HeightIndex::rebuild(&self.flat, &self.model, self.options.average_element_height);
    }

    /// Drops every cached extent. Materialized elements are re-measured on the next render.
    pub fn invalidate_heights(&mut self) -> Result<(), K> {
        for element in self.model.elements_mut() {
            element.invalidate_extent();
        }
        self.rebuild_heights();
        self.dirty = true;
        self.render_viewport()
    }

    /// Inserts elements (with parent references resolvable in the model or the batch) and
    /// materializes the ones landing in the rendered range.
    pub fn insert_elements(
        &mut self,
        specs: Vec<ElementSpec<K, T>>,
        trigger: Trigger,
    ) -> Result<(), K> {
        let inserted = self.model.insert(specs)?;
        rdebug!(count = inserted.len(), ?trigger, "insert_elements");
        update_filtered_elements(&mut self.model, &self.filters, true, Some(&inserted));
        self.recompute_check_state();
        self.refresh_flat(trigger, &inserted)
    }

    /// Deletes elements together with their subtrees. Deleted elements are deselected first.
    pub fn delete_elements(&mut self, keys: &[K], trigger: Trigger) -> Result<(), K> {
        if let Some(unknown) = keys.iter().find(|k| !self.model.contains(k)) {
            return Err(StructuralError::UnknownElement {
                element: unknown.clone(),
            });
        }
        let doomed: Vec<K> = keys
            .iter()
            .flat_map(|k| self.model.subtree_keys(k))
            .collect();
        self.selection.remove_all(&doomed);

        let removed = self.model.remove(keys)?;
        rdebug!(count = removed.len(), ?trigger, "delete_elements");
        update_filtered_elements(&mut self.model, &self.filters, false, None);
        self.recompute_check_state();
        self.refresh_flat(trigger, &removed)
    }

    pub fn delete_all_elements(&mut self) -> Result<(), K> {
        self.finish_all_animations_silently();
        for key in self.rendered.iter().filter_map(|i| self.flat.get(i)) {
            self.dom.remove_at(key);
        }
        let removed = self.model.clear();
        rdebug!(count = removed.len(), "delete_all_elements");
        self.selection.clear();
        self.selection.forget_all_markers();
        self.flat = FlatList::new();
        self.rebuild_heights();
        self.rendered = ViewRange::EMPTY;
        self.scroll_top = 0;
        self.dirty = false;
        self.render_pending = false;
        self.render_viewport()?;
        self.update_fillers();
        Ok(())
    }

    /// Mutates element payloads in place and re-materializes the affected elements.
    ///
    /// Filters are re-evaluated for the changed elements, so an update may hide or reveal them.
    pub fn update_elements(&mut self, keys: &[K], mut f: impl FnMut(&mut T)) -> Result<(), K> {
        if let Some(unknown) = keys.iter().find(|k| !self.model.contains(k)) {
            return Err(StructuralError::UnknownElement {
                element: unknown.clone(),
            });
        }
        for key in keys {
            if let Some(element) = self.model.get_mut(key) {
                f(&mut element.data);
                element.invalidate_extent();
            }
        }
        rdebug!(count = keys.len(), "update_elements");
        let outcome = update_filtered_elements(&mut self.model, &self.filters, true, Some(keys));
        self.selection.remove_all(&outcome.newly_hidden);
        self.refresh_flat(Trigger::Program, keys)?;
        self.rerender_elements(keys)
    }

    pub fn replace_element(&mut self, key: &K, data: T) -> Result<(), K> {
        let mut slot = Some(data);
        self.update_elements(core::slice::from_ref(key), |d| {
            if let Some(data) = slot.take() {
                *d = data;
            }
        })
    }

    pub fn set_expanded(&mut self, key: &K, expanded: bool, trigger: Trigger) -> Result<(), K> {
        let Some(element) = self.model.get_mut(key) else {
            return Err(StructuralError::UnknownElement {
                element: key.clone(),
            });
        };
        if element.expanded == expanded && !element.expanded_lazy {
            return Ok(());
        }
        element.expanded = expanded;
        element.expanded_lazy = false;
        rdebug!(element = ?key, expanded, ?trigger, "set_expanded");
        self.refresh_flat(trigger, &[])
    }

    pub fn expand(&mut self, key: &K, trigger: Trigger) -> Result<(), K> {
        self.set_expanded(key, true, trigger)
    }

    pub fn collapse(&mut self, key: &K, trigger: Trigger) -> Result<(), K> {
        self.set_expanded(key, false, trigger)
    }

    pub fn toggle_expanded(&mut self, key: &K, trigger: Trigger) -> Result<(), K> {
        let expanded = match self.model.get(key) {
            Some(e) => e.expanded && !e.expanded_lazy,
            None => {
                return Err(StructuralError::UnknownElement {
                    element: key.clone(),
                });
            }
        };
        self.set_expanded(key, !expanded, trigger)
    }

    /// Expands `key` lazily: only children inserted from now on are shown until the element is
    /// fully expanded.
    pub fn expand_lazy(&mut self, key: &K, trigger: Trigger) -> Result<(), K> {
        let Some(element) = self.model.get_mut(key) else {
            return Err(StructuralError::UnknownElement {
                element: key.clone(),
            });
        };
        if element.expanded && element.expanded_lazy {
            return Ok(());
        }
        element.expanded = true;
        element.expanded_lazy = true;
        self.refresh_flat(trigger, &[])
    }

    pub fn expand_all(&mut self) -> Result<(), K> {
        self.set_all_expanded(true)
    }

    pub fn collapse_all(&mut self) -> Result<(), K> {
        self.set_all_expanded(false)
    }

    fn set_all_expanded(&mut self, expanded: bool) -> Result<(), K> {
        let mut changed = false;
        for element in self.model.elements_mut() {
            if element.children.is_empty() {
                continue;
            }
            if element.expanded != expanded || element.expanded_lazy {
                element.expanded = expanded;
                element.expanded_lazy = false;
                changed = true;
            }
        }
        if !changed {
            return Ok(());
        }
        rdebug!(expanded, "set_all_expanded");
        self.refresh_flat(Trigger::Program, &[])
    }

    /// Reorders the children of `parent` (the roots when `None`) and rebuilds the rendered
    /// range, since materialized elements may have moved.
    pub fn sort_children(
        &mut self,
        parent: Option<&K>,
        cmp: impl FnMut(&Element<K, T>, &Element<K, T>) -> Ordering,
    ) -> Result<(), K> {
        self.finish_all_animations_silently();
        self.model.sort_children(parent, cmp)?;
        // Detach by the old order; the rendered indexes mean nothing in the new one.
        self.remove_range(self.rendered)?;
        self.flat = compute_visible_elements(&self.model);
        self.rebuild_heights();
        self.render_viewport()
    }

    pub fn sort_roots(
        &mut self,
        cmp: impl FnMut(&Element<K, T>, &Element<K, T>) -> Ordering,
    ) -> Result<(), K> {
        self.sort_children(None, cmp)
    }

    /// Registers a named filter and applies all filters.
    pub fn add_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&Element<K, T>) -> bool + Send + Sync + 'static,
    ) -> Result<(), K> {
        self.filters.add(name, filter);
        self.filter()
    }

    pub fn remove_filter(&mut self, name: &str) -> Result<(), K> {
        if !self.filters.remove(name) {
            return Ok(());
        }
        self.filter()
    }

    pub fn clear_filters(&mut self) -> Result<(), K> {
        if self.filters.is_empty() {
            return Ok(());
        }
        self.filters.clear();
        self.filter()
    }

    /// Direct access for bulk changes; call [`Self::filter`] afterwards.
    pub fn filters_mut(&mut self) -> &mut FilterSet<K, T> {
        &mut self.filters
    }

    /// Re-evaluates every filter. Elements that become hidden are deselected.
    pub fn filter(&mut self) -> Result<(), K> {
        let outcome = update_filtered_elements(&mut self.model, &self.filters, true, None);
        if outcome.is_empty() {
            return Ok(());
        }
        self.selection.remove_all(&outcome.newly_hidden);
        self.refresh_flat(Trigger::Program, &[])
    }

    /// Scrolls so that `key` is positioned according to `align`.
    ///
    /// Returns the applied scroll top, or `None` when the element is not visible (unknown,
    /// filtered out or inside a collapsed parent).
    pub fn scroll_to(&mut self, key: &K, align: Align) -> Result<Option<u64>, K> {
        let Some(target) = self.scroll_top_for(key, align) else {
            rtrace!(element = ?key, "scroll_to: element not visible");
            return Ok(None);
        };
        self.set_scroll_top(target)?;
        Ok(Some(self.scroll_top))
    }

    /// The clamped scroll top [`Viewport::scroll_to`] would apply, without applying it.
    pub fn scroll_top_for(&self, key: &K, align: Align) -> Option<u64> {
        let index = self.flat.index_of(key)?;
        let start = self.heights.offset_of(index);
        let size = self
            .heights
            .height(index)
            .unwrap_or(self.options.average_element_height) as u64;
        let end = start.saturating_add(size);
        let view = self.viewport_height as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => start.saturating_add(size / 2).saturating_sub(view / 2),
            Align::Auto => {
                let cur = self.scroll_top;
                if start >= cur && end <= cur.saturating_add(view) {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };
        Some(target.min(self.max_scroll_top()))
    }

    /// Expands every collapsed ancestor of `key`, then scrolls to it.
    ///
    /// Filtered-out or unknown elements are ignored.
    pub fn reveal(&mut self, key: &K, align: Align) -> Result<Option<u64>, K> {
        if !self.model.get(key).is_some_and(|e| e.filter_accepted) {
            rtrace!(element = ?key, "reveal: element not shown by filter");
            return Ok(None);
        }
        let mut changed = false;
        for ancestor in self.model.ancestor_keys(key) {
            if let Some(element) = self.model.get_mut(&ancestor) {
                if !element.expanded || element.expanded_lazy {
                    element.expanded = true;
                    element.expanded_lazy = false;
                    changed = true;
                }
            }
        }
        if changed {
            self.refresh_flat(Trigger::Program, &[])?;
        }
        self.scroll_to(key, align)
    }

    pub fn state(&self) -> ViewportState<K> {
        let order = self.model.pre_order_keys();
        let expanded = order
            .iter()
            .filter(|k| self.model.get(k).is_some_and(|e| e.expanded))
            .cloned()
            .collect();
        let checked = order
            .iter()
            .filter(|k| self.model.get(k).is_some_and(|e| e.checked))
            .cloned()
            .collect();
        ViewportState {
            scroll: ScrollState {
                scroll_top: self.scroll_top,
                viewport_height: self.viewport_height,
            },
            expanded,
            selected: self.selection.keys().to_vec(),
            checked,
        }
    }

    /// Applies a snapshot taken with [`Self::state`]. Ids that are no longer part of the model
    /// are skipped.
    pub fn restore_state(&mut self, state: &ViewportState<K>) -> Result<(), K> {
        self.finish_all_animations_silently();
        for element in self.model.elements_mut() {
            element.expanded = false;
            element.expanded_lazy = false;
            element.checked = false;
        }
        for key in &state.expanded {
            if let Some(element) = self.model.get_mut(key) {
                element.expanded = true;
            }
        }
        for key in &state.checked {
            if let Some(element) = self.model.get_mut(key) {
                element.checked = true;
            }
        }
        self.recompute_check_state();
        self.refresh_flat(Trigger::Program, &[])?;
        self.select_elements(state.selected.iter().cloned());
        self.set_viewport_and_scroll(state.scroll.viewport_height, state.scroll.scroll_top)
    }

    /// Swaps in a freshly computed flat list and patches the materialized range: removed
    /// elements are detached, insert batches inside the range are materialized, and the range
    /// bounds are shifted for changes before it.
    pub(crate) fn refresh_flat(&mut self, trigger: Trigger, touched: &[K]) -> Result<(), K> {
        let next = compute_visible_elements(&self.model);
        let prev = core::mem::replace(&mut self.flat, next);
        self.apply_structure_change(&prev, trigger, touched)
    }
}

impl<K: ElementKey, T, D> core::fmt::Debug for Viewport<K, T, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Viewport")
            .field("options", &self.options)
            .field("elements", &self.model.len())
            .field("visible", &self.flat.len())
            .field("scroll_top", &self.scroll_top)
            .field("viewport_height", &self.viewport_height)
            .field("view_range_size", &self.view_range_size)
            .field("rendered", &self.rendered)
            .field("dirty", &self.dirty)
            .field("render_pending", &self.render_pending)
            .finish_non_exhaustive()
    }
}
