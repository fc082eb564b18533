//! The renderer: reconciles the materialized range with a desired range.
//!
//! Only edge operations are allowed: a range grows by prepending or appending and shrinks by
//! dropping elements at either end. Anything else means the bookkeeping went wrong and is
//! reported as [`StructuralError::OverlappingRange`]. A dirty viewport skips the rule by
//! dropping everything first.

use alloc::vec::Vec;

use crate::error::{Result, StructuralError};
use crate::key::ElementKey;
use crate::range::calculate_view_range_for_index;
use crate::{DomAdapter, InsertPosition, RenderState, ViewRange, Viewport};

impl<K: ElementKey, T, D: DomAdapter<K, T>> Viewport<K, T, D> {
    /// The range the current scroll position asks for.
    ///
    /// When the content does not overflow the viewport the range starts at index `0`.
    pub fn calculate_current_view_range(&self) -> ViewRange {
        if !self.options.virtual_scrolling {
            return ViewRange::new(0, self.flat.len());
        }
        let max = self.max_scroll_top();
        let index = if max == 0 {
            0
        } else {
            self.heights
                .row_index_at_scroll_top(self.scroll_top.min(max))
        };
        calculate_view_range_for_index(index, self.view_range_size, self.flat.len())
    }

    /// Renders the range for the current scroll position.
    ///
    /// A zero-height (invisible) container renders nothing.
    pub fn render_viewport(&mut self) -> Result<(), K> {
        if self.options.virtual_scrolling
            && (self.viewport_height == 0 || self.options.average_element_height == 0)
        {
            rtrace!("render_viewport: no geometry");
            return Ok(());
        }
        let desired = self.calculate_current_view_range();
        self.render_view_range(desired)
    }

    /// Reconciles the materialized elements with `desired` (clamped to the flat list).
    ///
    /// Deferred while an animation runs.
    pub fn render_view_range(&mut self, desired: ViewRange) -> Result<(), K> {
        if self.render_state() == RenderState::Blocked {
            rtrace!(?desired, "render_view_range: deferred");
            self.render_pending = true;
            return Ok(());
        }

        let len = self.flat.len();
        let desired = ViewRange::new(desired.from.min(len), desired.to.min(len));
        if desired == self.rendered && !self.dirty {
            return Ok(());
        }
        rtrace!(rendered = ?self.rendered, ?desired, dirty = self.dirty, "render_view_range");

        if self.dirty {
            self.remove_range(self.rendered)?;
            self.dirty = false;
        }
        for part in self.rendered.subtract(desired) {
            if !part.is_empty() {
                self.remove_range(part)?;
            }
        }
        for part in desired.subtract(self.rendered) {
            if !part.is_empty() {
                self.render_range(part)?;
            }
        }

        debug_assert!(self.rendered.to <= self.flat.len());
        self.update_fillers();
        self.project_markers();
        self.check_rendered_range()?;
        if let Some(on_rendered) = &self.options.on_rendered {
            on_rendered(self.rendered);
        }
        Ok(())
    }

    /// Detaches `range`, which must be the whole rendered range or touch one of its ends.
    pub(crate) fn remove_range(&mut self, range: ViewRange) -> Result<(), K> {
        if range.is_empty() {
            return Ok(());
        }
        let rendered = self.rendered;
        let remaining = if range == rendered {
            ViewRange::EMPTY
        } else if rendered.from <= range.from && range.to <= rendered.to {
            if range.from == rendered.from {
                ViewRange::new(range.to, rendered.to)
            } else if range.to == rendered.to {
                ViewRange::new(rendered.from, range.from)
            } else {
                return Err(self.overlapping(range));
            }
        } else {
            return Err(self.overlapping(range));
        };

        let keys: Vec<K> = range
            .iter()
            .filter_map(|i| self.flat.get(i).cloned())
            .collect();
        for key in &keys {
            self.detach(key);
        }
        self.rendered = remaining;
        Ok(())
    }

    /// Materializes `range`, which must directly precede or follow the rendered range (or
    /// anything when nothing is rendered).
    pub(crate) fn render_range(&mut self, range: ViewRange) -> Result<(), K> {
        let rendered = self.rendered;
        let position = if rendered.is_empty() || range.to == rendered.from {
            InsertPosition::Start
        } else if range.from == rendered.to {
            match self.flat.get(rendered.to - 1) {
                Some(last) => InsertPosition::After(last.clone()),
                None => return Err(self.overlapping(range)),
            }
        } else {
            return Err(self.overlapping(range));
        };
        let Some(next) = rendered.union(range) else {
            return Err(self.overlapping(range));
        };
        self.materialize(position, range);
        self.rendered = next;
        Ok(())
    }

    fn overlapping(&self, requested: ViewRange) -> StructuralError<K> {
        rwarn!(rendered = ?self.rendered, ?requested, "range reconciliation failed");
        StructuralError::OverlappingRange {
            rendered: self.rendered,
            requested,
        }
    }

    /// Builds, inserts and measures the elements at flat indexes `range` as one batch.
    pub(crate) fn materialize(&mut self, position: InsertPosition<K>, range: ViewRange) {
        let mut batch = Vec::with_capacity(range.len());
        for i in range.iter() {
            let Some(key) = self.flat.get(i) else {
                continue;
            };
            let Some(element) = self.model.get(key) else {
                continue;
            };
            batch.push((key.clone(), self.dom.build_markup(element)));
        }
        let keys: Vec<K> = batch.iter().map(|(k, _)| k.clone()).collect();
        self.dom.insert_at(position, batch);

        for (offset, key) in keys.iter().enumerate() {
            if let Some(element) = self.model.get_mut(key) {
                element.attached = true;
            }
            // Fresh DOM carries no markers.
            self.selection.forget_markers(key);
            self.measure_element(range.from + offset, key);
        }
    }

    fn measure_element(&mut self, index: usize, key: &K) {
        let Some(extent) = self.dom.measure(key) else {
            return;
        };
        if let Some(element) = self.model.get_mut(key) {
            element.height = Some(extent.height);
            element.width = Some(extent.width);
        }
        self.heights.set(index, extent.height);
    }

    pub(crate) fn detach(&mut self, key: &K) {
        self.dom.remove_at(key);
        if let Some(element) = self.model.get_mut(key) {
            element.attached = false;
        }
        self.selection.forget_markers(key);
    }

    /// Replaces the DOM of materialized elements in place, e.g. after their data changed.
    pub(crate) fn rerender_elements(&mut self, keys: &[K]) -> Result<(), K> {
        let rendered = self.rendered;
        let mut changed = false;
        for key in keys {
            let Some(index) = self.flat.index_of(key).filter(|i| rendered.contains(*i)) else {
                continue;
            };
            let position = if index == rendered.from {
                InsertPosition::Start
            } else {
                match self.flat.get(index - 1) {
                    Some(prev) => InsertPosition::After(prev.clone()),
                    None => InsertPosition::Start,
                }
            };
            self.dom.remove_at(key);
            self.materialize(position, ViewRange::new(index, index + 1));
            changed = true;
        }
        if changed {
            self.update_fillers();
            self.project_markers();
            self.check_rendered_range()?;
        }
        Ok(())
    }

    pub(crate) fn update_fillers(&mut self) {
        let fillers = self.heights.filler_heights(self.rendered);
        if self.fillers == Some(fillers) {
            return;
        }
        self.fillers = Some(fillers);
        self.dom.update_fillers(fillers.0, fillers.1);
    }

    /// The first and last element of a non-empty rendered range must be materialized.
    fn check_rendered_range(&self) -> Result<(), K> {
        let rendered = self.rendered;
        if rendered.is_empty() {
            return Ok(());
        }
        for index in [rendered.from, rendered.to - 1] {
            let Some(key) = self.flat.get(index) else {
                return Err(self.overlapping(rendered));
            };
            if !self.dom.is_materialized(key) {
                rwarn!(element = ?key, index, "rendered range edge is not materialized");
                return Err(StructuralError::NotMaterialized {
                    element: key.clone(),
                    index,
                });
            }
        }
        Ok(())
    }
}
