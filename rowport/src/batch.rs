//! Patching the materialized range after a structural change, plus slide animation tracking.

use alloc::vec::Vec;

use crate::flat::FlatList;
use crate::key::{ElementKey, KeySet};
use crate::{
    AnimationId, AnimationKind, AnimationState, DomAdapter, InsertPosition, Trigger, ViewRange,
    Viewport,
};

/// A contiguous run of newly visible elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertBatch<K> {
    /// Index of the first element in the new flat list.
    pub insert_index: usize,
    pub keys: Vec<K>,
}

impl<K> InsertBatch<K> {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn range(&self) -> ViewRange {
        ViewRange::new(self.insert_index, self.insert_index + self.keys.len())
    }
}

/// Groups the elements of `next` that are missing from `prev` into runs, ascending.
pub(crate) fn collect_insert_batches<K: ElementKey>(
    next: &FlatList<K>,
    prev: &FlatList<K>,
) -> Vec<InsertBatch<K>> {
    let mut batches = Vec::new();
    let mut current: Option<InsertBatch<K>> = None;
    for (i, key) in next.keys().iter().enumerate() {
        if prev.contains(key) {
            if let Some(batch) = current.take() {
                batches.push(batch);
            }
            continue;
        }
        match &mut current {
            Some(batch) => batch.keys.push(key.clone()),
            None => {
                current = Some(InsertBatch {
                    insert_index: i,
                    keys: alloc::vec![key.clone()],
                })
            }
        }
    }
    batches.extend(current);
    batches
}

/// An animation the adapter has not finished yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningAnimation<K> {
    pub id: AnimationId,
    pub kind: AnimationKind,
    pub keys: Vec<K>,
}

#[derive(Clone, Debug)]
pub(crate) struct Animations<K> {
    next_id: u64,
    running: Vec<RunningAnimation<K>>,
}

impl<K: ElementKey> Animations<K> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            running: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[RunningAnimation<K>] {
        &self.running
    }

    fn push(&mut self, kind: AnimationKind, keys: Vec<K>) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.running.push(RunningAnimation { id, kind, keys });
        id
    }

    fn take(&mut self, id: AnimationId) -> Option<RunningAnimation<K>> {
        let pos = self.running.iter().position(|a| a.id == id)?;
        Some(self.running.remove(pos))
    }

    fn ids(&self) -> Vec<AnimationId> {
        self.running.iter().map(|a| a.id).collect()
    }

    fn overlapping(&self, keys: &KeySet<K>) -> Vec<AnimationId> {
        self.running
            .iter()
            .filter(|a| a.keys.iter().any(|k| keys.contains(k)))
            .map(|a| a.id)
            .collect()
    }
}

impl<K: ElementKey, T, D: DomAdapter<K, T>> Viewport<K, T, D> {
    /// Animations started through [`DomAdapter::start_animation`] that are still running.
    pub fn running_animations(&self) -> &[RunningAnimation<K>] {
        self.animations.as_slice()
    }

    /// Called by the adapter when an animation reached its end.
    ///
    /// Hidden elements lose their DOM here. Once the last animation is done, a render that was
    /// requested in the meantime runs.
    pub fn finish_animation(&mut self, id: AnimationId) -> crate::Result<(), K> {
        let Some(animation) = self.animations.take(id) else {
            rtrace!(?id, "finish_animation: unknown animation");
            return Ok(());
        };
        self.complete_animation(animation);
        self.run_pending_render()
    }

    /// Jumps every running animation to its end state.
    pub fn finish_all_animations(&mut self) -> crate::Result<(), K> {
        self.stop_animations(self.animations.ids());
        self.run_pending_render()
    }

    pub(crate) fn finish_all_animations_silently(&mut self) {
        self.stop_animations(self.animations.ids());
        self.render_pending = false;
    }

    fn run_pending_render(&mut self) -> crate::Result<(), K> {
        if !self.animations.is_empty() || !self.render_pending {
            return Ok(());
        }
        self.render_pending = false;
        rtrace!("running deferred render");
        self.render_viewport()
    }

    fn stop_animations(&mut self, ids: Vec<AnimationId>) {
        for id in ids {
            self.dom.stop_animation(id);
            if let Some(animation) = self.animations.take(id) {
                self.complete_animation(animation);
            }
        }
    }

    fn complete_animation(&mut self, animation: RunningAnimation<K>) {
        rtrace!(id = ?animation.id, kind = ?animation.kind, "complete_animation");
        for key in &animation.keys {
            if animation.kind == AnimationKind::Hide {
                self.dom.remove_at(key);
            }
            if let Some(element) = self.model.get_mut(key) {
                element.animation = AnimationState::Idle;
            }
        }
    }

    fn start_slide(&mut self, kind: AnimationKind, keys: Vec<K>) {
        let state = match kind {
            AnimationKind::Show => AnimationState::Showing,
            AnimationKind::Hide => AnimationState::Hiding,
        };
        for key in &keys {
            if let Some(element) = self.model.get_mut(key) {
                element.animation = state;
            }
        }
        let id = self.animations.push(kind, keys);
        let started = match self.animations.as_slice().last() {
            Some(animation) => self.dom.start_animation(id, kind, &animation.keys),
            None => false,
        };
        rdebug!(?id, ?kind, started, "start_slide");
        if !started {
            if let Some(animation) = self.animations.take(id) {
                self.complete_animation(animation);
            }
        }
    }

    fn should_animate(&self, trigger: Trigger, count: usize) -> bool {
        let max = self
            .options
            .max_animated_batch
            .unwrap_or(self.view_range_size);
        trigger == Trigger::User && self.options.animate && count > 0 && count <= max
    }

    /// Reconciles the materialized range with `self.flat` after it replaced `prev`.
    ///
    /// Elements touched by the change that are still animating are completed first.
    pub(crate) fn apply_structure_change(
        &mut self,
        prev: &FlatList<K>,
        trigger: Trigger,
        touched: &[K],
    ) -> crate::Result<(), K> {
        let removed: Vec<(usize, K)> = prev
            .keys()
            .iter()
            .enumerate()
            .filter(|(_, k)| !self.flat.contains(k))
            .map(|(i, k)| (i, k.clone()))
            .collect();
        let batches = collect_insert_batches(&self.flat, prev);

        if !self.animations.is_empty() {
            let mut affected: KeySet<K> = touched.iter().cloned().collect();
            affected.extend(removed.iter().map(|(_, k)| k.clone()));
            affected.extend(batches.iter().flat_map(|b| b.keys.iter().cloned()));
            let ids = self.animations.overlapping(&affected);
            self.stop_animations(ids);
        }

        rdebug!(
            removed = removed.len(),
            batches = batches.len(),
            visible = self.flat.len(),
            ?trigger,
            "apply_structure_change"
        );

        self.rebuild_heights();
        self.apply_removals(&removed, trigger);
        self.apply_insert_batches(prev, &batches, trigger);
        debug_assert!(self.rendered.to <= self.flat.len());

        self.update_fillers();
        self.project_markers();
        self.render_viewport()
    }

    /// Detaches removed elements inside the range (descending, so indexes stay valid) and
    /// shifts the range for removals before it.
    fn apply_removals(&mut self, removed: &[(usize, K)], trigger: Trigger) {
        let orig = self.rendered;
        let in_range = removed.iter().filter(|(i, _)| orig.contains(*i)).count();
        let animate = self.should_animate(trigger, in_range);

        let mut range = orig;
        let mut hiding = Vec::new();
        for (index, key) in removed.iter().rev() {
            if orig.contains(*index) {
                range.to -= 1;
                if animate {
                    hiding.push(key.clone());
                } else {
                    self.detach(key);
                }
            } else if *index < orig.from {
                range.from -= 1;
                range.to -= 1;
            }
        }
        self.rendered = if range.is_empty() {
            ViewRange::EMPTY
        } else {
            range
        };

        if hiding.is_empty() {
            return;
        }
        hiding.reverse();
        for key in &hiding {
            if let Some(element) = self.model.get_mut(key) {
                element.attached = false;
            }
            self.selection.forget_markers(key);
        }
        self.start_slide(AnimationKind::Hide, hiding);
    }

    /// Materializes insert batches that land inside or at the edges of the rendered range and
    /// shifts the range for batches before it. Batches after the range only change fillers.
    fn apply_insert_batches(
        &mut self,
        prev: &FlatList<K>,
        batches: &[InsertBatch<K>],
        trigger: Trigger,
    ) {
        if batches.is_empty() || self.rendered.is_empty() {
            // An empty range is rebuilt from scratch by the next render.
            return;
        }

        if self.options.virtual_scrolling {
            let mut range = self.rendered;
            for batch in batches {
                if batch.insert_index < range.from {
                    range.from += batch.len();
                    range.to += batch.len();
                } else if batch.insert_index <= range.to {
                    range.to += batch.len();
                }
            }
            let limit = self.view_range_size.saturating_mul(2).max(1);
            if range.len() > limit {
                // Too much to patch in: drop the range and let the next render rebuild it.
                rdebug!(len = range.len(), limit, "apply_insert_batches: rebuilding range");
                let survivors: Vec<K> = prev
                    .keys()
                    .iter()
                    .filter(|k| self.flat.contains(k))
                    .cloned()
                    .collect();
                for key in &survivors[self.rendered.from..self.rendered.to] {
                    self.detach(key);
                }
                self.rendered = ViewRange::EMPTY;
                return;
            }
        }

        for batch in batches {
            let range = self.rendered;
            let at = batch.insert_index;
            if at < range.from {
                self.rendered = ViewRange::new(range.from + batch.len(), range.to + batch.len());
                continue;
            }
            if at > range.to {
                continue;
            }
            let position = if at == range.from {
                InsertPosition::Start
            } else {
                match self.flat.get(at - 1) {
                    Some(prev_key) => InsertPosition::After(prev_key.clone()),
                    None => InsertPosition::Start,
                }
            };
            self.materialize(position, batch.range());
            self.rendered = ViewRange::new(range.from, range.to + batch.len());

            if self.should_animate(trigger, batch.len()) {
                self.start_slide(AnimationKind::Show, batch.keys.clone());
            }
        }
    }
}
