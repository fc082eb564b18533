use alloc::vec::Vec;

use crate::{AnimationId, AnimationKind, Element, ElementMarkers, Extent};

/// Where a batch of materialized elements goes, relative to the DOM that already exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertPosition<K> {
    /// Before the first materialized element (directly after the top filler).
    Start,
    /// Directly after the given materialized element.
    After(K),
}

/// The narrow DOM surface the viewport needs.
///
/// Materialized elements are always kept in flat-list order: the viewport only ever inserts
/// at the start of the rendered range or after an element it materialized before.
pub trait DomAdapter<K, T> {
    type Markup;

    /// Builds the representation of `element`. Must not depend on anything but the element's
    /// state at call time.
    fn build_markup(&self, element: &Element<K, T>) -> Self::Markup;

    fn insert_at(&mut self, position: InsertPosition<K>, batch: Vec<(K, Self::Markup)>);

    fn remove_at(&mut self, key: &K);

    fn is_materialized(&self, key: &K) -> bool;

    /// Synchronous layout read. `None` when the element cannot be measured right now (for
    /// example while the container is invisible).
    fn measure(&mut self, key: &K) -> Option<Extent>;

    /// Heights of the placeholders standing in for un-materialized elements.
    fn update_fillers(&mut self, before: u64, after: u64);

    fn apply_markers(&mut self, key: &K, markers: &ElementMarkers);

    /// Starts a slide animation over `keys`. Return `false` when nothing was started; the
    /// viewport then completes the transition synchronously. When `true` is returned, the
    /// adapter must eventually call [`crate::Viewport::finish_animation`] with `id`.
    fn start_animation(&mut self, id: AnimationId, kind: AnimationKind, keys: &[K]) -> bool {
        let _ = (id, kind, keys);
        false
    }

    /// Jumps an in-flight animation to its end state.
    fn stop_animation(&mut self, id: AnimationId) {
        let _ = id;
    }
}
