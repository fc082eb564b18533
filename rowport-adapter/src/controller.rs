use alloc::vec::Vec;
use core::fmt;

use rowport::{Align, AnimationId, DomAdapter, ElementKey, Viewport};

use crate::{Easing, ScrollAnchor, SlideTween, Tween, apply_anchor, capture_first_visible_anchor};

/// Timing knobs of a [`Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    /// Quiet time after the last scroll event before the viewport re-renders.
    pub scroll_debounce_ms: u64,
    /// Quiet time after the last resize event before the range size is recomputed.
    pub resize_debounce_ms: u64,
    /// Length of the slide animations the controller runs for the viewport.
    pub slide_duration_ms: u64,
    pub slide_easing: Easing,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: 10,
            resize_debounce_ms: 100,
            slide_duration_ms: 200,
            slide_easing: Easing::SmoothStep,
        }
    }
}

impl ControllerOptions {
    pub fn with_scroll_debounce_ms(mut self, ms: u64) -> Self {
        self.scroll_debounce_ms = ms;
        self
    }

    pub fn with_resize_debounce_ms(mut self, ms: u64) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    pub fn with_slide_duration_ms(mut self, ms: u64) -> Self {
        self.slide_duration_ms = ms;
        self
    }

    pub fn with_slide_easing(mut self, easing: Easing) -> Self {
        self.slide_easing = easing;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending<V> {
    value: V,
    at_ms: u64,
}

/// A framework-neutral driver around a [`rowport::Viewport`].
///
/// The controller holds no UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` when the scroll container reports events
/// - `tick(now_ms)` each frame or timer tick
///
/// Scroll and resize events are debounced: the viewport only sees the last value once the
/// events stopped for the configured quiet time. Slide animations the viewport starts are
/// clocked here and reported finished once their duration elapsed, which unblocks deferred
/// renders. Adapters whose [`DomAdapter::start_animation`] returns `true` can size animated
/// elements from [`Controller::slides`].
pub struct Controller<K, T, D> {
    vp: Viewport<K, T, D>,
    options: ControllerOptions,
    pending_scroll: Option<Pending<u64>>,
    pending_resize: Option<Pending<u32>>,
    tween: Option<Tween>,
    slides: Vec<SlideTween>,
}

impl<K: ElementKey, T, D> fmt::Debug for Controller<K, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("vp", &self.vp)
            .field("options", &self.options)
            .field("pending_scroll", &self.pending_scroll)
            .field("pending_resize", &self.pending_resize)
            .field("tween", &self.tween)
            .field("slides", &self.slides)
            .finish()
    }
}

impl<K: ElementKey, T, D: DomAdapter<K, T>> Controller<K, T, D> {
    pub fn new(vp: Viewport<K, T, D>, options: ControllerOptions) -> Self {
        Self {
            vp,
            options,
            pending_scroll: None,
            pending_resize: None,
            tween: None,
            slides: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport<K, T, D> {
        &self.vp
    }

    /// Direct access for structural operations (insert, expand, filter, select...).
    pub fn viewport_mut(&mut self) -> &mut Viewport<K, T, D> {
        &mut self.vp
    }

    pub fn into_viewport(self) -> Viewport<K, T, D> {
        self.vp
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ControllerOptions) {
        self.options = options;
    }

    /// Slide animations currently clocked by the controller.
    pub fn slides(&self) -> &[SlideTween] {
        &self.slides
    }

    /// Whether a scroll tween is running.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Whether scroll or resize events are waiting for their quiet time.
    pub fn has_pending_events(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_resize.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// This cancels any active tween.
    pub fn on_scroll(&mut self, scroll_top: u64, now_ms: u64) {
        self.cancel_animation();
        self.pending_scroll = Some(Pending {
            value: scroll_top,
            at_ms: now_ms,
        });
    }

    /// Call this when the scroll container's height changed.
    pub fn on_resize(&mut self, viewport_height: u32, now_ms: u64) {
        self.pending_resize = Some(Pending {
            value: viewport_height,
            at_ms: now_ms,
        });
    }

    /// Advances the controller.
    ///
    /// Applies debounced events whose quiet time elapsed, finishes slides that ran their
    /// course and advances the scroll tween. Returns the scroll top the container should show
    /// while a tween is active, `None` otherwise.
    pub fn tick(&mut self, now_ms: u64) -> rowport::Result<Option<u64>, K> {
        self.advance_slides(now_ms)?;

        if let Some(resize) = self.pending_resize {
            if now_ms.saturating_sub(resize.at_ms) >= self.options.resize_debounce_ms {
                self.pending_resize = None;
                self.vp.set_viewport_height(resize.value)?;
            }
        }
        if let Some(scroll) = self.pending_scroll {
            if now_ms.saturating_sub(scroll.at_ms) >= self.options.scroll_debounce_ms {
                self.pending_scroll = None;
                self.vp.set_scroll_top(scroll.value)?;
            }
        }

        let Some(tween) = self.tween else {
            return Ok(None);
        };
        self.vp.set_scroll_top(tween.sample(now_ms))?;
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        Ok(Some(self.vp.scroll_top()))
    }

    /// Applies pending scroll and resize events immediately.
    pub fn flush(&mut self) -> rowport::Result<(), K> {
        if let Some(resize) = self.pending_resize.take() {
            self.vp.set_viewport_height(resize.value)?;
        }
        if let Some(scroll) = self.pending_scroll.take() {
            self.vp.set_scroll_top(scroll.value)?;
        }
        Ok(())
    }

    /// Starts clocks for slides the viewport started since the last call and finishes the
    /// ones whose duration elapsed.
    pub fn advance_slides(&mut self, now_ms: u64) -> rowport::Result<(), K> {
        let running: Vec<(AnimationId, rowport::AnimationKind)> = self
            .vp
            .running_animations()
            .iter()
            .map(|a| (a.id, a.kind))
            .collect();
        // Slides finished or stopped by the viewport itself.
        self.slides
            .retain(|s| running.iter().any(|(id, _)| *id == s.id));
        for (id, kind) in running {
            if self.slides.iter().all(|s| s.id != id) {
                self.slides.push(SlideTween::new(
                    id,
                    kind,
                    now_ms,
                    self.options.slide_duration_ms,
                    self.options.slide_easing,
                ));
            }
        }

        let done: Vec<AnimationId> = self
            .slides
            .iter()
            .filter(|s| s.is_done(now_ms))
            .map(|s| s.id)
            .collect();
        self.slides.retain(|s| !done.contains(&s.id));
        for id in done {
            self.vp.finish_animation(id)?;
        }
        Ok(())
    }

    /// Jumps every slide to its end.
    pub fn finish_slides(&mut self) -> rowport::Result<(), K> {
        self.slides.clear();
        self.vp.finish_all_animations()
    }

    /// Scrolls to an element immediately (no animation).
    ///
    /// Returns the applied offset, `None` when the element is not visible.
    pub fn scroll_to(&mut self, key: &K, align: Align) -> rowport::Result<Option<u64>, K> {
        self.cancel_animation();
        self.pending_scroll = None;
        self.vp.scroll_to(key, align)
    }

    /// Starts a tween to an element.
    ///
    /// Returns the clamped target offset, `None` when the element is not visible.
    pub fn start_tween_to(
        &mut self,
        key: &K,
        align: Align,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Option<u64> {
        let to = self.vp.scroll_top_for(key, align)?;
        Some(self.start_tween_to_offset(to, now_ms, duration_ms, easing))
    }

    /// Starts a tween to an offset.
    ///
    /// Returns the clamped target offset.
    pub fn start_tween_to_offset(
        &mut self,
        offset: u64,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> u64 {
        let to = offset.min(self.vp.max_scroll_top());
        self.pending_scroll = None;
        match &mut self.tween {
            Some(tween) => tween.retarget(now_ms, to, duration_ms),
            None => {
                let from = self.vp.scroll_top();
                self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
            }
        }
        to
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor<K>> {
        capture_first_visible_anchor(&self.vp)
    }

    /// Runs a structural change while keeping the first visible element in place.
    ///
    /// Returns whether the anchor could be re-applied.
    pub fn anchored<R>(
        &mut self,
        f: impl FnOnce(&mut Viewport<K, T, D>) -> rowport::Result<R, K>,
    ) -> rowport::Result<(R, bool), K> {
        let anchor = self.capture_first_visible_anchor();
        let out = f(&mut self.vp)?;
        let applied = match anchor {
            Some(anchor) => self.apply_anchor(&anchor)?,
            None => false,
        };
        Ok((out, applied))
    }

    /// Applies a previously captured anchor by adjusting the scroll top.
    ///
    /// This cancels any active tween.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor<K>) -> rowport::Result<bool, K> {
        self.cancel_animation();
        apply_anchor(&mut self.vp, anchor)
    }
}
