use rowport::{AnimationId, AnimationKind};

/// Interpolates the scroll top between two offsets over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: u64,
    pub to: u64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: u64, to: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    pub fn sample(&self, now_ms: u64) -> u64 {
        let eased = self.easing.sample(progress(self.start_ms, self.duration_ms, now_ms));
        let from = self.from as f32;
        let to = self.to as f32;
        (from + (to - from) * eased).max(0.0) as u64
    }

    /// Restarts from the current sample towards `new_to`.
    pub fn retarget(&mut self, now_ms: u64, new_to: u64, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

/// Clock for one slide animation started by the viewport.
///
/// A show slide grows its elements from zero to their full height, a hide slide shrinks them.
/// The adapter reads [`SlideTween::visible_fraction`] to size the animated elements each frame
/// and reports completion once [`SlideTween::is_done`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideTween {
    pub id: AnimationId,
    pub kind: AnimationKind,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl SlideTween {
    pub fn new(
        id: AnimationId,
        kind: AnimationKind,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Self {
        Self {
            id,
            kind,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Share of the full height the animated elements occupy at `now_ms`, in `0.0..=1.0`.
    pub fn visible_fraction(&self, now_ms: u64) -> f32 {
        let eased = self
            .easing
            .sample(progress(self.start_ms, self.duration_ms, now_ms));
        match self.kind {
            AnimationKind::Show => eased,
            AnimationKind::Hide => 1.0 - eased,
        }
    }

    /// Height to give an element of `full_height` at `now_ms`.
    pub fn height_at(&self, full_height: u32, now_ms: u64) -> u32 {
        (full_height as f32 * self.visible_fraction(now_ms) + 0.5) as u32
    }
}

fn progress(start_ms: u64, duration_ms: u64, now_ms: u64) -> f32 {
    let elapsed = now_ms.saturating_sub(start_ms);
    (elapsed as f32 / duration_ms as f32).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    EaseInOutCubic,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}
