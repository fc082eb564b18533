use core::fmt;

use rowport::{DomAdapter, ElementKey, Viewport};

/// Keeps the viewport visually pinned to an element across structural changes.
///
/// Typical use cases:
/// - loading older rows above the current position without the content jumping
/// - collapsing or filtering above the viewport while the user reads further down
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// Position of the element's top relative to the scroll top; negative once the element
    /// is partly scrolled out.
    pub element_top: i64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("element_top", &self.element_top)
            .finish()
    }
}

/// Captures an anchor for the element at the scroll top.
///
/// Returns `None` when nothing is visible.
pub fn capture_first_visible_anchor<K, T, D>(vp: &Viewport<K, T, D>) -> Option<ScrollAnchor<K>>
where
    K: ElementKey,
    D: DomAdapter<K, T>,
{
    capture_anchor_at_offset(vp, 0)
}

/// Captures an anchor for the element `offset_in_viewport` below the scroll top.
pub fn capture_anchor_at_offset<K, T, D>(
    vp: &Viewport<K, T, D>,
    offset_in_viewport: u64,
) -> Option<ScrollAnchor<K>>
where
    K: ElementKey,
    D: DomAdapter<K, T>,
{
    let scroll_top = vp.scroll_top();
    let key = vp.element_at_offset(scroll_top.saturating_add(offset_in_viewport))?;
    let start = vp.element_offset(key)?;
    Some(ScrollAnchor {
        key: key.clone(),
        element_top: start as i64 - scroll_top as i64,
    })
}

/// Scrolls so that the anchor element sits where it was captured.
///
/// Returns `Ok(false)` when the element is no longer visible (deleted, filtered out or
/// collapsed away); the scroll position is left alone in that case.
pub fn apply_anchor<K, T, D>(
    vp: &mut Viewport<K, T, D>,
    anchor: &ScrollAnchor<K>,
) -> rowport::Result<bool, K>
where
    K: ElementKey,
    D: DomAdapter<K, T>,
{
    let Some(start) = vp.element_offset(&anchor.key) else {
        return Ok(false);
    };
    let target = (start as i64).saturating_sub(anchor.element_top).max(0) as u64;
    vp.set_scroll_top(target)?;
    Ok(true)
}
