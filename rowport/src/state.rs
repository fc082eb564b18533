use alloc::vec::Vec;

/// A lightweight snapshot of the scroll container geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub scroll_top: u64,
    pub viewport_height: u32,
}

/// Restorable UI state of a viewport: geometry plus expanded, selected and checked ids.
///
/// The element model itself is not part of the snapshot; unknown ids are ignored when
/// restoring.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState<K> {
    pub scroll: ScrollState,
    pub expanded: Vec<K>,
    pub selected: Vec<K>,
    pub checked: Vec<K>,
}

impl<K> Default for ViewportState<K> {
    fn default() -> Self {
        Self {
            scroll: ScrollState::default(),
            expanded: Vec::new(),
            selected: Vec::new(),
            checked: Vec::new(),
        }
    }
}
