//! A headless virtual-scrolling viewport for tables and trees.
//!
//! For host-side utilities (debounced scroll handling, animation clocks, anchoring), see the
//! `rowport-adapter` crate.
//!
//! The engine keeps a bounded, contiguous slice of a potentially huge hierarchical model
//! materialized while the model is filtered, sorted, expanded, collapsed, inserted into and
//! deleted from. It is UI-agnostic. The host provides:
//! - a [`DomAdapter`] that builds, inserts, removes and measures element representations
//! - the viewport height and scroll offset
//! - animation completion callbacks, when its adapter runs animations
//!
//! Everything else (visible-flat computation, range calculation, range diffing, insert batch
//! animation, selection and check markers) happens inside [`Viewport`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod batch;
mod dom;
mod element;
mod error;
mod fenwick;
mod filter;
mod flat;
mod key;
mod model;
mod options;
mod range;
mod registry;
mod render;
mod selection;
mod state;
mod types;
mod viewport;


pub use batch::{InsertBatch, RunningAnimation};
pub use dom::{DomAdapter, InsertPosition};
pub use element::{Element, ElementSpec};
pub use error::{Result, StructuralError};
pub use filter::{ElementFilter, FilterSet, SharedFilter};
pub use flat::FlatList;
pub use key::ElementKey;
pub use model::ElementModel;
pub use options::{CheckPropagation, RenderedCallback, ViewportOptions};
pub use range::{calculate_view_range_for_index, calculate_view_range_size};
pub use registry::Registry;
pub use state::{ScrollState, ViewportState};
pub use types::{
    Align, AnimationId, AnimationKind, AnimationState, ElementMarkers, Extent, RenderState,
    SelectionMarker, Trigger, ViewRange, ViewportKind,
};
pub use viewport::Viewport;
