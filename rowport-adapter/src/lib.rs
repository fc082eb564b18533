//! Adapter utilities for the `rowport` crate.
//!
//! `rowport` is UI-agnostic: it owns the element model and the materialized range, while the
//! host reports geometry and completes animations. This crate provides small,
//! framework-neutral helpers most hosts need:
//!
//! - A [`Controller`] that debounces scroll and resize events and clocks slide animations
//! - Scroll anchoring (keep the viewport pinned to an element across structural changes)
//! - Tween-based smooth scrolling and slide progress helpers
//!
//! This crate is intentionally framework-agnostic (no DOM or toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod anchor;
mod controller;
mod tween;

#[cfg(test)]
mod tests;

pub use anchor::{
    ScrollAnchor, apply_anchor, capture_anchor_at_offset, capture_first_visible_anchor,
};
pub use controller::{Controller, ControllerOptions};
pub use tween::{Easing, SlideTween, Tween};
