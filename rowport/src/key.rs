#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Identity of an element (row or node) inside a viewport.
///
/// With `std`, keys are hashed; without it they are ordered.
#[cfg(feature = "std")]
pub trait ElementKey: core::hash::Hash + Eq + Clone + core::fmt::Debug {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone + core::fmt::Debug> ElementKey for K {}

#[cfg(not(feature = "std"))]
pub trait ElementKey: Ord + Clone + core::fmt::Debug {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone + core::fmt::Debug> ElementKey for K {}
