use thiserror::Error;

use crate::ViewRange;

/// Programming-invariant violations.
///
/// These abort the current operation and are never retried: they point at a bug in the caller
/// or in the viewport's own bookkeeping. Conditions reachable through normal interaction
/// (revealing a filtered-out element, rendering into a zero-height container) are silent
/// no-ops instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError<K> {
    /// The element's parent is neither in the model nor in the inserted batch, or the batch
    /// contains a parent cycle.
    #[error("parent {parent:?} of element {element:?} cannot be resolved")]
    UnresolvedParent { element: K, parent: K },

    #[error("element {element:?} already exists")]
    DuplicateElement { element: K },

    #[error("element {element:?} is not part of the model")]
    UnknownElement { element: K },

    /// A range adjustment that is neither a prepend/append nor an edge removal.
    #[error("range {requested:?} cannot be reconciled with rendered range {rendered:?}")]
    OverlappingRange {
        rendered: ViewRange,
        requested: ViewRange,
    },

    /// The first or last element of the rendered range has no DOM representation.
    #[error("element {element:?} at index {index} was not materialized")]
    NotMaterialized { element: K, index: usize },
}

pub type Result<T, K> = core::result::Result<T, StructuralError<K>>;
