use alloc::string::String;
use alloc::sync::Arc;

use crate::Element;
use crate::registry::Registry;

/// A filter predicate supplied by an external filter-support component.
///
/// The viewport only calls it; it never defines filtering semantics itself.
pub trait ElementFilter<K, T>: Send + Sync {
    fn accept(&self, element: &Element<K, T>) -> bool;
}

impl<K, T, F> ElementFilter<K, T> for F
where
    F: Fn(&Element<K, T>) -> bool + Send + Sync,
{
    fn accept(&self, element: &Element<K, T>) -> bool {
        self(element)
    }
}

pub type SharedFilter<K, T> = Arc<dyn ElementFilter<K, T>>;

/// The set of active filters. An element matches when every filter accepts it.
pub struct FilterSet<K, T> {
    filters: Registry<SharedFilter<K, T>>,
}

impl<K, T> Default for FilterSet<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> Clone for FilterSet<K, T> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
        }
    }
}

impl<K, T> FilterSet<K, T> {
    pub fn new() -> Self {
        Self {
            filters: Registry::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Adds (or replaces) a filter evaluated with the default order `0`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(&Element<K, T>) -> bool + Send + Sync + 'static,
    ) {
        self.add_ordered(name, 0, Arc::new(filter));
    }

    /// Adds (or replaces) a filter. Lower `order` values are evaluated first.
    pub fn add_ordered(&mut self, name: impl Into<String>, order: i32, filter: SharedFilter<K, T>) {
        self.filters.register(name, order, filter);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.filters.unregister(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&SharedFilter<K, T>> {
        self.filters.resolve(name)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.names()
    }

    pub fn accepts(&self, element: &Element<K, T>) -> bool {
        self.filters.values().all(|f| f.accept(element))
    }
}

impl<K, T> core::fmt::Debug for FilterSet<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.filters.names()).finish()
    }
}
