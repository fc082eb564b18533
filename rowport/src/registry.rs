use alloc::string::String;
use alloc::vec::Vec;

/// An instance-scoped, named registry with deterministic iteration order.
///
/// Entries iterate by `(order, registration sequence)`. Re-registering a name replaces the
/// value and order but keeps the original sequence number.
#[derive(Clone, Debug)]
pub struct Registry<V> {
    entries: Vec<RegistryEntry<V>>,
    next_seq: u64,
}

#[derive(Clone, Debug)]
struct RegistryEntry<V> {
    name: String,
    order: i32,
    seq: u64,
    value: V,
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Registry<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers `value` under `name`, returning the value it replaced.
    pub fn register(&mut self, name: impl Into<String>, order: i32, value: V) -> Option<V> {
        let name = name.into();
        let (seq, previous) = match self.entries.iter().position(|e| e.name == name) {
            Some(pos) => {
                let entry = self.entries.remove(pos);
                (entry.seq, Some(entry.value))
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                (seq, None)
            }
        };
        let at = self
            .entries
            .partition_point(|e| (e.order, e.seq) < (order, seq));
        self.entries.insert(
            at,
            RegistryEntry {
                name,
                order,
                seq,
                value,
            },
        );
        previous
    }

    pub fn resolve(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    pub fn unregister(&mut self, name: &str) -> Option<V> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos).value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|e| &e.value)
    }
}
