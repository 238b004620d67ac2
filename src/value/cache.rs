use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

use crate::key::Key;

type Table<E, V> = HashMap<(Key<E>, E, E), Arc<V>>;

trait InternTable: Send {
    fn len(&self) -> usize;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E, V> InternTable for Table<E, V>
where
    E: Send + 'static,
    V: Send + Sync + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Interning table for immutable values.
///
/// Instances are keyed by their concrete type, key, default and actual
/// value. Lookup and insertion happen under a single lock, so concurrent
/// callers always observe one canonical instance per tuple.
///
/// Entries are never evicted: memory grows with the number of distinct
/// tuples seen. Callers that need a bound should [`clear`](Self::clear)
/// the cache on their own schedule or keep separate caches per scope.
#[derive(Default)]
pub struct ImmutableValueCache {
    tables: Mutex<HashMap<TypeId, Box<dyn InternTable>>>,
}

impl ImmutableValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance for the tuple, building it with `make`
    /// on first use.
    pub fn get_or_insert_with<V, E, F>(&self, key: &Key<E>, default: &E, actual: &E, make: F) -> Arc<V>
    where
        V: Send + Sync + 'static,
        E: Clone + Eq + Hash + Send + 'static,
        F: FnOnce() -> V,
    {
        let mut tables = self.tables.lock();
        let Some(table) = tables
            .entry(TypeId::of::<Table<E, V>>())
            .or_insert_with(|| Box::new(Table::<E, V>::new()) as Box<dyn InternTable>)
            .as_any_mut()
            .downcast_mut::<Table<E, V>>()
        else {
            // Unreachable: tables are only ever inserted under their own TypeId.
            return Arc::new(make());
        };

        let lookup = (key.clone(), default.clone(), actual.clone());
        if let Some(existing) = table.get(&lookup) {
            return Arc::clone(existing);
        }
        let value = Arc::new(make());
        table.insert(lookup, Arc::clone(&value));
        trace!(
            "interned {} for key {key} ({} entries)",
            std::any::type_name::<V>(),
            table.len()
        );
        value
    }

    /// Total number of interned instances across all value types.
    pub fn len(&self) -> usize {
        self.tables.lock().values().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.tables.lock().clear();
    }
}

impl std::fmt::Debug for ImmutableValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmutableValueCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn types_do_not_share_entries() {
        let cache = ImmutableValueCache::new();
        let key: Key<i32> = Key::new("level");
        let a: Arc<(i32, i32)> = cache.get_or_insert_with(&key, &1, &2, || (1, 2));
        let b: Arc<String> = cache.get_or_insert_with(&key, &1, &2, || "other".to_string());
        assert_eq!(*a, (1, 2));
        assert_eq!(*b, "other");
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_callers_share_one_instance() {
        let cache = Arc::new(ImmutableValueCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let key: Key<u32> = Key::new("speed");
                    cache.get_or_insert_with(&key, &0, &5, || 5u32)
                })
            })
            .collect();
        let results: Vec<Arc<u32>> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(results.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(cache.len(), 1);
    }
}
