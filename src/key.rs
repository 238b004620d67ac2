use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Opaque token naming a value of element type `E`.
///
/// Keys compare and hash by their id only. They are handed out by whatever
/// registry the host uses; the value model never looks inside them.
pub struct Key<E> {
    id: Arc<str>,
    _element: PhantomData<fn() -> E>,
}

impl<E> Key<E> {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            _element: PhantomData,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<E> Clone for Key<E> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            _element: PhantomData,
        }
    }
}

impl<E> PartialEq for Key<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for Key<E> {}

impl<E> Hash for Key<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<E> PartialOrd for Key<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Key<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<E> fmt::Debug for Key<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.id).finish()
    }
}

impl<E> fmt::Display for Key<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_compare_by_id() {
        let health: Key<f64> = Key::new("health");
        assert_eq!(health, Key::new("health"));
        assert_ne!(health, Key::new("max_health"));
        let set: HashSet<Key<f64>> = [health.clone(), Key::new("health")].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(health.to_string(), "health");
    }
}
