use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::key::Key;

use super::{ImmutableValue, MutableValue, Value};

/// Mutable value wrapping a live map.
#[derive(Debug, Clone)]
pub struct MapValue<K, V> {
    key: Key<HashMap<K, V>>,
    default: HashMap<K, V>,
    actual: HashMap<K, V>,
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for MapValue<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.default == other.default && self.actual == other.actual
    }
}

impl<K, V> MapValue<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(key: Key<HashMap<K, V>>, default: HashMap<K, V>, actual: HashMap<K, V>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn put(&mut self, key: K, value: V) -> &mut Self {
        self.actual.insert(key, value);
        self
    }

    pub fn put_all(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> &mut Self {
        self.actual.extend(entries);
        self
    }

    pub fn remove_key(&mut self, key: &K) -> &mut Self {
        self.actual.remove(key);
        self
    }

    pub fn remove_keys<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        for key in keys {
            self.actual.remove(key.borrow());
        }
        self
    }

    /// Removes every entry matching `predicate`.
    pub fn remove_if<P: FnMut(&K, &V) -> bool>(&mut self, mut predicate: P) -> &mut Self {
        self.actual.retain(|key, value| !predicate(key, value));
        self
    }

    pub fn get_entry(&self, key: &K) -> Option<&V> {
        self.actual.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.actual.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.actual.values().any(|existing| existing == value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.actual.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.actual.values()
    }

    pub fn size(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

impl<K, V> Value<HashMap<K, V>> for MapValue<K, V> {
    fn key(&self) -> &Key<HashMap<K, V>> {
        &self.key
    }

    fn get(&self) -> &HashMap<K, V> {
        &self.actual
    }

    fn default_value(&self) -> &HashMap<K, V> {
        &self.default
    }
}

impl<K, V> MutableValue<HashMap<K, V>> for MapValue<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    type Immutable = ImmutableMapValue<K, V>;

    fn set(&mut self, value: HashMap<K, V>) -> &mut Self {
        self.actual = value;
        self
    }

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&HashMap<K, V>) -> HashMap<K, V>,
    {
        self.actual = function(&self.actual);
        self
    }

    fn as_immutable(&self) -> ImmutableMapValue<K, V> {
        ImmutableMapValue::new(self.key.clone(), self.actual.clone(), self.actual.clone())
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}

/// Immutable counterpart of [`MapValue`].
#[derive(Debug, Clone)]
pub struct ImmutableMapValue<K, V> {
    key: Key<HashMap<K, V>>,
    default: HashMap<K, V>,
    actual: HashMap<K, V>,
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for ImmutableMapValue<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.default == other.default && self.actual == other.actual
    }
}

impl<K, V> ImmutableMapValue<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    pub fn new(key: Key<HashMap<K, V>>, default: HashMap<K, V>, actual: HashMap<K, V>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn with_entry(&self, key: K, value: V) -> Self {
        let mut actual = self.actual.clone();
        actual.insert(key, value);
        self.with(actual)
    }

    pub fn with_all_entries(&self, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut actual = self.actual.clone();
        actual.extend(entries);
        self.with(actual)
    }

    pub fn without_key(&self, key: &K) -> Self {
        let mut actual = self.actual.clone();
        actual.remove(key);
        self.with(actual)
    }

    pub fn without_keys<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut actual = self.actual.clone();
        for key in keys {
            actual.remove(key.borrow());
        }
        self.with(actual)
    }

    pub fn get_entry(&self, key: &K) -> Option<&V> {
        self.actual.get(key)
    }

    pub fn size(&self) -> usize {
        self.actual.len()
    }
}

impl<K, V> Value<HashMap<K, V>> for ImmutableMapValue<K, V> {
    fn key(&self) -> &Key<HashMap<K, V>> {
        &self.key
    }

    fn get(&self) -> &HashMap<K, V> {
        &self.actual
    }

    fn default_value(&self) -> &HashMap<K, V> {
        &self.default
    }
}

impl<K, V> ImmutableValue<HashMap<K, V>> for ImmutableMapValue<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    type Mutable = MapValue<K, V>;

    fn with(&self, value: HashMap<K, V>) -> Self {
        Self::new(self.key.clone(), self.default.clone(), value)
    }

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&HashMap<K, V>) -> HashMap<K, V>,
    {
        self.with(function(&self.actual))
    }

    fn as_mutable(&self) -> MapValue<K, V> {
        MapValue::new(self.key.clone(), self.default.clone(), self.actual.clone())
    }
}
