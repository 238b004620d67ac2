use std::hash::Hash;
use std::sync::Arc;

use crate::key::Key;

use super::cache::ImmutableValueCache;
use super::{ImmutableValue, MutableValue, Value};

/// Mutable value holding a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct Single<E> {
    key: Key<E>,
    default: E,
    actual: E,
}

impl<E: Clone> Single<E> {
    /// Creates a value whose actual value starts out as the default.
    pub fn new(key: Key<E>, default: E) -> Self {
        let actual = default.clone();
        Self::with_actual(key, default, actual)
    }

    pub fn with_actual(key: Key<E>, default: E, actual: E) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn into_inner(self) -> E {
        self.actual
    }
}

impl<E> Value<E> for Single<E> {
    fn key(&self) -> &Key<E> {
        &self.key
    }

    fn get(&self) -> &E {
        &self.actual
    }

    fn default_value(&self) -> &E {
        &self.default
    }
}

impl<E: Clone> MutableValue<E> for Single<E> {
    type Immutable = ImmutableSingle<E>;

    fn set(&mut self, value: E) -> &mut Self {
        self.actual = value;
        self
    }

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&E) -> E,
    {
        self.actual = function(&self.actual);
        self
    }

    fn as_immutable(&self) -> ImmutableSingle<E> {
        ImmutableSingle::with_actual(self.key.clone(), self.actual.clone(), self.actual.clone())
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}

/// Immutable value holding a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableSingle<E> {
    key: Key<E>,
    default: E,
    actual: E,
}

impl<E: Clone> ImmutableSingle<E> {
    pub fn new(key: Key<E>, default: E) -> Self {
        let actual = default.clone();
        Self::with_actual(key, default, actual)
    }

    pub fn with_actual(key: Key<E>, default: E, actual: E) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }
}

impl<E> ImmutableSingle<E>
where
    E: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Canonical shared instance for this exact key, default and actual value.
    pub fn cached_of(
        cache: &ImmutableValueCache,
        key: &Key<E>,
        default: E,
        actual: E,
    ) -> Arc<Self> {
        cache.get_or_insert_with(key, &default, &actual, || {
            Self::with_actual(key.clone(), default.clone(), actual.clone())
        })
    }
}

impl<E> Value<E> for ImmutableSingle<E> {
    fn key(&self) -> &Key<E> {
        &self.key
    }

    fn get(&self) -> &E {
        &self.actual
    }

    fn default_value(&self) -> &E {
        &self.default
    }
}

impl<E: Clone> ImmutableValue<E> for ImmutableSingle<E> {
    type Mutable = Single<E>;

    fn with(&self, value: E) -> Self {
        Self::with_actual(self.key.clone(), self.default.clone(), value)
    }

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&E) -> E,
    {
        self.with(function(&self.actual))
    }

    fn as_mutable(&self) -> Single<E> {
        Single::with_actual(self.key.clone(), self.default.clone(), self.actual.clone())
    }
}
