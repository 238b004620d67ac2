use std::hash::Hash;
use std::sync::Arc;

use crate::key::Key;

use super::cache::ImmutableValueCache;
use super::{ImmutableValue, MutableValue, Value};

/// Mutable value that may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalValue<E> {
    key: Key<Option<E>>,
    default: Option<E>,
    actual: Option<E>,
}

impl<E: Clone> OptionalValue<E> {
    pub fn new(key: Key<Option<E>>, default: Option<E>, actual: Option<E>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    /// The held element, or `fallback` when empty.
    pub fn or_else(&self, fallback: E) -> E {
        self.actual.clone().unwrap_or(fallback)
    }
}

impl<E> Value<Option<E>> for OptionalValue<E> {
    fn key(&self) -> &Key<Option<E>> {
        &self.key
    }

    fn get(&self) -> &Option<E> {
        &self.actual
    }

    fn default_value(&self) -> &Option<E> {
        &self.default
    }

    fn exists(&self) -> bool {
        self.actual.is_some()
    }
}

impl<E: Clone> MutableValue<Option<E>> for OptionalValue<E> {
    type Immutable = ImmutableOptionalValue<E>;

    fn set(&mut self, value: Option<E>) -> &mut Self {
        self.actual = value;
        self
    }

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&Option<E>) -> Option<E>,
    {
        self.actual = function(&self.actual);
        self
    }

    fn as_immutable(&self) -> ImmutableOptionalValue<E> {
        ImmutableOptionalValue::new(self.key.clone(), self.actual.clone(), self.actual.clone())
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}

/// Immutable value that may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableOptionalValue<E> {
    key: Key<Option<E>>,
    default: Option<E>,
    actual: Option<E>,
}

impl<E: Clone> ImmutableOptionalValue<E> {
    pub fn new(key: Key<Option<E>>, default: Option<E>, actual: Option<E>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn or_else(&self, fallback: E) -> E {
        self.actual.clone().unwrap_or(fallback)
    }
}

impl<E> ImmutableOptionalValue<E>
where
    E: Clone + Eq + Hash + Send + Sync + 'static,
{
    pub fn cached_of(
        cache: &ImmutableValueCache,
        key: &Key<Option<E>>,
        default: Option<E>,
        actual: Option<E>,
    ) -> Arc<Self> {
        cache.get_or_insert_with(key, &default, &actual, || {
            Self::new(key.clone(), default.clone(), actual.clone())
        })
    }
}

impl<E> Value<Option<E>> for ImmutableOptionalValue<E> {
    fn key(&self) -> &Key<Option<E>> {
        &self.key
    }

    fn get(&self) -> &Option<E> {
        &self.actual
    }

    fn default_value(&self) -> &Option<E> {
        &self.default
    }

    fn exists(&self) -> bool {
        self.actual.is_some()
    }
}

impl<E: Clone> ImmutableValue<Option<E>> for ImmutableOptionalValue<E> {
    type Mutable = OptionalValue<E>;

    fn with(&self, value: Option<E>) -> Self {
        Self::new(self.key.clone(), self.default.clone(), value)
    }

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&Option<E>) -> Option<E>,
    {
        self.with(function(&self.actual))
    }

    fn as_mutable(&self) -> OptionalValue<E> {
        OptionalValue::new(self.key.clone(), self.default.clone(), self.actual.clone())
    }
}
