//! Keyed values with default-value semantics.
//!
//! Every kind of value comes as a pair of types. The mutable side updates in
//! place and hands back `&mut Self` for chaining. The immutable side never
//! changes; every modification yields a new instance. Converting between the
//! two always allocates a fresh object.

mod bounded;
mod cache;
mod collection;
mod factory;
mod map;
mod optional;
mod single;

pub use bounded::{BoundedValue, Comparator, ImmutableBoundedValue};
pub use cache::ImmutableValueCache;
pub use collection::{
    CollectionValue, ElementCollection, ImmutableCollectionValue, ImmutableListValue,
    ImmutableSetValue, ImmutableSortedSetValue, ListValue, SetValue, SortedSetValue,
};
pub use factory::{BoundedValueBuilder, ValueFactory};
pub use map::{ImmutableMapValue, MapValue};
pub use optional::{ImmutableOptionalValue, OptionalValue};
pub use single::{ImmutableSingle, Single};

use crate::key::Key;

/// Read access shared by mutable and immutable values.
pub trait Value<E> {
    fn key(&self) -> &Key<E>;

    /// The current (actual) value.
    fn get(&self) -> &E;

    fn default_value(&self) -> &E;

    /// Whether the value holds anything. Only optional values can be empty.
    fn exists(&self) -> bool {
        true
    }
}

pub trait MutableValue<E>: Value<E> + Sized {
    type Immutable: ImmutableValue<E>;

    fn set(&mut self, value: E) -> &mut Self;

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&E) -> E;

    /// Snapshot of the current state. The snapshot's default is the
    /// current actual value.
    fn as_immutable(&self) -> Self::Immutable;

    /// Independent mutable copy with the same default and actual value.
    fn copy(&self) -> Self;
}

pub trait ImmutableValue<E>: Value<E> + Sized {
    type Mutable: MutableValue<E>;

    fn with(&self, value: E) -> Self;

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&E) -> E;

    fn as_mutable(&self) -> Self::Mutable;
}
