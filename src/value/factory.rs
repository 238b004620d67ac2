use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{DataError, DataResult};
use crate::key::Key;

use super::bounded::{natural_order, validate, BoundedValue, Comparator};
use super::collection::{ListValue, SetValue};
use super::map::MapValue;
use super::optional::OptionalValue;
use super::single::Single;

/// Constructors for every mutable value kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueFactory;

impl ValueFactory {
    /// Single value whose default is the given element.
    pub fn create_value<E: Clone>(key: Key<E>, element: E) -> Single<E> {
        Single::new(key, element)
    }

    pub fn create_value_with_default<E: Clone>(key: Key<E>, element: E, default: E) -> Single<E> {
        Single::with_actual(key, default, element)
    }

    /// List value with an empty default.
    pub fn create_list_value<E: Clone + PartialEq>(key: Key<Vec<E>>, elements: Vec<E>) -> ListValue<E> {
        ListValue::new(key, Vec::new(), elements)
    }

    pub fn create_list_value_with_defaults<E: Clone + PartialEq>(
        key: Key<Vec<E>>,
        elements: Vec<E>,
        defaults: Vec<E>,
    ) -> ListValue<E> {
        ListValue::new(key, defaults, elements)
    }

    /// Set value whose default is a copy of the given elements.
    pub fn create_set_value<E: Clone + Eq + Hash>(
        key: Key<HashSet<E>>,
        elements: HashSet<E>,
    ) -> SetValue<E> {
        SetValue::new(key, elements.clone(), elements)
    }

    pub fn create_set_value_with_defaults<E: Clone + Eq + Hash>(
        key: Key<HashSet<E>>,
        elements: HashSet<E>,
        defaults: HashSet<E>,
    ) -> SetValue<E> {
        SetValue::new(key, defaults, elements)
    }

    /// Map value whose default is a copy of the given map.
    pub fn create_map_value<K, V>(key: Key<HashMap<K, V>>, map: HashMap<K, V>) -> MapValue<K, V>
    where
        K: Clone + Eq + Hash,
        V: Clone,
    {
        MapValue::new(key, map.clone(), map)
    }

    pub fn create_map_value_with_defaults<K, V>(
        key: Key<HashMap<K, V>>,
        map: HashMap<K, V>,
        defaults: HashMap<K, V>,
    ) -> MapValue<K, V>
    where
        K: Clone + Eq + Hash,
        V: Clone,
    {
        MapValue::new(key, defaults, map)
    }

    pub fn create_bounded_value_builder<E>(key: Key<E>) -> BoundedValueBuilder<E>
    where
        E: PartialOrd + Clone + 'static,
    {
        BoundedValueBuilder::new(key)
    }

    /// Optional value with an empty default.
    pub fn create_optional_value<E: Clone>(key: Key<Option<E>>, element: Option<E>) -> OptionalValue<E> {
        OptionalValue::new(key, None, element)
    }

    pub fn create_optional_value_with_default<E: Clone>(
        key: Key<Option<E>>,
        element: Option<E>,
        default: E,
    ) -> OptionalValue<E> {
        OptionalValue::new(key, Some(default), element)
    }
}

/// Accumulates the parts of a [`BoundedValue`].
///
/// Unless a comparator is given explicitly, setting the first of `minimum`
/// or `maximum` installs the natural order of `E`. Builders created with
/// [`unordered`](Self::unordered) have no natural order and need
/// [`comparator`](Self::comparator).
pub struct BoundedValueBuilder<E> {
    key: Key<E>,
    natural: Option<Comparator<E>>,
    comparator: Option<Comparator<E>>,
    minimum: Option<E>,
    maximum: Option<E>,
    default_value: Option<E>,
    actual_value: Option<E>,
}

impl<E: PartialOrd + Clone + 'static> BoundedValueBuilder<E> {
    pub fn new(key: Key<E>) -> Self {
        let mut builder = Self::unordered(key);
        builder.natural = Some(natural_order());
        builder
    }
}

impl<E: Clone> BoundedValueBuilder<E> {
    pub fn unordered(key: Key<E>) -> Self {
        Self {
            key,
            natural: None,
            comparator: None,
            minimum: None,
            maximum: None,
            default_value: None,
            actual_value: None,
        }
    }

    pub fn comparator(mut self, comparator: Comparator<E>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn minimum(mut self, minimum: E) -> Self {
        self.install_natural_order();
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: E) -> Self {
        self.install_natural_order();
        self.maximum = Some(maximum);
        self
    }

    pub fn default_value(mut self, default: E) -> Self {
        self.default_value = Some(default);
        self
    }

    pub fn actual_value(mut self, actual: E) -> Self {
        self.actual_value = Some(actual);
        self
    }

    fn install_natural_order(&mut self) {
        if self.comparator.is_none() {
            self.comparator = self.natural.clone();
        }
    }

    pub fn build(self) -> DataResult<BoundedValue<E>> {
        let key = self.key;
        let missing = |field: &str| DataError::invalid_data(&key, format!("{field} must be set"));
        let comparator = self.comparator.ok_or_else(|| missing("comparator"))?;
        let minimum = self.minimum.ok_or_else(|| missing("minimum"))?;
        let maximum = self.maximum.ok_or_else(|| missing("maximum"))?;
        let default = self.default_value.ok_or_else(|| missing("default value"))?;
        let actual = self.actual_value.unwrap_or_else(|| default.clone());

        validate(&key, &minimum, &maximum, &comparator, &default, &actual)?;
        Ok(BoundedValue::from_parts(
            key, default, actual, minimum, maximum, comparator,
        ))
    }
}
