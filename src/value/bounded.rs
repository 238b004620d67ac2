use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::{DataError, DataResult};
use crate::key::Key;

use super::{ImmutableValue, MutableValue, Value};

/// Total order used to check a bounded value against its range.
pub type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

pub(crate) fn natural_order<E: PartialOrd + 'static>() -> Comparator<E> {
    Arc::new(|a: &E, b: &E| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

#[derive(Clone)]
struct Range<E> {
    minimum: E,
    maximum: E,
    comparator: Comparator<E>,
}

impl<E> Range<E> {
    fn contains(&self, value: &E) -> bool {
        (self.comparator)(value, &self.minimum) != Ordering::Less
            && (self.comparator)(value, &self.maximum) != Ordering::Greater
    }
}

/// Checks the range itself and the initial values. Shared by the builder.
pub(crate) fn validate<E>(
    key: &Key<E>,
    minimum: &E,
    maximum: &E,
    comparator: &Comparator<E>,
    default: &E,
    actual: &E,
) -> DataResult<()> {
    if comparator(minimum, maximum) == Ordering::Greater {
        return Err(DataError::invalid_data(key, "minimum is greater than maximum"));
    }
    let in_range = |value: &E| {
        comparator(value, minimum) != Ordering::Less
            && comparator(value, maximum) != Ordering::Greater
    };
    if !in_range(default) {
        return Err(DataError::invalid_data(key, "default value is outside the range"));
    }
    if !in_range(actual) {
        return Err(DataError::invalid_data(key, "actual value is outside the range"));
    }
    Ok(())
}

/// Mutable value constrained to `[minimum, maximum]` under a comparator.
///
/// Built through [`BoundedValueBuilder`](super::BoundedValueBuilder).
/// Updates that would leave the range are ignored; use
/// [`try_set`](Self::try_set) to have them reported instead.
#[derive(Clone)]
pub struct BoundedValue<E> {
    key: Key<E>,
    default: E,
    actual: E,
    range: Range<E>,
}

impl<E: Clone> BoundedValue<E> {
    pub(crate) fn from_parts(
        key: Key<E>,
        default: E,
        actual: E,
        minimum: E,
        maximum: E,
        comparator: Comparator<E>,
    ) -> Self {
        Self {
            key,
            default,
            actual,
            range: Range {
                minimum,
                maximum,
                comparator,
            },
        }
    }

    pub fn minimum(&self) -> &E {
        &self.range.minimum
    }

    pub fn maximum(&self) -> &E {
        &self.range.maximum
    }

    pub fn comparator(&self) -> &Comparator<E> {
        &self.range.comparator
    }

    pub fn in_range(&self, value: &E) -> bool {
        self.range.contains(value)
    }

    pub fn try_set(&mut self, value: E) -> DataResult<&mut Self> {
        if !self.range.contains(&value) {
            return Err(DataError::invalid_data(
                &self.key,
                "value is outside the range",
            ));
        }
        self.actual = value;
        Ok(self)
    }
}

impl<E> Value<E> for BoundedValue<E> {
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

impl<E: Clone> MutableValue<E> for BoundedValue<E> {
    type Immutable = ImmutableBoundedValue<E>;

    fn set(&mut self, value: E) -> &mut Self {
        if self.range.contains(&value) {
            self.actual = value;
        } else {
            debug!("ignoring out-of-range value for {}", self.key);
        }
        self
    }

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&E) -> E,
    {
        let value = function(&self.actual);
        self.set(value)
    }

    fn as_immutable(&self) -> ImmutableBoundedValue<E> {
        ImmutableBoundedValue {
            key: self.key.clone(),
            default: self.actual.clone(),
            actual: self.actual.clone(),
            range: self.range.clone(),
        }
    }

    fn copy(&self) -> Self {
        self.clone()
    }
}

impl<E: fmt::Debug> fmt::Debug for BoundedValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedValue")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("actual", &self.actual)
            .field("minimum", &self.range.minimum)
            .field("maximum", &self.range.maximum)
            .finish()
    }
}

/// Immutable counterpart of [`BoundedValue`].
#[derive(Clone)]
pub struct ImmutableBoundedValue<E> {
    key: Key<E>,
    default: E,
    actual: E,
    range: Range<E>,
}

impl<E: Clone> ImmutableBoundedValue<E> {
    pub fn minimum(&self) -> &E {
        &self.range.minimum
    }

    pub fn maximum(&self) -> &E {
        &self.range.maximum
    }

    pub fn in_range(&self, value: &E) -> bool {
        self.range.contains(value)
    }
}

impl<E> Value<E> for ImmutableBoundedValue<E> {
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

impl<E: Clone> ImmutableValue<E> for ImmutableBoundedValue<E> {
    type Mutable = BoundedValue<E>;

    /// Returns an unchanged copy when `value` lies outside the range.
    fn with(&self, value: E) -> Self {
        let mut next = self.clone();
        if self.range.contains(&value) {
            next.actual = value;
        } else {
            debug!("ignoring out-of-range value for {}", self.key);
        }
        next
    }

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&E) -> E,
    {
        self.with(function(&self.actual))
    }

    fn as_mutable(&self) -> BoundedValue<E> {
        BoundedValue {
            key: self.key.clone(),
            default: self.default.clone(),
            actual: self.actual.clone(),
            range: self.range.clone(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ImmutableBoundedValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableBoundedValue")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("actual", &self.actual)
            .field("minimum", &self.range.minimum)
            .field("maximum", &self.range.maximum)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> BoundedValue<i32> {
        BoundedValue::from_parts(Key::new("level"), 5, 5, 1, 10, natural_order())
    }

    #[test]
    fn out_of_range_updates_are_ignored() {
        let mut value = level();
        value.set(11).transform(|v| v - 10);
        assert_eq!(*value.get(), 5);
        value.set(10);
        assert_eq!(*value.get(), 10);
        assert!(value.try_set(0).is_err());
        assert_eq!(*value.try_set(1).unwrap().get(), 1);
    }

    #[test]
    fn immutable_side_keeps_range() {
        let immutable = level().as_immutable();
        assert_eq!(*immutable.with(3).get(), 3);
        assert_eq!(*immutable.with(30).get(), 5);
        assert_eq!(immutable.maximum(), &10);
        let mutable = immutable.with(2).as_mutable();
        assert_eq!(mutable.minimum(), &1);
        assert!(mutable.in_range(&7));
        assert!(!mutable.in_range(&-7));
    }

    #[test]
    fn validate_checks_range_and_values() {
        let key = Key::new("level");
        let order = natural_order::<i32>();
        assert!(validate(&key, &1, &10, &order, &5, &5).is_ok());
        assert!(validate(&key, &10, &1, &order, &5, &5).is_err());
        assert!(validate(&key, &1, &10, &order, &0, &5).is_err());
        assert!(validate(&key, &1, &10, &order, &5, &11).is_err());
    }

    #[test]
    fn custom_comparators_define_the_range() {
        let reversed: Comparator<i32> = Arc::new(|a: &i32, b: &i32| b.cmp(a));
        let value = BoundedValue::from_parts(Key::new("rev"), 5, 5, 10, 1, reversed);
        assert!(value.in_range(&3));
        assert!(!value.in_range(&0));
    }
}
