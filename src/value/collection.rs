use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{DataError, DataResult};
use crate::key::Key;

use super::{ImmutableValue, MutableValue, Value};

/// Element-level operations a collection value delegates to.
pub trait ElementCollection<E>: Clone {
    fn insert_element(&mut self, element: E);

    /// Removes one occurrence of `element`, reporting whether it was present.
    fn remove_element(&mut self, element: &E) -> bool;

    fn contains_element(&self, element: &E) -> bool;

    fn retain_elements<F: FnMut(&E) -> bool>(&mut self, keep: F);

    fn element_count(&self) -> usize;

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_>;
}

impl<E: Clone + PartialEq> ElementCollection<E> for Vec<E> {
    fn insert_element(&mut self, element: E) {
        self.push(element);
    }

    fn remove_element(&mut self, element: &E) -> bool {
        match self.iter().position(|existing| existing == element) {
            Some(index) => {
                self.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn retain_elements<F: FnMut(&E) -> bool>(&mut self, keep: F) {
        self.retain(keep);
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.iter())
    }
}

impl<E: Clone + Eq + Hash> ElementCollection<E> for HashSet<E> {
    fn insert_element(&mut self, element: E) {
        self.insert(element);
    }

    fn remove_element(&mut self, element: &E) -> bool {
        self.remove(element)
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn retain_elements<F: FnMut(&E) -> bool>(&mut self, keep: F) {
        self.retain(keep);
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.iter())
    }
}

impl<E: Clone + Ord> ElementCollection<E> for BTreeSet<E> {
    fn insert_element(&mut self, element: E) {
        self.insert(element);
    }

    fn remove_element(&mut self, element: &E) -> bool {
        self.remove(element)
    }

    fn contains_element(&self, element: &E) -> bool {
        self.contains(element)
    }

    fn retain_elements<F: FnMut(&E) -> bool>(&mut self, keep: F) {
        self.retain(keep);
    }

    fn element_count(&self) -> usize {
        self.len()
    }

    fn elements(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.iter())
    }
}

/// Mutable value wrapping a live collection.
///
/// All element operations act on the backing collection directly and hand
/// back the same wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionValue<E, C> {
    key: Key<C>,
    default: C,
    actual: C,
    _element: PhantomData<fn() -> E>,
}

pub type ListValue<E> = CollectionValue<E, Vec<E>>;
pub type SetValue<E> = CollectionValue<E, HashSet<E>>;
pub type SortedSetValue<E> = CollectionValue<E, BTreeSet<E>>;

impl<E, C: ElementCollection<E>> CollectionValue<E, C> {
    pub fn new(key: Key<C>, default: C, actual: C) -> Self {
        Self {
            key,
            default,
            actual,
            _element: PhantomData,
        }
    }

    pub fn add(&mut self, element: E) -> &mut Self {
        self.actual.insert_element(element);
        self
    }

    pub fn add_all(&mut self, elements: impl IntoIterator<Item = E>) -> &mut Self {
        for element in elements {
            self.actual.insert_element(element);
        }
        self
    }

    pub fn remove(&mut self, element: &E) -> &mut Self {
        self.actual.remove_element(element);
        self
    }

    pub fn remove_all<I>(&mut self, elements: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        for element in elements {
            self.actual.remove_element(element.borrow());
        }
        self
    }

    /// Removes every element matching `predicate`.
    pub fn remove_if<P: FnMut(&E) -> bool>(&mut self, mut predicate: P) -> &mut Self {
        self.actual.retain_elements(|element| !predicate(element));
        self
    }

    pub fn size(&self) -> usize {
        self.actual.element_count()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, element: &E) -> bool {
        self.actual.contains_element(element)
    }

    pub fn contains_all<I>(&self, elements: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        elements
            .into_iter()
            .all(|element| self.actual.contains_element(element.borrow()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.actual.elements()
    }
}

impl<E: Clone + PartialEq> CollectionValue<E, Vec<E>> {
    pub fn get_at(&self, index: usize) -> Option<&E> {
        self.actual.get(index)
    }

    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.actual.iter().position(|existing| existing == element)
    }

    pub fn insert_at(&mut self, index: usize, element: E) -> DataResult<&mut Self> {
        if index > self.actual.len() {
            return Err(out_of_bounds(index, self.actual.len()));
        }
        self.actual.insert(index, element);
        Ok(self)
    }

    pub fn set_at(&mut self, index: usize, element: E) -> DataResult<&mut Self> {
        let len = self.actual.len();
        let slot = self
            .actual
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        *slot = element;
        Ok(self)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<E> {
        (index < self.actual.len()).then(|| self.actual.remove(index))
    }
}

fn out_of_bounds(index: usize, len: usize) -> DataError {
    DataError::precondition(format!(
        "index {index} is out of bounds for a list of length {len}"
    ))
}

impl<E, C> Value<C> for CollectionValue<E, C> {
    fn key(&self) -> &Key<C> {
        &self.key
    }

    fn get(&self) -> &C {
        &self.actual
    }

    fn default_value(&self) -> &C {
        &self.default
    }
}

impl<E, C: ElementCollection<E>> MutableValue<C> for CollectionValue<E, C> {
    type Immutable = ImmutableCollectionValue<E, C>;

    fn set(&mut self, value: C) -> &mut Self {
        self.actual = value;
        self
    }

    fn transform<F>(&mut self, function: F) -> &mut Self
    where
        F: FnOnce(&C) -> C,
    {
        self.actual = function(&self.actual);
        self
    }

    fn as_immutable(&self) -> ImmutableCollectionValue<E, C> {
        ImmutableCollectionValue::new(self.key.clone(), self.actual.clone(), self.actual.clone())
    }

    fn copy(&self) -> Self {
        Self::new(self.key.clone(), self.default.clone(), self.actual.clone())
    }
}

/// Immutable counterpart of [`CollectionValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImmutableCollectionValue<E, C> {
    key: Key<C>,
    default: C,
    actual: C,
    _element: PhantomData<fn() -> E>,
}

pub type ImmutableListValue<E> = ImmutableCollectionValue<E, Vec<E>>;
pub type ImmutableSetValue<E> = ImmutableCollectionValue<E, HashSet<E>>;
pub type ImmutableSortedSetValue<E> = ImmutableCollectionValue<E, BTreeSet<E>>;

impl<E, C: ElementCollection<E>> ImmutableCollectionValue<E, C> {
    pub fn new(key: Key<C>, default: C, actual: C) -> Self {
        Self {
            key,
            default,
            actual,
            _element: PhantomData,
        }
    }

    fn modified(&self, change: impl FnOnce(&mut C)) -> Self {
        let mut actual = self.actual.clone();
        change(&mut actual);
        Self::new(self.key.clone(), self.default.clone(), actual)
    }

    pub fn with_element(&self, element: E) -> Self {
        self.modified(|actual| actual.insert_element(element))
    }

    pub fn with_all_elements(&self, elements: impl IntoIterator<Item = E>) -> Self {
        self.modified(|actual| {
            for element in elements {
                actual.insert_element(element);
            }
        })
    }

    pub fn without_element(&self, element: &E) -> Self {
        self.modified(|actual| {
            actual.remove_element(element);
        })
    }

    pub fn without_all<I>(&self, elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        self.modified(|actual| {
            for element in elements {
                actual.remove_element(element.borrow());
            }
        })
    }

    pub fn without_matching<P: FnMut(&E) -> bool>(&self, mut predicate: P) -> Self {
        self.modified(|actual| actual.retain_elements(|element| !predicate(element)))
    }

    pub fn size(&self) -> usize {
        self.actual.element_count()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, element: &E) -> bool {
        self.actual.contains_element(element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.actual.elements()
    }
}

impl<E, C> Value<C> for ImmutableCollectionValue<E, C> {
    fn key(&self) -> &Key<C> {
        &self.key
    }

    fn get(&self) -> &C {
        &self.actual
    }

    fn default_value(&self) -> &C {
        &self.default
    }
}

impl<E, C: ElementCollection<E>> ImmutableValue<C> for ImmutableCollectionValue<E, C> {
    type Mutable = CollectionValue<E, C>;

    fn with(&self, value: C) -> Self {
        Self::new(self.key.clone(), self.default.clone(), value)
    }

    fn transform<F>(&self, function: F) -> Self
    where
        F: FnOnce(&C) -> C,
    {
        self.with(function(&self.actual))
    }

    fn as_mutable(&self) -> CollectionValue<E, C> {
        CollectionValue::new(self.key.clone(), self.default.clone(), self.actual.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ListValue<String> {
        ListValue::new(
            Key::new("names"),
            Vec::new(),
            vec!["a".to_string(), "b".to_string()],
        )
    }

    #[test]
    fn element_operations_return_the_same_wrapper() {
        let mut value = names();
        let address = &value as *const ListValue<String>;
        let returned = value
            .add("c".to_string())
            .add_all(["d".to_string(), "e".to_string()])
            .remove(&"a".to_string()) as *const ListValue<String>;
        assert_eq!(address, returned);
        assert_eq!(value.get(), &["b", "c", "d", "e"]);

        value.remove_if(|name| name == "c" || name == "e");
        assert_eq!(value.get(), &["b", "d"]);
        value.remove_all(["b".to_string()]);
        assert_eq!(value.size(), 1);
        assert!(value.contains(&"d".to_string()));
        assert!(!value.is_empty());
        assert!(value.exists());
    }

    #[test]
    fn list_index_operations() {
        let mut value = names();
        value.insert_at(1, "x".to_string()).unwrap();
        assert_eq!(value.index_of(&"x".to_string()), Some(1));
        value.set_at(0, "z".to_string()).unwrap();
        assert_eq!(value.get_at(0).map(String::as_str), Some("z"));
        assert_eq!(value.remove_at(2), Some("b".to_string()));
        assert_eq!(value.remove_at(5), None);
        assert!(matches!(
            value.insert_at(9, "late".to_string()),
            Err(DataError::PreconditionViolation(_))
        ));
        assert!(value.set_at(9, "late".to_string()).is_err());
    }

    #[test]
    fn as_immutable_and_copy_preserve_order() {
        let mut value = names();
        value.add("c".to_string());
        let immutable = value.as_immutable();
        let copy = value.copy();
        value.remove(&"a".to_string());
        assert_eq!(immutable.get(), &["a", "b", "c"]);
        assert_eq!(copy.get(), &["a", "b", "c"]);
        assert!(copy.default_value().is_empty());
    }

    #[test]
    fn immutable_operations_leave_receiver_untouched() {
        let immutable = names().as_immutable();
        let grown = immutable.with_element("c".to_string());
        let shrunk = grown.without_matching(|name| name == "a");
        assert_eq!(immutable.size(), 2);
        assert_eq!(grown.get(), &["a", "b", "c"]);
        assert_eq!(shrunk.get(), &["b", "c"]);
        assert_eq!(shrunk.without_all(["b".to_string()]).size(), 1);

        let mut mutable = shrunk.as_mutable();
        mutable.add("d".to_string());
        assert_eq!(shrunk.size(), 2);
        assert_eq!(mutable.size(), 3);
    }

    #[test]
    fn set_values_delegate_membership() {
        let mut value: SetValue<u8> = SetValue::new(Key::new("ids"), HashSet::new(), HashSet::new());
        value.add_all([1, 2, 2, 3]);
        assert_eq!(value.size(), 3);
        assert!(value.contains_all([1u8, 3]));
        assert!(!value.contains_all([4u8]));

        let sorted: SortedSetValue<u8> =
            SortedSetValue::new(Key::new("sorted"), BTreeSet::new(), [3, 1, 2].into());
        assert_eq!(sorted.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }
}
