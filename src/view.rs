use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::data::{DataValue, Scalar};
use crate::error::{DataError, DataResult};
use crate::query::DataQuery;

/// Ordered hierarchical container addressed by [`DataQuery`] paths.
///
/// Keys are unique per level and keep their insertion order. Nested
/// containers are owned outright, so a view can never contain itself.
#[derive(Debug, Clone, Default)]
pub struct DataView {
    entries: Vec<(String, DataValue)>,
}

impl DataView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the direct entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns an independent deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }

    fn entry(&self, key: &str) -> Option<&DataValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    fn put(&mut self, key: &str, value: DataValue) {
        match self.position(key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Returns the value stored at `query`. The root query has no value.
    pub fn get(&self, query: impl Into<DataQuery>) -> Option<&DataValue> {
        let query = query.into();
        let (leaf, parents) = query.parts().split_last()?;
        self.view_at(parents)?.entry(leaf)
    }

    pub fn get_mut(&mut self, query: impl Into<DataQuery>) -> Option<&mut DataValue> {
        let query = query.into();
        let (leaf, parents) = query.parts().split_last()?;
        let view = self.view_at_mut(parents)?;
        let index = view.position(leaf)?;
        Some(&mut view.entries[index].1)
    }

    pub fn contains(&self, query: impl Into<DataQuery>) -> bool {
        self.get(query).is_some()
    }

    fn view_at(&self, parts: &[String]) -> Option<&DataView> {
        let mut current = self;
        for part in parts {
            current = current.entry(part)?.as_view()?;
        }
        Some(current)
    }

    fn view_at_mut(&mut self, parts: &[String]) -> Option<&mut DataView> {
        let Some((first, rest)) = parts.split_first() else {
            return Some(self);
        };
        let index = self.position(first)?;
        self.entries[index].1.as_view_mut()?.view_at_mut(rest)
    }

    /// Checks that every segment in `parts` is absent or a nested view, so
    /// that a following write cannot fail halfway through.
    fn check_writable(&self, query: &DataQuery, parts: &[String]) -> DataResult<()> {
        if query.parts().iter().any(String::is_empty) {
            return Err(DataError::precondition(format!(
                "query '{query}' contains an empty segment"
            )));
        }
        let mut current = self;
        for part in parts {
            match current.entry(part) {
                None => return Ok(()),
                Some(value) => {
                    current = value.as_view().ok_or_else(|| {
                        DataError::invalid_data(
                            query,
                            format!("segment '{part}' holds a {}, not a view", value.kind()),
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    fn descend_or_create(&mut self, parts: &[String]) -> DataResult<&mut DataView> {
        let Some((first, rest)) = parts.split_first() else {
            return Ok(self);
        };
        let index = match self.position(first) {
            Some(index) => index,
            None => {
                self.entries
                    .push((first.clone(), DataValue::Map(DataView::new())));
                self.entries.len() - 1
            }
        };
        let value = &mut self.entries[index].1;
        let kind = value.kind();
        match value.as_view_mut() {
            Some(view) => view.descend_or_create(rest),
            None => Err(DataError::invalid_data(
                first,
                format!("segment holds a {kind}, not a view"),
            )),
        }
    }

    /// Stores `value` at `query`, creating intermediate views as needed.
    ///
    /// Fails without mutating anything when the query is the root, has an
    /// empty segment, or runs through a scalar or list.
    pub fn set(
        &mut self,
        query: impl Into<DataQuery>,
        value: impl Into<DataValue>,
    ) -> DataResult<&mut Self> {
        let query = query.into();
        let Some((leaf, parents)) = query.parts().split_last() else {
            return Err(DataError::precondition("cannot set a value at the root query"));
        };
        self.check_writable(&query, parents)?;
        self.descend_or_create(parents)?.put(leaf, value.into());
        Ok(self)
    }

    /// Obtains or creates the nested view at `query`.
    pub fn create_view(&mut self, query: impl Into<DataQuery>) -> DataResult<&mut DataView> {
        let query = query.into();
        self.check_writable(&query, query.parts())?;
        if let Some(value) = self.get(&query) {
            if !value.is_view() {
                return Err(DataError::invalid_data(
                    &query,
                    format!("holds a {}, not a view", value.kind()),
                ));
            }
        }
        self.descend_or_create(query.parts())
    }

    /// Detaches the subtree at `query`, reporting whether anything was removed.
    pub fn remove(&mut self, query: impl Into<DataQuery>) -> bool {
        let query = query.into();
        let Some((leaf, parents)) = query.parts().split_last() else {
            return false;
        };
        let Some(view) = self.view_at_mut(parents) else {
            return false;
        };
        match view.position(leaf) {
            Some(index) => {
                view.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Lists the queries of all entries. With `deep`, entries of nested
    /// views are included after the view itself.
    pub fn keys(&self, deep: bool) -> Vec<DataQuery> {
        self.values(deep)
            .into_iter()
            .map(|(query, _)| query)
            .collect()
    }

    /// Pairs every entry with its query, in depth-first insertion order.
    pub fn values(&self, deep: bool) -> Vec<(DataQuery, &DataValue)> {
        let mut out = Vec::new();
        self.collect_values(&DataQuery::root(), deep, &mut out);
        out
    }

    fn collect_values<'a>(
        &'a self,
        prefix: &DataQuery,
        deep: bool,
        out: &mut Vec<(DataQuery, &'a DataValue)>,
    ) {
        for (key, value) in &self.entries {
            let query = prefix.child(key.as_str());
            out.push((query.clone(), value));
            if deep {
                if let Some(view) = value.as_view() {
                    view.collect_values(&query, deep, out);
                }
            }
        }
    }

    fn scalar(&self, query: impl Into<DataQuery>) -> Option<&Scalar> {
        self.get(query)?.as_scalar()
    }

    pub fn get_bool(&self, query: impl Into<DataQuery>) -> Option<bool> {
        self.scalar(query)?.as_bool()
    }

    pub fn get_byte(&self, query: impl Into<DataQuery>) -> Option<i8> {
        self.scalar(query)?.as_i64().map(|value| value as i8)
    }

    pub fn get_short(&self, query: impl Into<DataQuery>) -> Option<i16> {
        self.scalar(query)?.as_i64().map(|value| value as i16)
    }

    pub fn get_int(&self, query: impl Into<DataQuery>) -> Option<i32> {
        self.scalar(query)?.as_i64().map(|value| value as i32)
    }

    pub fn get_long(&self, query: impl Into<DataQuery>) -> Option<i64> {
        self.scalar(query)?.as_i64()
    }

    pub fn get_float(&self, query: impl Into<DataQuery>) -> Option<f32> {
        self.scalar(query)?.as_f64().map(|value| value as f32)
    }

    pub fn get_double(&self, query: impl Into<DataQuery>) -> Option<f64> {
        self.scalar(query)?.as_f64()
    }

    pub fn get_string(&self, query: impl Into<DataQuery>) -> Option<String> {
        self.scalar(query)?.as_str().map(str::to_string)
    }

    pub fn get_list(&self, query: impl Into<DataQuery>) -> Option<&[DataValue]> {
        self.get(query)?.as_list()
    }

    /// Nested view at `query`. The root query yields the view itself.
    pub fn get_view(&self, query: impl Into<DataQuery>) -> Option<&DataView> {
        let query = query.into();
        if query.is_root() {
            return Some(self);
        }
        self.get(query)?.as_view()
    }

    /// List at `query` whose elements are all views.
    pub fn get_views(&self, query: impl Into<DataQuery>) -> Option<Vec<&DataView>> {
        self.get_list(query)?.iter().map(DataValue::as_view).collect()
    }

    fn typed_list<T>(
        &self,
        query: impl Into<DataQuery>,
        convert: impl Fn(&Scalar) -> Option<T>,
    ) -> Option<Vec<T>> {
        self.get_list(query)?
            .iter()
            .map(|item| item.as_scalar().and_then(&convert))
            .collect()
    }

    pub fn get_string_list(&self, query: impl Into<DataQuery>) -> Option<Vec<String>> {
        self.typed_list(query, |scalar| scalar.as_str().map(str::to_string))
    }

    pub fn get_bool_list(&self, query: impl Into<DataQuery>) -> Option<Vec<bool>> {
        self.typed_list(query, Scalar::as_bool)
    }

    pub fn get_int_list(&self, query: impl Into<DataQuery>) -> Option<Vec<i32>> {
        self.typed_list(query, |scalar| scalar.as_i64().map(|value| value as i32))
    }

    pub fn get_long_list(&self, query: impl Into<DataQuery>) -> Option<Vec<i64>> {
        self.typed_list(query, Scalar::as_i64)
    }

    pub fn get_double_list(&self, query: impl Into<DataQuery>) -> Option<Vec<f64>> {
        self.typed_list(query, Scalar::as_f64)
    }
}

impl PartialEq for DataView {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entry(key) == Some(value))
    }
}

impl Serialize for DataView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataView {
        let mut view = DataView::new();
        view.set("foo.int", 1)
            .unwrap()
            .set("foo.double", 10.0)
            .unwrap()
            .set("foo.stringList", vec!["a", "b"])
            .unwrap()
            .set("name", "cube")
            .unwrap();
        view
    }

    #[test]
    fn multi_segment_set_creates_intermediate_views() {
        let view = sample();
        assert!(matches!(view.get("foo"), Some(DataValue::Map(_))));
        assert_eq!(view.get_int("foo.int"), Some(1));
        assert_eq!(view.get_double("foo.double"), Some(10.0));
        assert_eq!(
            view.get_string_list("foo.stringList"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(view.get_view("foo").map(DataView::len), Some(3));
    }

    #[test]
    fn accessors_coerce_numbers_but_not_strings() {
        let mut view = sample();
        view.set("big", i64::MAX).unwrap();
        assert_eq!(view.get_long("foo.int"), Some(1));
        assert_eq!(view.get_float("foo.int"), Some(1.0));
        assert_eq!(view.get_int("foo.double"), Some(10));
        assert_eq!(view.get_long("big"), Some(i64::MAX));
        assert_eq!(view.get_int("name"), None);
        assert_eq!(view.get_string("foo.int"), None);
        assert_eq!(view.get_bool("foo.int"), None);
        assert_eq!(view.get_int("missing.path"), None);
        assert_eq!(view.get_int_list("foo.stringList"), None);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut view = sample();
        view.set("foo.int", 7).unwrap();
        let keys: Vec<String> = view.keys(true).iter().map(ToString::to_string).collect();
        assert_eq!(
            keys,
            ["foo", "foo.int", "foo.double", "foo.stringList", "name"]
        );
        assert_eq!(view.get_int("foo.int"), Some(7));
    }

    #[test]
    fn set_rejects_root_and_non_view_parents_without_mutating() {
        let mut view = sample();
        let before = view.clone();
        assert!(matches!(
            view.set(DataQuery::root(), 1),
            Err(DataError::PreconditionViolation(_))
        ));
        assert!(matches!(
            view.set(DataQuery::of(["foo", ""]), 1),
            Err(DataError::PreconditionViolation(_))
        ));
        assert!(matches!(
            view.set("name.inner.deep", 1),
            Err(DataError::InvalidData { .. })
        ));
        assert_eq!(view, before);
        assert_eq!(view.keys(true).len(), before.keys(true).len());
    }

    #[test]
    fn explicit_views_stay_distinct_from_plain_maps() {
        let mut child = DataView::new();
        child.set("entryone", 1).unwrap();
        let mut view = DataView::new();
        view.set("outer.child", child.clone()).unwrap();
        assert!(matches!(view.get("outer"), Some(DataValue::Map(_))));
        assert!(matches!(view.get("outer.child"), Some(DataValue::View(_))));
        assert_eq!(view.get_view("outer.child"), Some(&child));
        assert_eq!(view.get_int("outer.child.entryone"), Some(1));
    }

    #[test]
    fn remove_detaches_subtrees() {
        let mut view = sample();
        assert!(view.remove("foo.int"));
        assert!(!view.remove("foo.int"));
        assert!(view.remove("foo"));
        assert!(!view.contains("foo.double"));
        assert!(!view.remove(DataQuery::root()));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn create_view_returns_nested_container() {
        let mut view = DataView::new();
        view.create_view("a.b").unwrap().set("c", true).unwrap();
        assert_eq!(view.get_bool("a.b.c"), Some(true));
        assert!(view.create_view("a.b.c").is_err());
    }

    #[test]
    fn equality_ignores_key_order_but_not_list_order() {
        let mut a = DataView::new();
        a.set("x", 1).unwrap().set("y", vec![1, 2]).unwrap();
        let mut b = DataView::new();
        b.set("y", vec![1, 2]).unwrap().set("x", 1).unwrap();
        assert_eq!(a, b);
        b.set("y", vec![2, 1]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn views_in_lists_are_exposed_by_get_views() {
        let mut one = DataView::new();
        one.set("entryone", 1).unwrap();
        let mut view = DataView::new();
        view.set("list", vec![one.clone()]).unwrap();
        assert_eq!(view.get_views("list"), Some(vec![&one]));
        view.set("mixed", vec![DataValue::from(one), DataValue::from(2)])
            .unwrap();
        assert_eq!(view.get_views("mixed"), None);
    }
}
