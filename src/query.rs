use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered path of segments addressing a value inside a [`DataView`].
///
/// The empty query addresses the root of a view.
///
/// [`DataView`]: crate::view::DataView
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataQuery {
    parts: Vec<String>,
}

impl DataQuery {
    /// The root query.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a query from already separated segments, kept verbatim.
    pub fn of<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits `path` on `separator`, dropping empty segments.
    pub fn parse(separator: char, path: &str) -> Self {
        Self {
            parts: path
                .split(separator)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Query without its last segment. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut parts = self.parts.clone();
        parts.pop();
        Self { parts }
    }

    /// Splits off the first segment, returning it with the remainder.
    pub fn pop_first(&self) -> Option<(&str, Self)> {
        let (first, rest) = self.parts.split_first()?;
        Some((first.as_str(), Self { parts: rest.to_vec() }))
    }

    /// Concatenates `other` onto the end of this query.
    pub fn then(&self, other: impl Into<DataQuery>) -> Self {
        let mut parts = self.parts.clone();
        parts.extend(other.into().parts);
        Self { parts }
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(segment.into());
        Self { parts }
    }
}

impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

impl From<&str> for DataQuery {
    fn from(path: &str) -> Self {
        Self::parse('.', path)
    }
}

impl From<String> for DataQuery {
    fn from(path: String) -> Self {
        Self::parse('.', &path)
    }
}

impl From<&String> for DataQuery {
    fn from(path: &String) -> Self {
        Self::parse('.', path)
    }
}

impl From<&DataQuery> for DataQuery {
    fn from(query: &DataQuery) -> Self {
        query.clone()
    }
}

impl From<Vec<String>> for DataQuery {
    fn from(parts: Vec<String>) -> Self {
        Self { parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_separator_and_drops_empty_parts() {
        let query = DataQuery::parse('/', "/foo//bar/");
        assert_eq!(query.parts(), ["foo", "bar"]);
        assert_eq!(DataQuery::from("foo.bar"), DataQuery::of(["foo", "bar"]));
    }

    #[test]
    fn empty_path_is_root() {
        assert!(DataQuery::from("").is_root());
        assert_eq!(DataQuery::root().parent(), DataQuery::root());
    }

    #[test]
    fn of_keeps_segments_verbatim() {
        let query = DataQuery::of(["a.b", "c"]);
        assert_eq!(query.len(), 2);
        assert_eq!(query.to_string(), "a.b.c");
    }

    #[test]
    fn composition_helpers() {
        let query = DataQuery::from("a.b");
        assert_eq!(query.then("c.d").to_string(), "a.b.c.d");
        assert_eq!(query.child("z").last(), Some("z"));
        let (first, rest) = query.pop_first().unwrap();
        assert_eq!(first, "a");
        assert_eq!(rest, DataQuery::of(["b"]));
        assert!(DataQuery::root().pop_first().is_none());
    }
}
