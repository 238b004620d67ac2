//! Conversion between [`DataView`] and configuration trees.
//!
//! Explicitly stored views are written as maps stamped with a marker child
//! so that they can be told apart from plain nested maps when read back.

use log::{debug, trace, warn};

use crate::data::{DataValue, Scalar};
use crate::error::{DataError, DataResult};
use crate::node::TreeNode;
use crate::query::DataQuery;
use crate::view::DataView;

pub const DEFAULT_MARKER: &str = "$DataView-8f3d5a9";
pub const DEFAULT_FALLBACK_KEY: &str = "value";
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Knobs for [`ConfigTranslator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Child key that marks a map as a stored view.
    pub marker: String,
    /// Path used when the root node is a bare scalar or list.
    pub fallback_key: String,
    /// Deepest nesting accepted in either direction.
    pub max_depth: usize,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            fallback_key: DEFAULT_FALLBACK_KEY.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TranslatorOptions {
    fn validate(&self) -> DataResult<()> {
        if self.marker.is_empty() {
            return Err(DataError::precondition("marker key must not be empty"));
        }
        if self.fallback_key.is_empty() {
            return Err(DataError::precondition("fallback key must not be empty"));
        }
        if self.fallback_key == self.marker {
            return Err(DataError::precondition(
                "fallback key must differ from the marker key",
            ));
        }
        Ok(())
    }
}

/// Stateless translator between views and [`TreeNode`] trees.
#[derive(Debug, Clone, Default)]
pub struct ConfigTranslator {
    options: TranslatorOptions,
}

impl ConfigTranslator {
    pub fn new(options: TranslatorOptions) -> DataResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// Builds a fresh root node holding the contents of `view`.
    pub fn serialize<N: TreeNode>(&self, view: &DataView) -> DataResult<N> {
        let mut node = N::root();
        self.translate_into(view, &mut node)?;
        Ok(node)
    }

    /// Writes every entry of `view` into `node`. Existing children under
    /// other keys are left in place.
    pub fn translate_into<N: TreeNode>(&self, view: &DataView, node: &mut N) -> DataResult<()> {
        debug!("serializing view with {} entries", view.len());
        self.write_view(view, node, &DataQuery::root(), 0)
    }

    /// Reads a whole tree into a new view.
    pub fn deserialize<N: TreeNode>(&self, node: &N) -> DataResult<DataView> {
        let mut view = DataView::new();
        self.read_node(node, &mut view, &mut Vec::new(), 0)?;
        debug!("deserialized view with {} entries", view.len());
        Ok(view)
    }

    /// Applies a single node to an existing view.
    ///
    /// Keyed scalar nodes are stored under their key, split on `.`. Unkeyed
    /// or structured nodes are deserialized into `view` wholesale.
    pub fn merge<N: TreeNode>(&self, node: &N, view: &mut DataView) -> DataResult<()> {
        if node.is_empty() {
            return Ok(());
        }
        let structured = node.has_map_children() || node.has_list_children();
        match (node.key(), node.value()) {
            (Some(key), Some(value)) if !structured => {
                view.set(DataQuery::parse('.', key), value.clone())?;
            }
            _ => self.read_node(node, view, &mut Vec::new(), 0)?,
        }
        Ok(())
    }

    fn check_depth(&self, path: impl std::fmt::Display, depth: usize) -> DataResult<()> {
        if depth > self.options.max_depth {
            return Err(DataError::invalid_data(
                path,
                format!("nesting exceeds the limit of {}", self.options.max_depth),
            ));
        }
        Ok(())
    }

    fn write_view<N: TreeNode>(
        &self,
        view: &DataView,
        node: &mut N,
        path: &DataQuery,
        depth: usize,
    ) -> DataResult<()> {
        self.check_depth(path, depth)?;
        for (key, value) in view.iter() {
            let query = path.child(key);
            if let Some(child) = self.write_value(value, &query, depth + 1)? {
                node.set_child(key, child);
            }
        }
        Ok(())
    }

    /// Returns `None` for values that have no representation in a tree.
    fn write_value<N: TreeNode>(
        &self,
        value: &DataValue,
        path: &DataQuery,
        depth: usize,
    ) -> DataResult<Option<N>> {
        self.check_depth(path, depth)?;
        let mut node = N::root();
        match value {
            DataValue::Scalar(scalar) => node.set_value(scalar.clone()),
            DataValue::List(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    match self.write_value(item, path, depth + 1)? {
                        Some(child) => children.push(child),
                        None => trace!("dropping empty list element at {path}"),
                    }
                }
                if children.is_empty() {
                    return Ok(None);
                }
                node.set_children_list(children);
            }
            DataValue::Map(inner) => {
                self.write_view(inner, &mut node, path, depth)?;
                if node.is_empty() {
                    return Ok(None);
                }
            }
            DataValue::View(inner) => {
                self.write_view(inner, &mut node, path, depth)?;
                node.child_mut(&self.options.marker)
                    .set_value(Scalar::Bool(true));
            }
        }
        Ok(Some(node))
    }

    fn is_marked<N: TreeNode>(&self, node: &N) -> bool {
        node.has_map_children() && node.child(&self.options.marker).is_some()
    }

    fn current_query(&self, path: &[String]) -> DataQuery {
        if path.is_empty() {
            DataQuery::of([self.options.fallback_key.as_str()])
        } else {
            DataQuery::of(path.iter().cloned())
        }
    }

    fn classify<N: TreeNode>(&self, node: &N, path: &[String], depth: usize) -> DataResult<()> {
        let display = DataQuery::of(path.iter().cloned());
        self.check_depth(&display, depth)?;
        if node.has_map_children() && node.has_list_children() {
            return Err(DataError::ambiguity(
                display,
                "node has both map and list children",
            ));
        }
        Ok(())
    }

    fn read_node<N: TreeNode>(
        &self,
        node: &N,
        view: &mut DataView,
        path: &mut Vec<String>,
        depth: usize,
    ) -> DataResult<()> {
        self.classify(node, path, depth)?;

        if node.has_map_children() {
            if !path.is_empty() && self.is_marked(node) {
                let nested = self.read_marked(node, path, depth)?;
                view.set(self.current_query(path), DataValue::View(nested))?;
                return Ok(());
            }
            for (key, child) in node.children_map() {
                if key == self.options.marker {
                    continue;
                }
                check_key(key, path)?;
                path.push(key.to_string());
                let result = self.read_node(child, view, path, depth + 1);
                path.pop();
                result?;
            }
        } else if node.has_list_children() {
            let items = self.read_list(node, path, depth)?;
            view.set(self.current_query(path), DataValue::List(items))?;
        } else if let Some(value) = node.value() {
            trace!("reading {} at {}", value.type_name(), self.current_query(path));
            view.set(self.current_query(path), value.clone())?;
        }
        Ok(())
    }

    /// Deserializes a marked map into its own view, as if it were a root.
    fn read_marked<N: TreeNode>(
        &self,
        node: &N,
        path: &[String],
        depth: usize,
    ) -> DataResult<DataView> {
        let mut nested = DataView::new();
        let mut nested_path = Vec::new();
        for (key, child) in node.children_map() {
            if key == self.options.marker {
                continue;
            }
            check_key(key, path)?;
            nested_path.push(key.to_string());
            let result = self.read_node(child, &mut nested, &mut nested_path, depth + 1);
            nested_path.pop();
            result.map_err(|err| rebase(err, path))?;
        }
        Ok(nested)
    }

    fn read_list<N: TreeNode>(
        &self,
        node: &N,
        path: &[String],
        depth: usize,
    ) -> DataResult<Vec<DataValue>> {
        let mut items = Vec::new();
        for (index, child) in node.children_list().into_iter().enumerate() {
            let mut item_path = path.to_vec();
            item_path.push(index.to_string());
            match self.read_raw(child, &item_path, depth + 1)? {
                Some(item) => items.push(item),
                None => warn!(
                    "dropping list element without a value at {}",
                    DataQuery::of(item_path)
                ),
            }
        }
        Ok(items)
    }

    /// Converts a node into a single value. Marked maps become views and
    /// unmarked maps become plain maps.
    fn read_raw<N: TreeNode>(
        &self,
        node: &N,
        path: &[String],
        depth: usize,
    ) -> DataResult<Option<DataValue>> {
        self.classify(node, path, depth)?;

        if node.has_map_children() {
            let inner = self.read_marked(node, path, depth)?;
            Ok(Some(if self.is_marked(node) {
                DataValue::View(inner)
            } else {
                DataValue::Map(inner)
            }))
        } else if node.has_list_children() {
            Ok(Some(DataValue::List(self.read_list(node, path, depth)?)))
        } else {
            Ok(node.value().cloned().map(DataValue::Scalar))
        }
    }
}

/// Rejects map children whose key cannot address a view entry.
fn check_key(key: &str, path: &[String]) -> DataResult<()> {
    if key.is_empty() {
        return Err(DataError::invalid_data(
            DataQuery::of(path.iter().cloned()),
            "map child has an empty key",
        ));
    }
    Ok(())
}

/// Prefixes the path of an error raised inside a nested view with the
/// path of that view.
fn rebase(err: DataError, prefix: &[String]) -> DataError {
    let prefixed = |path: String| {
        let base = DataQuery::of(prefix.iter().cloned());
        if path.is_empty() {
            base.to_string()
        } else {
            base.then(DataQuery::parse('.', &path)).to_string()
        }
    };
    match err {
        DataError::InvalidData { path, reason } => DataError::InvalidData {
            path: prefixed(path),
            reason,
        },
        DataError::StructuralAmbiguity { path, reason } => DataError::StructuralAmbiguity {
            path: prefixed(path),
            reason,
        },
        other => other,
    }
}
