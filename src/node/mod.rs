//! Hierarchical configuration nodes the translator reads and writes.

mod xml;

use crate::data::Scalar;

/// A node in a configuration tree.
///
/// A node is either empty, a scalar leaf, an ordered list of unkeyed
/// children, or an ordered map of keyed children. Implementations for
/// foreign tree types may report both map and list children at once; the
/// translator rejects such nodes.
pub trait TreeNode: Sized {
    /// A fresh node without a key.
    fn root() -> Self;

    fn key(&self) -> Option<&str>;

    fn value(&self) -> Option<&Scalar>;

    /// Turns the node into a scalar leaf, discarding any children.
    fn set_value(&mut self, value: Scalar);

    fn has_map_children(&self) -> bool;

    fn has_list_children(&self) -> bool;

    fn children_map(&self) -> Vec<(&str, &Self)>;

    fn children_list(&self) -> Vec<&Self>;

    fn child(&self, key: &str) -> Option<&Self>;

    /// Returns the keyed child, creating it (and turning this node into a
    /// map) when absent.
    fn child_mut(&mut self, key: &str) -> &mut Self;

    /// Attaches `child` under `key`, replacing any existing child.
    fn set_child(&mut self, key: &str, child: Self);

    fn set_children_list(&mut self, children: Vec<Self>);

    /// True when the node carries neither a value nor children.
    fn is_empty(&self) -> bool {
        self.value().is_none() && !self.has_map_children() && !self.has_list_children()
    }
}

/// In-memory [`TreeNode`] backed by ordered children.
///
/// At most one of `value`, `list` and `map` is populated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigNode {
    key: Option<String>,
    value: Option<Scalar>,
    list: Option<Vec<ConfigNode>>,
    map: Option<Vec<ConfigNode>>,
}

impl ConfigNode {
    /// Unkeyed scalar leaf.
    pub fn from_scalar(value: impl Into<Scalar>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Follows a chain of map keys from this node.
    pub fn get_path(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, segment| node.child(segment))
    }

    pub(crate) fn is_list(&self) -> bool {
        self.list.is_some()
    }

    pub(crate) fn is_map(&self) -> bool {
        self.map.is_some()
    }

    /// Marks the node as an (initially empty) map.
    pub(crate) fn make_map(&mut self) {
        self.value = None;
        self.list = None;
        self.map.get_or_insert_with(Vec::new);
    }
}

impl TreeNode for ConfigNode {
    fn root() -> Self {
        Self::default()
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Scalar) {
        self.list = None;
        self.map = None;
        self.value = Some(value);
    }

    fn has_map_children(&self) -> bool {
        self.map.as_ref().is_some_and(|children| !children.is_empty())
    }

    fn has_list_children(&self) -> bool {
        self.list.as_ref().is_some_and(|children| !children.is_empty())
    }

    fn children_map(&self) -> Vec<(&str, &Self)> {
        self.map
            .iter()
            .flatten()
            .map(|child| (child.key.as_deref().unwrap_or_default(), child))
            .collect()
    }

    fn children_list(&self) -> Vec<&Self> {
        self.list.iter().flatten().collect()
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.map
            .iter()
            .flatten()
            .find(|child| child.key.as_deref() == Some(key))
    }

    fn child_mut(&mut self, key: &str) -> &mut Self {
        self.value = None;
        self.list = None;
        let children = self.map.get_or_insert_with(Vec::new);
        let index = match children
            .iter()
            .position(|child| child.key.as_deref() == Some(key))
        {
            Some(index) => index,
            None => {
                children.push(ConfigNode {
                    key: Some(key.to_string()),
                    ..ConfigNode::default()
                });
                children.len() - 1
            }
        };
        &mut children[index]
    }

    fn set_child(&mut self, key: &str, mut child: Self) {
        child.key = Some(key.to_string());
        *self.child_mut(key) = child;
    }

    fn set_children_list(&mut self, children: Vec<Self>) {
        let children = children
            .into_iter()
            .map(|mut child| {
                child.key = None;
                child
            })
            .collect();
        self.value = None;
        self.map = None;
        self.list = Some(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_mut_creates_children_in_order() {
        let mut node = ConfigNode::root();
        node.child_mut("b").set_value(Scalar::Int(1));
        node.child_mut("a").child_mut("x").set_value(Scalar::Bool(true));
        node.child_mut("b").set_value(Scalar::Int(2));

        let keys: Vec<&str> = node.children_map().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(node.child("b").and_then(TreeNode::value), Some(&Scalar::Int(2)));
        assert_eq!(
            node.get_path(&["a", "x"]).and_then(TreeNode::value),
            Some(&Scalar::Bool(true))
        );
        assert!(node.has_map_children());
        assert!(!node.has_list_children());
    }

    #[test]
    fn set_value_replaces_children() {
        let mut node = ConfigNode::root();
        node.child_mut("a").set_value(Scalar::Int(1));
        node.set_value(Scalar::from("leaf"));
        assert!(!node.has_map_children());
        assert!(node.child("a").is_none());
        assert_eq!(node.value(), Some(&Scalar::from("leaf")));
    }

    #[test]
    fn list_children_drop_keys() {
        let mut keyed = ConfigNode::root();
        keyed.child_mut("k").set_value(Scalar::Int(3));
        let item = keyed.child("k").cloned().unwrap();

        let mut node = ConfigNode::root();
        node.set_children_list(vec![item, ConfigNode::from_scalar(4)]);
        assert!(node.has_list_children());
        assert!(node.children_list().iter().all(|child| child.key().is_none()));
        assert_eq!(node.children_list()[1].value(), Some(&Scalar::Int(4)));
    }

    #[test]
    fn empty_containers_have_no_children() {
        let mut node = ConfigNode::root();
        assert!(node.is_empty());
        node.set_children_list(Vec::new());
        assert!(!node.has_list_children());
        assert!(node.is_empty());
    }

    #[test]
    fn set_child_attaches_under_key() {
        let mut node = ConfigNode::root();
        node.set_child("inner", ConfigNode::from_scalar(5i64));
        assert_eq!(node.child("inner").and_then(TreeNode::key), Some("inner"));
        assert_eq!(node.children_map().len(), 1);
    }
}
