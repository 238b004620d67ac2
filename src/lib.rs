//! Path-addressed data containers and keyed values.
//!
//! [`DataView`] is a tree of entries addressed by [`DataQuery`] paths.
//! [`ConfigTranslator`] converts views to and from configuration trees
//! (any [`TreeNode`], with [`ConfigNode`] and its XML format provided
//! here). The [`value`] module holds the keyed value model used for
//! in-memory manipulation, together with an interning cache for immutable
//! values.

pub mod data;
pub mod error;
pub mod key;
pub mod node;
pub mod query;
pub mod translator;
pub mod value;
pub mod view;

pub use data::{DataValue, Scalar};
pub use error::{DataError, DataResult};
pub use key::Key;
pub use node::{ConfigNode, TreeNode};
pub use query::DataQuery;
pub use translator::{ConfigTranslator, TranslatorOptions};
pub use value::{ImmutableValue, ImmutableValueCache, MutableValue, Value, ValueFactory};
pub use view::DataView;
