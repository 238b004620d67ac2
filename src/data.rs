use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::view::DataView;

/// Leaf value stored in a [`DataView`] or a tree node.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Scalar {
    /// Short type name, also used as the `type` attribute of XML documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::Byte(_) => "byte",
            Scalar::Short(_) => "short",
            Scalar::Int(_) => "int",
            Scalar::Long(_) => "long",
            Scalar::Float(_) => "float",
            Scalar::Double(_) => "double",
            Scalar::String(_) => "string",
        }
    }

    /// Parses `text` as a scalar of the kind named by `type_name`.
    pub fn parse(type_name: &str, text: &str) -> Option<Self> {
        let text = if type_name == "string" { text } else { text.trim() };
        Some(match type_name {
            "bool" => Scalar::Bool(text.parse().ok()?),
            "byte" => Scalar::Byte(text.parse().ok()?),
            "short" => Scalar::Short(text.parse().ok()?),
            "int" => Scalar::Int(text.parse().ok()?),
            "long" => Scalar::Long(text.parse().ok()?),
            "float" => Scalar::Float(text.parse().ok()?),
            "double" => Scalar::Double(text.parse().ok()?),
            "string" => Scalar::String(text.to_string()),
            _ => return None,
        })
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Bool(_) | Scalar::String(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }

    /// Integer view of a numeric scalar. Floating point values truncate.
    pub fn as_i64(&self) -> Option<i64> {
        Some(match self {
            Scalar::Byte(value) => i64::from(*value),
            Scalar::Short(value) => i64::from(*value),
            Scalar::Int(value) => i64::from(*value),
            Scalar::Long(value) => *value,
            Scalar::Float(value) => *value as i64,
            Scalar::Double(value) => *value as i64,
            Scalar::Bool(_) | Scalar::String(_) => return None,
        })
    }

    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Scalar::Byte(value) => f64::from(*value),
            Scalar::Short(value) => f64::from(*value),
            Scalar::Int(value) => f64::from(*value),
            Scalar::Long(value) => *value as f64,
            Scalar::Float(value) => f64::from(*value),
            Scalar::Double(value) => *value,
            Scalar::Bool(_) | Scalar::String(_) => return None,
        })
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Byte(value) => write!(f, "{value}"),
            Scalar::Short(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Long(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value:?}"),
            Scalar::Double(value) => write!(f, "{value:?}"),
            Scalar::String(value) => write!(f, "{value:?}"),
        }
    }
}

/// Anything a [`DataView`] can hold under one segment.
///
/// `Map` is plain nesting, created implicitly by multi-segment writes.
/// `View` is a container that was stored explicitly as a value; the
/// translator marks it so that it survives a round trip as one unit.
#[derive(Debug, Clone)]
pub enum DataValue {
    Scalar(Scalar),
    List(Vec<DataValue>),
    Map(DataView),
    View(DataView),
}

impl DataValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            DataValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DataValue]> {
        match self {
            DataValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Nested container, whether plain or explicitly stored.
    pub fn as_view(&self) -> Option<&DataView> {
        match self {
            DataValue::Map(view) | DataValue::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_view_mut(&mut self) -> Option<&mut DataView> {
        match self {
            DataValue::Map(view) | DataValue::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, DataValue::Map(_) | DataValue::View(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DataValue::Scalar(scalar) => scalar.type_name(),
            DataValue::List(_) => "list",
            DataValue::Map(_) => "map",
            DataValue::View(_) => "view",
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Scalar(a), DataValue::Scalar(b)) => a == b,
            (DataValue::List(a), DataValue::List(b)) => a == b,
            (
                DataValue::Map(a) | DataValue::View(a),
                DataValue::Map(b) | DataValue::View(b),
            ) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            DataValue::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
            DataValue::Map(view) | DataValue::View(view) => {
                f.write_str("{")?;
                for (index, (key, value)) in view.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::Scalar(scalar) => scalar.serialize(serializer),
            DataValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DataValue::Map(view) | DataValue::View(view) => view.serialize(serializer),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value.into())
                }
            }

            impl From<$ty> for DataValue {
                fn from(value: $ty) -> Self {
                    DataValue::Scalar(Scalar::$variant(value.into()))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
}

impl From<Scalar> for DataValue {
    fn from(scalar: Scalar) -> Self {
        DataValue::Scalar(scalar)
    }
}

impl From<DataView> for DataValue {
    fn from(view: DataView) -> Self {
        DataValue::View(view)
    }
}

impl<T: Into<DataValue>> From<Vec<T>> for DataValue {
    fn from(items: Vec<T>) -> Self {
        DataValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion_never_touches_strings() {
        assert_eq!(Scalar::Double(10.7).as_i64(), Some(10));
        assert_eq!(Scalar::Byte(-3).as_f64(), Some(-3.0));
        assert_eq!(Scalar::String("1".into()).as_i64(), None);
        assert_eq!(Scalar::Int(1).as_str(), None);
        assert_eq!(Scalar::Bool(true).as_i64(), None);
    }

    #[test]
    fn parse_uses_type_names() {
        assert_eq!(Scalar::parse("int", " 42 "), Some(Scalar::Int(42)));
        assert_eq!(Scalar::parse("string", " a "), Some(Scalar::String(" a ".into())));
        assert_eq!(Scalar::parse("bool", "yes"), None);
        assert_eq!(Scalar::parse("uuid", "x"), None);
        for scalar in [Scalar::Long(i64::MAX), Scalar::Float(1.5), Scalar::Bool(false)] {
            let text = match &scalar {
                Scalar::Float(v) => v.to_string(),
                other => other.to_string(),
            };
            assert_eq!(Scalar::parse(scalar.type_name(), &text), Some(scalar));
        }
    }

    #[test]
    fn map_and_view_with_same_contents_are_equal() {
        let mut inner = DataView::new();
        inner.set("a", 1).unwrap();
        assert_eq!(DataValue::Map(inner.clone()), DataValue::View(inner));
        assert_ne!(DataValue::from(1), DataValue::from(1i64));
    }

    #[test]
    fn display_renders_nested_values() {
        let value = DataValue::from(vec!["a", "b"]);
        assert_eq!(value.to_string(), r#"["a", "b"]"#);
    }
}
