//! Order-normalized, hashable projection of YAML values.

use serde_yaml::{Number, Value};

use super::error::SetOpError;

/// A YAML value reduced to a form that can live in a `HashSet`.
///
/// Mappings are stored as key-sorted pairs so that two mappings with the same
/// content compare equal regardless of key order. Sequences keep their order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashableValue {
    /// `null` or `~`.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A number representable as `i64`.
    Int(i64),
    /// A positive number above `i64::MAX`.
    UInt(u64),
    /// A floating point number, stored as its canonical bit pattern.
    Float(u64),
    /// A string scalar.
    String(String),
    /// A sequence, element order preserved.
    Sequence(Vec<HashableValue>),
    /// A mapping as `(key, value)` pairs sorted by key.
    Mapping(Vec<(HashableValue, HashableValue)>),
    /// A tagged mapping key. Only produced by [`HashableValue::from_key`].
    Tagged(String, Box<HashableValue>),
}

impl HashableValue {
    /// Projects a YAML value, reporting `path` if an unsupported value is found.
    pub fn from_value(value: &Value, path: &str) -> Result<Self, SetOpError> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(Self::from_number(n)),
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Sequence(seq) => seq
                .iter()
                .map(|item| Self::from_value(item, path))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Sequence),
            Value::Mapping(map) => map
                .iter()
                .map(|(k, v)| -> Result<_, SetOpError> {
                    Ok((Self::from_value(k, path)?, Self::from_value(v, path)?))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::sorted_mapping),
            Value::Tagged(tagged) => Err(SetOpError::UnhashableValue {
                path: path.to_string(),
                tag: tagged.tag.to_string(),
            }),
        }
    }

    /// Projects a mapping key. Unlike [`from_value`](Self::from_value) this
    /// never fails: a tag is part of the key's identity.
    pub fn from_key(key: &Value) -> Self {
        match key {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::from_number(n),
            Value::String(s) => Self::String(s.clone()),
            Value::Sequence(seq) => Self::Sequence(seq.iter().map(Self::from_key).collect()),
            Value::Mapping(map) => Self::sorted_mapping(
                map.iter()
                    .map(|(k, v)| (Self::from_key(k), Self::from_key(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::Tagged(
                tagged.tag.to_string(),
                Box::new(Self::from_key(&tagged.value)),
            ),
        }
    }

    fn sorted_mapping(mut pairs: Vec<(Self, Self)>) -> Self {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self::Mapping(pairs)
    }

    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Int(i)
        } else if let Some(u) = n.as_u64() {
            Self::UInt(u)
        } else {
            Self::Float(canonical_bits(n.as_f64().unwrap_or(f64::NAN)))
        }
    }
}

/// Folds `-0.0` into `0.0` and every NaN payload into one.
fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0_f64.to_bits()
    } else {
        f.to_bits()
    }
}
