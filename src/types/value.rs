//! The generic value tree the archive codec produces and consumes.

/// A single node in the decoded object graph.
///
/// Maps are ordered association lists, not hash maps: key order is part of
/// the round-trip contract because later consumers compare maps structurally.
/// Keys within one map are unique.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Text(String),
    Blob(Vec<u8>),
    Sequence(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Human-readable name of this variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "int",
            Self::Text(_) => "string",
            Self::Blob(_) => "data",
            Self::Sequence(_) => "array",
            Self::Map(_) => "dict",
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Vec<(String, Value)>> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Vec<(String, Value)>> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a key in a map value. Returns None for non-map values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()
            .and_then(|pairs| pairs.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v)
    }

    /// Mutable lookup of a key in a map value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_map_mut()
            .and_then(|pairs| pairs.iter_mut().find(|(k, _)| k == key))
            .map(|(_, v)| v)
    }

    /// Set a key in a map value, replacing in place when the key exists
    /// (preserving its position) and appending otherwise. No-op on non-maps.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        if let Some(pairs) = self.as_map_mut() {
            let key = key.into();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => pairs.push((key, value)),
            }
        }
    }
}
