/*!
# JSON Value

The dynamically-typed value tree produced by the parser.
*/
use serde::Serialize;

/// Ordered map backing [`Value::Object`].
///
/// Iteration follows first-insertion order; equality ignores order.
pub type Map = indexmap::IndexMap<String, Value>;

/// A parsed JSON value.
#[derive(PartialEq, Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Represents the JSON `null` literal
    #[default]
    Null,
    /// Represents a JSON Boolean value
    Bool(bool),
    /// Represents a JSON number; integers and fractions alike are stored as
    /// doubles
    Number(f64),
    /// Represents a JSON string value
    String(String),
    /// Represents a JSON array containing values of any type
    Array(Vec<Value>),
    /// Represents a JSON object with string keys and values of any type
    Object(Map),
}

impl Value {
    /// Compute the depth of the JSON document.
    ///
    /// Scalars have depth 1; each enclosing array or object adds one.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Array(arr) => 1 + arr.iter().map(Self::depth).max().unwrap_or(0),
            Self::Object(map) => {
                1 + map.values().map(Self::depth).max().unwrap_or(0)
            }
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => 1,
        }
    }

    /// Name of the variant, as used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Whether this is `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is one.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// The members, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
