//! Runtime values the walker traverses

use derive_more::{Display, From};
use indexmap::IndexMap;

/// Target for reading through an absent reference
static NULL: Value = Value::Null;

/// A runtime value. This is very similar to a JSON value, with two
/// additions for host data that JSON can't express:
/// - Records, whose named fields carry a visibility flag
/// - References, which may be absent and read through as null
///
/// Values are immutable through the evaluator: no walk mutates its input.
#[derive(Clone, Debug, Default, From, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    #[from(skip)] // We use a generic impl instead
    Array(Vec<Self>),
    #[from(skip)] // We use a generic impl instead
    Map(IndexMap<String, Self>),
    Record(Record),
    #[from(skip)]
    Ref(Option<Box<Self>>),
}

impl Value {
    /// The variant tag, used for dispatch and error messages
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
            Self::Record(_) => ValueKind::Record,
            Self::Ref(_) => ValueKind::Ref,
        }
    }

    /// Read through reference indirection. An absent reference reads as
    /// null. For any other kind this is the value itself.
    pub fn resolved(&self) -> &Self {
        let mut value = self;
        while let Self::Ref(inner) = value {
            match inner {
                Some(target) => value = target,
                None => return &NULL,
            }
        }
        value
    }

    /// Convert host JSON data into a walkable value. This is the boundary
    /// through which structured host data enters the walker; records and
    /// references only occur in hand-built values.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(number) => {
                if let Some(i) = number.as_i64() {
                    Self::Int(i)
                } else {
                    // Too big for i64, or fractional. f64 is the closest
                    // representation we have for either.
                    Self::Float(number.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Self::from).collect())
    }
}

/// Map from (key, value) pairs
impl<K, V> From<Vec<(K, V)>> for Value
where
    String: From<K>,
    Value: From<V>,
{
    fn from(value: Vec<(K, V)>) -> Self {
        Self::Map(
            value
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(value)
    }
}

/// Variant tag for a [Value]
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum ValueKind {
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("string")]
    String,
    #[display("array")]
    Array,
    #[display("map")]
    Map,
    #[display("record")]
    Record,
    #[display("ref")]
    Ref,
}

/// Named fields, each with a visibility flag. The walker refuses to read a
/// field that isn't visible, which models host data with private members.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable field
    #[must_use]
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            Field {
                visible: true,
                value: value.into(),
            },
        );
        self
    }

    /// Add a field the walker refuses to read
    #[must_use]
    pub fn with_hidden(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            Field {
                visible: false,
                value: value.into(),
            },
        );
        self
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.fields.iter()
    }
}

/// One record field
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub visible: bool,
    pub value: Value,
}
