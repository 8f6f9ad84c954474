//! Canonical serialization of values
//!
//! Splicing a container into rendered output goes through its JSON form.
//! Keys are emitted in sorted order so the output is deterministic no
//! matter how the scope was built.

use crate::value::{Field, Record, Value};
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut entries: Vec<(&String, &Self)> = map.iter().collect();
                entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Self::Record(record) => record.serialize(serializer),
            // References serialize as their target; absent ones as null
            Self::Ref(Some(target)) => target.serialize(serializer),
            Self::Ref(None) => serializer.serialize_unit(),
        }
    }
}

/// A record serializes as an object holding its visible fields only
impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fields: Vec<(&String, &Field)> =
            self.iter().filter(|(_, field)| field.visible).collect();
        fields.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        let mut out = serializer.serialize_map(Some(fields.len()))?;
        for (name, field) in fields {
            out.serialize_entry(name, &field.value)?;
        }
        out.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::null(Value::Null, "null")]
    #[case::scalars(
        Value::from(vec![
            Value::Bool(true),
            Value::Int(-3),
            Value::Float(2.5),
            "x".into(),
        ]),
        r#"[true,-3,2.5,"x"]"#
    )]
    #[case::sorted_keys(
        Value::from(vec![("b", Value::Int(2)), ("a", Value::Int(1))]),
        r#"{"a":1,"b":2}"#
    )]
    #[case::sorted_nested(
        Value::from(vec![(
            "outer",
            Value::from(vec![("z", Value::Int(1)), ("y", Value::Int(2))]),
        )]),
        r#"{"outer":{"y":2,"z":1}}"#
    )]
    #[case::record_hidden_skipped(
        Value::Record(
            Record::new()
                .with_field("name", "pino")
                .with_hidden("secret", 7)
                .with_field("age", 22),
        ),
        r#"{"age":22,"name":"pino"}"#
    )]
    #[case::ref_present(
        Value::Ref(Some(Box::new("target".into()))),
        r#""target""#
    )]
    #[case::ref_absent(Value::Ref(None), "null")]
    fn test_canonical_json(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&value).unwrap(), expected);
    }
}
