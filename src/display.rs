//! Value stringification for template splicing

use crate::value::Value;
use std::fmt::{self, Display};

/// The conversion the template driver uses when splicing a walk result into
/// output: scalars render bare (`2.99`, `true`, text as-is), containers
/// render as canonical JSON with sorted keys, references read through to
/// their target.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolved() {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Shortest round-trip form: 11.0 renders as 11
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            value @ (Self::Array(_) | Self::Map(_) | Self::Record(_)) => {
                let json =
                    serde_json::to_string(value).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Self::Ref(_) => unreachable!("resolved() reads through references"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::null(Value::Null, "null")]
    #[case::bool_true(Value::Bool(true), "true")]
    #[case::bool_false(Value::Bool(false), "false")]
    #[case::int(Value::Int(22), "22")]
    #[case::negative_int(Value::Int(-5), "-5")]
    #[case::float(Value::Float(22.5), "22.5")]
    #[case::float_round(Value::Float(11.0), "11")]
    #[case::float_precise(Value::Float(2.99), "2.99")]
    #[case::string("bananas".into(), "bananas")]
    #[case::array(
        Value::from(vec!["keys", "wallet"]),
        r#"["keys","wallet"]"#
    )]
    #[case::map(
        Value::from(vec![("name", Value::from("pino")), ("age", 22.into())]),
        r#"{"age":22,"name":"pino"}"#
    )]
    #[case::record(
        Value::Record(Record::new().with_field("gino", 22).with_hidden("x", 1)),
        r#"{"gino":22}"#
    )]
    #[case::reference(Value::Ref(Some(Box::new("pino".into()))), "pino")]
    #[case::absent_reference(Value::Ref(None), "null")]
    fn test_to_string(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}
