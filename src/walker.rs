//! The recursive expression evaluator

use crate::{
    context::Context,
    error::WalkError,
    functions::Functions,
    parse::{
        extract_indices, parse_call, split_head, split_params,
        take_leading_indices,
    },
    value::Value,
};
use tracing::trace;

/// Evaluate a path expression against a value, narrowing the value one
/// dot-separated segment at a time. Segments can be names (map keys, record
/// fields), `[n]` indices, or `name(params)` calls dispatched through the
/// registry; a call's result becomes the current value for the rest of the
/// expression. When no registry is given, one holding only the built-ins is
/// used.
///
/// Missing map keys are not errors: they degrade to null, and the rest of
/// the path walks the null. The empty expression and the bare `.` both
/// yield the value unchanged.
pub fn walk(
    context: &Context,
    expr: &str,
    value: &Value,
    functions: Option<&Functions>,
) -> Result<Value, WalkError> {
    match functions {
        Some(functions) => walk_value(context, expr, value, &[], functions),
        None => walk_value(context, expr, value, &[], &Functions::new()),
    }
}

/// One step of the traversal: narrow `value` by a pending index or by the
/// first segment of `expr`, then recurse on the remainder. `pending` holds
/// indices extracted from an earlier segment that have not been consumed
/// yet, so `foo.split(|)[0]` can index the call's result.
pub(crate) fn walk_value(
    context: &Context,
    expr: &str,
    value: &Value,
    pending: &[usize],
    functions: &Functions,
) -> Result<Value, WalkError> {
    context.check()?;
    trace!(expr, kind = %value.kind(), ?pending, "walk step");

    // A null can still be the receiver of a call; any other segment keeps
    // the result null
    if let Value::Null = value {
        return match run_call(context, expr, value, functions) {
            Ok(Some(result)) => Ok(result),
            Ok(None) | Err(WalkError::FunctionNotFound { .. }) => {
                Ok(Value::Null)
            }
            Err(error) => Err(error),
        };
    }

    if expr == "." {
        return Ok(value.clone());
    }

    match value {
        Value::Map(map) => {
            if expr.is_empty() {
                return Ok(value.clone());
            }
            let (head, tail) = split_head(expr);
            if head.is_empty() {
                return walk_value(context, tail, value, pending, functions);
            }
            let (partial, indices) = extract_indices(head);
            if let Some(result) = run_call(context, &partial, value, functions)?
            {
                return walk_value(context, tail, &result, &indices, functions);
            }
            match map.get(partial.as_ref()) {
                Some(child) => {
                    walk_value(context, tail, child, &indices, functions)
                }
                // Not an error: the rest of the path walks a null
                None => walk_value(
                    context,
                    tail,
                    &Value::Null,
                    &indices,
                    functions,
                ),
            }
        }

        Value::Array(items) => {
            // A leading index group binds to this sequence
            let (expr, parsed) = if pending.is_empty() && expr.starts_with('[')
            {
                take_leading_indices(expr)
            } else {
                (expr, Vec::new())
            };
            let pending = if parsed.is_empty() {
                pending
            } else {
                parsed.as_slice()
            };

            if let [index, rest @ ..] = pending {
                return match items.get(*index) {
                    Some(element) => {
                        walk_value(context, expr, element, rest, functions)
                    }
                    None => Err(WalkError::IndexOutOfBounds),
                };
            }
            if !expr.is_empty() {
                return match run_call(context, expr, value, functions)? {
                    Some(result) => Ok(result),
                    None => Err(WalkError::SequenceField),
                };
            }
            Ok(value.clone())
        }

        Value::Record(record) => {
            if expr.is_empty() {
                return Ok(value.clone());
            }
            let (head, tail) = split_head(expr);
            if head.is_empty() {
                return walk_value(context, tail, value, pending, functions);
            }
            let (partial, indices) = extract_indices(head);
            if let Some(result) = run_call(context, &partial, value, functions)?
            {
                return walk_value(context, tail, &result, &indices, functions);
            }
            match record.get(partial.as_ref()) {
                Some(field) => {
                    // An absent reference reads through as null before the
                    // visibility check
                    if let Value::Ref(None) = field.value {
                        return Ok(Value::Null);
                    }
                    if !field.visible {
                        return Err(WalkError::PrivateField);
                    }
                    walk_value(context, tail, &field.value, &indices, functions)
                }
                None => walk_value(
                    context,
                    tail,
                    &Value::Null,
                    &indices,
                    functions,
                ),
            }
        }

        // References are transparent to traversal
        Value::Ref(inner) => match inner {
            Some(target) => {
                walk_value(context, expr, target, pending, functions)
            }
            None => Ok(Value::Null),
        },

        // Scalars: a call can transform them, anything else dead-ends
        _ => {
            let (head, tail) = split_head(expr);
            let (partial, indices) = extract_indices(head);
            if let Some(result) = run_call(context, &partial, value, functions)?
            {
                return walk_value(context, tail, &result, &indices, functions);
            }
            if head.is_empty() {
                Ok(value.clone())
            } else {
                Ok(Value::Null)
            }
        }
    }
}

/// Dispatch a segment shaped like `name(params)`. `Ok(None)` means the
/// segment is not a call at all. A call to an unregistered name fails with
/// an error carrying the segment text, so the render layer can splice the
/// expression verbatim instead of failing the whole template.
fn run_call(
    context: &Context,
    segment: &str,
    current: &Value,
    functions: &Functions,
) -> Result<Option<Value>, WalkError> {
    let Some((name, raw_params)) = parse_call(segment) else {
        return Ok(None);
    };
    let Some(function) = functions.get(name) else {
        return Err(WalkError::FunctionNotFound {
            expression: segment.to_owned(),
        });
    };
    let params = split_params(raw_params);
    trace!(name, ?params, "calling function");
    function(context, current, &params, functions).map(Some)
}
