//! Lexical helpers for the path-expression language
//!
//! The language is small enough that no AST is built up front: each walk
//! step re-parses one segment with the helpers here. A segment is a
//! dot-delimited piece of an expression and may carry `[n]` indices and/or
//! a `name(params)` call.

use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Every `[N]` index group in a segment
static INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9]+)\]").unwrap());

/// Index groups anchored at the front of an expression
static LEADING_INDICES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[[0-9]+\])+").unwrap());

/// A call-shaped segment: `name(params)`
static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\((.*)\)$").unwrap());

/// Split an expression into its first segment and the rest. The separator
/// is a dot *outside parentheses*, so `split(.)` stays a single segment.
/// Parenthesis tracking is one level deep; nesting is not part of the
/// language. An expression with no splitting dot is a single segment.
pub(crate) fn split_head(expr: &str) -> (&str, &str) {
    let mut in_call = false;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => in_call = true,
            ')' => in_call = false,
            '.' if !in_call => return (&expr[..i], &expr[i + 1..]),
            _ => {}
        }
    }
    (expr, "")
}

/// Strip every `[N]` group from a segment, returning the stripped segment
/// and the indices in order. Brackets holding anything but digits stay in
/// the segment, so `foo[bar]` parses as a plain name.
pub(crate) fn extract_indices(segment: &str) -> (Cow<'_, str>, Vec<usize>) {
    let indices: Vec<usize> = INDEX
        .captures_iter(segment)
        .filter_map(|captures| captures[1].parse().ok())
        .collect();
    if indices.is_empty() {
        (Cow::Borrowed(segment), indices)
    } else {
        (INDEX.replace_all(segment, ""), indices)
    }
}

/// Consume index groups at the front of an expression: `[0][1].rest`
/// becomes `(".rest", [0, 1])`. An expression with no leading group is
/// returned unchanged.
pub(crate) fn take_leading_indices(expr: &str) -> (&str, Vec<usize>) {
    match LEADING_INDICES.find(expr) {
        Some(found) => {
            let (head, rest) = expr.split_at(found.end());
            let indices = INDEX
                .captures_iter(head)
                .filter_map(|captures| captures[1].parse().ok())
                .collect();
            (rest, indices)
        }
        None => (expr, Vec::new()),
    }
}

/// Parse a segment as a function call, returning the name and the raw
/// parameter text. A segment with unbalanced brackets or an empty name is
/// not a call.
pub(crate) fn parse_call(segment: &str) -> Option<(&str, &str)> {
    let captures = CALL.captures(segment)?;
    match (captures.get(1), captures.get(2)) {
        (Some(name), Some(params)) => Some((name.as_str(), params.as_str())),
        _ => None,
    }
}

/// Split a raw parameter list on commas. `\,` is an escaped comma: it does
/// not separate parameters and unescapes to a literal `,`. Parameters are
/// raw tokens with no quoting. An empty parameter string means no
/// parameters at all.
pub(crate) fn split_params(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut params = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in raw.chars() {
        match c {
            '\\' if !escaped => escaped = true,
            ',' if escaped => {
                current.push(',');
                escaped = false;
            }
            ',' => params.push(std::mem::take(&mut current)),
            _ => {
                if escaped {
                    // A backslash not followed by a comma is literal
                    current.push('\\');
                    escaped = false;
                }
                current.push(c);
            }
        }
    }
    if escaped {
        current.push('\\');
    }
    params.push(current);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", "", "")]
    #[case::single("foo", "foo", "")]
    #[case::two("foo.bar", "foo", "bar")]
    #[case::deep("foo.bar.baz", "foo", "bar.baz")]
    #[case::leading_dot(".foo", "", "foo")]
    #[case::trailing_dot("foo.", "foo", "")]
    // The dot inside the parentheses is an argument, not a separator
    #[case::dot_in_call("foo.split(.)", "foo", "split(.)")]
    #[case::call_then_more("split(.).size()", "split(.)", "size()")]
    fn test_split_head(
        #[case] expr: &str,
        #[case] head: &str,
        #[case] tail: &str,
    ) {
        assert_eq!(split_head(expr), (head, tail));
    }

    #[rstest]
    #[case::one_digit("foo[0]", "foo", vec![0])]
    #[case::two_digits("foo[29]", "foo", vec![29])]
    #[case::stacked("foo[0][1]", "foo", vec![0, 1])]
    #[case::none("foo", "foo", vec![])]
    #[case::empty_brackets("foo[]", "foo[]", vec![])]
    #[case::alpha_brackets("foo[bar]", "foo[bar]", vec![])]
    fn test_extract_indices(
        #[case] segment: &str,
        #[case] partial: &str,
        #[case] indices: Vec<usize>,
    ) {
        assert_eq!(extract_indices(segment), (Cow::from(partial), indices));
    }

    #[rstest]
    #[case::none("foo[0]", "foo[0]", vec![])]
    #[case::single("[0]", "", vec![0])]
    #[case::stacked("[0][1].foo", ".foo", vec![0, 1])]
    fn test_take_leading_indices(
        #[case] expr: &str,
        #[case] rest: &str,
        #[case] indices: Vec<usize>,
    ) {
        assert_eq!(take_leading_indices(expr), (rest, indices));
    }

    #[rstest]
    #[case::simple("foo(bar)", Some(("foo", "bar")))]
    #[case::no_params("size()", Some(("size", "")))]
    #[case::dotted_param("foo(bar.dawg)", Some(("foo", "bar.dawg")))]
    #[case::plain_name("foo", None)]
    #[case::empty_name("()", None)]
    #[case::unbalanced(r"split(\,", None)]
    #[case::index_suffix("foo(bar)[0]", None)]
    fn test_parse_call(
        #[case] segment: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        assert_eq!(parse_call(segment), expected);
    }

    #[rstest]
    #[case::empty("", vec![])]
    #[case::one("bar", vec!["bar"])]
    #[case::two("bar,dawg", vec!["bar", "dawg"])]
    #[case::escaped_comma(r"\,", vec![","])]
    #[case::escaped_mid(r"a\,b,c", vec!["a,b", "c"])]
    #[case::trailing_escape(r"t2,\,", vec!["t2", ","])]
    #[case::plain_backslash(r"a\b", vec![r"a\b"])]
    fn test_split_params(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_params(raw), expected);
    }
}
