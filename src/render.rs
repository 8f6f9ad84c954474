//! The template driver: find `${...}` markers, walk each expression against
//! the scope, splice the results back into the text

use crate::{
    context::Context,
    error::{RenderError, WalkError},
    functions::Functions,
    value::Value,
    walker,
};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Interpolation markers, non-greedy so adjacent markers stay separate
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").unwrap());

/// Render a template string against a value scope. Markers are processed
/// left to right, each one an independent walk.
///
/// A marker that resolves to null is left in place, so a missing scope key
/// keeps `${its.marker}` visible in the output. A call to an unknown
/// function renders as the raw expression text. Any other walk failure
/// aborts the render; the returned [RenderError] carries the partially
/// rendered output.
pub fn render(
    context: &Context,
    template: &str,
    value: &Value,
    functions: Option<&Functions>,
) -> Result<String, RenderError> {
    match functions {
        Some(functions) => render_with(context, template, value, functions),
        None => render_with(context, template, value, &Functions::new()),
    }
}

/// Prime the registry with the given sub-templates, then render.
/// Sub-templates land in the registry scope under `"_" + name`, where the
/// `render` and `renderEach` built-ins find them. The caller's registry is
/// not mutated; priming happens on a clone.
pub fn render_all(
    context: &Context,
    template: &str,
    sub_templates: &SubTemplates,
    value: &Value,
    functions: Option<&Functions>,
) -> Result<String, RenderError> {
    let mut functions = functions.cloned().unwrap_or_default();
    for (name, sub_template) in sub_templates.iter() {
        functions.add_sub_template(name, sub_template);
    }
    render_with(context, template, value, &functions)
}

pub(crate) fn render_with(
    context: &Context,
    template: &str,
    value: &Value,
    functions: &Functions,
) -> Result<String, RenderError> {
    let mut output = String::with_capacity(template.len());
    let mut tail_start = 0;
    for captures in MARKER.captures_iter(template) {
        let marker = captures.get(0).unwrap();
        let expr = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        output.push_str(&template[tail_start..marker.start()]);
        tail_start = marker.end();
        match walker::walk_value(context, expr, value, &[], functions) {
            // Null doesn't substitute; the marker stays visible
            Ok(Value::Null) => output.push_str(marker.as_str()),
            Ok(result) => output.push_str(&result.to_string()),
            // Unknown call: show the expression itself
            Err(WalkError::FunctionNotFound { expression }) => {
                output.push_str(&expression);
            }
            Err(error) => {
                debug!(expr, %error, "render aborted");
                output.push_str(&template[marker.start()..]);
                return Err(RenderError {
                    partial: output,
                    error,
                });
            }
        }
    }
    output.push_str(&template[tail_start..]);
    Ok(output)
}

/// A named collection of sub-templates for [render_all]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTemplates(IndexMap<String, String>);

impl SubTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a sub-template. Returns `self` for chaining.
    #[must_use]
    pub fn add(
        mut self,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.0.insert(name.into(), template.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, template)| (name.as_str(), template.as_str()))
    }
}

/// Sub-templates from (name, template) pairs
impl<K, V, const N: usize> From<[(K, V); N]> for SubTemplates
where
    String: From<K> + From<V>,
{
    fn from(entries: [(K, V); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, template)| (name.into(), template.into()))
                .collect(),
        )
    }
}
