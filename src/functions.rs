//! The function registry and the built-in callables

use crate::{
    context::Context,
    error::WalkError,
    render,
    value::Value,
};
use indexmap::IndexMap;
use itertools::Itertools;
use std::sync::Arc;

/// A registered callable. It receives the ambient context, the current
/// value the call was reached on, the raw string parameters from the call
/// segment, and the registry itself (which the rendering built-ins use to
/// reach the sub-template scope).
pub type Function = Arc<
    dyn Fn(&Context, &Value, &[String], &Functions) -> Result<Value, WalkError>
        + Send
        + Sync,
>;

/// Sub-templates are stored in the side scope under this prefix so
/// user-added scope entries cannot collide with template slots
const SUB_TEMPLATE_PREFIX: &str = "_";

/// Named callables available to call segments, plus a side scope the
/// rendering built-ins use to look up sub-templates.
///
/// The registry is read-only during a walk: prime it with [add](Self::add)
/// and [add_sub_template](Self::add_sub_template) before evaluation begins.
/// Cloning is cheap because callables are shared, and one registry can
/// serve concurrent walks as long as user-added callables are themselves
/// thread-safe.
#[derive(Clone, derive_more::Debug)]
pub struct Functions {
    #[debug(skip)]
    entries: IndexMap<String, Function>,
    scope: IndexMap<String, Value>,
}

impl Functions {
    /// A registry holding the built-ins: `size`, `split`, `collect`,
    /// `render`, `renderEach` and `toString`
    pub fn new() -> Self {
        let mut functions = Self {
            entries: IndexMap::new(),
            scope: IndexMap::new(),
        };
        functions
            .add("size", size)
            .add("split", split)
            .add("collect", collect)
            .add("render", render_template)
            .add("renderEach", render_each)
            .add("toString", to_text);
        functions
    }

    /// Insert or replace a callable. Returns `self` for chaining.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        function: impl Fn(
            &Context,
            &Value,
            &[String],
            &Functions,
        ) -> Result<Value, WalkError>
        + Send
        + Sync
        + 'static,
    ) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(function));
        self
    }

    /// Look up a callable by name
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.entries.get(name)
    }

    /// The side scope: arbitrary named values available to callables. The
    /// rendering built-ins store sub-templates here under reserved keys.
    pub fn scope(&self) -> &IndexMap<String, Value> {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.scope
    }

    /// Store a sub-template under its reserved slot. Returns `self` for
    /// chaining.
    pub fn add_sub_template(
        &mut self,
        name: &str,
        template: impl Into<String>,
    ) -> &mut Self {
        self.scope.insert(
            format!("{SUB_TEMPLATE_PREFIX}{name}"),
            Value::String(template.into()),
        );
        self
    }

    /// Fetch a sub-template primed via
    /// [add_sub_template](Self::add_sub_template)
    fn sub_template(&self, name: &str) -> Option<&str> {
        match self.scope.get(&format!("{SUB_TEMPLATE_PREFIX}{name}"))? {
            Value::String(template) => Some(template),
            _ => None,
        }
    }
}

impl Default for Functions {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the current value: entry count for maps and arrays, character
/// count for strings
fn size(
    _: &Context,
    current: &Value,
    _: &[String],
    _: &Functions,
) -> Result<Value, WalkError> {
    let length = match current.resolved() {
        Value::Null => {
            return Err(WalkError::NilReceiver { function: "size" });
        }
        Value::String(text) => text.chars().count(),
        Value::Array(items) => items.len(),
        Value::Map(map) => map.len(),
        value => {
            return Err(WalkError::UnsupportedKind {
                function: "size",
                kind: value.kind(),
            });
        }
    };
    Ok(Value::Int(length as i64))
}

/// Split a string on a literal separator
fn split(
    _: &Context,
    current: &Value,
    params: &[String],
    _: &Functions,
) -> Result<Value, WalkError> {
    let Some(separator) = params.first() else {
        return Err(WalkError::SeparatorMissing);
    };
    match current.resolved() {
        Value::String(text) => Ok(Value::Array(
            text.split(separator.as_str()).map(Value::from).collect(),
        )),
        _ => Err(WalkError::SplitReceiver),
    }
}

/// Project an array of maps down to the named fields. A field that is
/// missing or null in an element is dropped from that element's projection.
fn collect(
    _: &Context,
    current: &Value,
    params: &[String],
    _: &Functions,
) -> Result<Value, WalkError> {
    if params.is_empty() {
        return Err(WalkError::FieldsMissing);
    }
    let Value::Array(items) = current.resolved() else {
        return Err(WalkError::NotCollectable);
    };
    let collected = items
        .iter()
        .map(|item| {
            let Value::Map(map) = item.resolved() else {
                return Err(WalkError::ElementNotMap);
            };
            let fields: IndexMap<String, Value> = params
                .iter()
                .filter_map(|field| match map.get(field.as_str()) {
                    Some(Value::Null) | None => None,
                    Some(value) => Some((field.clone(), value.clone())),
                })
                .collect();
            Ok(Value::Map(fields))
        })
        .collect::<Result<Vec<Value>, WalkError>>()?;
    Ok(Value::Array(collected))
}

/// Run a named sub-template against the current value
fn render_template(
    context: &Context,
    current: &Value,
    params: &[String],
    functions: &Functions,
) -> Result<Value, WalkError> {
    let Some(name) = params.first() else {
        return Err(WalkError::TemplateMissing);
    };
    let Some(template) = functions.sub_template(name) else {
        return Err(WalkError::TemplateNotFound);
    };
    let rendered = render::render_with(context, template, current, functions)
        .map_err(|error| error.error)?;
    Ok(Value::String(rendered))
}

/// Render a named sub-template once per element, joining the results with
/// an optional separator. Map entries are bound as `{key, value}` pairs, in
/// the map's insertion order.
fn render_each(
    context: &Context,
    current: &Value,
    params: &[String],
    functions: &Functions,
) -> Result<Value, WalkError> {
    let Some(name) = params.first() else {
        return Err(WalkError::TemplateMissing);
    };
    let Some(template) = functions.sub_template(name) else {
        return Err(WalkError::TemplateNotFound);
    };
    let separator = params.get(1).map(String::as_str).unwrap_or_default();

    let elements: Vec<Value> = match current.resolved() {
        Value::Array(items) => items.clone(),
        Value::Map(map) => map
            .iter()
            .map(|(key, value)| {
                Value::from(vec![
                    ("key", Value::from(key.as_str())),
                    ("value", value.clone()),
                ])
            })
            .collect(),
        _ => return Err(WalkError::NotIterable),
    };

    let rendered = elements
        .iter()
        .map(|element| {
            render::render_with(context, template, element, functions)
                .map_err(|error| error.error)
        })
        .collect::<Result<Vec<String>, WalkError>>()?;
    Ok(Value::String(rendered.iter().join(separator)))
}

/// The template-splice text form of the current value
fn to_text(
    _: &Context,
    current: &Value,
    _: &[String],
    _: &Functions,
) -> Result<Value, WalkError> {
    Ok(Value::String(current.to_string()))
}
