//! Render strings from templates whose `${...}` markers hold path
//! expressions, evaluated against a scope of structured data. An expression
//! is a chain of dot-separated segments: map keys and record fields, `[n]`
//! indices, and `name(params)` calls dispatched through a function
//! registry. The engine is agnostic of where the data comes from; host data
//! enters through [Value::from_json] or by building [Value]s directly.
//!
//! ```
//! use amble::{Context, Value, render};
//!
//! let scope = Value::from_json(serde_json::json!({
//!     "name": "pino",
//!     "items": ["keys", "wallet"],
//! }));
//! let output = render(
//!     &Context::new(),
//!     "${name} carries ${items.size()} items, first the ${items[0]}",
//!     &scope,
//!     None,
//! )?;
//! assert_eq!(output, "pino carries 2 items, first the keys");
//! # Ok::<(), amble::RenderError>(())
//! ```
//!
//! Every walk threads a [Context] carrying an optional deadline and a
//! cancellation flag, checked at each traversal step and available to every
//! registered callable.

mod cereal;
mod context;
mod display;
mod error;
mod functions;
mod parse;
mod render;
#[cfg(test)]
mod tests;
mod value;
mod walker;

pub use crate::{
    context::Context,
    error::{RenderError, WalkError},
    functions::{Function, Functions},
    render::{SubTemplates, render, render_all},
    value::{Field, Record, Value, ValueKind},
    walker::walk,
};
