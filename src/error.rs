use crate::value::ValueKind;
use thiserror::Error;

/// Any error that can occur while walking a path expression.
///
/// The error always holds owned data so it can be detached from the lifetime
/// of the expression and scope. The messages here are user-visible: the
/// template driver surfaces them directly, so they should be brief.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The context's deadline passed before the walk finished
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The context was cancelled mid-walk
    #[error("cancelled")]
    Cancelled,

    /// An index selected past the end of a sequence
    #[error("index out of bounds")]
    IndexOutOfBounds,

    /// A name segment was applied to a sequence. Sequences only take indices
    /// and calls.
    #[error("cannot access attributes from an array")]
    SequenceField,

    /// A record field exists but is not readable
    #[error("cannot access private field")]
    PrivateField,

    /// A call-shaped segment named an unregistered function. The segment
    /// text is carried so the render layer can splice the expression
    /// verbatim instead of failing.
    #[error("function not found")]
    FunctionNotFound { expression: String },

    /// A built-in was applied to a null current value
    #[error("nil reference to {function} function")]
    NilReceiver { function: &'static str },

    /// A built-in was applied to a kind it doesn't handle
    #[error("{function} not supported for: {kind}")]
    UnsupportedKind {
        function: &'static str,
        kind: ValueKind,
    },

    /// `split` was applied to something that isn't a string
    #[error("split only supported for strings")]
    SplitReceiver,

    /// `split` was called without a separator parameter
    #[error("separator not provided")]
    SeparatorMissing,

    /// `collect` was called without any field names
    #[error("list of fields not provided")]
    FieldsMissing,

    /// `collect` found a sequence element that isn't a map
    #[error("at least one item in the array is not a map")]
    ElementNotMap,

    /// `collect` was applied to something that isn't a sequence
    #[error("operation can only be applied to arrays of maps")]
    NotCollectable,

    /// A rendering built-in was called without a template name
    #[error("template not provided")]
    TemplateMissing,

    /// No sub-template was primed under the requested name
    #[error("template not found")]
    TemplateNotFound,

    /// `renderEach` was applied to something it can't iterate
    #[error("cannot iterate on a data type that is not an array")]
    NotIterable,

    /// External error type from a user-registered callable
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl WalkError {
    /// Create a [WalkError::Other] from another error
    pub fn other(
        error: impl 'static + Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Other(error.into())
    }
}

/// An error from the template driver: the first walk failure across the
/// template's markers, together with the text rendered up to that point.
/// Markers before the failing one are substituted; the failing marker and
/// everything after it are left as written.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RenderError {
    /// Partially rendered output
    pub partial: String,
    /// The walk failure that aborted the render
    pub error: WalkError,
}
