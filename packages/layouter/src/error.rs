//! Error types for the layouter.
//!
//! Every kind here is fatal for a run. The only soft paths (an unknown
//! hidden-line style, an element without a line style) are handled inside
//! the styling pass and never surface as errors.

use thiserror::Error;

/// Main error type for the layouter library.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// An element could not be resolved to any registered schema.
    #[error("No schema for element <{tag}>{}", .context.as_ref().map(|c| format!(" in {c}")).unwrap_or_default())]
    UnknownTag {
        tag: String,
        context: Option<String>,
    },

    /// Accessor used with a name outside the schema's declared set.
    #[error("Unknown attribute or child role '{name}' on <{tag}>")]
    UnknownAttribute { tag: String, name: String },

    /// More than one child matches a declared role.
    #[error("More than one child for role '{role}' on <{tag}>, role children must be unique")]
    AmbiguousChildRole { tag: String, role: String },

    /// A declared role has no child (it was removed structurally).
    #[error("No child occupies role '{role}' on <{tag}>")]
    MissingChildRole { tag: String, role: String },

    /// Required layout configuration key is absent.
    #[error("Missing layout configuration key: {0}")]
    MissingConfigKey(String),

    /// A value failed a shape check.
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// A schema declaration references a schema that was never registered.
    #[error("Unknown schema '{0}'")]
    UnknownSchema(String),

    /// Two concrete schemas claim the same tag without a union to tell them apart.
    #[error("Tag <{tag}> already claimed by schema '{existing}', cannot register '{new}'")]
    DuplicateTag {
        tag: String,
        existing: String,
        new: String,
    },

    /// Document nesting exceeds the configured recursion ceiling.
    #[error("Nesting depth limit of {limit} exceeded at <{tag}>")]
    DepthLimitExceeded { limit: usize, tag: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Layout JSON parsing failed.
    #[error("Layout JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for layouter operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
