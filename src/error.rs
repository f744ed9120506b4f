use thiserror::Error;

/// A fatal error raised at the mutation or loading boundary.
///
/// Anything not listed here degrades silently (dangling references, edits
/// through a property, edits to keys that never existed).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThemeError {
    /// A symbol name does not match `@word(-word)*`.
    #[error("'{name}' is not a valid symbol name")]
    InvalidName { name: String },

    /// A symbol with this name already exists in the edited table.
    #[error("symbol '{name}' already exists")]
    DuplicateName { name: String },

    /// A node already exists at this dotted path in the edited tree.
    #[error("a node already exists at '{path}'")]
    DuplicatePath { path: String },

    /// A symbol value contains an array with no elements.
    #[error("symbol '{name}' contains an empty array")]
    EmptyList { name: String },

    /// A mutation was dispatched before any theme was loaded.
    #[error("no theme has been loaded")]
    NoTheme,

    /// A document could not be read or written as JSON.
    #[error("invalid theme document: {message}")]
    Json { message: String },
}

impl ThemeError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ThemeError::InvalidName { .. } => "invalid-name",
            ThemeError::DuplicateName { .. } => "duplicate-name",
            ThemeError::DuplicatePath { .. } => "duplicate-path",
            ThemeError::EmptyList { .. } => "empty-list",
            ThemeError::NoTheme => "no-theme",
            ThemeError::Json { .. } => "json-error",
        }
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(err: serde_json::Error) -> Self {
        ThemeError::Json {
            message: err.to_string(),
        }
    }
}
