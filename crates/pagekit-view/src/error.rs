//! Error types for view rendering.
//!
//! [`ViewError`] covers the store, path resolution and template execution.
//! Engine errors are flattened into strings so the public API does not leak
//! the underlying template engine's types.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for store and render operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A write to, or a render with, the reserved `view_template_file` name.
    #[error("cannot bind variable named '{0}'")]
    ReservedName(String),

    /// No candidate root holds the requested view. `path` is the last
    /// candidate tried.
    #[error("view {} not found", .path.display())]
    ViewNotFound { view: String, path: PathBuf },

    /// Read of a name that was never set.
    #[error("variable '{0}' is not bound")]
    UnboundVariable(String),

    /// Template syntax or execution failure.
    #[error("template error: {0}")]
    Template(String),

    /// A value could not be converted for the template scope.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The resolved view file could not be read.
    #[error("failed to read view {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<minijinja::Error> for ViewError {
    fn from(err: minijinja::Error) -> Self {
        ViewError::Template(err.to_string())
    }
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ViewError::ViewNotFound {
            view: "home.html".into(),
            path: PathBuf::from("/srv/views/home.html"),
        };
        assert_eq!(err.to_string(), "view /srv/views/home.html not found");

        let err = ViewError::ReservedName("view_template_file".into());
        assert!(err.to_string().contains("view_template_file"));
    }

    #[test]
    fn test_from_minijinja_error() {
        let mj_err = minijinja::Error::new(
            minijinja::ErrorKind::TemplateNotFound,
            "template 'foo' not found",
        );
        let err: ViewError = mj_err.into();
        assert!(matches!(err, ViewError::Template(_)));
    }
}
