//! Error types for the form builder.

use thiserror::Error;

/// Errors raised while building form controls.
///
/// Both variants are caller errors: the markup is never partially produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The `type` attribute is not one of [`VALID_INPUT_TYPES`](crate::VALID_INPUT_TYPES).
    #[error("\"{0}\" is not a valid input type")]
    InvalidFieldType(String),

    /// A select was built without an options tree.
    #[error("select element \"{name}\" is missing its options")]
    InvalidOptions { name: String },
}

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
