use crate::FieldPath;

/// Error type for answer tree access.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Malformed field path: '{0}'")]
    MalformedPath(FieldPath),

    #[error("Missing answer for path: {0}")]
    MissingPath(FieldPath),

    #[error("Type mismatch at path '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Expected a JSON object at the root of the answer tree, got {0}")]
    NotAnObject(&'static str),
}
