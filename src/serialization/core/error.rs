// ============================================================================
// Serialization Backend Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("No decoder registered for type: {0}")]
    UnknownType(String),

    #[error("Deserialized object has type {actual}, expected {expected}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Serialized input is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object (de)serialization error: {0}")]
    Erased(#[from] erased_serde::Error),
}
