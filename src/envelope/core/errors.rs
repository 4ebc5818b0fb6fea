use std::fmt;

use crate::serialization::SerializationError;

// ============================================================================
// Envelope Errors
// ============================================================================

/// Which side of an envelope's dual representation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Live,
    Serialized,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Live => f.write_str("live message"),
            Representation::Serialized => f.write_str("serialized message"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Envelope for {message_type} has no {representation} available")]
    UnavailableRepresentation {
        message_type: String,
        representation: Representation,
    },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[source] SerializationError),
}

impl From<SerializationError> for EnvelopeError {
    fn from(error: SerializationError) -> Self {
        match error {
            SerializationError::TypeMismatch { expected, actual } => {
                EnvelopeError::TypeMismatch { expected, actual }
            }
            other => EnvelopeError::Serialization(other),
        }
    }
}

impl EnvelopeError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, EnvelopeError::TypeMismatch { .. })
    }

    pub fn is_unavailable_representation(&self) -> bool {
        matches!(self, EnvelopeError::UnavailableRepresentation { .. })
    }
}
