use std::sync::Arc;

use super::errors::{EnvelopeError, Representation};
use crate::serialization::{Message, Object, SerializedForm};

// ============================================================================
// Envelope - Dual-Representation Message Container
// ============================================================================
//
// An envelope pairs a message type name with the live message, its
// serialized form, or both. Envelopes are values: every `with_*` call returns
// a new envelope and leaves the original untouched.
//
// Asymmetry to keep in mind:
// - `with_message` drops any serialized form (it no longer matches)
// - `with_serialized_message` keeps the live message (the serialized form is
//   a companion of the live one, not a replacement)
//
// ============================================================================

/// A message envelope. Implementations are themselves messages, so a backend
/// can serialize and rebuild them like any other registered type.
pub trait Envelope: Message {
    /// Envelope around a live message; the type name is taken from the message.
    fn for_message(message: Arc<dyn Object>) -> Self;

    /// Envelope around an already serialized message of type `message_type`.
    fn for_serialized_message(message_type: impl Into<String>, serialized: SerializedForm) -> Self;

    fn message_type(&self) -> &str;

    fn message(&self) -> Result<&Arc<dyn Object>, EnvelopeError>;

    fn serialized_message(&self) -> Result<&SerializedForm, EnvelopeError>;

    fn with_message(&self, message: Arc<dyn Object>) -> Self;

    fn with_serialized_message(&self, serialized: SerializedForm) -> Self;

    /// The live message as its concrete type.
    fn message_as<M: Message>(&self) -> Result<&M, EnvelopeError> {
        let message = self.message()?;
        message
            .downcast_ref::<M>()
            .ok_or_else(|| EnvelopeError::TypeMismatch {
                expected: M::type_name().to_string(),
                actual: message.object_type().to_string(),
            })
    }

    fn has_message(&self) -> bool {
        self.message().is_ok()
    }

    fn has_serialized_message(&self) -> bool {
        self.serialized_message().is_ok()
    }
}

/// The type name and representations shared by every shipped envelope.
#[derive(Debug, Clone)]
pub(crate) struct EnvelopeBody {
    message_type: String,
    message: Option<Arc<dyn Object>>,
    serialized_message: Option<SerializedForm>,
}

impl EnvelopeBody {
    pub(crate) fn live(message: Arc<dyn Object>) -> Self {
        Self {
            message_type: message.object_type().to_string(),
            message: Some(message),
            serialized_message: None,
        }
    }

    pub(crate) fn serialized(message_type: String, serialized: SerializedForm) -> Self {
        Self {
            message_type,
            message: None,
            serialized_message: Some(serialized),
        }
    }

    pub(crate) fn message_type(&self) -> &str {
        &self.message_type
    }

    pub(crate) fn message(&self) -> Result<&Arc<dyn Object>, EnvelopeError> {
        self.message
            .as_ref()
            .ok_or_else(|| self.unavailable(Representation::Live))
    }

    pub(crate) fn serialized_message(&self) -> Result<&SerializedForm, EnvelopeError> {
        self.serialized_message
            .as_ref()
            .ok_or_else(|| self.unavailable(Representation::Serialized))
    }

    pub(crate) fn with_message(&self, message: Arc<dyn Object>) -> Self {
        Self {
            message_type: self.message_type.clone(),
            message: Some(message),
            serialized_message: None,
        }
    }

    pub(crate) fn with_serialized_message(&self, serialized: SerializedForm) -> Self {
        Self {
            message_type: self.message_type.clone(),
            message: self.message.clone(),
            serialized_message: Some(serialized),
        }
    }

    fn unavailable(&self, representation: Representation) -> EnvelopeError {
        EnvelopeError::UnavailableRepresentation {
            message_type: self.message_type.clone(),
            representation,
        }
    }
}

impl PartialEq for EnvelopeBody {
    fn eq(&self, other: &Self) -> bool {
        let same_message = match (&self.message, &other.message) {
            (Some(a), Some(b)) => a.dyn_eq(b.as_ref()),
            (None, None) => true,
            _ => false,
        };

        same_message
            && self.message_type == other.message_type
            && self.serialized_message == other.serialized_message
    }
}
