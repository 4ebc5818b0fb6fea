use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

use super::envelope::{Envelope, EnvelopeBody};
use super::errors::EnvelopeError;
use crate::serialization::{Message, Object, SerializedForm};

/// The standard envelope: a type name plus a live and/or serialized message.
///
/// Only the type name and the serialized message are part of the wire form.
/// Serializing an envelope that has no serialized message fails.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "DefaultEnvelopeRecord")]
pub struct DefaultEnvelope {
    body: EnvelopeBody,
}

#[derive(Serialize)]
struct DefaultEnvelopeRef<'a> {
    message_type: &'a str,
    serialized_message: &'a SerializedForm,
}

#[derive(Deserialize)]
struct DefaultEnvelopeRecord {
    message_type: String,
    serialized_message: SerializedForm,
}

impl From<DefaultEnvelopeRecord> for DefaultEnvelope {
    fn from(record: DefaultEnvelopeRecord) -> Self {
        Self::for_serialized_message(record.message_type, record.serialized_message)
    }
}

impl Serialize for DefaultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let serialized_message = self.body.serialized_message().map_err(S::Error::custom)?;

        DefaultEnvelopeRef {
            message_type: self.body.message_type(),
            serialized_message,
        }
        .serialize(serializer)
    }
}

impl Message for DefaultEnvelope {
    fn type_name() -> &'static str {
        "DefaultEnvelope"
    }
}

impl Envelope for DefaultEnvelope {
    fn for_message(message: Arc<dyn Object>) -> Self {
        Self {
            body: EnvelopeBody::live(message),
        }
    }

    fn for_serialized_message(message_type: impl Into<String>, serialized: SerializedForm) -> Self {
        Self {
            body: EnvelopeBody::serialized(message_type.into(), serialized),
        }
    }

    fn message_type(&self) -> &str {
        self.body.message_type()
    }

    fn message(&self) -> Result<&Arc<dyn Object>, EnvelopeError> {
        self.body.message()
    }

    fn serialized_message(&self) -> Result<&SerializedForm, EnvelopeError> {
        self.body.serialized_message()
    }

    fn with_message(&self, message: Arc<dyn Object>) -> Self {
        Self {
            body: self.body.with_message(message),
        }
    }

    fn with_serialized_message(&self, serialized: SerializedForm) -> Self {
        Self {
            body: self.body.with_serialized_message(serialized),
        }
    }
}
