use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::envelope::{Envelope, EnvelopeBody};
use super::errors::EnvelopeError;
use crate::serialization::{Message, Object, SerializedForm};

// ============================================================================
// Traced Envelope - Envelope With Tracing Metadata
// ============================================================================
//
// Same dual representation as `DefaultEnvelope`, plus identity, causation &
// correlation ids and free-form metadata. Metadata belongs to the envelope,
// so it survives `with_message` / `with_serialized_message` and the wire.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TracedEnvelopeRecord")]
pub struct TracedEnvelope {
    body: EnvelopeBody,

    envelope_id: Uuid,
    correlation_id: Uuid,
    causation_id: Option<Uuid>, // What message caused this one
    created_at: DateTime<Utc>,
    metadata: HashMap<String, String>,
}

#[derive(Serialize)]
struct TracedEnvelopeRef<'a> {
    message_type: &'a str,
    serialized_message: &'a SerializedForm,
    envelope_id: Uuid,
    correlation_id: Uuid,
    causation_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "no_metadata")]
    metadata: &'a HashMap<String, String>,
}

fn no_metadata(metadata: &&HashMap<String, String>) -> bool {
    metadata.is_empty()
}

#[derive(Deserialize)]
struct TracedEnvelopeRecord {
    message_type: String,
    serialized_message: SerializedForm,
    envelope_id: Uuid,
    correlation_id: Uuid,
    causation_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl From<TracedEnvelopeRecord> for TracedEnvelope {
    fn from(record: TracedEnvelopeRecord) -> Self {
        Self {
            body: EnvelopeBody::serialized(record.message_type, record.serialized_message),
            envelope_id: record.envelope_id,
            correlation_id: record.correlation_id,
            causation_id: record.causation_id,
            created_at: record.created_at,
            metadata: record.metadata,
        }
    }
}

impl Serialize for TracedEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let serialized_message = self.body.serialized_message().map_err(S::Error::custom)?;

        TracedEnvelopeRef {
            message_type: self.body.message_type(),
            serialized_message,
            envelope_id: self.envelope_id,
            correlation_id: self.correlation_id,
            causation_id: self.causation_id,
            created_at: self.created_at,
            metadata: &self.metadata,
        }
        .serialize(serializer)
    }
}

impl TracedEnvelope {
    fn stamped(body: EnvelopeBody) -> Self {
        Self {
            body,
            envelope_id: Uuid::new_v4(),
            correlation_id: Uuid::new_v4(),
            causation_id: None,
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    fn with_body(&self, body: EnvelopeBody) -> Self {
        Self {
            body,
            envelope_id: self.envelope_id,
            correlation_id: self.correlation_id,
            causation_id: self.causation_id,
            created_at: self.created_at,
            metadata: self.metadata.clone(),
        }
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn with_causation(mut self, causation_id: Uuid) -> Self {
        self.causation_id = Some(causation_id);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn envelope_id(&self) -> Uuid {
        self.envelope_id
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn causation_id(&self) -> Option<Uuid> {
        self.causation_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

impl Message for TracedEnvelope {
    fn type_name() -> &'static str {
        "TracedEnvelope"
    }
}

impl Envelope for TracedEnvelope {
    fn for_message(message: Arc<dyn Object>) -> Self {
        Self::stamped(EnvelopeBody::live(message))
    }

    fn for_serialized_message(message_type: impl Into<String>, serialized: SerializedForm) -> Self {
        Self::stamped(EnvelopeBody::serialized(message_type.into(), serialized))
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
        self.with_body(self.body.with_message(message))
    }

    fn with_serialized_message(&self, serialized: SerializedForm) -> Self {
        self.with_body(self.body.with_serialized_message(serialized))
    }
}
