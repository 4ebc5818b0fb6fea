use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::core::{DefaultEnvelope, Envelope, TracedEnvelope};
use crate::serialization::{Message, Object};

// ============================================================================
// Envelope Factories
// ============================================================================
//
// A factory decides which envelope variant wraps outgoing messages, and
// tells the orchestrating serializer which type to expect when unwrapping.
//
// ============================================================================

pub trait EnvelopeFactory: Send + Sync {
    type Envelope: Envelope;

    fn wrap_message_in_envelope(&self, message: Arc<dyn Object>) -> Self::Envelope;

    /// Registered type name of the envelopes this factory produces.
    fn envelope_type(&self) -> &str {
        <Self::Envelope as Message>::type_name()
    }
}

/// Produces [`DefaultEnvelope`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvelopeFactory;

impl EnvelopeFactory for DefaultEnvelopeFactory {
    type Envelope = DefaultEnvelope;

    fn wrap_message_in_envelope(&self, message: Arc<dyn Object>) -> DefaultEnvelope {
        DefaultEnvelope::for_message(message)
    }
}

/// Produces [`TracedEnvelope`]s, optionally pinned to one correlation id and
/// stamped with fixed metadata (service name, region, ...).
#[derive(Debug, Clone, Default)]
pub struct TracedEnvelopeFactory {
    correlation_id: Option<Uuid>,
    metadata: HashMap<String, String>,
}

impl TracedEnvelopeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl EnvelopeFactory for TracedEnvelopeFactory {
    type Envelope = TracedEnvelope;

    fn wrap_message_in_envelope(&self, message: Arc<dyn Object>) -> TracedEnvelope {
        let mut envelope = TracedEnvelope::for_message(message);

        if let Some(correlation_id) = self.correlation_id {
            envelope = envelope.with_correlation(correlation_id);
        }
        for (key, value) in &self.metadata {
            envelope = envelope.with_metadata(key.clone(), value.clone());
        }

        envelope
    }
}
