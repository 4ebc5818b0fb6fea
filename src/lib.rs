// ============================================================================
// Message Envelope Serialization
// ============================================================================
//
// Wraps application messages in typed envelopes that can cross process
// boundaries (queues, logs, RPC payloads) and rebuilds them on the other side
// with type checks at every step.
//
// Layout:
// - serialization: object model, type registry, pluggable backends
// - envelope: envelopes, envelope factories, wrap/unwrap orchestration
//
// ============================================================================

pub mod envelope;
pub mod serialization;

pub use envelope::{
    DefaultEnvelope, DefaultEnvelopeFactory, Envelope, EnvelopeError, EnvelopeFactory,
    MessageInEnvelopeSerializer, Representation, StandardMessageInEnvelopeSerializer,
    TracedEnvelope, TracedEnvelopeFactory,
};
pub use serialization::{
    live, JsonObjectSerializer, JsonSerializerConfig, Message, Object, ObjectSerializer,
    SerializationError, SerializedForm, TypeRegistry,
};
