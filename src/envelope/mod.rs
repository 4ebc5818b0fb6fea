// ============================================================================
// Message Envelopes
// ============================================================================
//
// Envelopes (core), factories that produce them, and the orchestrating
// serializer that wraps/unwraps messages through an `ObjectSerializer`.
//
// ============================================================================

mod core;
mod factory;
mod serializer;

pub use self::core::*;
pub use self::factory::{DefaultEnvelopeFactory, EnvelopeFactory, TracedEnvelopeFactory};
pub use self::serializer::{MessageInEnvelopeSerializer, StandardMessageInEnvelopeSerializer};
