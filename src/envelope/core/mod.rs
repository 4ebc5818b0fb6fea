// ============================================================================
// Envelope Core - Envelope Abstraction and Shipped Variants
// ============================================================================

pub mod default_envelope;
pub mod envelope;
pub mod errors;
pub mod traced_envelope;

pub use default_envelope::DefaultEnvelope;
pub use envelope::Envelope;
pub use errors::{EnvelopeError, Representation};
pub use traced_envelope::TracedEnvelope;
