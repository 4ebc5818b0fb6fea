// ============================================================================
// Serialization Core - Backend-Agnostic Abstractions
// ============================================================================
//
// Nothing in here knows about a concrete wire format. Backends implement
// `ObjectSerializer`; messages implement `Message`.
//
// ============================================================================

pub mod error;
pub mod object;
pub mod object_serializer;
pub mod serialized_form;

pub use error::SerializationError;
pub use object::{live, Message, Object};
pub use object_serializer::ObjectSerializer;
pub use serialized_form::SerializedForm;
