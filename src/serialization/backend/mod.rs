// ============================================================================
// Serialization Backends
// ============================================================================
//
// Concrete `ObjectSerializer` implementations and the type registry they
// decode through.
//
// ============================================================================

pub mod config;
pub mod json;
pub mod registry;

pub use config::JsonSerializerConfig;
pub use json::JsonObjectSerializer;
pub use registry::TypeRegistry;
