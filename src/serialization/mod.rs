// ============================================================================
// Object Serialization
// ============================================================================
//
// Backend-agnostic object model (core) and the shipped JSON backend.
//
// ============================================================================

mod backend;
mod core;

pub use self::backend::*;
pub use self::core::*;
