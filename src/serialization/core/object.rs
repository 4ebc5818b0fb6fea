use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

// ============================================================================
// Object Model - Type-Erased Live Messages
// ============================================================================
//
// Live messages travel through envelopes as `dyn Object`. Every concrete
// message type carries an explicit, registered type name; that name is what
// gets written to the wire and what deserialization is checked against.
//
// ============================================================================

/// A concrete message type that can travel inside an envelope.
///
/// `type_name()` must be unique among the types registered with a
/// [`TypeRegistry`](crate::serialization::TypeRegistry).
pub trait Message:
    Serialize + DeserializeOwned + Debug + Clone + PartialEq + Send + Sync + 'static
{
    fn type_name() -> &'static str
    where
        Self: Sized;
}

/// Type-erased view of a [`Message`].
///
/// Implemented automatically for every `Message`.
pub trait Object: erased_serde::Serialize + Debug + Send + Sync + 'static {
    /// Registered type name of the concrete type behind this object.
    fn object_type(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Structural equality across the type erasure. Objects of different
    /// concrete types are never equal.
    fn dyn_eq(&self, other: &dyn Object) -> bool;
}

impl<M: Message> Object for M {
    fn object_type(&self) -> &'static str {
        M::type_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn dyn_eq(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<M>()
            .is_some_and(|other| other == self)
    }
}

erased_serde::serialize_trait_object!(Object);

impl PartialEq for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

impl dyn Object {
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    pub fn is<M: Message>(&self) -> bool {
        self.as_any().is::<M>()
    }
}

/// Share a concrete message as a live envelope payload.
pub fn live<M: Message>(message: M) -> Arc<dyn Object> {
    Arc::new(message)
}
