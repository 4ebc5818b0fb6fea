use std::collections::HashMap;
use std::fmt;

use crate::envelope::{DefaultEnvelope, TracedEnvelope};
use crate::serialization::core::{Message, Object, SerializationError};

// ============================================================================
// Type Registry - Type Names to Decoders
// ============================================================================
//
// Backends cannot reflect a type out of a name, so every type that may be
// rebuilt from its serialized form is registered here up front.
//
// ============================================================================

type DecodeFn = for<'de> fn(
    &mut dyn erased_serde::Deserializer<'de>,
) -> Result<Box<dyn Object>, erased_serde::Error>;

fn decode_as<M: Message>(
    deserializer: &mut dyn erased_serde::Deserializer<'_>,
) -> Result<Box<dyn Object>, erased_serde::Error> {
    let message: M = erased_serde::deserialize(deserializer)?;
    Ok(Box::new(message))
}

#[derive(Clone)]
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    /// Registry with the shipped envelope types already registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<DefaultEnvelope>()
            .register::<TracedEnvelope>();
        registry
    }

    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register `M` under `M::type_name()`. A later registration under the
    /// same name replaces the earlier one.
    pub fn register<M: Message>(&mut self) -> &mut Self {
        let type_name = M::type_name();
        if self.decoders.insert(type_name, decode_as::<M>).is_some() {
            tracing::warn!(type_name = %type_name, "Replaced existing decoder registration");
        } else {
            tracing::debug!(type_name = %type_name, "Registered decoder");
        }
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with<M: Message>(mut self) -> Self {
        self.register::<M>();
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn decode<'de>(
        &self,
        type_name: &str,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Box<dyn Object>, SerializationError> {
        let decode = self
            .decoders
            .get(type_name)
            .ok_or_else(|| SerializationError::UnknownType(type_name.to_string()))?;

        Ok(decode(deserializer)?)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.type_names().collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}
