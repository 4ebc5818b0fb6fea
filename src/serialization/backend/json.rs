use serde::{Deserialize, Serialize};

use super::config::JsonSerializerConfig;
use super::registry::TypeRegistry;
use crate::serialization::core::{Object, ObjectSerializer, SerializationError, SerializedForm};

// ============================================================================
// JSON Object Serializer - Reference Backend
// ============================================================================
//
// Wire form:
//
//   {"type": "<registered type name>", "data": <serde representation>}
//
// The embedded type name is authoritative: an object is only rebuilt when the
// name in the payload equals the type the caller expects.
//
// ============================================================================

#[derive(Serialize)]
struct TaggedObjectRef<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    data: &'a dyn Object,
}

#[derive(Deserialize)]
struct TaggedObject {
    #[serde(rename = "type")]
    type_name: String,
    data: serde_json::Value,
}

#[derive(Clone, Debug)]
pub struct JsonObjectSerializer {
    registry: TypeRegistry,
    config: JsonSerializerConfig,
}

impl JsonObjectSerializer {
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, JsonSerializerConfig::default())
    }

    pub fn with_config(registry: TypeRegistry, config: JsonSerializerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &JsonSerializerConfig {
        &self.config
    }
}

impl ObjectSerializer for JsonObjectSerializer {
    fn serialize(&self, object: &dyn Object) -> Result<SerializedForm, SerializationError> {
        let tagged = TaggedObjectRef {
            type_name: object.object_type(),
            data: object,
        };

        let json = if self.config.pretty {
            serde_json::to_string_pretty(&tagged)?
        } else {
            serde_json::to_string(&tagged)?
        };

        if json.len() > self.config.max_input_bytes {
            tracing::warn!(
                type_name = %tagged.type_name,
                size = json.len(),
                limit = self.config.max_input_bytes,
                "Serialized object exceeds size limit"
            );
            return Err(SerializationError::PayloadTooLarge {
                size: json.len(),
                limit: self.config.max_input_bytes,
            });
        }

        tracing::trace!(
            type_name = %tagged.type_name,
            bytes = json.len(),
            "Serialized object"
        );

        Ok(SerializedForm::Text(json))
    }

    fn deserialize(
        &self,
        data: &SerializedForm,
        expected_type: &str,
    ) -> Result<Box<dyn Object>, SerializationError> {
        if data.len() > self.config.max_input_bytes {
            return Err(SerializationError::PayloadTooLarge {
                size: data.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let tagged: TaggedObject = serde_json::from_slice(data.as_bytes())?;

        if tagged.type_name != expected_type {
            tracing::warn!(
                expected = %expected_type,
                actual = %tagged.type_name,
                "Serialized object is not of the expected type"
            );
            return Err(SerializationError::TypeMismatch {
                expected: expected_type.to_string(),
                actual: tagged.type_name,
            });
        }

        let mut deserializer = <dyn erased_serde::Deserializer>::erase(tagged.data);
        let object = self.registry.decode(&tagged.type_name, &mut deserializer)?;

        tracing::trace!(type_name = %tagged.type_name, "Deserialized object");

        Ok(object)
    }
}
