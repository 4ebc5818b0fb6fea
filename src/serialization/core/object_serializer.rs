use super::error::SerializationError;
use super::object::Object;
use super::serialized_form::SerializedForm;

/// Backend that turns objects into a serialized form and back.
///
/// `deserialize` must return `SerializationError::TypeMismatch` when the
/// reconstructed object is not of `expected_type`.
pub trait ObjectSerializer: Send + Sync {
    fn serialize(&self, object: &dyn Object) -> Result<SerializedForm, SerializationError>;

    fn deserialize(
        &self,
        data: &SerializedForm,
        expected_type: &str,
    ) -> Result<Box<dyn Object>, SerializationError>;
}
