use std::sync::Arc;

use super::core::{Envelope, EnvelopeError};
use super::factory::EnvelopeFactory;
use crate::serialization::{live, Message, Object, ObjectSerializer, SerializedForm};

// ============================================================================
// Message-in-Envelope Serializer
// ============================================================================
//
// Wrapping serializes twice: first the message, then an envelope that holds
// the message in serialized form. The backend therefore never has to walk a
// live message graph inside an envelope, and the message's wire form is fixed
// at wrap time.
//
// Unwrapping reverses this and checks types at both levels:
// 1. the outer object must be the factory's envelope type
// 2. the inner object must be the envelope's declared message type
//
// ============================================================================

pub trait MessageInEnvelopeSerializer: Send + Sync {
    type Envelope: Envelope;

    fn wrap_and_serialize(&self, message: Arc<dyn Object>) -> Result<SerializedForm, EnvelopeError>;

    fn unwrap_and_deserialize(
        &self,
        serialized_envelope: &SerializedForm,
    ) -> Result<Self::Envelope, EnvelopeError>;
}

pub struct StandardMessageInEnvelopeSerializer<F: EnvelopeFactory> {
    envelope_factory: Arc<F>,
    object_serializer: Arc<dyn ObjectSerializer>,
}

impl<F: EnvelopeFactory> StandardMessageInEnvelopeSerializer<F> {
    pub fn new(envelope_factory: Arc<F>, object_serializer: Arc<dyn ObjectSerializer>) -> Self {
        Self {
            envelope_factory,
            object_serializer,
        }
    }

    /// Typed convenience for [`wrap_and_serialize`](MessageInEnvelopeSerializer::wrap_and_serialize).
    pub fn wrap_and_serialize_message<M: Message>(
        &self,
        message: M,
    ) -> Result<SerializedForm, EnvelopeError> {
        self.wrap_and_serialize(live(message))
    }

    pub fn envelope_factory(&self) -> &F {
        &self.envelope_factory
    }
}

impl<F: EnvelopeFactory> MessageInEnvelopeSerializer for StandardMessageInEnvelopeSerializer<F> {
    type Envelope = F::Envelope;

    fn wrap_and_serialize(&self, message: Arc<dyn Object>) -> Result<SerializedForm, EnvelopeError> {
        let serialized_message = self.object_serializer.serialize(message.as_ref())?;

        let envelope = self
            .envelope_factory
            .wrap_message_in_envelope(message)
            .with_serialized_message(serialized_message);

        let serialized_envelope = self.object_serializer.serialize(&envelope)?;

        tracing::debug!(
            message_type = %envelope.message_type(),
            envelope_type = %self.envelope_factory.envelope_type(),
            bytes = serialized_envelope.len(),
            "Wrapped and serialized message"
        );

        Ok(serialized_envelope)
    }

    fn unwrap_and_deserialize(
        &self,
        serialized_envelope: &SerializedForm,
    ) -> Result<F::Envelope, EnvelopeError> {
        let envelope_type = self.envelope_factory.envelope_type();

        let candidate = self
            .object_serializer
            .deserialize(serialized_envelope, envelope_type)?;
        let candidate_type = candidate.object_type();

        let envelope = match candidate.into_any().downcast::<F::Envelope>() {
            Ok(envelope) => *envelope,
            Err(_) => {
                tracing::warn!(
                    expected = %envelope_type,
                    actual = %candidate_type,
                    "Deserialized envelope is not of the expected type"
                );
                return Err(EnvelopeError::TypeMismatch {
                    expected: envelope_type.to_string(),
                    actual: candidate_type.to_string(),
                });
            }
        };

        let message_type = envelope.message_type();
        let message = self
            .object_serializer
            .deserialize(envelope.serialized_message()?, message_type)?;

        if message.object_type() != message_type {
            tracing::warn!(
                expected = %message_type,
                actual = %message.object_type(),
                "Deserialized message is not of the declared type"
            );
            return Err(EnvelopeError::TypeMismatch {
                expected: message_type.to_string(),
                actual: message.object_type().to_string(),
            });
        }

        tracing::debug!(
            message_type = %message_type,
            envelope_type = %envelope_type,
            "Unwrapped and deserialized message"
        );

        Ok(envelope.with_message(Arc::from(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{DefaultEnvelope, DefaultEnvelopeFactory, TracedEnvelopeFactory};
    use crate::serialization::{
        JsonObjectSerializer, JsonSerializerConfig, SerializationError, TypeRegistry,
    };
    use serde::{Deserialize, Serialize};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct DummyMessage {}

    impl Message for DummyMessage {
        fn type_name() -> &'static str {
            "DummyMessage"
        }
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct AnotherDummyMessage {}

    impl Message for AnotherDummyMessage {
        fn type_name() -> &'static str {
            "AnotherDummyMessage"
        }
    }

    /// Stands in for an arbitrary object that is neither an envelope nor a message.
    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct PlainObject {}

    impl Message for PlainObject {
        fn type_name() -> &'static str {
            "PlainObject"
        }
    }

    #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
    struct Transfer {
        from: String,
        to: String,
        cents: u64,
    }

    impl Message for Transfer {
        fn type_name() -> &'static str {
            "Transfer"
        }
    }

    /// Backend returning scripted results and recording what it was asked.
    #[derive(Default)]
    struct ScriptedSerializer {
        serialize_results: Mutex<VecDeque<SerializedForm>>,
        deserialize_results: Mutex<VecDeque<Box<dyn Object>>>,
        serialized_objects: Mutex<Vec<serde_json::Value>>,
        deserialize_calls: Mutex<Vec<(SerializedForm, String)>>,
    }

    impl ScriptedSerializer {
        fn serializing(results: Vec<SerializedForm>) -> Self {
            Self {
                serialize_results: Mutex::new(results.into()),
                ..Self::default()
            }
        }

        fn deserializing(results: Vec<Box<dyn Object>>) -> Self {
            Self {
                deserialize_results: Mutex::new(results.into()),
                ..Self::default()
            }
        }
    }

    impl ObjectSerializer for ScriptedSerializer {
        fn serialize(&self, object: &dyn Object) -> Result<SerializedForm, SerializationError> {
            self.serialized_objects
                .lock()
                .unwrap()
                .push(serde_json::to_value(object)?);
            Ok(self
                .serialize_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected serialize call"))
        }

        fn deserialize(
            &self,
            data: &SerializedForm,
            expected_type: &str,
        ) -> Result<Box<dyn Object>, SerializationError> {
            self.deserialize_calls
                .lock()
                .unwrap()
                .push((data.clone(), expected_type.to_string()));
            Ok(self
                .deserialize_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected deserialize call"))
        }
    }

    /// Produces default envelopes but reports a configurable envelope type.
    struct FixedTypeFactory {
        envelope_type: &'static str,
    }

    impl EnvelopeFactory for FixedTypeFactory {
        type Envelope = DefaultEnvelope;

        fn wrap_message_in_envelope(&self, message: Arc<dyn Object>) -> DefaultEnvelope {
            DefaultEnvelope::for_message(message)
        }

        fn envelope_type(&self) -> &str {
            self.envelope_type
        }
    }

    fn json_backend() -> Arc<JsonObjectSerializer> {
        Arc::new(JsonObjectSerializer::new(
            TypeRegistry::new()
                .with::<DummyMessage>()
                .with::<AnotherDummyMessage>()
                .with::<Transfer>(),
        ))
    }

    #[test]
    fn test_serializes_message_and_wraps_it_in_serialized_envelope() {
        let serialized_message = SerializedForm::from("the serialized message");
        let serialized_envelope = SerializedForm::from("the serialized envelope");
        let backend = Arc::new(ScriptedSerializer::serializing(vec![
            serialized_message,
            serialized_envelope.clone(),
        ]));
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend.clone());

        let actual = serializer.wrap_and_serialize(live(DummyMessage {})).unwrap();

        assert_eq!(actual, serialized_envelope);
        let serialized_objects = backend.serialized_objects.lock().unwrap();
        assert_eq!(serialized_objects.len(), 2);
        assert_eq!(serialized_objects[0], serde_json::json!({}));
        assert_eq!(
            serialized_objects[1],
            serde_json::json!({
                "message_type": "DummyMessage",
                "serialized_message": "the serialized message"
            })
        );
    }

    #[test]
    fn test_deserializes_message_after_unwrapping_it_from_serialized_envelope() {
        let serialized_message = SerializedForm::from("the serialized message");
        let envelope = DefaultEnvelope::for_serialized_message(
            DummyMessage::type_name(),
            serialized_message.clone(),
        );
        let serialized_envelope = SerializedForm::from("the serialized envelope");
        let backend = Arc::new(ScriptedSerializer::deserializing(vec![
            Box::new(envelope.clone()) as Box<dyn Object>,
            Box::new(DummyMessage {}),
        ]));
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend.clone());

        let actual = serializer.unwrap_and_deserialize(&serialized_envelope).unwrap();

        assert_eq!(actual, envelope.with_message(live(DummyMessage {})));
        let calls = backend.deserialize_calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (serialized_envelope, "DefaultEnvelope".to_string()),
                (serialized_message, "DummyMessage".to_string()),
            ]
        );
    }

    #[test]
    fn test_fails_if_deserialized_envelope_is_not_of_expected_type() {
        let serialized_envelope = SerializedForm::from("the serialized envelope");
        let backend = Arc::new(ScriptedSerializer::deserializing(vec![
            Box::new(PlainObject {}) as Box<dyn Object>,
        ]));
        let factory = Arc::new(FixedTypeFactory {
            envelope_type: "The.Envelope.Type",
        });
        let serializer = StandardMessageInEnvelopeSerializer::new(factory, backend.clone());

        let error = serializer.unwrap_and_deserialize(&serialized_envelope).unwrap_err();

        assert!(matches!(
            error,
            EnvelopeError::TypeMismatch { ref expected, ref actual }
                if expected == "The.Envelope.Type" && actual == "PlainObject"
        ));
        // message deserialization never attempted
        assert_eq!(
            *backend.deserialize_calls.lock().unwrap(),
            vec![(serialized_envelope, "The.Envelope.Type".to_string())]
        );
    }

    #[test]
    fn test_fails_if_deserialized_message_is_not_of_expected_type() {
        let envelope = DefaultEnvelope::for_serialized_message(
            DummyMessage::type_name(),
            SerializedForm::from("the serialized message"),
        );
        let backend = Arc::new(ScriptedSerializer::deserializing(vec![
            Box::new(envelope) as Box<dyn Object>,
            Box::new(PlainObject {}),
        ]));
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend.clone());

        let error = serializer
            .unwrap_and_deserialize(&SerializedForm::from("the serialized envelope"))
            .unwrap_err();

        assert!(error.is_type_mismatch());
        assert_eq!(backend.deserialize_calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_fails_if_deserialized_envelope_has_no_serialized_message() {
        let backend = Arc::new(ScriptedSerializer::deserializing(vec![
            Box::new(DefaultEnvelope::for_message(live(DummyMessage {}))) as Box<dyn Object>,
        ]));
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend);

        let error = serializer
            .unwrap_and_deserialize(&SerializedForm::from("the serialized envelope"))
            .unwrap_err();

        assert!(error.is_unavailable_representation());
    }

    #[test]
    fn test_round_trip_through_json_backend() {
        let serializer = StandardMessageInEnvelopeSerializer::new(
            Arc::new(DefaultEnvelopeFactory),
            json_backend(),
        );

        let serialized = serializer.wrap_and_serialize(live(DummyMessage {})).unwrap();
        let envelope = serializer.unwrap_and_deserialize(&serialized).unwrap();

        assert_eq!(envelope.message_type(), "DummyMessage");
        assert!(envelope.message().unwrap().is::<DummyMessage>());
        assert!(!envelope.has_serialized_message());
    }

    #[test]
    fn test_round_trip_preserves_message_value() {
        let serializer = StandardMessageInEnvelopeSerializer::new(
            Arc::new(DefaultEnvelopeFactory),
            json_backend(),
        );
        let transfer = Transfer {
            from: "alice".to_string(),
            to: "bob".to_string(),
            cents: 1250,
        };

        let serialized = serializer.wrap_and_serialize_message(transfer.clone()).unwrap();
        let envelope = serializer.unwrap_and_deserialize(&serialized).unwrap();

        assert_eq!(envelope.message_as::<Transfer>().unwrap(), &transfer);
    }

    #[test]
    fn test_round_trip_with_traced_envelopes() {
        let correlation_id = Uuid::new_v4();
        let serializer = StandardMessageInEnvelopeSerializer::new(
            Arc::new(
                TracedEnvelopeFactory::new()
                    .with_correlation(correlation_id)
                    .with_metadata("service", "ledger"),
            ),
            json_backend(),
        );

        let serialized = serializer.wrap_and_serialize_message(DummyMessage {}).unwrap();
        let envelope = serializer.unwrap_and_deserialize(&serialized).unwrap();

        assert_eq!(envelope.correlation_id(), correlation_id);
        assert_eq!(envelope.metadata().get("service").map(String::as_str), Some("ledger"));
        assert!(envelope.message_as::<DummyMessage>().is_ok());
    }

    #[test]
    fn test_json_backend_rejects_envelope_of_other_variant() {
        let backend = json_backend();
        let producer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend.clone());
        let consumer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(TracedEnvelopeFactory::new()), backend);

        let serialized = producer.wrap_and_serialize_message(DummyMessage {}).unwrap();
        let error = consumer.unwrap_and_deserialize(&serialized).unwrap_err();

        assert!(matches!(
            error,
            EnvelopeError::TypeMismatch { ref expected, ref actual }
                if expected == "TracedEnvelope" && actual == "DefaultEnvelope"
        ));
    }

    #[test]
    fn test_json_backend_rejects_message_of_undeclared_type() {
        let backend = json_backend();
        let inner = backend.serialize(&AnotherDummyMessage {}).unwrap();
        let forged = DefaultEnvelope::for_serialized_message(DummyMessage::type_name(), inner);
        let serialized = backend.serialize(&forged).unwrap();
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend);

        let error = serializer.unwrap_and_deserialize(&serialized).unwrap_err();

        assert!(matches!(
            error,
            EnvelopeError::TypeMismatch { ref expected, ref actual }
                if expected == "DummyMessage" && actual == "AnotherDummyMessage"
        ));
    }

    #[test]
    fn test_unknown_declared_message_type_surfaces_as_serialization_error() {
        let backend = json_backend();
        let inner = SerializedForm::from(r#"{"type":"Unregistered","data":{}}"#);
        let envelope = DefaultEnvelope::for_serialized_message("Unregistered", inner);
        let serialized = backend.serialize(&envelope).unwrap();
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend);

        let error = serializer.unwrap_and_deserialize(&serialized).unwrap_err();

        assert!(matches!(
            error,
            EnvelopeError::Serialization(SerializationError::UnknownType(ref name))
                if name == "Unregistered"
        ));
        assert!(!error.is_type_mismatch());
    }

    #[test]
    fn test_oversized_message_fails_at_wrap_time() {
        let backend = Arc::new(JsonObjectSerializer::with_config(
            TypeRegistry::new().with::<Transfer>(),
            JsonSerializerConfig::compact(),
        ));
        let serializer =
            StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend);
        let transfer = Transfer {
            from: "x".repeat(70 * 1024),
            to: "bob".to_string(),
            cents: 1,
        };

        let error = serializer.wrap_and_serialize_message(transfer).unwrap_err();

        assert!(matches!(
            error,
            EnvelopeError::Serialization(SerializationError::PayloadTooLarge { limit, .. })
                if limit == 64 * 1024
        ));
    }
}
