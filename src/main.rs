use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use message_envelope::{
    DefaultEnvelopeFactory, Envelope, JsonObjectSerializer, JsonSerializerConfig, Message,
    MessageInEnvelopeSerializer, StandardMessageInEnvelopeSerializer, TracedEnvelopeFactory,
    TypeRegistry,
};

// ============================================================================
// Demo Messages
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct OrderItem {
    product_id: Uuid,
    quantity: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct OrderCreated {
    order_id: Uuid,
    customer_id: Uuid,
    items: Vec<OrderItem>,
}

impl Message for OrderCreated {
    fn type_name() -> &'static str {
        "OrderCreated"
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct OrderCancelled {
    order_id: Uuid,
    reason: Option<String>,
}

impl Message for OrderCancelled {
    fn type_name() -> &'static str {
        "OrderCancelled"
    }
}

fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=trace cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,message_envelope=debug")),
        )
        .init();

    tracing::info!("Starting message envelope demo");

    // === 1. Backend with every message type registered ===
    let registry = TypeRegistry::new()
        .with::<OrderCreated>()
        .with::<OrderCancelled>();
    let backend = Arc::new(JsonObjectSerializer::with_config(
        registry,
        JsonSerializerConfig::compact(),
    ));

    // === 2. Default envelopes ===
    let serializer =
        StandardMessageInEnvelopeSerializer::new(Arc::new(DefaultEnvelopeFactory), backend.clone());

    let order_id = Uuid::new_v4();
    let created = OrderCreated {
        order_id,
        customer_id: Uuid::new_v4(),
        items: vec![
            OrderItem {
                product_id: Uuid::new_v4(),
                quantity: 2,
            },
            OrderItem {
                product_id: Uuid::new_v4(),
                quantity: 1,
            },
        ],
    };

    let serialized = serializer.wrap_and_serialize_message(created.clone())?;
    tracing::info!(envelope = %serialized, "Wrapped order in default envelope");

    let envelope = serializer.unwrap_and_deserialize(&serialized)?;
    let restored = envelope.message_as::<OrderCreated>()?;
    anyhow::ensure!(restored == &created, "round trip changed the message");
    tracing::info!(
        message_type = %envelope.message_type(),
        items = restored.items.len(),
        "✅ Unwrapped order"
    );

    // === 3. Traced envelopes sharing one correlation id ===
    let correlation_id = Uuid::new_v4();
    let traced = StandardMessageInEnvelopeSerializer::new(
        Arc::new(
            TracedEnvelopeFactory::new()
                .with_correlation(correlation_id)
                .with_metadata("service", "envelope-demo"),
        ),
        backend,
    );

    let serialized = traced.wrap_and_serialize_message(OrderCancelled {
        order_id,
        reason: Some("Customer requested cancellation".to_string()),
    })?;
    let envelope = traced.unwrap_and_deserialize(&serialized)?;
    tracing::info!(
        message_type = %envelope.message_type(),
        envelope_id = %envelope.envelope_id(),
        correlation_id = %envelope.correlation_id(),
        "✅ Unwrapped traced cancellation"
    );

    // === 4. A consumer expecting another envelope variant rejects the payload ===
    let default_payload = serializer.wrap_and_serialize_message(created)?;
    match traced.unwrap_and_deserialize(&default_payload) {
        Ok(_) => anyhow::bail!("traced consumer accepted a default envelope"),
        Err(e) => tracing::info!(error = %e, "Rejected envelope of the wrong variant"),
    }

    tracing::info!("🎉 Demo complete!");

    Ok(())
}
