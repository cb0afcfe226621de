use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shipforge_core::AggregateId;

use crate::event::Event;

/// Envelope for an event, containing stream metadata.
///
/// This is the unit a stock ledger hands to persistence.
///
/// - `sequence_number` is monotonically increasing per aggregate stream,
///   starting at 1.
/// - `event_type` is copied from the payload so consumers can route without
///   deserializing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    event_type: String,

    aggregate_id: AggregateId,
    aggregate_type: String,

    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        event_type: impl Into<String>,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap an event emitted by an aggregate at stream position `sequence_number`.
    pub fn wrap(
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self::new(
            Uuid::now_v7(),
            payload.event_type(),
            aggregate_id,
            aggregate_type,
            sequence_number,
            payload,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Pinged {
        at: DateTime<Utc>,
    }

    impl Event for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn wrap_copies_event_type_and_position() {
        let aggregate_id = AggregateId::from_u128(9);
        let env = EventEnvelope::wrap(aggregate_id, "test", 3, Pinged { at: Utc::now() });

        assert_eq!(env.event_type(), "test.pinged");
        assert_eq!(env.aggregate_id(), aggregate_id);
        assert_eq!(env.aggregate_type(), "test");
        assert_eq!(env.sequence_number(), 3);
    }

    #[test]
    fn envelope_serializes_payload_inline() {
        let env = EventEnvelope::wrap(AggregateId::from_u128(1), "test", 1, Pinged { at: Utc::now() });
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["event_type"], "test.pinged");
        assert!(json["payload"]["at"].is_string());

        let back: EventEnvelope<Pinged> = serde_json::from_value(json).unwrap();
        assert_eq!(back, env);
    }
}
