use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dtesv_core::AggregateId;

use crate::event::Event;

/// Envelope for an event, containing stream metadata.
///
/// This is the unit a host persists next to the document record (its audit
/// trail). `sequence_number` is monotonically increasing per aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    aggregate_id: AggregateId,
    aggregate_type: String,

    /// Monotonically increasing position in the aggregate stream.
    sequence_number: u64,

    event_type: String,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        event_type: impl Into<String>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            event_type: event_type.into(),
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
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

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event; both type names come from the event itself.
    pub fn wrap(aggregate_id: AggregateId, sequence_number: u64, payload: E) -> Self {
        Self::new(
            Uuid::new_v4(),
            aggregate_id,
            payload.aggregate_type(),
            sequence_number,
            payload.event_type(),
            payload,
        )
    }
}

impl<E: Serialize> EventEnvelope<E> {
    /// Erase the payload type (for hosts storing events as JSON).
    pub fn to_json(&self) -> Result<EventEnvelope<serde_json::Value>, serde_json::Error> {
        Ok(EventEnvelope {
            event_id: self.event_id,
            aggregate_id: self.aggregate_id,
            aggregate_type: self.aggregate_type.clone(),
            sequence_number: self.sequence_number,
            event_type: self.event_type.clone(),
            payload: serde_json::to_value(&self.payload)?,
        })
    }
}
