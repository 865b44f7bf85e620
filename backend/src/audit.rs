//! Audit event emission
//!
//! Every successful mutation notifies an audit collaborator. Delivery is
//! fire-and-forget by construction: `record` is infallible, so a broken
//! sink can never fail the operation that produced the event.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{MedicationStatus, MovementKind};

/// Events emitted after successful mutations
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    MedicationCreated {
        medication_id: Uuid,
        name: String,
    },
    MedicationUpdated {
        medication_id: Uuid,
    },
    MedicationStatusChanged {
        medication_id: Uuid,
        status: MedicationStatus,
    },
    CategoryCreated {
        category_id: Uuid,
        name: String,
    },
    CategoryDeleted {
        category_id: Uuid,
    },
    ClientCreated {
        client_id: Uuid,
    },
    ClientUpdated {
        client_id: Uuid,
    },
    ClientDeleted {
        client_id: Uuid,
    },
    StockMovementRecorded {
        movement_id: Uuid,
        medication_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        quantity_after: i32,
    },
    SaleCreated {
        sale_id: Uuid,
        client_id: Option<Uuid>,
        item_count: usize,
        total_amount: Decimal,
    },
}

/// Audit collaborator interface
pub trait AuditSink: Send + Sync {
    /// Record an event. Must not block or fail the calling operation.
    fn record(&self, event: AuditEvent);
}

/// Sink that emits structured `tracing` events with a JSON payload
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::info!(target: "audit", %payload, "audit event"),
            Err(err) => {
                tracing::warn!(target: "audit", error = %err, "unserializable audit event")
            }
        }
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Default)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Shared handle type used by the services
pub type SharedAuditSink = Arc<dyn AuditSink>;
