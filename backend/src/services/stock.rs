//! Stock ledger service
//!
//! The single authority over stock quantities: every increment and
//! decrement in the system (manual entrada/saída and the per-line
//! decrements of a sale) goes through [`StockService::apply_movement`].
//! Nothing else writes `stock_quantity`.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{MedicationStatus, MovementKind, StockMovement};
use shared::validation;

use crate::audit::{AuditEvent, SharedAuditSink};
use crate::error::{AppError, AppResult};
use crate::store::{CatalogStore, MovementStore};

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    catalog: Arc<dyn CatalogStore>,
    movements: Arc<dyn MovementStore>,
    audit: SharedAuditSink,
}

/// Outcome of a recorded movement
///
/// Restates the medication's name, status and stock presence so callers
/// never need a second round-trip to learn the resulting state.
#[derive(Debug, Clone, Serialize)]
pub struct MovementReceipt {
    pub movement: StockMovement,
    pub medication_name: String,
    pub status: MedicationStatus,
    pub in_stock: bool,
}

impl StockService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        movements: Arc<dyn MovementStore>,
        audit: SharedAuditSink,
    ) -> Self {
        Self {
            catalog,
            movements,
            audit,
        }
    }

    /// Record a stock movement
    ///
    /// The non-negativity check happens inside the store's atomic delta,
    /// not here: a rejected saída leaves the stock level untouched.
    /// Movements may target inactive medications; status is restated in
    /// the receipt.
    pub async fn apply_movement(
        &self,
        medication_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        note: Option<String>,
    ) -> AppResult<MovementReceipt> {
        validation::validate_movement_quantity(quantity).map_err(|msg| {
            AppError::validation("quantity", msg, "Quantidade deve ser maior que zero")
        })?;
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(note) = &note {
            validation::validate_note(note).map_err(|msg| {
                AppError::validation("note", msg, "Observação deve ter no máximo 500 caracteres")
            })?;
        }

        let delta = match kind {
            MovementKind::Entrada => quantity,
            MovementKind::Saida => -quantity,
        };
        let transition = self.catalog.apply_stock_delta(medication_id, delta).await?;

        let movement = StockMovement {
            id: Uuid::new_v4(),
            medication_id,
            kind,
            quantity,
            quantity_before: transition.quantity_before,
            quantity_after: transition.quantity_after,
            moved_at: Utc::now(),
            note,
        };
        let movement = self.movements.append_movement(movement).await?;

        tracing::info!(
            medication_id = %medication_id,
            kind = %kind,
            quantity,
            quantity_after = movement.quantity_after,
            "stock movement recorded"
        );
        self.audit.record(AuditEvent::StockMovementRecorded {
            movement_id: movement.id,
            medication_id,
            kind,
            quantity,
            quantity_after: movement.quantity_after,
        });

        Ok(MovementReceipt {
            medication_name: transition.medication_name,
            status: transition.status,
            in_stock: transition.quantity_after > 0,
            movement,
        })
    }

    /// Record an inbound movement
    pub async fn entrada(
        &self,
        medication_id: Uuid,
        quantity: i32,
        note: Option<String>,
    ) -> AppResult<MovementReceipt> {
        self.apply_movement(medication_id, MovementKind::Entrada, quantity, note)
            .await
    }

    /// Record an outbound movement
    pub async fn saida(
        &self,
        medication_id: Uuid,
        quantity: i32,
        note: Option<String>,
    ) -> AppResult<MovementReceipt> {
        self.apply_movement(medication_id, MovementKind::Saida, quantity, note)
            .await
    }

    /// Full movement history, newest first
    pub async fn movements(&self) -> AppResult<Vec<StockMovement>> {
        self.movements.list_movements().await
    }

    /// Movement history of one medication, newest first
    pub async fn movements_for(&self, medication_id: Uuid) -> AppResult<Vec<StockMovement>> {
        if self.catalog.get_medication(medication_id).await?.is_none() {
            return Err(AppError::NotFound("Medication".to_string()));
        }
        self.movements.list_movements_for(medication_id).await
    }

    /// Current stock level of one medication
    pub async fn stock_of(&self, medication_id: Uuid) -> AppResult<i32> {
        self.catalog
            .get_medication(medication_id)
            .await?
            .map(|m| m.stock_quantity)
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))
    }
}
