//! Stock ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the free-text note attached to a movement
pub const MAX_MOVEMENT_NOTE_LEN: usize = 500;

/// Direction of a stock movement
///
/// The wire spelling keeps the domain vocabulary: `ENTRADA` (inbound)
/// and `SAIDA` (outbound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAIDA")]
    Saida,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entrada => "ENTRADA",
            MovementKind::Saida => "SAIDA",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, append-only ledger entry recording one stock change
///
/// Both the quantity before and after the movement are snapshotted, so
/// the ledger can be audited without replaying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub moved_at: DateTime<Utc>,
    pub note: Option<String>,
}
