//! Store abstractions over durable persistence
//!
//! The engine depends on these traits only; the embedding system supplies
//! the durable implementation (a database, a remote service). Each trait
//! covers one record family. `InMemoryStore` is the in-process reference
//! implementation used by the test suites.
//!
//! The one hard requirement on implementations is single-record atomicity
//! of [`CatalogStore::apply_stock_delta`]: the read, the non-negativity
//! check and the write must happen as one step (row lock, compare-and-set),
//! because it is the authoritative guard against stock going negative.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use shared::models::{Category, Client, Medication, MedicationStatus, Sale, StockMovement};

use crate::error::AppResult;

/// Catalog listing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    /// Active and inactive entries; soft-removed ones stay hidden
    All,
    #[default]
    ActiveOnly,
}

/// Result of an atomic stock adjustment
#[derive(Debug, Clone)]
pub struct StockTransition {
    pub medication_id: Uuid,
    pub medication_name: String,
    pub status: MedicationStatus,
    pub quantity_before: i32,
    pub quantity_after: i32,
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, category: Category) -> AppResult<Category>;
    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>>;
    async fn list_categories(&self) -> AppResult<Vec<Category>>;
    /// Replace the stored record with the same id; fails if absent
    async fn update_category(&self, category: Category) -> AppResult<Category>;
    /// Returns false when no such category existed
    async fn delete_category(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_medication(&self, medication: Medication) -> AppResult<Medication>;
    /// Resolves soft-removed records too, so history never dangles
    async fn get_medication(&self, id: Uuid) -> AppResult<Option<Medication>>;
    async fn list_medications(&self, filter: ListFilter) -> AppResult<Vec<Medication>>;
    /// Replace the stored record with the same id; fails if absent
    async fn update_medication(&self, medication: Medication) -> AppResult<Medication>;

    /// Atomically adjust a medication's stock level by `delta`.
    ///
    /// Fails without mutating when the medication is unknown or the delta
    /// would drive the stock below zero. This is the single enforcement
    /// point of the no-negative-stock invariant.
    async fn apply_stock_delta(&self, id: Uuid, delta: i32) -> AppResult<StockTransition>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, client: Client) -> AppResult<Client>;
    async fn get_client(&self, id: Uuid) -> AppResult<Option<Client>>;
    async fn list_clients(&self) -> AppResult<Vec<Client>>;
    /// Replace the stored record with the same id; fails if absent
    async fn update_client(&self, client: Client) -> AppResult<Client>;
    /// Returns false when no such client existed
    async fn delete_client(&self, id: Uuid) -> AppResult<bool>;
    /// Lookup by canonical 11-digit CPF
    async fn find_client_by_cpf(&self, cpf: &str) -> AppResult<Option<Client>>;
}

#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn append_movement(&self, movement: StockMovement) -> AppResult<StockMovement>;
    /// All movements, newest first
    async fn list_movements(&self) -> AppResult<Vec<StockMovement>>;
    /// Movements of one medication, newest first
    async fn list_movements_for(&self, medication_id: Uuid) -> AppResult<Vec<StockMovement>>;
}

#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn insert_sale(&self, sale: Sale) -> AppResult<Sale>;
    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>>;
    /// All sales, newest first
    async fn list_sales(&self) -> AppResult<Vec<Sale>>;
    async fn list_sales_by_client(&self, client_id: Uuid) -> AppResult<Vec<Sale>>;
}

/// The full set of store handles the engine is assembled over
#[derive(Clone)]
pub struct Stores {
    pub categories: std::sync::Arc<dyn CategoryStore>,
    pub catalog: std::sync::Arc<dyn CatalogStore>,
    pub clients: std::sync::Arc<dyn ClientStore>,
    pub movements: std::sync::Arc<dyn MovementStore>,
    pub sales: std::sync::Arc<dyn SaleStore>,
}

impl Stores {
    /// One shared in-memory store behind every trait
    pub fn in_memory() -> Self {
        let store = std::sync::Arc::new(InMemoryStore::new());
        Self {
            categories: store.clone(),
            catalog: store.clone(),
            clients: store.clone(),
            movements: store.clone(),
            sales: store,
        }
    }
}
