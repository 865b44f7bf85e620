//! In-memory store implementation
//!
//! Reference implementation of the store traits, used by the test suites
//! and by anything that wants a scratch catalog. All state sits behind a
//! single `RwLock`; `apply_stock_delta` holds the write guard across its
//! check and update, which gives it the per-record atomicity the ledger
//! contract requires.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{Category, Client, Medication, Sale, StockMovement};

use crate::error::{AppError, AppResult};

use super::{
    CatalogStore, CategoryStore, ClientStore, ListFilter, MovementStore, SaleStore,
    StockTransition,
};

#[derive(Default)]
struct State {
    categories: HashMap<Uuid, Category>,
    medications: HashMap<Uuid, Medication>,
    clients: HashMap<Uuid, Client>,
    movements: Vec<StockMovement>,
    sales: Vec<Sale>,
}

/// Thread-safe in-memory store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn insert_category(&self, category: Category) -> AppResult<Category> {
        let mut state = self.state.write().await;
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(categories)
    }

    async fn update_category(&self, category: Category) -> AppResult<Category> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&category.id) {
            return Err(AppError::NotFound("Category".to_string()));
        }
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_medication(&self, medication: Medication) -> AppResult<Medication> {
        let mut state = self.state.write().await;
        state.medications.insert(medication.id, medication.clone());
        Ok(medication)
    }

    async fn get_medication(&self, id: Uuid) -> AppResult<Option<Medication>> {
        let state = self.state.read().await;
        Ok(state.medications.get(&id).cloned())
    }

    async fn list_medications(&self, filter: ListFilter) -> AppResult<Vec<Medication>> {
        let state = self.state.read().await;
        let mut medications: Vec<_> = state
            .medications
            .values()
            .filter(|m| match filter {
                ListFilter::All => m.status != shared::models::MedicationStatus::Removed,
                ListFilter::ActiveOnly => m.is_active(),
            })
            .cloned()
            .collect();
        medications.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(medications)
    }

    async fn update_medication(&self, medication: Medication) -> AppResult<Medication> {
        let mut state = self.state.write().await;
        if !state.medications.contains_key(&medication.id) {
            return Err(AppError::NotFound("Medication".to_string()));
        }
        state.medications.insert(medication.id, medication.clone());
        Ok(medication)
    }

    async fn apply_stock_delta(&self, id: Uuid, delta: i32) -> AppResult<StockTransition> {
        // Write guard held across check and update: concurrent deltas on the
        // same medication serialize here, so two outbound movements can never
        // both read the same quantity_before.
        let mut state = self.state.write().await;
        let medication = state
            .medications
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))?;

        let before = medication.stock_quantity;
        let after = before.checked_add(delta).ok_or_else(|| {
            AppError::validation(
                "quantity",
                "Stock quantity out of range",
                "Quantidade de estoque fora do intervalo",
            )
        })?;

        if after < 0 {
            return Err(AppError::InsufficientStock {
                medication_id: id,
                medication_name: medication.display_name(),
                available: before,
                requested: delta.unsigned_abs() as i32,
            });
        }

        medication.stock_quantity = after;
        medication.updated_at = Utc::now();

        Ok(StockTransition {
            medication_id: id,
            medication_name: medication.display_name(),
            status: medication.status,
            quantity_before: before,
            quantity_after: after,
        })
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn insert_client(&self, client: Client) -> AppResult<Client> {
        let mut state = self.state.write().await;
        state.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn get_client(&self, id: Uuid) -> AppResult<Option<Client>> {
        let state = self.state.read().await;
        Ok(state.clients.get(&id).cloned())
    }

    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        let state = self.state.read().await;
        let mut clients: Vec<_> = state.clients.values().cloned().collect();
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    async fn update_client(&self, client: Client) -> AppResult<Client> {
        let mut state = self.state.write().await;
        if !state.clients.contains_key(&client.id) {
            return Err(AppError::NotFound("Client".to_string()));
        }
        state.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn delete_client(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.clients.remove(&id).is_some())
    }

    async fn find_client_by_cpf(&self, cpf: &str) -> AppResult<Option<Client>> {
        let state = self.state.read().await;
        Ok(state.clients.values().find(|c| c.cpf == cpf).cloned())
    }
}

#[async_trait]
impl MovementStore for InMemoryStore {
    async fn append_movement(&self, movement: StockMovement) -> AppResult<StockMovement> {
        let mut state = self.state.write().await;
        state.movements.push(movement.clone());
        Ok(movement)
    }

    async fn list_movements(&self) -> AppResult<Vec<StockMovement>> {
        let state = self.state.read().await;
        Ok(state.movements.iter().rev().cloned().collect())
    }

    async fn list_movements_for(&self, medication_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let state = self.state.read().await;
        Ok(state
            .movements
            .iter()
            .rev()
            .filter(|m| m.medication_id == medication_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SaleStore for InMemoryStore {
    async fn insert_sale(&self, sale: Sale) -> AppResult<Sale> {
        let mut state = self.state.write().await;
        state.sales.push(sale.clone());
        Ok(sale)
    }

    async fn get_sale(&self, id: Uuid) -> AppResult<Option<Sale>> {
        let state = self.state.read().await;
        Ok(state.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sales(&self) -> AppResult<Vec<Sale>> {
        let state = self.state.read().await;
        Ok(state.sales.iter().rev().cloned().collect())
    }

    async fn list_sales_by_client(&self, client_id: Uuid) -> AppResult<Vec<Sale>> {
        let state = self.state.read().await;
        Ok(state
            .sales
            .iter()
            .rev()
            .filter(|s| s.client_id == Some(client_id))
            .cloned()
            .collect())
    }
}
