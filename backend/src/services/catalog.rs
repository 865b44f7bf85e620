//! Catalog service for medications and categories
//!
//! Owns the Medication and Category lifecycle. Stock levels are read here
//! but only ever mutated through the stock ledger.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Category, Medication, MedicationStatus};
use shared::validation;

use crate::audit::{AuditEvent, SharedAuditSink};
use crate::error::{AppError, AppResult};
use crate::store::{CatalogStore, CategoryStore, ListFilter};

/// Catalog service managing medications and their categories
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    categories: Arc<dyn CategoryStore>,
    audit: SharedAuditSink,
}

/// Input for creating a medication
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub expiry_date: NaiveDate,
    pub category_id: Uuid,
}

/// Partial medication update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub expiry_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial category update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        categories: Arc<dyn CategoryStore>,
        audit: SharedAuditSink,
    ) -> Self {
        Self {
            store,
            categories,
            audit,
        }
    }

    // ------------------------------------------------------------------
    // Medications
    // ------------------------------------------------------------------

    pub async fn get(&self, id: Uuid) -> AppResult<Medication> {
        self.store
            .get_medication(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))
    }

    pub async fn list(&self, filter: ListFilter) -> AppResult<Vec<Medication>> {
        self.store.list_medications(filter).await
    }

    pub async fn create(&self, input: NewMedication) -> AppResult<Medication> {
        validation::validate_name(&input.name).map_err(|msg| {
            AppError::validation("name", msg, "Nome do medicamento é obrigatório")
        })?;
        validation::validate_price(input.price)
            .map_err(|msg| AppError::validation("price", msg, "Preço não pode ser negativo"))?;
        validation::validate_stock_quantity(input.stock_quantity).map_err(|msg| {
            AppError::validation("stock_quantity", msg, "Estoque não pode ser negativo")
        })?;
        self.require_category(input.category_id).await?;

        let now = Utc::now();
        let medication = Medication {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            dosage: input.dosage.trim().to_string(),
            description: input.description,
            price: input.price,
            stock_quantity: input.stock_quantity,
            expiry_date: input.expiry_date,
            status: MedicationStatus::Active,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };

        let medication = self.store.insert_medication(medication).await?;
        tracing::info!(medication_id = %medication.id, name = %medication.name, "medication created");
        self.audit.record(AuditEvent::MedicationCreated {
            medication_id: medication.id,
            name: medication.name.clone(),
        });
        Ok(medication)
    }

    pub async fn update(&self, id: Uuid, input: MedicationUpdate) -> AppResult<Medication> {
        let mut medication = self.get(id).await?;

        if let Some(name) = input.name {
            validation::validate_name(&name).map_err(|msg| {
                AppError::validation("name", msg, "Nome do medicamento é obrigatório")
            })?;
            medication.name = name.trim().to_string();
        }
        if let Some(dosage) = input.dosage {
            medication.dosage = dosage.trim().to_string();
        }
        if let Some(description) = input.description {
            medication.description = Some(description);
        }
        if let Some(price) = input.price {
            validation::validate_price(price)
                .map_err(|msg| AppError::validation("price", msg, "Preço não pode ser negativo"))?;
            medication.price = price;
        }
        if let Some(stock_quantity) = input.stock_quantity {
            validation::validate_stock_quantity(stock_quantity).map_err(|msg| {
                AppError::validation("stock_quantity", msg, "Estoque não pode ser negativo")
            })?;
            medication.stock_quantity = stock_quantity;
        }
        if let Some(expiry_date) = input.expiry_date {
            medication.expiry_date = expiry_date;
        }
        if let Some(category_id) = input.category_id {
            self.require_category(category_id).await?;
            medication.category_id = category_id;
        }

        medication.updated_at = Utc::now();
        let medication = self.store.update_medication(medication).await?;
        tracing::info!(medication_id = %medication.id, "medication updated");
        self.audit.record(AuditEvent::MedicationUpdated {
            medication_id: medication.id,
        });
        Ok(medication)
    }

    /// Flip a medication between active and inactive
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Medication> {
        let mut medication = self.get(id).await?;
        if medication.status == MedicationStatus::Removed {
            return Err(AppError::Conflict {
                resource: "Medication".to_string(),
                message: "Medication has been removed from the catalog".to_string(),
                message_pt: "Medicamento foi excluído do catálogo".to_string(),
            });
        }

        medication.status = if active {
            MedicationStatus::Active
        } else {
            MedicationStatus::Inactive
        };
        medication.updated_at = Utc::now();

        let medication = self.store.update_medication(medication).await?;
        tracing::info!(medication_id = %medication.id, status = %medication.status, "medication status changed");
        self.audit.record(AuditEvent::MedicationStatusChanged {
            medication_id: medication.id,
            status: medication.status,
        });
        Ok(medication)
    }

    /// Soft-remove a medication. The record stays resolvable by id so
    /// historical sales and movements keep their references.
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut medication = self.get(id).await?;
        medication.status = MedicationStatus::Removed;
        medication.updated_at = Utc::now();
        let medication = self.store.update_medication(medication).await?;
        tracing::info!(medication_id = %medication.id, "medication removed");
        self.audit.record(AuditEvent::MedicationStatusChanged {
            medication_id: medication.id,
            status: medication.status,
        });
        Ok(())
    }

    async fn require_category(&self, id: Uuid) -> AppResult<Category> {
        match self.categories.get_category(id).await? {
            Some(category) => Ok(category),
            None => Err(AppError::validation(
                "category_id",
                "Unknown category",
                "Categoria desconhecida",
            )),
        }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn create_category(&self, input: NewCategory) -> AppResult<Category> {
        validation::validate_name(&input.name)
            .map_err(|msg| AppError::validation("name", msg, "Nome da categoria é obrigatório"))?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };

        let category = self.categories.insert_category(category).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        self.audit.record(AuditEvent::CategoryCreated {
            category_id: category.id,
            name: category.name.clone(),
        });
        Ok(category)
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.categories
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.categories.list_categories().await
    }

    pub async fn update_category(&self, id: Uuid, input: CategoryUpdate) -> AppResult<Category> {
        let mut category = self.get_category(id).await?;

        if let Some(name) = input.name {
            validation::validate_name(&name).map_err(|msg| {
                AppError::validation("name", msg, "Nome da categoria é obrigatório")
            })?;
            category.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }

        category.updated_at = Utc::now();
        self.categories.update_category(category).await
    }

    /// Delete a category. Refused while any non-removed medication still
    /// references it.
    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        let in_use = self
            .store
            .list_medications(ListFilter::All)
            .await?
            .iter()
            .any(|m| m.category_id == id);
        if in_use {
            return Err(AppError::Conflict {
                resource: "Category".to_string(),
                message: "Category is still referenced by medications".to_string(),
                message_pt: "Categoria ainda é referenciada por medicamentos".to_string(),
            });
        }

        if !self.categories.delete_category(id).await? {
            return Err(AppError::NotFound("Category".to_string()));
        }
        tracing::info!(category_id = %id, "category deleted");
        self.audit
            .record(AuditEvent::CategoryDeleted { category_id: id });
        Ok(())
    }
}
