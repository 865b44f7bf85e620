//! Sales transaction composer
//!
//! Builds a candidate sale as an in-memory cart, validates it against the
//! catalog and the client registry, and on commit routes every line-item
//! decrement through the stock ledger before persisting the sale.
//!
//! A cart is a client-side draft: abandoning one without committing has no
//! effect on stored state. Commit applies lines in cart order and does not
//! roll earlier lines back if a later one fails; the transactional
//! boundary around a whole commit belongs to the embedding system.

use std::sync::Arc;

use chrono::{Local, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{Sale, SaleItem};
use shared::validation;

use crate::audit::{AuditEvent, SharedAuditSink};
use crate::config::SalesConfig;
use crate::error::{AppError, AppResult};
use crate::services::stock::StockService;
use crate::store::{CatalogStore, ClientStore, SaleStore};

/// Draft line in a cart
///
/// Name and price here are display snapshots from the moment the line was
/// added; the authoritative snapshots are re-taken at commit time.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub medication_id: Uuid,
    pub medication_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

impl CartLine {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// In-memory, discardable sale draft
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Running display total
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}

/// Sales transaction composer
#[derive(Clone)]
pub struct SalesService {
    catalog: Arc<dyn CatalogStore>,
    clients: Arc<dyn ClientStore>,
    sales: Arc<dyn SaleStore>,
    stock: StockService,
    config: SalesConfig,
    audit: SharedAuditSink,
}

impl SalesService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        clients: Arc<dyn ClientStore>,
        sales: Arc<dyn SaleStore>,
        stock: StockService,
        config: SalesConfig,
        audit: SharedAuditSink,
    ) -> Self {
        Self {
            catalog,
            clients,
            sales,
            stock,
            config,
            audit,
        }
    }

    pub fn build_cart(&self) -> Cart {
        Cart::new()
    }

    /// Add a medication to the cart
    ///
    /// Only sellable medications may enter a cart: active, in stock, and
    /// not past their expiry date (selling on the expiry day itself is
    /// allowed). One line per medication; use [`Self::set_quantity`] to
    /// change an existing line.
    pub async fn add_line(
        &self,
        cart: &mut Cart,
        medication_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        validation::validate_movement_quantity(quantity).map_err(|msg| {
            AppError::validation("quantity", msg, "Quantidade deve ser maior que zero")
        })?;

        let medication = self
            .catalog
            .get_medication(medication_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Medication".to_string()))?;

        if cart.lines.iter().any(|l| l.medication_id == medication_id) {
            return Err(AppError::DuplicateLine {
                medication_id,
                medication_name: medication.display_name(),
            });
        }
        if !medication.is_active() {
            return Err(AppError::validation(
                "medication",
                "Medication is not active for sale",
                "Medicamento não está ativo para venda",
            ));
        }
        if medication.stock_quantity <= 0 {
            return Err(AppError::validation(
                "medication",
                "Medication is out of stock",
                "Medicamento sem estoque",
            ));
        }
        if medication.is_expired_on(Local::now().date_naive()) {
            return Err(AppError::validation(
                "medication",
                "Medication is past its expiry date",
                "Medicamento com validade vencida",
            ));
        }

        cart.lines.push(CartLine {
            medication_id,
            medication_name: medication.display_name(),
            unit_price: medication.price,
            quantity,
        });
        Ok(())
    }

    /// Remove a line by position
    pub fn remove_line(&self, cart: &mut Cart, index: usize) -> AppResult<CartLine> {
        if index >= cart.lines.len() {
            return Err(AppError::NotFound("Cart line".to_string()));
        }
        Ok(cart.lines.remove(index))
    }

    /// Change a line's quantity
    pub fn set_quantity(&self, cart: &mut Cart, index: usize, quantity: i32) -> AppResult<()> {
        validation::validate_movement_quantity(quantity).map_err(|msg| {
            AppError::validation("quantity", msg, "Quantidade deve ser maior que zero")
        })?;
        let line = cart
            .lines
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound("Cart line".to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Commit the cart into a persisted sale
    ///
    /// Validates fully before applying: empty cart, client eligibility,
    /// then an advisory stock re-check on every line (stock may have moved
    /// since the line was added). Only then are the outbound ledger
    /// movements applied, in cart order; the ledger re-checks atomically
    /// on each one. The sale is persisted with commit-time snapshots of
    /// name and unit price.
    pub async fn commit(&self, cart: Cart, client_id: Option<Uuid>) -> AppResult<Sale> {
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        if let Some(client_id) = client_id {
            let client = self
                .clients
                .get_client(client_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Client".to_string()))?;
            let age = client.age_on(Local::now().date_naive());
            if !validation::is_of_legal_age(age, self.config.minimum_client_age) {
                return Err(AppError::ClientUnderage {
                    client_id,
                    age,
                    minimum: self.config.minimum_client_age,
                });
            }
        }

        // Advisory pre-check; the authoritative guard is the atomic delta
        // inside each ledger movement below.
        let mut resolved = Vec::with_capacity(cart.lines.len());
        for line in cart.lines() {
            let medication = self
                .catalog
                .get_medication(line.medication_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Medication".to_string()))?;
            if medication.stock_quantity < line.quantity {
                return Err(AppError::InsufficientStock {
                    medication_id: medication.id,
                    medication_name: medication.display_name(),
                    available: medication.stock_quantity,
                    requested: line.quantity,
                });
            }
            resolved.push((medication, line.quantity));
        }

        let sale_id = Uuid::new_v4();
        let mut items = Vec::with_capacity(resolved.len());
        for (medication, quantity) in resolved {
            self.stock
                .saida(medication.id, quantity, Some(format!("venda {}", sale_id)))
                .await?;
            items.push(SaleItem {
                medication_id: medication.id,
                medication_name: medication.display_name(),
                quantity,
                unit_price: medication.price,
            });
        }

        let total_amount = Sale::total_of(&items);
        let sale = Sale {
            id: sale_id,
            client_id,
            items,
            total_amount,
            sold_at: Utc::now(),
        };
        let sale = self.sales.insert_sale(sale).await?;

        tracing::info!(
            sale_id = %sale.id,
            items = sale.items.len(),
            total = %sale.total_amount,
            "sale committed"
        );
        self.audit.record(AuditEvent::SaleCreated {
            sale_id: sale.id,
            client_id,
            item_count: sale.items.len(),
            total_amount: sale.total_amount,
        });
        Ok(sale)
    }

    /// All sales, newest first
    pub async fn sales(&self) -> AppResult<Vec<Sale>> {
        self.sales.list_sales().await
    }

    pub async fn sale(&self, id: Uuid) -> AppResult<Sale> {
        self.sales
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    pub async fn sales_by_client(&self, client_id: Uuid) -> AppResult<Vec<Sale>> {
        self.sales.list_sales_by_client(client_id).await
    }
}
