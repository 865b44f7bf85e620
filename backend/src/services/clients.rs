//! Client registry service
//!
//! CRUD over registered clients plus the CPF/contact validation rules.
//! Eligibility (minimum age) is consumed by the sales composer.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use shared::models::Client;
use shared::validation;

use crate::audit::{AuditEvent, SharedAuditSink};
use crate::error::{AppError, AppResult};
use crate::store::ClientStore;

/// Client registry service
#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn ClientStore>,
    audit: SharedAuditSink,
}

/// Input for registering a client
#[derive(Debug, Clone, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
}

/// Partial client update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl ClientService {
    pub fn new(store: Arc<dyn ClientStore>, audit: SharedAuditSink) -> Self {
        Self { store, audit }
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Client> {
        self.store
            .get_client(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.store.list_clients().await
    }

    /// Case-insensitive name match, or CPF digit match
    pub async fn search(&self, query: &str) -> AppResult<Vec<Client>> {
        let clients = self.store.list_clients().await?;
        let query_lower = query.to_lowercase();
        let query_digits = validation::normalize_cpf(query);
        Ok(clients
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&query_lower)
                    || (!query_digits.is_empty() && c.cpf.contains(&query_digits))
            })
            .collect())
    }

    pub async fn create(&self, input: NewClient) -> AppResult<Client> {
        validation::validate_name(&input.name)
            .map_err(|msg| AppError::validation("name", msg, "Nome do cliente é obrigatório"))?;
        validation::validate_cpf(&input.cpf)
            .map_err(|msg| AppError::validation("cpf", msg, "CPF inválido"))?;
        validation::validate_email(&input.email)
            .map_err(|msg| AppError::validation("email", msg, "E-mail inválido"))?;
        if let Some(phone) = &input.phone {
            validation::validate_phone(phone)
                .map_err(|msg| AppError::validation("phone", msg, "Telefone inválido"))?;
        }
        validation::validate_birth_date(input.birth_date, Local::now().date_naive()).map_err(
            |msg| AppError::validation("birth_date", msg, "Data de nascimento inválida"),
        )?;

        let cpf = validation::normalize_cpf(&input.cpf);
        if self.store.find_client_by_cpf(&cpf).await?.is_some() {
            return Err(AppError::DuplicateEntry("cpf".to_string()));
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            cpf,
            email: input.email.trim().to_string(),
            phone: input.phone,
            birth_date: input.birth_date,
            created_at: now,
            updated_at: now,
        };

        let client = self.store.insert_client(client).await?;
        tracing::info!(client_id = %client.id, "client created");
        self.audit.record(AuditEvent::ClientCreated {
            client_id: client.id,
        });
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, input: ClientUpdate) -> AppResult<Client> {
        let mut client = self.get(id).await?;

        if let Some(name) = input.name {
            validation::validate_name(&name).map_err(|msg| {
                AppError::validation("name", msg, "Nome do cliente é obrigatório")
            })?;
            client.name = name.trim().to_string();
        }
        if let Some(cpf) = input.cpf {
            validation::validate_cpf(&cpf)
                .map_err(|msg| AppError::validation("cpf", msg, "CPF inválido"))?;
            let cpf = validation::normalize_cpf(&cpf);
            if let Some(existing) = self.store.find_client_by_cpf(&cpf).await? {
                if existing.id != id {
                    return Err(AppError::DuplicateEntry("cpf".to_string()));
                }
            }
            client.cpf = cpf;
        }
        if let Some(email) = input.email {
            validation::validate_email(&email)
                .map_err(|msg| AppError::validation("email", msg, "E-mail inválido"))?;
            client.email = email.trim().to_string();
        }
        if let Some(phone) = input.phone {
            validation::validate_phone(&phone)
                .map_err(|msg| AppError::validation("phone", msg, "Telefone inválido"))?;
            client.phone = Some(phone);
        }
        if let Some(birth_date) = input.birth_date {
            validation::validate_birth_date(birth_date, Local::now().date_naive()).map_err(
                |msg| AppError::validation("birth_date", msg, "Data de nascimento inválida"),
            )?;
            client.birth_date = birth_date;
        }

        client.updated_at = Utc::now();
        let client = self.store.update_client(client).await?;
        tracing::info!(client_id = %client.id, "client updated");
        self.audit.record(AuditEvent::ClientUpdated {
            client_id: client.id,
        });
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_client(id).await? {
            return Err(AppError::NotFound("Client".to_string()));
        }
        tracing::info!(client_id = %id, "client deleted");
        self.audit.record(AuditEvent::ClientDeleted { client_id: id });
        Ok(())
    }
}
