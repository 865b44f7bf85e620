//! Error handling for the pharmacy back-office core
//!
//! Provides consistent, structured error details in Portuguese and English
//! so the embedding UI can always render a specific message.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_pt: String,
    },

    // Business logic errors
    #[error("Insufficient stock for {medication_name}: requested {requested}, available {available}")]
    InsufficientStock {
        medication_id: Uuid,
        medication_name: String,
        available: i32,
        requested: i32,
    },

    #[error("{medication_name} is already in the cart")]
    DuplicateLine {
        medication_id: Uuid,
        medication_name: String,
    },

    #[error("Client is {age} years old; sales require {minimum}+")]
    ClientUnderage {
        client_id: Uuid,
        age: i32,
        minimum: i32,
    },

    #[error("Cannot commit a sale with no line items")]
    EmptyCart,

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a field-level validation failure
    pub fn validation(
        field: impl Into<String>,
        message: impl Into<String>,
        message_pt: impl Into<String>,
    ) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
            message_pt: message_pt.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::DuplicateLine { .. } => "DUPLICATE_LINE",
            AppError::ClientUnderage { .. } => "CLIENT_UNDERAGE",
            AppError::EmptyCart => "EMPTY_CART",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Structured detail for the embedding UI
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation {
                field,
                message,
                message_pt,
            } => ErrorDetail {
                code: self.code(),
                message_en: message.clone(),
                message_pt: message_pt.clone(),
                field: Some(field.clone()),
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: self.code(),
                message_en: format!("{} not found", resource),
                message_pt: format!("{} não encontrado", resource),
                field: None,
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::DuplicateEntry(field) => ErrorDetail {
                code: self.code(),
                message_en: format!("A record with this {} already exists", field),
                message_pt: format!("Já existe um registro com este {}", field),
                field: Some(field.clone()),
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::Conflict {
                resource,
                message,
                message_pt,
            } => ErrorDetail {
                code: self.code(),
                message_en: message.clone(),
                message_pt: message_pt.clone(),
                field: Some(resource.clone()),
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::InsufficientStock {
                medication_id,
                medication_name,
                available,
                requested,
            } => ErrorDetail {
                code: self.code(),
                message_en: format!(
                    "Insufficient stock for {}: requested {}, available {}",
                    medication_name, requested, available
                ),
                message_pt: format!(
                    "Estoque insuficiente para {}: solicitado {}, disponível {}",
                    medication_name, requested, available
                ),
                field: None,
                entity_id: Some(*medication_id),
                available: Some(*available),
                requested: Some(*requested),
            },
            AppError::DuplicateLine {
                medication_id,
                medication_name,
            } => ErrorDetail {
                code: self.code(),
                message_en: format!("{} is already in the cart", medication_name),
                message_pt: format!("{} já está no carrinho", medication_name),
                field: None,
                entity_id: Some(*medication_id),
                available: None,
                requested: None,
            },
            AppError::ClientUnderage {
                client_id,
                age,
                minimum,
            } => ErrorDetail {
                code: self.code(),
                message_en: format!(
                    "Client is {} years old; sales require {}+",
                    age, minimum
                ),
                message_pt: format!(
                    "Cliente tem {} anos; vendas exigem {}+",
                    age, minimum
                ),
                field: None,
                entity_id: Some(*client_id),
                available: None,
                requested: None,
            },
            AppError::EmptyCart => ErrorDetail {
                code: self.code(),
                message_en: "Cannot commit a sale with no line items".to_string(),
                message_pt: "Não é possível concluir uma venda sem itens".to_string(),
                field: None,
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::Storage(msg) => ErrorDetail {
                code: self.code(),
                message_en: format!("Storage error: {}", msg),
                message_pt: format!("Erro de armazenamento: {}", msg),
                field: None,
                entity_id: None,
                available: None,
                requested: None,
            },
            AppError::Internal(_) => ErrorDetail {
                code: self.code(),
                message_en: "An internal error occurred".to_string(),
                message_pt: "Ocorreu um erro interno".to_string(),
                field: None,
                entity_id: None,
                available: None,
                requested: None,
            },
        }
    }
}

/// Error detail structure surfaced to the embedding system
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<i32>,
}

/// Result type alias for core operations
pub type AppResult<T> = Result<T, AppError>;
