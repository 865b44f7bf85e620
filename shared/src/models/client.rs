//! Client registry models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered pharmacy client
///
/// `cpf` is stored as its canonical 11-digit form, without punctuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Whole years completed on `as_of`, counting only birthdays that
    /// have already occurred.
    pub fn age_on(&self, as_of: NaiveDate) -> i32 {
        crate::validation::age_on(self.birth_date, as_of)
    }
}
