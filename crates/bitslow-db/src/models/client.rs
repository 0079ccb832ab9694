use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for clients table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbClient {
    pub id: i64,
    pub name: String,
    /// Unique login identifier
    pub email: String,
    /// Unsalted SHA-256 hex digest
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
