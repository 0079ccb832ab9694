use bitslow_core::{compute_hash, Components};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for coins table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCoin {
    pub coin_id: i64,
    pub bit1: i64,
    pub bit2: i64,
    pub bit3: i64,
    pub value: f64,
}

impl DbCoin {
    pub fn hash(&self) -> String {
        compute_hash(self.bit1, self.bit2, self.bit3)
    }

    /// Component triple, or `None` if a stored component is outside `0..=255`
    pub fn components(&self) -> Option<Components> {
        Some(Components::new(
            u8::try_from(self.bit1).ok()?,
            u8::try_from(self.bit2).ok()?,
            u8::try_from(self.bit3).ok()?,
        ))
    }
}

/// A catalog row: coin plus the name of its current owner
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCoinListing {
    pub id: i64,
    pub bit1: i64,
    pub bit2: i64,
    pub bit3: i64,
    pub monetary_value: f64,
    /// Buyer of the latest transaction, `None` if the coin was never traded
    pub current_owner: Option<String>,
}

impl DbCoinListing {
    pub fn hash(&self) -> String {
        compute_hash(self.bit1, self.bit2, self.bit3)
    }
}
