use bitslow_core::compute_hash;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Values for a new ledger row; the date is assigned by the database
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub coin_id: i64,
    pub seller_id: Option<i64>,
    pub buyer_id: i64,
    pub amount: f64,
}

/// Transaction joined with client names and coin components
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTransactionDetail {
    pub id: i64,
    pub coin_id: i64,
    pub amount: f64,
    pub transaction_date: String,
    pub seller_id: Option<i64>,
    pub seller_name: Option<String>,
    pub buyer_id: i64,
    pub buyer_name: String,
    pub bit1: i64,
    pub bit2: i64,
    pub bit3: i64,
    pub value: f64,
}

impl DbTransactionDetail {
    pub fn hash(&self) -> String {
        compute_hash(self.bit1, self.bit2, self.bit3)
    }
}

/// One entry of a coin's ownership history
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbHistoryEntry {
    pub id: i64,
    pub bitslow_id: i64,
    pub previous_owner: Option<String>,
    pub new_owner: String,
    pub timestamp: String,
}

/// Optional filters for the transaction ledger listing.
///
/// Dates are compared as `YYYY-MM-DD HH:MM:SS` text, both bounds inclusive.
/// Name filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub buyer_name: Option<String>,
    pub seller_name: Option<String>,
}
