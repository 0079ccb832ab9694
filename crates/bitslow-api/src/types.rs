//! Request and response bodies of the JSON API

use bitslow_db::models::{
    DbClient, DbCoin, DbCoinListing, DbHistoryEntry, DbTransactionDetail,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Debug form and source chain of a server-side failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Mint request; `amount` may be a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub amount: serde_json::Value,
}

/// Public view of a client (never includes the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<DbClient> for UserResponse {
    fn from(client: DbClient) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub total_transactions: i64,
    pub total_bit_slows: usize,
    pub total_value: f64,
    pub holdings: Vec<HoldingResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingResponse {
    pub coin_id: i64,
    pub bit1: i64,
    pub bit2: i64,
    pub bit3: i64,
    pub value: f64,
    #[serde(rename = "computedBitSlow")]
    pub computed_bit_slow: String,
}

impl From<DbCoin> for HoldingResponse {
    fn from(coin: DbCoin) -> Self {
        Self {
            computed_bit_slow: coin.hash(),
            coin_id: coin.coin_id,
            bit1: coin.bit1,
            bit2: coin.bit2,
            bit3: coin.bit3,
            value: coin.value,
        }
    }
}

/// Ledger row with names, coin components and the coin hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
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
    #[serde(rename = "computedBitSlow")]
    pub computed_bit_slow: String,
}

impl From<DbTransactionDetail> for TransactionResponse {
    fn from(tx: DbTransactionDetail) -> Self {
        Self {
            computed_bit_slow: tx.hash(),
            id: tx.id,
            coin_id: tx.coin_id,
            amount: tx.amount,
            transaction_date: tx.transaction_date,
            seller_id: tx.seller_id,
            seller_name: tx.seller_name,
            buyer_id: tx.buyer_id,
            buyer_name: tx.buyer_name,
            bit1: tx.bit1,
            bit2: tx.bit2,
            bit3: tx.bit3,
            value: tx.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinListResponse {
    pub bitslows: Vec<CoinResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinResponse {
    pub id: i64,
    pub bit1: i64,
    pub bit2: i64,
    pub bit3: i64,
    pub monetary_value: f64,
    pub current_owner: Option<String>,
    pub hash: String,
    pub component_numbers: [i64; 3],
}

impl From<DbCoinListing> for CoinResponse {
    fn from(coin: DbCoinListing) -> Self {
        Self {
            hash: coin.hash(),
            component_numbers: [coin.bit1, coin.bit2, coin.bit3],
            id: coin.id,
            bit1: coin.bit1,
            bit2: coin.bit2,
            bit3: coin.bit3,
            monetary_value: coin.monetary_value,
            current_owner: coin.current_owner,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub bitslow: GeneratedCoin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCoin {
    pub id: i64,
    pub component_numbers: [u8; 3],
    pub monetary_value: f64,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: i64,
    pub bitslow_id: i64,
    pub previous_owner: Option<String>,
    pub new_owner: String,
    pub timestamp: String,
}

impl From<DbHistoryEntry> for HistoryEntryResponse {
    fn from(entry: DbHistoryEntry) -> Self {
        Self {
            id: entry.id,
            bitslow_id: entry.bitslow_id,
            previous_owner: entry.previous_owner,
            new_owner: entry.new_owner,
            timestamp: entry.timestamp,
        }
    }
}

/// Raw `GET /api/bitslows` query parameters, validated by the handler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCoinsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Raw `GET /api/transactions` filter parameters, validated by the handler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub buyer_name: Option<String>,
    pub seller_name: Option<String>,
}
