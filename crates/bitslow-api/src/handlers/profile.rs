use axum::extract::{Path, State};
use axum::Json;
use bitslow_core::ExchangeError;
use bitslow_db::repositories::{CoinRepository, TransactionRepository};

use super::parse_id;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{HoldingResponse, ProfileResponse};

/// `GET /api/profile/{user_id}`
///
/// Holdings are the coins whose latest transaction has this client as buyer.
/// Unknown clients get an empty profile.
pub async fn profile(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ProfileResponse>> {
    let client_id = parse_id(&raw_id, ExchangeError::InvalidUserId)?;
    let pool = state.db.inner();

    let total_transactions = TransactionRepository::count_for_client(pool, client_id).await?;
    let holdings: Vec<HoldingResponse> = CoinRepository::get_holdings(pool, client_id)
        .await?
        .into_iter()
        .map(HoldingResponse::from)
        .collect();
    let total_value = holdings.iter().map(|h| h.value).sum();

    Ok(Json(ProfileResponse {
        total_transactions,
        total_bit_slows: holdings.len(),
        total_value,
        holdings,
    }))
}
