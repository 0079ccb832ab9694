use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use bitslow_core::{find_unused_components, validate_amount, ExchangeError};
use bitslow_db::models::NewTransaction;
use bitslow_db::repositories::{ClientRepository, CoinRepository, TransactionRepository};
use bitslow_metrics::{counters, histograms};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use super::{non_blank, parse_id};
use crate::error::Result;
use crate::extract::Actor;
use crate::state::AppState;
use crate::types::{
    CoinListResponse, CoinResponse, GenerateRequest, GenerateResponse, GeneratedCoin,
    HistoryEntryResponse, ListCoinsParams, SuccessResponse,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_LIMIT: i64 = 30;

/// `GET /api/bitslows?page=&limit=`
pub async fn list_coins(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListCoinsParams>, QueryRejection>,
) -> Result<Json<CoinListResponse>> {
    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "Rejected coin list query");
        ExchangeError::invalid_parameter("query", "malformed query string")
    })?;
    let page = parse_positive("page", params.page, DEFAULT_PAGE)?;
    let limit = parse_positive("limit", params.limit, DEFAULT_PAGE_LIMIT)?;
    let offset = (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| ExchangeError::invalid_parameter("page", "out of range"))?;

    let pool = state.db.inner();
    let total = CoinRepository::count(pool).await?;
    let coins = CoinRepository::get_page(pool, limit, offset).await?;

    Ok(Json(CoinListResponse {
        bitslows: coins.into_iter().map(CoinResponse::from).collect(),
        total,
        page,
        limit,
    }))
}

/// `POST /api/bitslows/generate`
///
/// Mints a coin with a component triple not seen in the catalog at read time
/// and records its minting transaction. The read and the inserts are separate
/// statements, so concurrent mints may reuse a triple.
pub async fn generate(
    State(state): State<AppState>,
    Actor(buyer): Actor,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(req) = body.map_err(|e| {
        debug!(error = %e, "Rejected generate body");
        ExchangeError::InvalidBody
    })?;
    let amount = validate_amount(parse_amount(&req.amount)?)?;

    let started = Instant::now();
    let pool = state.db.inner();
    if !ClientRepository::exists(pool, buyer.get()).await? {
        return Err(ExchangeError::UnknownClient(buyer.get()).into());
    }

    let used = CoinRepository::used_components(pool).await?;
    let draw = {
        let mut rng = rand::thread_rng();
        find_unused_components(&mut rng, &used)?
    };
    let components = draw.components;

    let coin_id = CoinRepository::insert(pool, components, amount).await?;
    TransactionRepository::insert(
        pool,
        &NewTransaction {
            coin_id,
            seller_id: None,
            buyer_id: buyer.get(),
            amount,
        },
    )
    .await?;
    histograms::db_query_duration(started.elapsed(), "generate");
    histograms::mint_attempts(draw.attempts);
    counters::coins_generated(1);

    info!(
        coin_id,
        components = %components,
        value = amount,
        buyer = %buyer,
        attempts = draw.attempts,
        "Coin generated"
    );

    Ok(Json(GenerateResponse {
        success: true,
        bitslow: GeneratedCoin {
            id: coin_id,
            component_numbers: components.as_array(),
            monetary_value: amount,
            hash: components.hash(),
        },
    }))
}

/// `POST /api/bitslows/{id}/buy`
///
/// Transfers the coin from its current owner to the acting client at the
/// coin's value. The owner lookup and the insert are not isolated from other
/// requests: two concurrent buys of one coin can both succeed.
pub async fn buy(
    State(state): State<AppState>,
    Actor(buyer): Actor,
    Path(raw_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let coin_id = parse_id(&raw_id, ExchangeError::InvalidCoinId)?;

    let started = Instant::now();
    let pool = state.db.inner();
    let coin = CoinRepository::get_by_id(pool, coin_id)
        .await?
        .ok_or(ExchangeError::CoinNotFound(coin_id))?;

    if !ClientRepository::exists(pool, buyer.get()).await? {
        return Err(ExchangeError::UnknownClient(buyer.get()).into());
    }

    let seller = TransactionRepository::current_owner(pool, coin_id).await?;
    let transaction_id = TransactionRepository::insert(
        pool,
        &NewTransaction {
            coin_id,
            seller_id: seller,
            buyer_id: buyer.get(),
            amount: coin.value,
        },
    )
    .await?;
    histograms::db_query_duration(started.elapsed(), "buy");
    counters::purchases(1);

    info!(
        coin_id,
        transaction_id,
        seller = ?seller,
        buyer = %buyer,
        amount = coin.value,
        "Coin purchased"
    );

    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/bitslows/{id}/history`
pub async fn history(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<HistoryEntryResponse>>> {
    let coin_id = parse_id(&raw_id, ExchangeError::InvalidCoinId)?;
    let entries = TransactionRepository::get_history(state.db.inner(), coin_id).await?;
    Ok(Json(
        entries.into_iter().map(HistoryEntryResponse::from).collect(),
    ))
}

fn parse_positive(
    field: &str,
    raw: Option<String>,
    default: i64,
) -> std::result::Result<i64, ExchangeError> {
    match non_blank(raw) {
        None => Ok(default),
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ExchangeError::invalid_parameter(
                field,
                "must be a positive integer",
            )),
        },
    }
}

/// Accept a JSON number or a string holding one
fn parse_amount(value: &Value) -> std::result::Result<f64, ExchangeError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(ExchangeError::InvalidAmount),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| ExchangeError::InvalidAmount),
        _ => Err(ExchangeError::InvalidAmount),
    }
}
