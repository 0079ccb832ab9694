use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use bitslow_core::ExchangeError;
use bitslow_db::models::TransactionFilter;
use bitslow_db::repositories::ClientRepository;
use bitslow_db::repositories::TransactionRepository;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::non_blank;
use crate::error::Result;
use crate::state::AppState;
use crate::types::{TransactionParams, TransactionResponse, UserResponse};

/// Layout of SQLite `datetime()` output, used for stored transaction dates
const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Rows returned by the debug user listing
const DEBUG_USER_LIMIT: i64 = 10;

/// `GET /api/transactions`
pub async fn list_transactions(
    State(state): State<AppState>,
    params: std::result::Result<Query<TransactionParams>, QueryRejection>,
) -> Result<Json<Vec<TransactionResponse>>> {
    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "Rejected transaction query");
        ExchangeError::invalid_parameter("query", "malformed query string")
    })?;
    let filter = parse_filter(params)?;

    let transactions = TransactionRepository::get_detailed(state.db.inner(), &filter).await?;
    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

/// `GET /api/debug/users`, only routed when debug endpoints are enabled
pub async fn debug_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let clients = ClientRepository::list(state.db.inner(), DEBUG_USER_LIMIT).await?;
    Ok(Json(clients.into_iter().map(UserResponse::from).collect()))
}

fn parse_filter(params: TransactionParams) -> std::result::Result<TransactionFilter, ExchangeError> {
    Ok(TransactionFilter {
        start_date: non_blank(params.start_date)
            .map(|raw| parse_date_bound("startDate", &raw, false))
            .transpose()?,
        end_date: non_blank(params.end_date)
            .map(|raw| parse_date_bound("endDate", &raw, true))
            .transpose()?,
        min_value: non_blank(params.min_value)
            .map(|raw| parse_value("minValue", &raw))
            .transpose()?,
        max_value: non_blank(params.max_value)
            .map(|raw| parse_value("maxValue", &raw))
            .transpose()?,
        buyer_name: non_blank(params.buyer_name),
        seller_name: non_blank(params.seller_name),
    })
}

/// Normalize a date or datetime to the stored layout.
///
/// A bare date covers the whole day: it starts at 00:00:00 as a lower bound
/// and ends at 23:59:59 as an upper bound.
fn parse_date_bound(
    field: &str,
    raw: &str,
    end_of_day: bool,
) -> std::result::Result<String, ExchangeError> {
    let invalid = || ExchangeError::invalid_parameter(field, "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS");

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let bound = if end_of_day {
            date.and_hms_opt(23, 59, 59)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        return bound
            .map(|dt| dt.format(DB_DATETIME_FORMAT).to_string())
            .ok_or_else(invalid);
    }

    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format(DB_DATETIME_FORMAT).to_string())
        .ok_or_else(invalid)
}

fn parse_value(field: &str, raw: &str) -> std::result::Result<f64, ExchangeError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExchangeError::invalid_parameter(field, "expected a number"))
}
