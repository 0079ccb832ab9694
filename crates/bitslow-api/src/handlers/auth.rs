use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use bitslow_core::{hash_password, verify_password, ExchangeError};
use bitslow_db::repositories::ClientRepository;
use bitslow_db::DatabaseError;
use bitslow_metrics::counters;
use tracing::{debug, info};

use crate::error::Result;
use crate::state::AppState;
use crate::types::{LoginRequest, RegisterRequest, UserResponse};

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = body.map_err(|e| {
        debug!(error = %e, "Rejected registration body");
        ExchangeError::InvalidBody
    })?;

    for (field, value) in [
        ("name", &req.name),
        ("email", &req.email),
        ("password", &req.password),
    ] {
        if value.trim().is_empty() {
            return Err(ExchangeError::invalid_parameter(field, "must not be empty").into());
        }
    }

    let pool = state.db.inner();
    if ClientRepository::get_by_email(pool, &req.email).await?.is_some() {
        return Err(ExchangeError::EmailAlreadyRegistered.into());
    }

    let password_hash = hash_password(&req.password);
    // A concurrent registration can still win the race past the lookup above
    let id = match ClientRepository::insert(pool, &req.name, &req.email, &password_hash).await {
        Ok(id) => id,
        Err(DatabaseError::UniqueViolation(_)) => {
            return Err(ExchangeError::EmailAlreadyRegistered.into())
        }
        Err(e) => return Err(e.into()),
    };

    counters::registrations(1);
    info!(client_id = id, email = %req.email, "Client registered");

    Ok(Json(UserResponse {
        id,
        name: req.name,
        email: req.email,
    }))
}

/// `POST /api/login`
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(req) = body.map_err(|e| {
        debug!(error = %e, "Rejected login body");
        ExchangeError::InvalidBody
    })?;

    let client = ClientRepository::get_by_email(state.db.inner(), &req.email)
        .await?
        .filter(|client| verify_password(&req.password, &client.password_hash));

    match client {
        Some(client) => {
            counters::logins(1, true);
            info!(client_id = client.id, "Login succeeded");
            Ok(Json(UserResponse::from(client)))
        }
        None => {
            counters::logins(1, false);
            info!(email = %req.email, "Login failed");
            Err(ExchangeError::InvalidCredentials.into())
        }
    }
}
