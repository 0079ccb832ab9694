use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bitslow_core::{ClientId, ExchangeError};

use crate::error::ApiError;
use crate::state::AppState;

/// Header naming the client that performs a purchase or mint
pub const USER_ID_HEADER: &str = "x-user-id";

/// The client acting on a request.
///
/// Read from the `X-User-Id` header; requests without it act as the
/// configured default buyer. The header is trusted as sent: there are no
/// sessions or tokens to check it against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub ClientId);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(USER_ID_HEADER) {
            None => Ok(Actor(state.default_buyer)),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .map(|id| Actor(ClientId(id)))
                .ok_or_else(|| ApiError::Exchange(ExchangeError::InvalidUserId)),
        }
    }
}
