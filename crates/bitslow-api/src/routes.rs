use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::handlers::{auth, coins, profile, transactions};
use crate::state::AppState;

/// Build the HTTP router for the exchange API
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let cors = if config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let mut router = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/profile/{user_id}", get(profile::profile))
        .route("/api/transactions", get(transactions::list_transactions))
        .route("/api/bitslows", get(coins::list_coins))
        .route("/api/bitslows/generate", post(coins::generate))
        .route("/api/bitslows/{id}/buy", post(coins::buy))
        .route("/api/bitslows/{id}/history", get(coins::history))
        .route("/health", get(health_check));

    if config.debug_endpoints {
        router = router.route("/api/debug/users", get(transactions::debug_users));
    }

    router
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Result<&'static str> {
    state.db.health_check().await?;
    Ok("OK")
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
