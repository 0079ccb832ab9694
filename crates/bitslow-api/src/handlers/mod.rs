pub mod auth;
pub mod coins;
pub mod profile;
pub mod transactions;

use bitslow_core::ExchangeError;

/// Parse a numeric path segment, mapping failure to `err`
fn parse_id(raw: &str, err: ExchangeError) -> Result<i64, ExchangeError> {
    raw.trim().parse::<i64>().map_err(|_| err)
}

/// Treat missing and blank query parameters the same way
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
