use bitslow_core::ClientId;
use bitslow_db::DatabasePool;
use std::sync::Arc;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabasePool>,
    /// Buyer used when a request does not identify its client
    pub default_buyer: ClientId,
}

impl AppState {
    pub fn new(db: Arc<DatabasePool>, default_buyer: ClientId) -> Self {
        Self { db, default_buyer }
    }
}
