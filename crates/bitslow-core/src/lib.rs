pub mod error;
pub mod mint;
pub mod types;

pub use error::{ExchangeError, Result};
pub use mint::{find_unused_components, validate_amount, Draw, MAX_MINT_ATTEMPTS};
pub use types::{compute_hash, hash_password, verify_password, ClientId, Components, COMPONENT_RANGE};
