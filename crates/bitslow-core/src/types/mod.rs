mod client;
mod coin;

pub use client::{hash_password, verify_password, ClientId};
pub use coin::{compute_hash, Components, COMPONENT_RANGE};
