mod client;
mod coin;
mod transaction;

pub use client::ClientRepository;
pub use coin::CoinRepository;
pub use transaction::TransactionRepository;
