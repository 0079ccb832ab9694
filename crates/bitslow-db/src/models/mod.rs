mod client;
mod coin;
mod transaction;

pub use client::DbClient;
pub use coin::{DbCoin, DbCoinListing};
pub use transaction::{
    DbHistoryEntry, DbTransactionDetail, NewTransaction, TransactionFilter,
};
