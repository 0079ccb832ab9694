use crate::models::{DbHistoryEntry, DbTransactionDetail, NewTransaction, TransactionFilter};
use crate::Result;
use sqlx::SqlitePool;

pub struct TransactionRepository;

impl TransactionRepository {
    /// Append a ledger row stamped with the current time; returns its id
    pub async fn insert(pool: &SqlitePool, tx: &NewTransaction) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (coin_id, seller_id, buyer_id, amount, transaction_date)
            VALUES (?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(tx.coin_id)
        .bind(tx.seller_id)
        .bind(tx.buyer_id)
        .bind(tx.amount)
        .execute(pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Append a ledger row dated `minutes_ago` minutes in the past
    pub async fn insert_backdated(
        pool: &SqlitePool,
        tx: &NewTransaction,
        minutes_ago: i64,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (coin_id, seller_id, buyer_id, amount, transaction_date)
            VALUES (?, ?, ?, ?, datetime('now', ?))
            "#,
        )
        .bind(tx.coin_id)
        .bind(tx.seller_id)
        .bind(tx.buyer_id)
        .bind(tx.amount)
        .bind(format!("-{} minutes", minutes_ago))
        .execute(pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Buyer of the newest transaction for a coin, `None` if it never traded
    pub async fn current_owner(pool: &SqlitePool, coin_id: i64) -> Result<Option<i64>> {
        let result: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT buyer_id
            FROM transactions
            WHERE coin_id = ?
            ORDER BY transaction_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(coin_id)
        .fetch_optional(pool)
        .await?;
        Ok(result.map(|(buyer_id,)| buyer_id))
    }

    /// Ownership history of a coin, newest first
    pub async fn get_history(pool: &SqlitePool, coin_id: i64) -> Result<Vec<DbHistoryEntry>> {
        let results = sqlx::query_as::<_, DbHistoryEntry>(
            r#"
            SELECT
                t.id,
                t.coin_id AS bitslow_id,
                s.name AS previous_owner,
                b.name AS new_owner,
                t.transaction_date AS timestamp
            FROM transactions t
            LEFT JOIN clients s ON t.seller_id = s.id
            JOIN clients b ON t.buyer_id = b.id
            WHERE t.coin_id = ?
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
        )
        .bind(coin_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Full ledger with names and coin components, newest first
    pub async fn get_detailed(
        pool: &SqlitePool,
        filter: &TransactionFilter,
    ) -> Result<Vec<DbTransactionDetail>> {
        let results = sqlx::query_as::<_, DbTransactionDetail>(
            r#"
            SELECT
                t.id,
                t.coin_id,
                t.amount,
                t.transaction_date,
                t.seller_id,
                s.name AS seller_name,
                t.buyer_id,
                b.name AS buyer_name,
                c.bit1,
                c.bit2,
                c.bit3,
                c.value
            FROM transactions t
            JOIN clients b ON t.buyer_id = b.id
            LEFT JOIN clients s ON t.seller_id = s.id
            JOIN coins c ON t.coin_id = c.coin_id
            WHERE (?1 IS NULL OR t.transaction_date >= ?1)
              AND (?2 IS NULL OR t.transaction_date <= ?2)
              AND (?3 IS NULL OR c.value >= ?3)
              AND (?4 IS NULL OR c.value <= ?4)
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
        )
        .bind(filter.start_date.as_deref())
        .bind(filter.end_date.as_deref())
        .bind(filter.min_value)
        .bind(filter.max_value)
        .fetch_all(pool)
        .await?;

        // SQLite's lower() folds ASCII only, so names are matched here
        let buyer = filter.buyer_name.as_deref().map(str::to_lowercase);
        let seller = filter.seller_name.as_deref().map(str::to_lowercase);
        Ok(results
            .into_iter()
            .filter(|tx| {
                buyer
                    .as_deref()
                    .map_or(true, |needle| name_contains(Some(tx.buyer_name.as_str()), needle))
                    && seller
                        .as_deref()
                        .map_or(true, |needle| name_contains(tx.seller_name.as_deref(), needle))
            })
            .collect())
    }

    /// Number of transactions where the client is buyer or seller
    pub async fn count_for_client(pool: &SqlitePool, client_id: i64) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transactions WHERE buyer_id = ?1 OR seller_id = ?1",
        )
        .bind(client_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count total transactions
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// Case-insensitive substring match; a missing name never matches
fn name_contains(name: Option<&str>, lowered_needle: &str) -> bool {
    name.is_some_and(|name| name.to_lowercase().contains(lowered_needle))
}
