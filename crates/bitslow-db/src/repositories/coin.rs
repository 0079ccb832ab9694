use crate::models::{DbCoin, DbCoinListing};
use crate::Result;
use bitslow_core::Components;
use sqlx::SqlitePool;
use std::collections::HashSet;

pub struct CoinRepository;

impl CoinRepository {
    /// Insert coin and return its id
    pub async fn insert(pool: &SqlitePool, components: Components, value: f64) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO coins (bit1, bit2, bit3, value)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(i64::from(components.bit1))
        .bind(i64::from(components.bit2))
        .bind(i64::from(components.bit3))
        .bind(value)
        .execute(pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get coin by ID
    pub async fn get_by_id(pool: &SqlitePool, coin_id: i64) -> Result<Option<DbCoin>> {
        let result = sqlx::query_as::<_, DbCoin>("SELECT * FROM coins WHERE coin_id = ?")
            .bind(coin_id)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// Get a page of coins with the current owner's name.
    ///
    /// The owner is the buyer of the newest transaction; ties on
    /// `transaction_date` go to the later row.
    pub async fn get_page(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<DbCoinListing>> {
        let results = sqlx::query_as::<_, DbCoinListing>(
            r#"
            SELECT
                c.coin_id AS id,
                c.bit1,
                c.bit2,
                c.bit3,
                c.value AS monetary_value,
                (
                    SELECT cl.name
                    FROM transactions t
                    JOIN clients cl ON t.buyer_id = cl.id
                    WHERE t.coin_id = c.coin_id
                    ORDER BY t.transaction_date DESC, t.id DESC
                    LIMIT 1
                ) AS current_owner
            FROM coins c
            ORDER BY c.coin_id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Count total coins
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coins")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Every component triple currently in use
    pub async fn used_components(pool: &SqlitePool) -> Result<HashSet<Components>> {
        let coins = sqlx::query_as::<_, DbCoin>("SELECT * FROM coins")
            .fetch_all(pool)
            .await?;
        Ok(coins.iter().filter_map(DbCoin::components).collect())
    }

    /// Coins whose latest transaction has `client_id` as buyer
    pub async fn get_holdings(pool: &SqlitePool, client_id: i64) -> Result<Vec<DbCoin>> {
        let results = sqlx::query_as::<_, DbCoin>(
            r#"
            SELECT c.coin_id, c.bit1, c.bit2, c.bit3, c.value
            FROM coins c
            JOIN transactions t ON t.id = (
                SELECT t2.id
                FROM transactions t2
                WHERE t2.coin_id = c.coin_id
                ORDER BY t2.transaction_date DESC, t2.id DESC
                LIMIT 1
            )
            WHERE t.buyer_id = ?
            ORDER BY c.coin_id ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;
    use crate::repositories::{ClientRepository, TransactionRepository};
    use crate::DatabasePool;

    async fn mint(pool: &SqlitePool, components: Components, value: f64, owner: i64) -> i64 {
        let coin_id = CoinRepository::insert(pool, components, value).await.unwrap();
        TransactionRepository::insert(
            pool,
            &NewTransaction {
                coin_id,
                seller_id: None,
                buyer_id: owner,
                amount: value,
            },
        )
        .await
        .unwrap();
        coin_id
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = DatabasePool::in_memory().await.unwrap();
        let pool = db.inner();

        let id = CoinRepository::insert(pool, Components::new(3, 7, 42), 12.5)
            .await
            .unwrap();
        let coin = CoinRepository::get_by_id(pool, id).await.unwrap().unwrap();

        assert_eq!((coin.bit1, coin.bit2, coin.bit3), (3, 7, 42));
        assert_eq!(coin.value, 12.5);
        assert_eq!(coin.components(), Some(Components::new(3, 7, 42)));
        assert_eq!(coin.hash(), "aff1dc34b2c9339fb327f2f02c1e0871");
        assert!(CoinRepository::get_by_id(pool, id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_follows_insertion_order() {
        let db = DatabasePool::in_memory().await.unwrap();
        let pool = db.inner();

        let mut ids = Vec::new();
        for i in 0..65u8 {
            let id = CoinRepository::insert(pool, Components::new(i, i, i), f64::from(i) + 1.0)
                .await
                .unwrap();
            ids.push(id);
        }

        let page = CoinRepository::get_page(pool, 30, 30).await.unwrap();
        assert_eq!(page.len(), 30);
        let page_ids: Vec<i64> = page.iter().map(|c| c.id).collect();
        assert_eq!(page_ids, ids[30..60].to_vec());
        assert!(page.iter().all(|c| c.current_owner.is_none()));

        let tail = CoinRepository::get_page(pool, 30, 60).await.unwrap();
        assert_eq!(tail.len(), 5);
        assert_eq!(CoinRepository::count(pool).await.unwrap(), 65);
    }

    #[tokio::test]
    async fn test_page_reports_latest_buyer_as_owner() {
        let db = DatabasePool::in_memory().await.unwrap();
        let pool = db.inner();

        let alice = ClientRepository::insert(pool, "Alice", "a@example.com", "h")
            .await
            .unwrap();
        let bob = ClientRepository::insert(pool, "Bob", "b@example.com", "h")
            .await
            .unwrap();

        let coin_id = mint(pool, Components::new(1, 2, 3), 10.0, alice).await;
        TransactionRepository::insert(
            pool,
            &NewTransaction {
                coin_id,
                seller_id: Some(alice),
                buyer_id: bob,
                amount: 10.0,
            },
        )
        .await
        .unwrap();

        let page = CoinRepository::get_page(pool, 30, 0).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].current_owner.as_deref(), Some("Bob"));
        assert_eq!(page[0].monetary_value, 10.0);
    }

    #[tokio::test]
    async fn test_used_components() {
        let db = DatabasePool::in_memory().await.unwrap();
        let pool = db.inner();

        CoinRepository::insert(pool, Components::new(1, 2, 3), 1.0)
            .await
            .unwrap();
        CoinRepository::insert(pool, Components::new(99, 0, 5), 1.0)
            .await
            .unwrap();
        // Duplicate triples are allowed by the schema
        CoinRepository::insert(pool, Components::new(1, 2, 3), 2.0)
            .await
            .unwrap();

        let used = CoinRepository::used_components(pool).await.unwrap();
        assert_eq!(used.len(), 2);
        assert!(used.contains(&Components::new(1, 2, 3)));
        assert!(used.contains(&Components::new(99, 0, 5)));
    }

    #[tokio::test]
    async fn test_holdings_track_latest_buyer() {
        let db = DatabasePool::in_memory().await.unwrap();
        let pool = db.inner();

        let alice = ClientRepository::insert(pool, "Alice", "a@example.com", "h")
            .await
            .unwrap();
        let bob = ClientRepository::insert(pool, "Bob", "b@example.com", "h")
            .await
            .unwrap();

        let kept = mint(pool, Components::new(1, 1, 1), 5.0, alice).await;
        let sold = mint(pool, Components::new(2, 2, 2), 7.0, alice).await;
        let bought_back = mint(pool, Components::new(3, 3, 3), 9.0, alice).await;

        for (coin_id, seller, buyer, amount) in [
            (sold, alice, bob, 7.0),
            (bought_back, alice, bob, 9.0),
            (bought_back, bob, alice, 9.0),
        ] {
            TransactionRepository::insert(
                pool,
                &NewTransaction {
                    coin_id,
                    seller_id: Some(seller),
                    buyer_id: buyer,
                    amount,
                },
            )
            .await
            .unwrap();
        }

        let alice_ids: Vec<i64> = CoinRepository::get_holdings(pool, alice)
            .await
            .unwrap()
            .iter()
            .map(|c| c.coin_id)
            .collect();
        assert_eq!(alice_ids, vec![kept, bought_back]);

        let bob_ids: Vec<i64> = CoinRepository::get_holdings(pool, bob)
            .await
            .unwrap()
            .iter()
            .map(|c| c.coin_id)
            .collect();
        assert_eq!(bob_ids, vec![sold]);
    }
}
