use crate::models::DbClient;
use crate::Result;
use sqlx::SqlitePool;

pub struct ClientRepository;

impl ClientRepository {
    /// Insert a client and return its id.
    ///
    /// Fails with a query error if the email is already taken.
    pub async fn insert(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, email, password_hash, phone, address)
            VALUES (?, ?, ?, NULL, NULL)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get client by email
    pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<DbClient>> {
        let result = sqlx::query_as::<_, DbClient>("SELECT * FROM clients WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// Get client by id
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<DbClient>> {
        let result = sqlx::query_as::<_, DbClient>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool> {
        let (found,): (i64,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM clients WHERE id = ?)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(found != 0)
    }

    /// List clients in id order
    pub async fn list(pool: &SqlitePool, limit: i64) -> Result<Vec<DbClient>> {
        let results = sqlx::query_as::<_, DbClient>("SELECT * FROM clients ORDER BY id LIMIT ?")
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(results)
    }

    /// Count total clients
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
