//! Startup seeding with synthetic clients, coins and trades.
//!
//! Every seeded coin gets a minting transaction, and every seeded transfer is
//! sold by the coin's owner at that point, so the ledger reads the same way a
//! ledger built through the API would.

use crate::config::SeedConfig;
use crate::models::NewTransaction;
use crate::repositories::{ClientRepository, CoinRepository, TransactionRepository};
use crate::{DatabaseError, Result};
use bitslow_core::{find_unused_components, hash_password};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Password shared by every seeded client
pub const SEED_PASSWORD: &str = "password123";

/// Minutes between consecutive seeded transactions
const SEED_STEP_MINUTES: i64 = 5;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chiara", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
    "Kofi", "Lena", "Mateo", "Nadia", "Oskar", "Priya",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Berg", "Castro", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen", "Ito",
    "Kowalski", "Larsen", "Moreau", "Novak", "Okafor",
];

/// Rows written by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub clients: usize,
    pub coins: usize,
    pub transactions: usize,
}

pub struct Seeder {
    config: SeedConfig,
}

impl Seeder {
    pub fn new(config: SeedConfig) -> Self {
        Self { config }
    }

    /// Seed using an entropy-seeded generator
    pub async fn run(&self, pool: &SqlitePool) -> Result<SeedSummary> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(pool, &mut rng).await
    }

    pub async fn run_with_rng<R: Rng + Send>(
        &self,
        pool: &SqlitePool,
        rng: &mut R,
    ) -> Result<SeedSummary> {
        if self.config.clear_existing {
            Self::clear(pool).await?;
        }

        let mut summary = SeedSummary::default();
        let existing_clients = ClientRepository::count(pool).await?;
        let password_hash = hash_password(SEED_PASSWORD);

        let mut client_ids = Vec::with_capacity(self.config.client_count);
        for i in 0..self.config.client_count {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Client");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Seed");
            let name = format!("{} {}", first, last);
            let email = format!(
                "{}.{}{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                existing_clients + i as i64 + 1
            );
            let id = ClientRepository::insert(pool, &name, &email, &password_hash).await?;
            client_ids.push(id);
        }
        summary.clients = client_ids.len();

        if client_ids.is_empty() {
            if self.config.coin_count > 0 {
                warn!("No seed clients to own coins, skipping coins and transfers");
            }
            return Ok(summary);
        }

        let total_events = (self.config.coin_count + self.config.transaction_count) as i64;
        let mut event = 0i64;
        let mut next_age = || {
            event += 1;
            (total_events - event + 1) * SEED_STEP_MINUTES
        };

        // (coin_id, value, current owner)
        let mut coins: Vec<(i64, f64, i64)> = Vec::with_capacity(self.config.coin_count);
        let mut used = CoinRepository::used_components(pool).await?;
        for _ in 0..self.config.coin_count {
            let draw = find_unused_components(rng, &used)
                .map_err(|e| DatabaseError::Seed(e.to_string()))?;
            used.insert(draw.components);

            let value = f64::from(rng.gen_range(100u32..=100_000)) / 100.0;
            let owner = client_ids[rng.gen_range(0..client_ids.len())];
            let coin_id = CoinRepository::insert(pool, draw.components, value).await?;
            TransactionRepository::insert_backdated(
                pool,
                &NewTransaction {
                    coin_id,
                    seller_id: None,
                    buyer_id: owner,
                    amount: value,
                },
                next_age(),
            )
            .await?;
            coins.push((coin_id, value, owner));
            summary.coins += 1;
            summary.transactions += 1;
        }

        if coins.is_empty() || client_ids.len() < 2 {
            if self.config.transaction_count > 0 {
                warn!("Need at least one coin and two clients for seed transfers, skipping");
            }
            return Ok(summary);
        }

        for _ in 0..self.config.transaction_count {
            let index = rng.gen_range(0..coins.len());
            let (coin_id, value, seller) = coins[index];
            let buyer = loop {
                let candidate = client_ids[rng.gen_range(0..client_ids.len())];
                if candidate != seller {
                    break candidate;
                }
            };

            TransactionRepository::insert_backdated(
                pool,
                &NewTransaction {
                    coin_id,
                    seller_id: Some(seller),
                    buyer_id: buyer,
                    amount: value,
                },
                next_age(),
            )
            .await?;
            coins[index].2 = buyer;
            summary.transactions += 1;
        }

        info!(
            clients = summary.clients,
            coins = summary.coins,
            transactions = summary.transactions,
            "Database seeded"
        );

        Ok(summary)
    }

    /// Remove all rows and restart id sequences at 1
    pub async fn clear(pool: &SqlitePool) -> Result<()> {
        let mut tx = pool.begin().await?;
        for statement in [
            "DELETE FROM transactions",
            "DELETE FROM coins",
            "DELETE FROM clients",
            "DELETE FROM sqlite_sequence WHERE name IN ('transactions', 'coins', 'clients')",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Cleared existing data");
        Ok(())
    }
}
