use bitslow_api::{ApiConfig, ApiServer};
use bitslow_db::repositories::{ClientRepository, CoinRepository, TransactionRepository};
use bitslow_db::{DatabaseConfig, DatabasePool, SeedConfig, Seeder};
use bitslow_metrics::{MetricsConfig, MetricsServer};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("bitslow_api=info".parse()?)
                .add_directive("bitslow_db=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("BitSlow exchange starting...");

    // Metrics recorder goes in first so startup seeding is counted
    let metrics_config = MetricsConfig::from_env();
    if metrics_config.enabled {
        match MetricsServer::install(metrics_config) {
            Ok(metrics_server) => {
                tokio::spawn(async move {
                    if let Err(e) = metrics_server.run().await {
                        error!(error = %e, "Metrics server error");
                    }
                });
                info!("Metrics server started");
            }
            Err(e) => warn!(error = %e, "Failed to install metrics recorder, continuing without metrics"),
        }
    }

    let db_config = DatabaseConfig::from_env();
    let db = match DatabasePool::new(&db_config).await {
        Ok(pool) => {
            if let Err(e) = pool.migrate().await {
                error!(error = %e, "Failed to run database migrations");
                std::process::exit(1);
            }
            info!(url = %db_config.url, "Database connected and migrations applied");
            Arc::new(pool)
        }
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    let seed_config = SeedConfig::from_env();
    if seed_config.enabled {
        info!(
            clients = seed_config.client_count,
            coins = seed_config.coin_count,
            transactions = seed_config.transaction_count,
            clear_existing = seed_config.clear_existing,
            "Seeding database"
        );
        if let Err(e) = Seeder::new(seed_config).run(db.inner()).await {
            error!(error = %e, "Failed to seed database");
            std::process::exit(1);
        }
    } else {
        info!("Seeding disabled, keeping existing data");
    }

    // Setup shutdown signal
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received (Ctrl+C)");
        shutdown_tx_clone.send(()).ok();
    });

    // Spawn status printer
    let db_for_status = db.clone();
    let status = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            let pool = db_for_status.inner();
            let counts = tokio::try_join!(
                ClientRepository::count(pool),
                CoinRepository::count(pool),
                TransactionRepository::count(pool),
            );
            match counts {
                Ok((clients, coins, transactions)) => {
                    info!(clients, coins, transactions, "Status");
                    bitslow_metrics::gauges::set_clients(clients);
                    bitslow_metrics::gauges::set_coins(coins);
                }
                Err(e) => warn!(error = %e, "Failed to read status counts"),
            }
        }
    });

    let api_server = ApiServer::new(ApiConfig::from_env(), db.clone());
    let shutdown = async move {
        shutdown_rx.recv().await.ok();
    };
    if let Err(e) = api_server.run(shutdown).await {
        error!(error = %e, "API server error");
        std::process::exit(1);
    }

    // Graceful shutdown
    info!("Shutting down...");
    status.abort();

    db.close().await;
    info!("Database connections closed");

    info!("BitSlow exchange shutdown complete");
    Ok(())
}
