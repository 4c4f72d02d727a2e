//! Ledger Service

use std::sync::Arc;

use bootstrap::{Infrastructure, run_http};
use tracing::{info, warn};

use ledger::api::{self, AppState};
use ledger::domain::OrderRepository;
use ledger::infrastructure::persistence::PostgresOrderRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_http("config", |infra: Infrastructure| async move {
        info!("Initializing ledger service...");

        let repository = Arc::new(PostgresOrderRepository::new(infra.postgres_pool()));

        // 启动时预热建表，每笔订单写入前仍会再确认一次
        let warmup = repository.clone();
        tokio::spawn(async move {
            match warmup.ensure_schema().await {
                Ok(()) => info!("Orders table ready"),
                Err(e) => warn!(error = %e, "Orders table not ensured at startup"),
            }
        });

        Ok(api::routes(AppState::new(repository)))
    })
    .await
}
