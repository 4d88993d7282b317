// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use private_asset_transfer::{
    api::router,
    config::Config,
    ledger::{CollectionRegistry, Ledger},
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    let registry = CollectionRegistry::for_organizations(&config.organizations);
    let ledger_path = config.ledger_path();
    let ledger = Ledger::open(&ledger_path, registry).map_err(|e| {
        error!(path = %ledger_path.display(), error = %e, "Failed to open ledger");
        e
    })?;
    let height = ledger.height()?;
    info!(
        path = %ledger_path.display(),
        height,
        organizations = ?config.organizations,
        "Ledger opened"
    );

    let state = AppState::new(Arc::new(ledger), config.peer_name.clone());
    let app = router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        peer = %config.peer_name,
        "Private asset transfer node listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
