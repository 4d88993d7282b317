// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public transaction log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{ApiError, ErrorBody};
use crate::ledger::TxRecord;
use crate::state::AppState;

/// List every committed transaction in commit order.
#[utoipa::path(
    get,
    path = "/v1/ledger/transactions",
    tag = "Ledger",
    responses(
        (status = 200, description = "Transaction log", body = Vec<TxRecord>)
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TxRecord>>, ApiError> {
    let records = state.ledger.transactions().map_err(|e| {
        tracing::error!(error = %e, "Failed to read transaction log");
        ApiError::internal("failed to read transaction log")
    })?;
    Ok(Json(records))
}

/// Look up a single committed transaction.
#[utoipa::path(
    get,
    path = "/v1/ledger/transactions/{tx_id}",
    tag = "Ledger",
    params(
        ("tx_id" = String, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction", body = TxRecord),
        (status = 404, description = "Unknown transaction", body = ErrorBody)
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(tx_id): Path<String>,
) -> Result<Json<TxRecord>, ApiError> {
    let record = state.ledger.transaction(&tx_id).map_err(|e| {
        tracing::error!(tx_id = %tx_id, error = %e, "Failed to read transaction log");
        ApiError::internal("failed to read transaction log")
    })?;

    record.map(Json).ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("transaction {tx_id} does not exist"),
        )
    })
}
