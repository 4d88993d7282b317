// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Readiness of the node and its ledger.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// "ok" or "degraded".
    pub status: &'static str,
    pub checks: NodeChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NodeChecks {
    pub service: &'static str,
    /// "ok" when a read transaction succeeds, "unavailable" otherwise.
    pub ledger: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    /// Channel members, in MSP ID order.
    pub organizations: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Readiness probe: 503 while the ledger cannot be read.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Node is ready", body = ReadinessResponse),
        (status = 503, description = "Ledger unreadable", body = ReadinessResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let organizations = state
        .ledger
        .collections()
        .organizations()
        .into_iter()
        .map(str::to_string)
        .collect();

    let (status, checks) = match state.ledger.height() {
        Ok(height) => (
            StatusCode::OK,
            NodeChecks {
                service: "ok",
                ledger: "ok",
                height: Some(height),
                organizations,
            },
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Ledger readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                NodeChecks {
                    service: "ok",
                    ledger: "unavailable",
                    height: None,
                    organizations,
                },
            )
        }
    };

    let overall = if status.is_success() { "ok" } else { "degraded" };
    (
        status,
        Json(ReadinessResponse {
            status: overall,
            checks,
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is up", body = LivenessResponse)
    )
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "ok" })
}
