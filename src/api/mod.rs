// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    contract::{ErrorCode, Operation},
    error::ErrorBody,
    gateway::ErrorDetail,
    ledger::{PrivateWrite, TxRecord, WriteKind},
    models::{
        Asset, AssetKey, AssetOwner, AssetPrivateDetails, AssetProperties, AssetValue,
        EvaluateRequest, SubmitRequest, SubmitResponse, TransferAgreement,
    },
    state::AppState,
};

pub mod health;
pub mod ledger;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/transactions/submit", post(transactions::submit_transaction))
        .route(
            "/transactions/evaluate",
            post(transactions::evaluate_transaction),
        )
        .route("/ledger/transactions", get(ledger::list_transactions))
        .route("/ledger/transactions/{tx_id}", get(ledger::get_transaction))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        transactions::submit_transaction,
        transactions::evaluate_transaction,
        ledger::list_transactions,
        ledger::get_transaction,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            Asset,
            AssetPrivateDetails,
            TransferAgreement,
            AssetProperties,
            AssetValue,
            AssetOwner,
            AssetKey,
            SubmitRequest,
            SubmitResponse,
            EvaluateRequest,
            Operation,
            ErrorBody,
            ErrorDetail,
            ErrorCode,
            TxRecord,
            PrivateWrite,
            WriteKind
        )
    ),
    tags(
        (name = "Transactions", description = "Submit and evaluate protocol operations"),
        (name = "Ledger", description = "Public transaction log"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
