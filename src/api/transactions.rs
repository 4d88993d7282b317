// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Submit and evaluate endpoints.
//!
//! Both run the protocol engine as the organization named in `X-Msp-Id`,
//! through this node's [`LocalGateway`](crate::gateway::LocalGateway).

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64ct::{Base64, Encoding};

use crate::auth::CallerOrg;
use crate::error::{ApiError, ErrorBody};
use crate::gateway::Gateway;
use crate::models::{EvaluateRequest, SubmitRequest, SubmitResponse};
use crate::state::AppState;

/// Submit a state-changing operation.
#[utoipa::path(
    post,
    path = "/v1/transactions/submit",
    tag = "Transactions",
    request_body = SubmitRequest,
    params(
        ("X-Msp-Id" = String, Header, description = "MSP ID of the calling organization")
    ),
    responses(
        (status = 200, description = "Transaction committed", body = SubmitResponse),
        (status = 400, description = "Invalid input or unknown operation", body = ErrorBody),
        (status = 401, description = "Unknown organization", body = ErrorBody),
        (status = 403, description = "Caller does not own the asset", body = ErrorBody),
        (status = 404, description = "Asset not found", body = ErrorBody),
        (status = 409, description = "Duplicate asset or agreement failure", body = ErrorBody)
    )
)]
pub async fn submit_transaction(
    State(state): State<AppState>,
    CallerOrg(msp_id): CallerOrg,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let transient = request.decode_transient().map_err(ApiError::bad_request)?;

    let committed = state
        .gateway_for(&msp_id)
        .submit(&request.operation, transient)
        .await?;

    tracing::info!(
        tx_id = %committed.tx_id,
        operation = %request.operation,
        msp_id = %msp_id,
        "Transaction committed"
    );

    Ok(Json(SubmitResponse {
        tx_id: committed.tx_id,
        result: Base64::encode_string(&committed.result),
    }))
}

/// Evaluate a query.
///
/// The body is the raw JSON result; an empty body means no data.
#[utoipa::path(
    post,
    path = "/v1/transactions/evaluate",
    tag = "Transactions",
    request_body = EvaluateRequest,
    params(
        ("X-Msp-Id" = String, Header, description = "MSP ID of the calling organization")
    ),
    responses(
        (status = 200, description = "Query result, empty when there is no data"),
        (status = 400, description = "Invalid input or unknown operation", body = ErrorBody),
        (status = 401, description = "Unknown organization", body = ErrorBody)
    )
)]
pub async fn evaluate_transaction(
    State(state): State<AppState>,
    CallerOrg(msp_id): CallerOrg,
    Json(request): Json<EvaluateRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .gateway_for(&msp_id)
        .evaluate(&request.operation, request.args)
        .await?;

    if result.is_empty() {
        return Ok(StatusCode::OK.into_response());
    }
    Ok(([(CONTENT_TYPE, "application/json")], result).into_response())
}
