// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller organization extractor.
//!
//! Identity and signing are handled in front of this node; requests arrive
//! with the caller's MSP ID in the `X-Msp-Id` header. The header must name a
//! channel member.
//!
//! ```rust,ignore
//! async fn my_handler(CallerOrg(msp_id): CallerOrg) -> impl IntoResponse {
//!     // msp_id is a known organization
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's MSP ID.
pub const MSP_ID_HEADER: &str = "x-msp-id";

/// MSP ID of the calling organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerOrg(pub String);

impl FromRequestParts<AppState> for CallerOrg {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let msp_id = parts
            .headers
            .get(MSP_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("X-Msp-Id header is required"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("X-Msp-Id header is not valid text"))?
            .trim();

        if !state.ledger.collections().is_organization(msp_id) {
            tracing::warn!(msp_id = %msp_id, "Request from unknown organization");
            return Err(ApiError::unauthorized(format!(
                "{msp_id} is not a member of this channel"
            )));
        }

        Ok(CallerOrg(msp_id.to_string()))
    }
}
