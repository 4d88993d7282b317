// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Organization Client
//!
//! How an organization issues protocol operations. A [`Gateway`] submits
//! state-changing operations with a transient map and evaluates queries with
//! plain string arguments.
//!
//! ## Implementations
//!
//! - [`LocalGateway`]: runs the engine in-process against a shared ledger
//! - [`HttpGateway`]: talks to a remote node's HTTP surface
//!
//! [`AssetClient`] layers typed helpers over either.
//!
//! ## Failures
//!
//! A [`GatewayError::Rejected`] carries one [`ErrorDetail`] per peer that
//! refused the proposal, in the order the peers answered. Business rejections
//! (`not_owner`, `agreement_not_found`, ...) are ordinary outcomes; check
//! [`GatewayError::is_business_rejection`] before treating one as a fault.

pub mod client;
pub mod http;
pub mod local;

use std::fmt::Write as _;
use std::future::Future;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use client::AssetClient;
pub use http::HttpGateway;
pub use local::LocalGateway;

use crate::contract::ErrorCode;
use crate::models::Transient;

/// One peer's reason for refusing a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Address of the peer.
    pub address: String,
    /// Organization the peer belongs to.
    pub msp_id: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The ledger refused the operation.
    #[error("{message}")]
    Rejected {
        code: ErrorCode,
        message: String,
        details: Vec<ErrorDetail>,
    },

    /// The node could not be reached or answered garbage.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A request or result payload could not be (de)serialized.
    #[error("payload codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            GatewayError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            GatewayError::Rejected { details, .. } => details,
            _ => &[],
        }
    }

    pub fn is_business_rejection(&self) -> bool {
        self.code().is_some_and(ErrorCode::is_business_rejection)
    }

    /// Multi-line description including every peer detail.
    pub fn describe(&self) -> String {
        let mut out = self.to_string();
        for detail in self.details() {
            let _ = write!(
                out,
                "\n- address: {}, mspId: {}, message: {}",
                detail.address, detail.msp_id, detail.message
            );
        }
        out
    }
}

/// A committed submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub tx_id: String,
    pub result: Vec<u8>,
}

/// Connection to the ledger on behalf of one organization.
pub trait Gateway: Send + Sync {
    /// MSP ID of the organization this gateway acts for.
    fn msp_id(&self) -> &str;

    /// Submit a state-changing operation. Resolves once the transaction is
    /// committed or refused.
    fn submit(
        &self,
        operation: &str,
        transient: Transient,
    ) -> impl Future<Output = Result<Committed, GatewayError>> + Send;

    /// Evaluate a query. Empty bytes mean "no data".
    fn evaluate(
        &self,
        operation: &str,
        args: Vec<String>,
    ) -> impl Future<Output = Result<Vec<u8>, GatewayError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_every_detail_in_order() {
        let err = GatewayError::Rejected {
            code: ErrorCode::NotOwner,
            message: "Org2MSP is not the owner of asset asset1".into(),
            details: vec![
                ErrorDetail {
                    address: "peer0.org1.example.com:7051".into(),
                    msp_id: "Org1MSP".into(),
                    message: "first".into(),
                },
                ErrorDetail {
                    address: "peer0.org2.example.com:9051".into(),
                    msp_id: "Org2MSP".into(),
                    message: "second".into(),
                },
            ],
        };

        let text = err.describe();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Org1MSP") && lines[1].ends_with("first"));
        assert!(lines[2].contains("Org2MSP") && lines[2].ends_with("second"));
        assert!(err.is_business_rejection());
    }

    #[test]
    fn transport_failures_are_not_business_rejections() {
        let err = GatewayError::Transport("connection refused".into());
        assert!(!err.is_business_rejection());
        assert!(err.details().is_empty());
        assert_eq!(err.code(), None);
    }

    #[test]
    fn detail_uses_msp_id_field_name() {
        let detail = ErrorDetail {
            address: "peer0.local".into(),
            msp_id: "Org1MSP".into(),
            message: "boom".into(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["mspId"], "Org1MSP");
    }
}
