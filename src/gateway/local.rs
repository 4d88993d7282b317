// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process gateway.
//!
//! Runs the protocol engine directly against a shared [`Ledger`] as one
//! organization. The HTTP node surface and tests both go through this type.
//! Ledger work is blocking (redb) and runs on tokio's blocking pool.

use std::sync::Arc;

use super::{Committed, ErrorDetail, Gateway, GatewayError};
use crate::contract::{self, ContractError, Operation};
use crate::ledger::Ledger;
use crate::models::Transient;

#[derive(Clone)]
pub struct LocalGateway {
    ledger: Arc<Ledger>,
    msp_id: String,
    peer_address: String,
}

impl LocalGateway {
    pub fn new(ledger: Arc<Ledger>, msp_id: impl Into<String>, peer_address: impl Into<String>) -> Self {
        Self {
            ledger,
            msp_id: msp_id.into(),
            peer_address: peer_address.into(),
        }
    }

    /// Run a submit on the current thread.
    pub fn submit_blocking(&self, operation: &str, transient: &Transient) -> Result<Committed, GatewayError> {
        let outcome = operation.parse::<Operation>().and_then(|op| {
            self.ledger
                .submit(&self.msp_id, op.name(), |tx| contract::submit(tx, op, transient))
        });

        match outcome {
            Ok((result, record)) => Ok(Committed {
                tx_id: record.tx_id,
                result,
            }),
            Err(err) => Err(self.reject(operation, err)),
        }
    }

    /// Run an evaluation on the current thread.
    pub fn evaluate_blocking(&self, operation: &str, args: &[String]) -> Result<Vec<u8>, GatewayError> {
        operation
            .parse::<Operation>()
            .and_then(|op| {
                self.ledger
                    .evaluate(&self.msp_id, |view| contract::evaluate(view, op, args))
            })
            .map_err(|err| self.reject(operation, err))
    }

    fn reject(&self, operation: &str, err: ContractError) -> GatewayError {
        if err.is_business_rejection() {
            tracing::info!(
                operation,
                msp_id = %self.msp_id,
                error_code = %err.code(),
                error = %err,
                "Operation rejected"
            );
        } else {
            tracing::error!(
                operation,
                msp_id = %self.msp_id,
                error = %err,
                "Operation failed"
            );
        }

        let message = err.to_string();
        GatewayError::Rejected {
            code: err.code(),
            message: message.clone(),
            details: vec![ErrorDetail {
                address: self.peer_address.clone(),
                msp_id: self.msp_id.clone(),
                message,
            }],
        }
    }
}

impl Gateway for LocalGateway {
    fn msp_id(&self) -> &str {
        &self.msp_id
    }

    async fn submit(&self, operation: &str, transient: Transient) -> Result<Committed, GatewayError> {
        let gateway = self.clone();
        let operation = operation.to_string();
        tokio::task::spawn_blocking(move || gateway.submit_blocking(&operation, &transient))
            .await
            .map_err(|e| GatewayError::Transport(format!("submit task failed: {e}")))?
    }

    async fn evaluate(&self, operation: &str, args: Vec<String>) -> Result<Vec<u8>, GatewayError> {
        let gateway = self.clone();
        let operation = operation.to_string();
        tokio::task::spawn_blocking(move || gateway.evaluate_blocking(&operation, &args))
            .await
            .map_err(|e| GatewayError::Transport(format!("evaluate task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ErrorCode;
    use crate::ledger::CollectionRegistry;
    use crate::models::TRANSIENT_ASSET_PROPERTIES;

    fn gateway(ledger: &Arc<Ledger>, msp_id: &str) -> LocalGateway {
        LocalGateway::new(Arc::clone(ledger), msp_id, format!("peer0.{msp_id}"))
    }

    fn shared_ledger() -> Arc<Ledger> {
        Arc::new(
            Ledger::in_memory(CollectionRegistry::for_organizations(&["Org1MSP", "Org2MSP"]))
                .unwrap(),
        )
    }

    fn create_transient(asset_id: &str) -> Transient {
        let json = format!(
            r#"{{"objectType":"asset","assetID":"{asset_id}","color":"blue","size":5,"appraisedValue":50}}"#
        );
        Transient::from([(TRANSIENT_ASSET_PROPERTIES.to_string(), json.into_bytes())])
    }

    #[tokio::test]
    async fn submit_commits_and_reports_tx_id() {
        let ledger = shared_ledger();
        let org1 = gateway(&ledger, "Org1MSP");

        let committed = org1.submit("CreateAsset", create_transient("asset1")).await.unwrap();
        assert!(committed.result.is_empty());

        let record = ledger.transaction(&committed.tx_id).unwrap().unwrap();
        assert_eq!(record.operation, "CreateAsset");
        assert_eq!(record.creator, "Org1MSP");
    }

    #[tokio::test]
    async fn rejection_carries_peer_detail() {
        let ledger = shared_ledger();
        let org1 = gateway(&ledger, "Org1MSP");
        org1.submit("CreateAsset", create_transient("asset1")).await.unwrap();

        let err = org1
            .submit("CreateAsset", create_transient("asset1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::DuplicateAsset));
        assert!(err.is_business_rejection());

        let details = err.details();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].address, "peer0.Org1MSP");
        assert_eq!(details[0].msp_id, "Org1MSP");
        assert!(details[0].message.contains("asset1"));
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected() {
        let ledger = shared_ledger();
        let err = gateway(&ledger, "Org1MSP")
            .evaluate("InitLedger", Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnknownOperation));
    }

    #[tokio::test]
    async fn evaluate_returns_empty_for_no_data() {
        let ledger = shared_ledger();
        let bytes = gateway(&ledger, "Org2MSP")
            .evaluate("ReadAsset", vec!["ghost".into()])
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
