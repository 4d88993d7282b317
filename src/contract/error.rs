// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Protocol errors.
//!
//! Every variant except [`ContractError::Ledger`] is an expected business
//! rejection: the operation was refused by the protocol rules and nothing
//! was written. Callers treat those as ordinary control flow.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ledger::LedgerError;

/// Stable, serializable identifier for each error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    DuplicateAsset,
    AgreementNotFound,
    AgreementMismatch,
    NotOwner,
    NotFound,
    InvalidInput,
    UnknownOperation,
    LedgerFailure,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateAsset => "duplicate_asset",
            ErrorCode::AgreementNotFound => "agreement_not_found",
            ErrorCode::AgreementMismatch => "agreement_mismatch",
            ErrorCode::NotOwner => "not_owner",
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::UnknownOperation => "unknown_operation",
            ErrorCode::LedgerFailure => "ledger_failure",
        }
    }

    /// `false` only for unexpected system failures.
    pub fn is_business_rejection(self) -> bool {
        !matches!(self, ErrorCode::LedgerFailure)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("asset already exists: {0}")]
    DuplicateAsset(String),

    #[error("no transfer agreement found for asset {0}")]
    AgreementNotFound(String),

    #[error("transfer agreement for asset {asset_id} does not match: {reason}")]
    AgreementMismatch { asset_id: String, reason: String },

    #[error("{caller} is not the owner of asset {asset_id}")]
    NotOwner { caller: String, asset_id: String },

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ContractError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ContractError::DuplicateAsset(_) => ErrorCode::DuplicateAsset,
            ContractError::AgreementNotFound(_) => ErrorCode::AgreementNotFound,
            ContractError::AgreementMismatch { .. } => ErrorCode::AgreementMismatch,
            ContractError::NotOwner { .. } => ErrorCode::NotOwner,
            ContractError::NotFound(_) => ErrorCode::NotFound,
            ContractError::InvalidInput(_) => ErrorCode::InvalidInput,
            ContractError::UnknownOperation(_) => ErrorCode::UnknownOperation,
            ContractError::Ledger(_) => ErrorCode::LedgerFailure,
        }
    }

    pub fn is_business_rejection(&self) -> bool {
        self.code().is_business_rejection()
    }

    pub(crate) fn mismatch(asset_id: &str, reason: impl Into<String>) -> Self {
        ContractError::AgreementMismatch {
            asset_id: asset_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
