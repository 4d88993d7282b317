// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Asset Data Models
//!
//! Ledger records and transient inputs of the private asset transfer
//! protocol. Field names are part of the wire contract with existing
//! clients and ledgers and must not change.
//!
//! ## Model Categories
//!
//! - **Ledger records**: [`Asset`], [`AssetPrivateDetails`], [`TransferAgreement`]
//! - **Transient inputs**: one struct per transient map key, never persisted
//!   as submitted
//! - **Node API**: [`SubmitRequest`], [`SubmitResponse`], [`EvaluateRequest`]

use std::collections::BTreeMap;

use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Transient payload map: key → opaque bytes (JSON for every key in use).
pub type Transient = BTreeMap<String, Vec<u8>>;

// =============================================================================
// Transient Keys
// =============================================================================

pub const TRANSIENT_ASSET_PROPERTIES: &str = "asset_properties";
pub const TRANSIENT_ASSET_VALUE: &str = "asset_value";
pub const TRANSIENT_ASSET_OWNER: &str = "asset_owner";
pub const TRANSIENT_ASSET_DELETE: &str = "asset_delete";
pub const TRANSIENT_ASSET_PURGE: &str = "asset_purge";

// =============================================================================
// Ledger Records
// =============================================================================

/// Public asset record, visible to every channel member.
///
/// The appraised value is deliberately absent; it lives only in the owner's
/// private collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Asset {
    #[serde(rename = "objectType")]
    pub object_type: String,
    #[serde(rename = "assetID")]
    pub asset_id: String,
    pub color: String,
    pub size: u32,
    /// MSP ID of the owning organization.
    pub owner: String,
}

/// Confidential asset details, held in exactly one organization's private
/// collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetPrivateDetails {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    #[serde(rename = "appraisedValue")]
    pub appraised_value: u32,
}

/// A buyer's standing offer to take an asset.
///
/// Only `assetID` and `buyerID` are stored in the shared collection. The
/// agreed price stays in the buyer's private collection, so
/// `appraisedValue` is filled in only for callers that can read it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TransferAgreement {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    /// MSP ID of the prospective buyer.
    #[serde(rename = "buyerID")]
    pub buyer_id: String,
    #[serde(
        rename = "appraisedValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub appraised_value: Option<u32>,
}

// =============================================================================
// Transient Inputs
// =============================================================================

/// `asset_properties`: everything needed to create an asset.
///
/// Untagged clients send PascalCase field names; both spellings decode.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetProperties {
    #[serde(rename = "objectType", alias = "ObjectType")]
    pub object_type: String,
    #[serde(rename = "assetID", alias = "AssetID")]
    pub asset_id: String,
    #[serde(alias = "Color")]
    pub color: String,
    #[serde(alias = "Size")]
    pub size: u32,
    #[serde(rename = "appraisedValue", alias = "AppraisedValue")]
    pub appraised_value: u32,
}

/// `asset_value`: the price a buyer agrees to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetValue {
    #[serde(rename = "assetID", alias = "AssetID")]
    pub asset_id: String,
    #[serde(rename = "appraisedValue", alias = "AppraisedValue")]
    pub appraised_value: u32,
}

/// `asset_owner`: the buyer a seller transfers to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetOwner {
    #[serde(rename = "assetID", alias = "AssetID")]
    pub asset_id: String,
    #[serde(rename = "buyerMSP", alias = "BuyerMSP")]
    pub buyer_msp: String,
}

/// `asset_delete` and `asset_purge`: just the asset ID.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetKey {
    #[serde(rename = "assetID", alias = "AssetID")]
    pub asset_id: String,
}

// =============================================================================
// Node API
// =============================================================================

/// Submit a state-changing operation.
///
/// Transient values travel base64-encoded; they reach the protocol engine but
/// never the transaction log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// Operation name, e.g. `CreateAsset`.
    pub operation: String,
    /// Transient map: key → base64 of the raw value.
    #[serde(default)]
    pub transient: BTreeMap<String, String>,
}

impl SubmitRequest {
    pub fn new(operation: impl Into<String>, transient: &Transient) -> Self {
        Self {
            operation: operation.into(),
            transient: transient
                .iter()
                .map(|(key, value)| (key.clone(), Base64::encode_string(value)))
                .collect(),
        }
    }

    /// Decode the base64 transient values back to raw bytes.
    pub fn decode_transient(&self) -> Result<Transient, String> {
        self.transient
            .iter()
            .map(|(key, value)| {
                Base64::decode_vec(value)
                    .map(|bytes| (key.clone(), bytes))
                    .map_err(|e| format!("transient value {key} is not valid base64: {e}"))
            })
            .collect()
    }
}

/// Outcome of a committed submit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// ID of the committed transaction.
    pub tx_id: String,
    /// Base64 of the operation result (empty for every current operation).
    pub result: String,
}

/// Evaluate a read-only operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluateRequest {
    /// Operation name, e.g. `ReadAsset`.
    pub operation: String,
    #[serde(default)]
    pub args: Vec<String>,
}
