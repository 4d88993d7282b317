// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transfer Protocol Engine
//!
//! The operations of the private asset transfer protocol, written against the
//! [`CollectionReader`]/[`CollectionStore`] capabilities. The engine never
//! checks collection membership itself: the store it is handed is already
//! scoped to the calling organization.
//!
//! ## Operations
//!
//! | Operation | Kind | Input |
//! |-----------|------|-------|
//! | `CreateAsset` | submit | transient `asset_properties` |
//! | `AgreeToTransfer` | submit | transient `asset_value` |
//! | `TransferAsset` | submit | transient `asset_owner` |
//! | `DeleteAsset` | submit | transient `asset_delete` |
//! | `PurgeAsset` | submit | transient `asset_purge` |
//! | `ReadAsset` | evaluate | `[assetID]` |
//! | `ReadAssetPrivateDetails` | evaluate | `[collection, assetID]` |
//! | `ReadTransferAgreement` | evaluate | `[assetID]` |
//! | `GetAssetByRange` | evaluate | `[startKey, endKey]` |
//!
//! Submits return empty bytes. Evaluations return JSON, or empty bytes when
//! there is no data.

pub mod agreement;
pub mod asset;
pub mod codec;
pub mod error;
pub mod transfer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use error::{ContractError, ContractResult, ErrorCode};

use crate::ledger::{CollectionReader, CollectionStore};
use crate::models::Transient;

/// Named protocol operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Operation {
    CreateAsset,
    AgreeToTransfer,
    TransferAsset,
    DeleteAsset,
    PurgeAsset,
    ReadAsset,
    ReadAssetPrivateDetails,
    ReadTransferAgreement,
    GetAssetByRange,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::CreateAsset,
        Operation::AgreeToTransfer,
        Operation::TransferAsset,
        Operation::DeleteAsset,
        Operation::PurgeAsset,
        Operation::ReadAsset,
        Operation::ReadAssetPrivateDetails,
        Operation::ReadTransferAgreement,
        Operation::GetAssetByRange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateAsset => "CreateAsset",
            Operation::AgreeToTransfer => "AgreeToTransfer",
            Operation::TransferAsset => "TransferAsset",
            Operation::DeleteAsset => "DeleteAsset",
            Operation::PurgeAsset => "PurgeAsset",
            Operation::ReadAsset => "ReadAsset",
            Operation::ReadAssetPrivateDetails => "ReadAssetPrivateDetails",
            Operation::ReadTransferAgreement => "ReadTransferAgreement",
            Operation::GetAssetByRange => "GetAssetByRange",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ContractError::UnknownOperation(s.to_string()))
    }
}

/// Run a state-changing operation inside the caller's transaction.
pub fn submit<S>(store: &mut S, operation: Operation, transient: &Transient) -> ContractResult<Vec<u8>>
where
    S: CollectionStore + ?Sized,
{
    match operation {
        Operation::CreateAsset => asset::create_asset(store, transient).map(|_| ()),
        Operation::AgreeToTransfer => agreement::agree_to_transfer(store, transient).map(|_| ()),
        Operation::TransferAsset => transfer::transfer_asset(store, transient).map(|_| ()),
        Operation::DeleteAsset => asset::delete_asset(store, transient),
        Operation::PurgeAsset => asset::purge_asset(store, transient).map(|_| ()),
        query => {
            return Err(ContractError::InvalidInput(format!(
                "{query} is a query and must be evaluated"
            )))
        }
    }?;
    Ok(Vec::new())
}

/// Run a read-only operation against a snapshot.
pub fn evaluate<R>(reader: &R, operation: Operation, args: &[String]) -> ContractResult<Vec<u8>>
where
    R: CollectionReader + ?Sized,
{
    match operation {
        Operation::ReadAsset => {
            let [asset_id] = expect_args::<1>(operation, args)?;
            codec::encode_optional(asset::read_asset(reader, asset_id)?)
        }
        Operation::ReadAssetPrivateDetails => {
            let [collection, asset_id] = expect_args::<2>(operation, args)?;
            codec::encode_optional(asset::read_asset_private_details(
                reader, collection, asset_id,
            )?)
        }
        Operation::ReadTransferAgreement => {
            let [asset_id] = expect_args::<1>(operation, args)?;
            codec::encode_optional(agreement::read_transfer_agreement(reader, asset_id)?)
        }
        Operation::GetAssetByRange => {
            let [start, end] = expect_args::<2>(operation, args)?;
            let assets = asset::get_asset_by_range(reader, start, end)?;
            Ok(serde_json::to_vec(&assets).map_err(crate::ledger::LedgerError::from)?)
        }
        mutation => Err(ContractError::InvalidInput(format!(
            "{mutation} changes ledger state and must be submitted"
        ))),
    }
}

fn expect_args<const N: usize>(operation: Operation, args: &[String]) -> ContractResult<[&str; N]> {
    if args.len() != N {
        return Err(ContractError::InvalidInput(format!(
            "{operation} expects {N} argument(s), got {}",
            args.len()
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for protocol tests.

    use super::*;
    use crate::ledger::{private_collection_name, CollectionRegistry, Ledger, LedgerTx};
    use crate::models::{
        AssetPrivateDetails, TransferAgreement, TRANSIENT_ASSET_OWNER,
        TRANSIENT_ASSET_PROPERTIES, TRANSIENT_ASSET_VALUE,
    };

    pub const ORG1: &str = "Org1MSP";
    pub const ORG2: &str = "Org2MSP";
    pub const ORG3: &str = "Org3MSP";

    pub fn ledger() -> Ledger {
        Ledger::in_memory(CollectionRegistry::for_organizations(&[ORG1, ORG2])).unwrap()
    }

    pub fn three_org_ledger() -> Ledger {
        Ledger::in_memory(CollectionRegistry::for_organizations(&[ORG1, ORG2, ORG3])).unwrap()
    }

    pub fn submit_as<T>(
        ledger: &Ledger,
        org: &str,
        f: impl FnOnce(&mut LedgerTx<'_>) -> ContractResult<T>,
    ) -> ContractResult<T> {
        ledger.submit(org, "test", f).map(|(value, _)| value)
    }

    pub fn json_transient(key: &str, value: serde_json::Value) -> Transient {
        Transient::from([(key.to_string(), serde_json::to_vec(&value).unwrap())])
    }

    pub fn properties(asset_id: &str, appraised_value: u32) -> Transient {
        json_transient(
            TRANSIENT_ASSET_PROPERTIES,
            serde_json::json!({
                "objectType": "asset",
                "assetID": asset_id,
                "color": "green",
                "size": 20,
                "appraisedValue": appraised_value,
            }),
        )
    }

    pub fn value_input(asset_id: &str, appraised_value: u32) -> Transient {
        json_transient(
            TRANSIENT_ASSET_VALUE,
            serde_json::json!({ "assetID": asset_id, "appraisedValue": appraised_value }),
        )
    }

    pub fn owner_input(asset_id: &str, buyer: &str) -> Transient {
        json_transient(
            TRANSIENT_ASSET_OWNER,
            serde_json::json!({ "assetID": asset_id, "buyerMSP": buyer }),
        )
    }

    pub fn key_input(transient_key: &str, asset_id: &str) -> Transient {
        json_transient(transient_key, serde_json::json!({ "assetID": asset_id }))
    }

    pub fn create(ledger: &Ledger, org: &str, asset_id: &str, appraised_value: u32) {
        submit_as(ledger, org, |tx| {
            asset::create_asset(tx, &properties(asset_id, appraised_value))
        })
        .unwrap();
    }

    pub fn agree(ledger: &Ledger, org: &str, asset_id: &str, appraised_value: u32) {
        submit_as(ledger, org, |tx| {
            agreement::agree_to_transfer(tx, &value_input(asset_id, appraised_value))
        })
        .unwrap();
    }

    pub fn owner_of(ledger: &Ledger, asset_id: &str) -> Option<String> {
        ledger
            .evaluate(ORG1, |view| asset::read_asset(view, asset_id))
            .unwrap()
            .map(|asset| asset.owner)
    }

    pub fn agreement_of(ledger: &Ledger, asset_id: &str) -> Option<TransferAgreement> {
        agreement_seen_by(ledger, ORG1, asset_id)
    }

    pub fn agreement_seen_by(
        ledger: &Ledger,
        reader: &str,
        asset_id: &str,
    ) -> Option<TransferAgreement> {
        ledger
            .evaluate(reader, |view| agreement::read_transfer_agreement(view, asset_id))
            .unwrap()
    }

    /// Private details of `asset_id` in `owner`'s collection, as seen by `reader`.
    pub fn private_details(
        ledger: &Ledger,
        reader: &str,
        owner: &str,
        asset_id: &str,
    ) -> Option<AssetPrivateDetails> {
        ledger
            .evaluate(reader, |view| {
                asset::read_asset_private_details(view, &private_collection_name(owner), asset_id)
            })
            .unwrap()
    }
}
