// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed asset-transfer client over any [`Gateway`].

use serde::{de::DeserializeOwned, Serialize};

use super::{Committed, Gateway, GatewayError};
use crate::contract::Operation;
use crate::ledger::private_collection_name;
use crate::models::{
    Asset, AssetKey, AssetOwner, AssetPrivateDetails, AssetProperties, AssetValue, Transient,
    TransferAgreement, TRANSIENT_ASSET_DELETE, TRANSIENT_ASSET_OWNER, TRANSIENT_ASSET_PROPERTIES,
    TRANSIENT_ASSET_PURGE, TRANSIENT_ASSET_VALUE,
};

pub struct AssetClient<G> {
    gateway: G,
}

impl<G: Gateway> AssetClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Name of this organization's own private collection.
    pub fn own_collection(&self) -> String {
        private_collection_name(self.gateway.msp_id())
    }

    pub async fn create_asset(&self, properties: &AssetProperties) -> Result<Committed, GatewayError> {
        self.submit(Operation::CreateAsset, TRANSIENT_ASSET_PROPERTIES, properties)
            .await
    }

    pub async fn agree_to_transfer(&self, value: &AssetValue) -> Result<Committed, GatewayError> {
        self.submit(Operation::AgreeToTransfer, TRANSIENT_ASSET_VALUE, value)
            .await
    }

    pub async fn transfer_asset(&self, owner: &AssetOwner) -> Result<Committed, GatewayError> {
        self.submit(Operation::TransferAsset, TRANSIENT_ASSET_OWNER, owner)
            .await
    }

    pub async fn delete_asset(&self, asset_id: &str) -> Result<Committed, GatewayError> {
        let key = AssetKey {
            asset_id: asset_id.to_string(),
        };
        self.submit(Operation::DeleteAsset, TRANSIENT_ASSET_DELETE, &key)
            .await
    }

    pub async fn purge_asset(&self, asset_id: &str) -> Result<Committed, GatewayError> {
        let key = AssetKey {
            asset_id: asset_id.to_string(),
        };
        self.submit(Operation::PurgeAsset, TRANSIENT_ASSET_PURGE, &key)
            .await
    }

    pub async fn read_asset(&self, asset_id: &str) -> Result<Option<Asset>, GatewayError> {
        self.evaluate(Operation::ReadAsset, vec![asset_id.to_string()])
            .await
    }

    pub async fn read_asset_private_details(
        &self,
        collection: &str,
        asset_id: &str,
    ) -> Result<Option<AssetPrivateDetails>, GatewayError> {
        self.evaluate(
            Operation::ReadAssetPrivateDetails,
            vec![collection.to_string(), asset_id.to_string()],
        )
        .await
    }

    pub async fn read_transfer_agreement(
        &self,
        asset_id: &str,
    ) -> Result<Option<TransferAgreement>, GatewayError> {
        self.evaluate(Operation::ReadTransferAgreement, vec![asset_id.to_string()])
            .await
    }

    /// Assets in `[start, end)`; an empty `end` is unbounded.
    pub async fn get_asset_by_range(&self, start: &str, end: &str) -> Result<Vec<Asset>, GatewayError> {
        let assets = self
            .evaluate(
                Operation::GetAssetByRange,
                vec![start.to_string(), end.to_string()],
            )
            .await?;
        Ok(assets.unwrap_or_default())
    }

    async fn submit<T: Serialize>(
        &self,
        operation: Operation,
        key: &str,
        input: &T,
    ) -> Result<Committed, GatewayError> {
        let transient = Transient::from([(key.to_string(), serde_json::to_vec(input)?)]);
        self.gateway.submit(operation.name(), transient).await
    }

    async fn evaluate<T: DeserializeOwned>(
        &self,
        operation: Operation,
        args: Vec<String>,
    ) -> Result<Option<T>, GatewayError> {
        let bytes = self.gateway.evaluate(operation.name(), args).await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
