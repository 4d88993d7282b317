// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer agreements.
//!
//! A buyer records the price it accepts for an asset. The shared collection
//! only learns who the buyer is: the agreement record under
//! [`agreement_key`] holds the asset and buyer IDs, while the price is
//! written to the buyer's own private collection under [`agreed_value_key`].
//! A transfer matches the two sides by comparing value hashes, which every
//! channel member can read without seeing the value.
//!
//! There is one agreement slot per asset: a later `AgreeToTransfer`, from the
//! same or a different buyer, replaces the earlier one. The seller then
//! transfers to whichever buyer holds the slot.

use super::codec::{decode_transient, read_json, require_asset_id, require_positive, write_json};
use super::{ContractError, ContractResult};
use crate::ledger::keys::composite_key;
use crate::ledger::{private_collection_name, CollectionReader, CollectionStore, ASSET_COLLECTION};
use crate::models::{
    Asset, AssetPrivateDetails, AssetValue, Transient, TransferAgreement, TRANSIENT_ASSET_VALUE,
};

const AGREEMENT_OBJECT_TYPE: &str = "transferAgreement";
const AGREED_VALUE_OBJECT_TYPE: &str = "agreedValue";

/// Key of the agreement slot for `asset_id` in the shared collection.
pub fn agreement_key(asset_id: &str) -> String {
    composite_key(AGREEMENT_OBJECT_TYPE, &[asset_id])
}

/// Key of the buyer's agreed price in the buyer's private collection.
///
/// Kept apart from the asset key so the buyer's collection never holds the
/// live private details before the transfer commits.
pub fn agreed_value_key(asset_id: &str) -> String {
    composite_key(AGREED_VALUE_OBJECT_TYPE, &[asset_id])
}

/// Record the caller's offer to buy an asset.
pub fn agree_to_transfer<S>(store: &mut S, transient: &Transient) -> ContractResult<TransferAgreement>
where
    S: CollectionStore + ?Sized,
{
    let input: AssetValue = decode_transient(transient, TRANSIENT_ASSET_VALUE)?;
    require_asset_id(&input.asset_id)?;
    require_positive("appraisedValue", input.appraised_value)?;

    let asset: Asset = read_json(&*store, ASSET_COLLECTION, &input.asset_id)?
        .ok_or_else(|| ContractError::NotFound(format!("asset {}", input.asset_id)))?;

    let buyer = store.caller().to_string();
    if asset.owner == buyer {
        return Err(ContractError::InvalidInput(format!(
            "{buyer} already owns asset {}",
            asset.asset_id
        )));
    }

    let key = agreement_key(&asset.asset_id);
    let value_key = agreed_value_key(&asset.asset_id);
    if let Some(previous) = read_json::<_, TransferAgreement>(&*store, ASSET_COLLECTION, &key)? {
        if previous.buyer_id != buyer {
            tracing::info!(
                asset_id = %asset.asset_id,
                previous_buyer = %previous.buyer_id,
                buyer = %buyer,
                "Replacing transfer agreement from another buyer"
            );
            store.delete(&private_collection_name(&previous.buyer_id), &value_key)?;
        }
    }

    let record = TransferAgreement {
        asset_id: asset.asset_id.clone(),
        buyer_id: buyer.clone(),
        appraised_value: None,
    };
    write_json(store, ASSET_COLLECTION, &key, &record)?;

    let agreed = AssetPrivateDetails {
        asset_id: asset.asset_id,
        appraised_value: input.appraised_value,
    };
    write_json(store, &private_collection_name(&buyer), &value_key, &agreed)?;

    tracing::info!(asset_id = %record.asset_id, buyer = %buyer, "Transfer agreement recorded");
    Ok(TransferAgreement {
        appraised_value: Some(agreed.appraised_value),
        ..record
    })
}

/// The agreement for `asset_id`, if any.
///
/// The agreed price is included only when the caller can read the buyer's
/// private collection.
pub fn read_transfer_agreement<R>(reader: &R, asset_id: &str) -> ContractResult<Option<TransferAgreement>>
where
    R: CollectionReader + ?Sized,
{
    require_asset_id(asset_id)?;
    let Some(mut agreement) =
        read_json::<_, TransferAgreement>(reader, ASSET_COLLECTION, &agreement_key(asset_id))?
    else {
        return Ok(None);
    };

    agreement.appraised_value = read_json::<_, AssetPrivateDetails>(
        reader,
        &private_collection_name(&agreement.buyer_id),
        &agreed_value_key(asset_id),
    )?
    .map(|agreed| agreed.appraised_value);
    Ok(Some(agreement))
}
