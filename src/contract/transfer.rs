// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership transfer.
//!
//! The seller never sends the price and never reads the buyer's. The hash of
//! the seller's stored private details must equal the hash of the price the
//! buyer stored in its own collection, so neither side can transfer at a
//! value the other did not commit to.

use super::agreement::{agreed_value_key, agreement_key};
use super::codec::{decode_transient, read_json, require_asset_id, require_non_empty, write_json};
use super::{ContractError, ContractResult};
use crate::ledger::{private_collection_name, CollectionStore, ASSET_COLLECTION};
use crate::models::{Asset, AssetOwner, Transient, TransferAgreement, TRANSIENT_ASSET_OWNER};

/// Transfer an asset the caller owns to the buyer holding its agreement.
///
/// On success the public owner changes, the private details move from the
/// seller's collection to the buyer's, and the agreement and the buyer's
/// agreed price are consumed, all in the caller's transaction.
pub fn transfer_asset<S>(store: &mut S, transient: &Transient) -> ContractResult<Asset>
where
    S: CollectionStore + ?Sized,
{
    let input: AssetOwner = decode_transient(transient, TRANSIENT_ASSET_OWNER)?;
    require_asset_id(&input.asset_id)?;
    require_non_empty("buyerMSP", &input.buyer_msp)?;

    let mut asset: Asset = read_json(&*store, ASSET_COLLECTION, &input.asset_id)?
        .ok_or_else(|| ContractError::NotFound(format!("asset {}", input.asset_id)))?;

    let seller = store.caller().to_string();
    if asset.owner != seller {
        return Err(ContractError::NotOwner {
            caller: seller,
            asset_id: asset.asset_id,
        });
    }
    if input.buyer_msp == seller {
        return Err(ContractError::InvalidInput(format!(
            "{seller} cannot transfer asset {} to itself",
            asset.asset_id
        )));
    }

    let key = agreement_key(&asset.asset_id);
    let agreement: TransferAgreement = read_json(&*store, ASSET_COLLECTION, &key)?
        .ok_or_else(|| ContractError::AgreementNotFound(asset.asset_id.clone()))?;

    if agreement.buyer_id != input.buyer_msp {
        return Err(ContractError::mismatch(
            &asset.asset_id,
            format!(
                "agreement is held by {}, not {}",
                agreement.buyer_id, input.buyer_msp
            ),
        ));
    }

    let seller_collection = private_collection_name(&seller);
    let details = store
        .get(&seller_collection, &asset.asset_id)?
        .ok_or_else(|| {
            ContractError::NotFound(format!("private details of asset {}", asset.asset_id))
        })?;

    let buyer_collection = private_collection_name(&agreement.buyer_id);
    let value_key = agreed_value_key(&asset.asset_id);
    let agreed = store.get_hash(&buyer_collection, &value_key)?;
    let stored = store.get_hash(&seller_collection, &asset.asset_id)?;
    if agreed.is_none() || agreed != stored {
        tracing::info!(
            asset_id = %asset.asset_id,
            seller = %seller,
            buyer = %agreement.buyer_id,
            "Appraised value does not match the agreement"
        );
        return Err(ContractError::mismatch(
            &asset.asset_id,
            "appraised value does not match the seller's private details",
        ));
    }

    asset.owner = agreement.buyer_id;
    write_json(store, ASSET_COLLECTION, &asset.asset_id, &asset)?;
    store.delete(&seller_collection, &asset.asset_id)?;
    store.put(&buyer_collection, &asset.asset_id, &details)?;
    store.delete(&buyer_collection, &value_key)?;
    store.delete(ASSET_COLLECTION, &key)?;

    tracing::info!(
        asset_id = %asset.asset_id,
        seller = %seller,
        buyer = %asset.owner,
        "Asset transferred"
    );
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use super::*;
    use crate::contract::testing::*;
    use crate::ledger::Ledger;
    use crate::ledger::store::CollectionReader;

    fn transfer(ledger: &Ledger, org: &str, asset_id: &str, buyer: &str) -> ContractResult<Asset> {
        submit_as(ledger, org, |tx| {
            transfer_asset(tx, &owner_input(asset_id, buyer))
        })
    }

    #[test]
    fn agreed_transfer_moves_ownership_and_details() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        let asset = transfer(&ledger, ORG1, "asset1", ORG2).unwrap();
        assert_eq!(asset.owner, ORG2);
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG2));

        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_none());
        let moved = private_details(&ledger, ORG2, ORG2, "asset1").unwrap();
        assert_eq!(moved.appraised_value, 100);

        assert!(agreement_of(&ledger, "asset1").is_none());
        let leftover = ledger
            .evaluate(ORG2, |view| {
                view.get(&private_collection_name(ORG2), &agreed_value_key("asset1"))
            })
            .unwrap();
        assert!(leftover.is_none());
    }

    #[test]
    fn transfer_fails_when_buyer_price_is_gone() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);
        submit_as(&ledger, ORG2, |tx| {
            tx.purge(&private_collection_name(ORG2), &agreed_value_key("asset1"))
                .map_err(ContractError::from)
        })
        .unwrap();

        let err = transfer(&ledger, ORG1, "asset1", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::AgreementMismatch { .. }));
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
    }

    #[test]
    fn transfer_without_agreement_fails() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        let err = transfer(&ledger, ORG1, "asset1", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::AgreementNotFound(_)));
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_some());
    }

    #[test]
    fn price_mismatch_leaves_state_untouched() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 90);
        let height = ledger.height().unwrap();

        let err = transfer(&ledger, ORG1, "asset1", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::AgreementMismatch { .. }));

        assert_eq!(ledger.height().unwrap(), height);
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_some());
        assert!(private_details(&ledger, ORG2, ORG2, "asset1").is_none());
        assert!(agreement_of(&ledger, "asset1").is_some());
    }

    #[test]
    fn buyer_mismatch_is_rejected() {
        let ledger = three_org_ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        let err = transfer(&ledger, ORG1, "asset1", ORG3).unwrap_err();
        assert!(matches!(err, ContractError::AgreementMismatch { .. }));
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
    }

    #[test]
    fn only_the_owner_can_transfer() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        let err = transfer(&ledger, ORG2, "asset1", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::NotOwner { .. }));
    }

    #[test]
    fn transfer_to_self_is_invalid() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        let err = transfer(&ledger, ORG1, "asset1", ORG1).unwrap_err();
        assert!(matches!(err, ContractError::InvalidInput(_)));
    }

    #[test]
    fn transfer_of_unknown_asset_is_not_found() {
        let ledger = ledger();
        let err = transfer(&ledger, ORG1, "ghost", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::NotFound(_)));
    }

    #[test]
    fn replaced_agreement_decides_the_buyer() {
        let ledger = three_org_ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);
        agree(&ledger, ORG3, "asset1", 100);

        let err = transfer(&ledger, ORG1, "asset1", ORG2).unwrap_err();
        assert!(matches!(err, ContractError::AgreementMismatch { .. }));

        transfer(&ledger, ORG1, "asset1", ORG3).unwrap();
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG3));
    }

    #[test]
    fn new_owner_can_sell_on() {
        let ledger = three_org_ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);
        transfer(&ledger, ORG1, "asset1", ORG2).unwrap();

        agree(&ledger, ORG3, "asset1", 100);
        transfer(&ledger, ORG2, "asset1", ORG3).unwrap();

        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG3));
        assert!(private_details(&ledger, ORG2, ORG2, "asset1").is_none());
        assert!(private_details(&ledger, ORG3, ORG3, "asset1").is_some());
    }

    #[test]
    fn conflicting_transfers_commit_exactly_once() {
        let ledger = Arc::new(ledger());
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    transfer(&ledger, ORG1, "asset1", ORG2)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let committed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, ContractError::NotOwner { .. }));
        }

        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG2));
        assert!(private_details(&ledger, ORG2, ORG2, "asset1").is_some());
    }
}
