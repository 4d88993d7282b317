// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset lifecycle: create, read, delete and purge.

use super::agreement::{agreed_value_key, agreement_key};
use super::codec::{
    decode_transient, read_json, require_asset_id, require_non_empty, require_positive,
    write_json,
};
use super::{ContractError, ContractResult};
use crate::ledger::{private_collection_name, CollectionReader, CollectionStore, ASSET_COLLECTION};
use crate::models::{
    Asset, AssetKey, AssetPrivateDetails, AssetProperties, Transient, TransferAgreement,
    TRANSIENT_ASSET_DELETE, TRANSIENT_ASSET_PROPERTIES, TRANSIENT_ASSET_PURGE,
};

/// Create an asset owned by the caller.
///
/// The public record goes to the shared collection; the appraised value only
/// to the caller's private collection.
pub fn create_asset<S>(store: &mut S, transient: &Transient) -> ContractResult<Asset>
where
    S: CollectionStore + ?Sized,
{
    let props: AssetProperties = decode_transient(transient, TRANSIENT_ASSET_PROPERTIES)?;
    require_non_empty("objectType", &props.object_type)?;
    require_asset_id(&props.asset_id)?;
    require_non_empty("color", &props.color)?;
    require_positive("size", props.size)?;
    require_positive("appraisedValue", props.appraised_value)?;

    if store.get(ASSET_COLLECTION, &props.asset_id)?.is_some() {
        return Err(ContractError::DuplicateAsset(props.asset_id));
    }

    let owner = store.caller().to_string();
    let asset = Asset {
        object_type: props.object_type,
        asset_id: props.asset_id,
        color: props.color,
        size: props.size,
        owner,
    };
    write_json(store, ASSET_COLLECTION, &asset.asset_id, &asset)?;

    let details = AssetPrivateDetails {
        asset_id: asset.asset_id.clone(),
        appraised_value: props.appraised_value,
    };
    write_json(
        store,
        &private_collection_name(&asset.owner),
        &asset.asset_id,
        &details,
    )?;

    tracing::info!(asset_id = %asset.asset_id, owner = %asset.owner, "Asset created");
    Ok(asset)
}

pub fn read_asset<R>(reader: &R, asset_id: &str) -> ContractResult<Option<Asset>>
where
    R: CollectionReader + ?Sized,
{
    require_asset_id(asset_id)?;
    read_json(reader, ASSET_COLLECTION, asset_id)
}

/// Private details of `asset_id` in `collection`.
///
/// Returns `None` both when the record is absent and when the caller is not
/// a member of `collection`.
pub fn read_asset_private_details<R>(
    reader: &R,
    collection: &str,
    asset_id: &str,
) -> ContractResult<Option<AssetPrivateDetails>>
where
    R: CollectionReader + ?Sized,
{
    require_non_empty("collection", collection)?;
    require_asset_id(asset_id)?;
    read_json(reader, collection, asset_id)
}

/// Assets with IDs in `[start, end)`. An empty `end` leaves the range open.
pub fn get_asset_by_range<R>(reader: &R, start: &str, end: &str) -> ContractResult<Vec<Asset>>
where
    R: CollectionReader + ?Sized,
{
    let mut assets = Vec::new();
    for (key, bytes) in reader.range(ASSET_COLLECTION, start, end)? {
        match serde_json::from_slice::<Asset>(&bytes) {
            Ok(asset) => assets.push(asset),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping undecodable asset record");
            }
        }
    }
    Ok(assets)
}

/// Delete an asset the caller owns, with its private details and any pending
/// agreement, including the buyer's agreed price. Prior versions stay in
/// history until purged.
pub fn delete_asset<S>(store: &mut S, transient: &Transient) -> ContractResult<()>
where
    S: CollectionStore + ?Sized,
{
    let input: AssetKey = decode_transient(transient, TRANSIENT_ASSET_DELETE)?;
    require_asset_id(&input.asset_id)?;

    let asset: Asset = read_json(&*store, ASSET_COLLECTION, &input.asset_id)?
        .ok_or_else(|| ContractError::NotFound(format!("asset {}", input.asset_id)))?;

    let caller = store.caller().to_string();
    if asset.owner != caller {
        return Err(ContractError::NotOwner {
            caller,
            asset_id: asset.asset_id,
        });
    }

    let key = agreement_key(&asset.asset_id);
    if let Some(agreement) = read_json::<_, TransferAgreement>(&*store, ASSET_COLLECTION, &key)? {
        store.delete(
            &private_collection_name(&agreement.buyer_id),
            &agreed_value_key(&asset.asset_id),
        )?;
        store.delete(ASSET_COLLECTION, &key)?;
    }
    store.delete(ASSET_COLLECTION, &asset.asset_id)?;
    store.delete(&private_collection_name(&caller), &asset.asset_id)?;

    tracing::info!(asset_id = %asset.asset_id, owner = %caller, "Asset deleted");
    Ok(())
}

/// Erase the caller's traces of an asset.
///
/// The caller's private collection is always purged: the private details
/// and any agreed price, live state and history. The public record and the
/// agreement in the shared collection are purged too unless another
/// organization owns the live asset; a former owner can therefore clear its
/// residual history after a transfer without touching the new owner's
/// record. Succeeds on assets that are already deleted or purged.
///
/// Returns the number of erased records.
pub fn purge_asset<S>(store: &mut S, transient: &Transient) -> ContractResult<usize>
where
    S: CollectionStore + ?Sized,
{
    let input: AssetKey = decode_transient(transient, TRANSIENT_ASSET_PURGE)?;
    require_asset_id(&input.asset_id)?;

    let caller = store.caller().to_string();
    let live_owner = read_json::<_, Asset>(&*store, ASSET_COLLECTION, &input.asset_id)?
        .map(|asset| asset.owner);

    let own_collection = private_collection_name(&caller);
    let mut erased = store.purge(&own_collection, &input.asset_id)?;
    erased += store.purge(&own_collection, &agreed_value_key(&input.asset_id))?;

    match live_owner {
        Some(owner) if owner != caller => {
            tracing::info!(
                asset_id = %input.asset_id,
                caller = %caller,
                owner = %owner,
                "Keeping shared records of an asset owned by another organization"
            );
        }
        _ => {
            erased += store.purge(ASSET_COLLECTION, &input.asset_id)?;
            erased += store.purge(ASSET_COLLECTION, &agreement_key(&input.asset_id))?;
        }
    }

    tracing::info!(asset_id = %input.asset_id, caller = %caller, erased, "Asset purged");
    Ok(erased)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::*;
    use crate::ledger::Ledger;

    #[test]
    fn create_then_read() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        let asset = ledger
            .evaluate(ORG2, |view| read_asset(view, "asset1"))
            .unwrap()
            .unwrap();
        assert_eq!(asset.owner, ORG1);
        assert_eq!(asset.color, "green");
        assert_eq!(asset.size, 20);

        let details = private_details(&ledger, ORG1, ORG1, "asset1").unwrap();
        assert_eq!(details.appraised_value, 100);
    }

    #[test]
    fn public_record_carries_no_appraised_value() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        let raw = ledger
            .evaluate(ORG2, |view| view.get(ASSET_COLLECTION, "asset1"))
            .unwrap()
            .unwrap();
        let text = String::from_utf8(raw).unwrap();
        assert!(!text.contains("appraisedValue"));
    }

    #[test]
    fn duplicate_create_is_rejected_without_side_effects() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        let height = ledger.height().unwrap();

        let err = submit_as(&ledger, ORG2, |tx| {
            create_asset(tx, &properties("asset1", 999))
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateAsset(ref id) if id == "asset1"));

        assert_eq!(ledger.height().unwrap(), height);
        assert!(private_details(&ledger, ORG2, ORG2, "asset1").is_none());
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
    }

    #[test]
    fn create_validates_input() {
        let ledger = ledger();
        for (id, value) in [("", 100), ("bad\u{0}id", 100), ("asset1", 0)] {
            let err = submit_as(&ledger, ORG1, |tx| create_asset(tx, &properties(id, value)))
                .unwrap_err();
            assert!(matches!(err, ContractError::InvalidInput(_)), "{id:?}/{value}");
        }

        let err = submit_as(&ledger, ORG1, |tx| create_asset(tx, &Transient::new())).unwrap_err();
        assert!(matches!(err, ContractError::InvalidInput(_)));
        assert_eq!(ledger.height().unwrap(), 0);
    }

    #[test]
    fn read_of_unknown_asset_is_none() {
        let ledger = ledger();
        let asset = ledger
            .evaluate(ORG1, |view| read_asset(view, "ghost"))
            .unwrap();
        assert!(asset.is_none());
    }

    #[test]
    fn private_details_are_invisible_to_non_members() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        assert!(private_details(&ledger, ORG2, ORG1, "asset1").is_none());
        assert!(private_details(&ledger, ORG2, ORG2, "asset1").is_none());
    }

    #[test]
    fn range_returns_assets_in_key_order() {
        let ledger = ledger();
        for id in ["asset3", "asset1", "asset2"] {
            create(&ledger, ORG1, id, 10);
        }
        agree(&ledger, ORG2, "asset1", 10);

        let ids = |start: &str, end: &str| -> Vec<String> {
            ledger
                .evaluate(ORG2, |view| get_asset_by_range(view, start, end))
                .unwrap()
                .into_iter()
                .map(|a| a.asset_id)
                .collect()
        };

        assert_eq!(ids("asset1", "asset3"), vec!["asset1", "asset2"]);
        assert_eq!(ids("", ""), vec!["asset1", "asset2", "asset3"]);
        assert_eq!(ids("asset2", ""), vec!["asset2", "asset3"]);
        assert!(ids("zzz", "").is_empty());
    }

    #[test]
    fn non_owner_cannot_delete() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);

        let err = submit_as(&ledger, ORG2, |tx| delete_asset(tx, &key_input(TRANSIENT_ASSET_DELETE, "asset1")))
            .unwrap_err();
        assert!(matches!(err, ContractError::NotOwner { .. }));
        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
    }

    #[test]
    fn owner_delete_removes_everything_live() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        submit_as(&ledger, ORG1, |tx| delete_asset(tx, &key_input(TRANSIENT_ASSET_DELETE, "asset1")))
            .unwrap();

        assert!(owner_of(&ledger, "asset1").is_none());
        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_none());
        assert!(agreement_of(&ledger, "asset1").is_none());
        let agreed = ledger
            .evaluate(ORG2, |view| {
                view.get(&private_collection_name(ORG2), &agreed_value_key("asset1"))
            })
            .unwrap();
        assert!(agreed.is_none());

        // tombstoned, not erased
        let history = ledger
            .history(ORG1, &private_collection_name(ORG1), "asset1")
            .unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[1].is_delete);
    }

    #[test]
    fn delete_of_unknown_asset_is_not_found() {
        let ledger = ledger();
        let err = submit_as(&ledger, ORG1, |tx| delete_asset(tx, &key_input(TRANSIENT_ASSET_DELETE, "ghost")))
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound(_)));
    }

    #[test]
    fn purge_is_idempotent_and_erases_history() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        submit_as(&ledger, ORG1, |tx| delete_asset(tx, &key_input(TRANSIENT_ASSET_DELETE, "asset1")))
            .unwrap();

        let first = submit_as(&ledger, ORG1, |tx| purge_asset(tx, &key_input(TRANSIENT_ASSET_PURGE, "asset1")))
            .unwrap();
        assert!(first > 0);
        let second = submit_as(&ledger, ORG1, |tx| purge_asset(tx, &key_input(TRANSIENT_ASSET_PURGE, "asset1")))
            .unwrap();
        assert_eq!(second, 0);

        assert!(ledger
            .history(ORG1, &private_collection_name(ORG1), "asset1")
            .unwrap()
            .is_empty());
        assert!(ledger
            .history(ORG1, ASSET_COLLECTION, "asset1")
            .unwrap()
            .is_empty());
        assert!(owner_of(&ledger, "asset1").is_none());
    }

    fn purge(ledger: &Ledger, org: &str, asset_id: &str) -> usize {
        submit_as(ledger, org, |tx| purge_asset(tx, &key_input(TRANSIENT_ASSET_PURGE, asset_id)))
            .unwrap()
    }

    #[test]
    fn non_owner_purge_leaves_shared_records_alone() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);

        purge(&ledger, ORG2, "asset1");

        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG1));
        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_some());
        assert_eq!(agreement_of(&ledger, "asset1").unwrap().buyer_id, ORG2);
        assert!(ledger
            .history(ORG2, &private_collection_name(ORG2), &agreed_value_key("asset1"))
            .unwrap()
            .is_empty());

        purge(&ledger, ORG1, "asset1");
        assert!(owner_of(&ledger, "asset1").is_none());
        assert!(private_details(&ledger, ORG1, ORG1, "asset1").is_none());
        assert!(agreement_of(&ledger, "asset1").is_none());
    }

    #[test]
    fn former_owner_purges_residual_history_after_transfer() {
        let ledger = ledger();
        create(&ledger, ORG1, "asset1", 100);
        agree(&ledger, ORG2, "asset1", 100);
        submit_as(&ledger, ORG1, |tx| {
            crate::contract::transfer::transfer_asset(tx, &owner_input("asset1", ORG2))
        })
        .unwrap();

        let seller_collection = private_collection_name(ORG1);
        assert_eq!(
            ledger.history(ORG1, &seller_collection, "asset1").unwrap().len(),
            2
        );

        assert_eq!(purge(&ledger, ORG1, "asset1"), 2);
        assert!(ledger
            .history(ORG1, &seller_collection, "asset1")
            .unwrap()
            .is_empty());

        assert_eq!(owner_of(&ledger, "asset1").as_deref(), Some(ORG2));
        assert_eq!(
            private_details(&ledger, ORG2, ORG2, "asset1").unwrap().appraised_value,
            100
        );
        assert!(!ledger
            .history(ORG1, ASSET_COLLECTION, "asset1")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn purge_of_never_created_asset_succeeds() {
        let ledger = ledger();
        let erased = submit_as(&ledger, ORG2, |tx| purge_asset(tx, &key_input(TRANSIENT_ASSET_PURGE, "ghost")))
            .unwrap();
        assert_eq!(erased, 0);
    }
}
