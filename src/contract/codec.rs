// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON plumbing between transient input, collection values and records.

use serde::{de::DeserializeOwned, Serialize};

use super::{ContractError, ContractResult};
use crate::ledger::{CollectionReader, CollectionStore};
use crate::models::Transient;

/// Decode the JSON struct carried under `key` in the transient map.
pub fn decode_transient<T: DeserializeOwned>(transient: &Transient, key: &str) -> ContractResult<T> {
    let bytes = transient.get(key).ok_or_else(|| {
        ContractError::InvalidInput(format!("{key} key not found in the transient map"))
    })?;

    if bytes.is_empty() {
        return Err(ContractError::InvalidInput(format!(
            "{key} value in the transient map must be a non-empty JSON string"
        )));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| ContractError::InvalidInput(format!("failed to decode {key}: {e}")))
}

pub fn read_json<R, T>(reader: &R, collection: &str, key: &str) -> ContractResult<Option<T>>
where
    R: CollectionReader + ?Sized,
    T: DeserializeOwned,
{
    match reader.get(collection, key)? {
        Some(bytes) => Ok(Some(
            serde_json::from_slice(&bytes).map_err(crate::ledger::LedgerError::from)?,
        )),
        None => Ok(None),
    }
}

pub fn write_json<S, T>(store: &mut S, collection: &str, key: &str, value: &T) -> ContractResult<()>
where
    S: CollectionStore + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(value).map_err(crate::ledger::LedgerError::from)?;
    store.put(collection, key, &bytes)?;
    Ok(())
}

/// Query result bytes: JSON for a hit, empty for "no data".
pub fn encode_optional<T: Serialize>(value: Option<T>) -> ContractResult<Vec<u8>> {
    match value {
        Some(value) => Ok(serde_json::to_vec(&value).map_err(crate::ledger::LedgerError::from)?),
        None => Ok(Vec::new()),
    }
}

pub fn require_asset_id(asset_id: &str) -> ContractResult<()> {
    if asset_id.is_empty() {
        return Err(ContractError::InvalidInput(
            "assetID field must be a non-empty string".to_string(),
        ));
    }
    if asset_id.contains('\u{0}') {
        return Err(ContractError::InvalidInput(
            "assetID field must not contain NUL characters".to_string(),
        ));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> ContractResult<()> {
    if value.is_empty() {
        return Err(ContractError::InvalidInput(format!(
            "{field} field must be a non-empty string"
        )));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: u32) -> ContractResult<()> {
    if value == 0 {
        return Err(ContractError::InvalidInput(format!(
            "{field} field must be a positive integer"
        )));
    }
    Ok(())
}
