// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Records kept permanently by the ledger.
//!
//! The transaction log is public to every channel member. It carries hashes
//! of private writes only: never plaintext private values, never transient
//! input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// Kind of change a transaction made to a private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WriteKind {
    Put,
    Delete,
    Purge,
}

/// Hashed trace of one private write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivateWrite {
    pub collection: String,
    /// SHA-256 of the key, hex encoded.
    pub key_hash: String,
    pub kind: WriteKind,
    /// SHA-256 of the written value, hex encoded. Absent for deletes and purges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_hash: Option<String>,
}

impl PrivateWrite {
    pub fn new(collection: &str, key: &str, kind: WriteKind, value: Option<&[u8]>) -> Self {
        Self {
            collection: collection.to_string(),
            key_hash: hex_digest(key.as_bytes()),
            kind,
            value_hash: value.map(hex_digest),
        }
    }
}

/// One committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    pub tx_id: String,
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    /// MSP ID of the submitting organization.
    pub creator: String,
    pub writes: Vec<PrivateWrite>,
}

/// One version of a private key, as retained until purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub height: u64,
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<u8>>,
}

pub(crate) fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

pub(crate) fn hex_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
