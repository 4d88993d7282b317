// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capability-scoped access to private data collections.
//!
//! A store handed to the protocol engine is already bound to the calling
//! organization. The engine names collections and keys; the store decides
//! what that organization can see.

use super::LedgerResult;

/// SHA-256 digest of a stored value.
pub type ValueHash = [u8; 32];

/// Read side of a collection store.
pub trait CollectionReader {
    /// MSP ID of the organization this store is scoped to.
    fn caller(&self) -> &str;

    /// Live value of `key`, or `None` when absent or not readable by the caller.
    fn get(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Hash of the live value of `key`.
    ///
    /// Hashes are visible to every channel member, including organizations
    /// that cannot read the value itself.
    fn get_hash(&self, collection: &str, key: &str) -> LedgerResult<Option<ValueHash>>;

    /// Simple keys in `[start, end)`, in key order. Empty bounds are open.
    fn range(&self, collection: &str, start: &str, end: &str)
        -> LedgerResult<Vec<(String, Vec<u8>)>>;
}

/// Write side of a collection store. All writes belong to one atomic
/// transaction.
pub trait CollectionStore: CollectionReader {
    fn put(&mut self, collection: &str, key: &str, value: &[u8]) -> LedgerResult<()>;

    /// Remove the live value. History is kept. Deleting an absent key is a no-op.
    fn delete(&mut self, collection: &str, key: &str) -> LedgerResult<()>;

    /// Remove the live value and every historical version. Returns the number
    /// of records erased.
    fn purge(&mut self, collection: &str, key: &str) -> LedgerResult<usize>;
}
