// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-node ledger backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `private_state`: collection|key → live value bytes
//! - `private_history`: collection|key|height → serialized HistoryEntry
//! - `tx_log`: height → serialized TxRecord
//! - `ledger_meta`: name → u64 (current height)
//!
//! Every submitted operation runs in exactly one redb write transaction. redb
//! allows a single writer at a time, so submits are serializable; evaluations
//! read from a snapshot and never block writers.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{
    backends::InMemoryBackend, Database, ReadTransaction, ReadableDatabase, ReadableTable,
    TableDefinition, WriteTransaction,
};

use super::collections::CollectionRegistry;
use super::keys;
use super::record::{digest, HistoryEntry, PrivateWrite, TxRecord, WriteKind};
use super::store::{CollectionReader, CollectionStore, ValueHash};
use super::{LedgerError, LedgerResult};

// =============================================================================
// Table Definitions
// =============================================================================

/// Live private values: `collection|0x00|key` → value bytes.
const PRIVATE_STATE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("private_state");

/// Version history: `collection|0x00|key|0x00|height_be` → HistoryEntry (JSON).
const PRIVATE_HISTORY: TableDefinition<&[u8], &[u8]> = TableDefinition::new("private_history");

/// Permanent transaction log: height → TxRecord (JSON).
const TX_LOG: TableDefinition<u64, &[u8]> = TableDefinition::new("tx_log");

/// Ledger counters.
const LEDGER_META: TableDefinition<&str, u64> = TableDefinition::new("ledger_meta");

const HEIGHT_KEY: &str = "height";

// =============================================================================
// Ledger
// =============================================================================

/// Embedded ledger holding every private data collection.
pub struct Ledger {
    db: Database,
    collections: CollectionRegistry,
}

impl Ledger {
    /// Open (or create) the ledger at the given path.
    pub fn open(path: &Path, collections: CollectionRegistry) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;
        Self::init(db, collections)
    }

    /// Volatile ledger, used by tests and throwaway nodes.
    pub fn in_memory(collections: CollectionRegistry) -> LedgerResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db, collections)
    }

    fn init(db: Database, collections: CollectionRegistry) -> LedgerResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRIVATE_STATE)?;
            let _ = write_txn.open_table(PRIVATE_HISTORY)?;
            let _ = write_txn.open_table(TX_LOG)?;
            let _ = write_txn.open_table(LEDGER_META)?;
        }
        write_txn.commit()?;

        Ok(Self { db, collections })
    }

    pub fn collections(&self) -> &CollectionRegistry {
        &self.collections
    }

    /// Height of the last committed transaction (0 for an empty ledger).
    pub fn height(&self) -> LedgerResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LEDGER_META)?;
        let height = table.get(HEIGHT_KEY)?.map(|v| v.value()).unwrap_or(0);
        Ok(height)
    }

    /// Run `f` as one atomic transaction on behalf of `msp_id`.
    ///
    /// The effects of `f` are committed together with a transaction log entry
    /// when it returns `Ok`; when it returns `Err` nothing is written.
    pub fn submit<T, E, F>(&self, msp_id: &str, operation: &str, f: F) -> Result<(T, TxRecord), E>
    where
        F: FnOnce(&mut LedgerTx<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let txn = self.db.begin_write().map_err(LedgerError::from)?;
        let height = {
            let meta = txn.open_table(LEDGER_META).map_err(LedgerError::from)?;
            let current = meta
                .get(HEIGHT_KEY)
                .map_err(LedgerError::from)?
                .map(|v| v.value())
                .unwrap_or(0);
            current + 1
        };

        let mut tx = LedgerTx {
            txn,
            registry: &self.collections,
            caller: msp_id.to_string(),
            tx_id: uuid::Uuid::new_v4().to_string(),
            height,
            timestamp: Utc::now(),
            writes: Vec::new(),
        };

        match f(&mut tx) {
            Ok(value) => {
                let record = tx.commit(operation)?;
                Ok((value, record))
            }
            Err(err) => {
                tx.abort();
                Err(err)
            }
        }
    }

    /// Run `f` against a read-only snapshot on behalf of `msp_id`.
    pub fn evaluate<T, E, F>(&self, msp_id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&LedgerView<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let txn = self.db.begin_read().map_err(LedgerError::from)?;
        let view = LedgerView {
            txn,
            registry: &self.collections,
            caller: msp_id.to_string(),
        };
        f(&view)
    }

    /// Full transaction log in commit order.
    pub fn transactions(&self) -> LedgerResult<Vec<TxRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TX_LOG)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }

    /// Look up a committed transaction by ID.
    pub fn transaction(&self, tx_id: &str) -> LedgerResult<Option<TxRecord>> {
        Ok(self
            .transactions()?
            .into_iter()
            .find(|record| record.tx_id == tx_id))
    }

    /// Retained versions of a private key, oldest first.
    ///
    /// Scoped like any other private read: organizations that cannot read the
    /// collection get an empty list.
    pub fn history(
        &self,
        msp_id: &str,
        collection: &str,
        key: &str,
    ) -> LedgerResult<Vec<HistoryEntry>> {
        if !self.collections.can_read(msp_id, collection) {
            return Ok(Vec::new());
        }

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRIVATE_HISTORY)?;
        let (start, end) = keys::history_range(collection, key);

        let mut entries = Vec::new();
        for (_, value) in scan(&table, &start, &end)? {
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }
}

// =============================================================================
// Write Transaction
// =============================================================================

/// A pending transaction scoped to the submitting organization.
pub struct LedgerTx<'a> {
    txn: WriteTransaction,
    registry: &'a CollectionRegistry,
    caller: String,
    tx_id: String,
    height: u64,
    timestamp: DateTime<Utc>,
    writes: Vec<PrivateWrite>,
}

impl LedgerTx<'_> {
    fn record_history(&mut self, collection: &str, key: &str, value: Option<&[u8]>) -> LedgerResult<()> {
        let entry = HistoryEntry {
            height: self.height,
            tx_id: self.tx_id.clone(),
            timestamp: self.timestamp,
            is_delete: value.is_none(),
            value: value.map(<[u8]>::to_vec),
        };
        let json = serde_json::to_vec(&entry)?;

        let mut table = self.txn.open_table(PRIVATE_HISTORY)?;
        let key = keys::history_key(collection, key, self.height);
        table.insert(key.as_slice(), json.as_slice())?;
        Ok(())
    }

    fn commit(self, operation: &str) -> LedgerResult<TxRecord> {
        let record = TxRecord {
            tx_id: self.tx_id,
            height: self.height,
            timestamp: self.timestamp,
            operation: operation.to_string(),
            creator: self.caller,
            writes: self.writes,
        };
        let json = serde_json::to_vec(&record)?;

        {
            let mut meta = self.txn.open_table(LEDGER_META)?;
            meta.insert(HEIGHT_KEY, record.height)?;

            let mut log = self.txn.open_table(TX_LOG)?;
            log.insert(record.height, json.as_slice())?;
        }
        self.txn.commit()?;

        tracing::debug!(
            tx_id = %record.tx_id,
            height = record.height,
            operation = %record.operation,
            creator = %record.creator,
            "Transaction committed"
        );
        Ok(record)
    }

    fn abort(self) {
        if let Err(e) = self.txn.abort() {
            tracing::warn!(tx_id = %self.tx_id, error = %e, "Failed to abort transaction");
        }
    }
}

impl CollectionReader for LedgerTx<'_> {
    fn caller(&self) -> &str {
        &self.caller
    }

    fn get(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        if !self.registry.can_read(&self.caller, collection) {
            return Ok(None);
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        lookup(&table, &keys::state_key(collection, key))
    }

    fn get_hash(&self, collection: &str, key: &str) -> LedgerResult<Option<ValueHash>> {
        if self.registry.get(collection).is_none() {
            return Ok(None);
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        Ok(lookup(&table, &keys::state_key(collection, key))?.map(|v| digest(&v)))
    }

    fn range(
        &self,
        collection: &str,
        start: &str,
        end: &str,
    ) -> LedgerResult<Vec<(String, Vec<u8>)>> {
        if !self.registry.can_read(&self.caller, collection) {
            return Ok(Vec::new());
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        scan_collection(&table, collection, start, end)
    }
}

impl CollectionStore for LedgerTx<'_> {
    fn put(&mut self, collection: &str, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.registry.check_write(&self.caller, collection)?;
        {
            let mut table = self.txn.open_table(PRIVATE_STATE)?;
            table.insert(keys::state_key(collection, key).as_slice(), value)?;
        }
        self.record_history(collection, key, Some(value))?;
        self.writes
            .push(PrivateWrite::new(collection, key, WriteKind::Put, Some(value)));
        Ok(())
    }

    fn delete(&mut self, collection: &str, key: &str) -> LedgerResult<()> {
        self.registry.check_write(&self.caller, collection)?;
        let removed = {
            let mut table = self.txn.open_table(PRIVATE_STATE)?;
            let removed = table.remove(keys::state_key(collection, key).as_slice())?.is_some();
            removed
        };
        if removed {
            self.record_history(collection, key, None)?;
            self.writes
                .push(PrivateWrite::new(collection, key, WriteKind::Delete, None));
        }
        Ok(())
    }

    fn purge(&mut self, collection: &str, key: &str) -> LedgerResult<usize> {
        self.registry.check_purge(&self.caller, collection)?;
        let mut erased = 0;

        {
            let mut state = self.txn.open_table(PRIVATE_STATE)?;
            if state.remove(keys::state_key(collection, key).as_slice())?.is_some() {
                erased += 1;
            }
        }

        {
            let mut history = self.txn.open_table(PRIVATE_HISTORY)?;
            let (start, end) = keys::history_range(collection, key);
            let versions = scan(&history, &start, &end)?;
            for (version_key, _) in &versions {
                history.remove(version_key.as_slice())?;
            }
            erased += versions.len();
        }

        if erased > 0 {
            self.writes
                .push(PrivateWrite::new(collection, key, WriteKind::Purge, None));
        }
        Ok(erased)
    }
}

// =============================================================================
// Read Snapshot
// =============================================================================

/// Read-only snapshot scoped to the evaluating organization.
pub struct LedgerView<'a> {
    txn: ReadTransaction,
    registry: &'a CollectionRegistry,
    caller: String,
}

impl CollectionReader for LedgerView<'_> {
    fn caller(&self) -> &str {
        &self.caller
    }

    fn get(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        if !self.registry.can_read(&self.caller, collection) {
            return Ok(None);
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        lookup(&table, &keys::state_key(collection, key))
    }

    fn get_hash(&self, collection: &str, key: &str) -> LedgerResult<Option<ValueHash>> {
        if self.registry.get(collection).is_none() {
            return Ok(None);
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        Ok(lookup(&table, &keys::state_key(collection, key))?.map(|v| digest(&v)))
    }

    fn range(
        &self,
        collection: &str,
        start: &str,
        end: &str,
    ) -> LedgerResult<Vec<(String, Vec<u8>)>> {
        if !self.registry.can_read(&self.caller, collection) {
            return Ok(Vec::new());
        }
        let table = self.txn.open_table(PRIVATE_STATE)?;
        scan_collection(&table, collection, start, end)
    }
}

// =============================================================================
// Table Helpers
// =============================================================================

fn lookup<T>(table: &T, key: &[u8]) -> LedgerResult<Option<Vec<u8>>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    Ok(table.get(key)?.map(|v| v.value().to_vec()))
}

fn scan<T>(table: &T, start: &[u8], end: &[u8]) -> LedgerResult<Vec<(Vec<u8>, Vec<u8>)>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let mut out = Vec::new();
    for entry in table.range(start..end)? {
        let (key, value) = entry?;
        out.push((key.value().to_vec(), value.value().to_vec()));
    }
    Ok(out)
}

fn scan_collection<T>(
    table: &T,
    collection: &str,
    start: &str,
    end: &str,
) -> LedgerResult<Vec<(String, Vec<u8>)>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let (lower, upper) = keys::state_range(collection, start, end);
    if lower >= upper {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for (raw, value) in scan(table, &lower, &upper)? {
        if let Some(key) = keys::split_state_key(collection, &raw) {
            out.push((key.to_string(), value));
        }
    }
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
