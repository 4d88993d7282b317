// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Module
//!
//! Local stand-in for the shared ledger: private data collections, their
//! version history and the permanent transaction log, all kept in one redb
//! database.
//!
//! ## Guarantees Relied On By The Protocol
//!
//! - A submitted operation commits its full effect set or nothing
//! - Submits are serialized (single redb writer)
//! - Private reads are scoped by collection membership; a read the caller
//!   is not entitled to returns no data rather than an error
//! - The transaction log records hashes of private writes, never values and
//!   never transient input
//!
//! ## Storage Layout
//!
//! ```text
//! ledger.redb
//!   private_state     collection|key → value
//!   private_history   collection|key|height → HistoryEntry
//!   tx_log            height → TxRecord
//!   ledger_meta       "height" → u64
//! ```

pub mod collections;
pub mod database;
pub mod error;
pub mod keys;
pub mod record;
pub mod store;

pub use collections::{
    private_collection_name, CollectionConfig, CollectionRegistry, ASSET_COLLECTION,
};
pub use database::{Ledger, LedgerTx, LedgerView};
pub use error::{LedgerError, LedgerResult};
pub use record::{HistoryEntry, PrivateWrite, TxRecord, WriteKind};
pub use store::{CollectionReader, CollectionStore, ValueHash};
