// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Private Asset Transfer - confidential multi-organization asset ledger
//!
//! Organizations share a channel ledger. Public asset records (ID, object
//! type, color, size and owner) are visible to every member. Only the
//! appraised value is private: the owner keeps it in its own collection and
//! a prospective buyer keeps its agreed price in its own. Ownership moves
//! only when the hashes of the two match.
//!
//! ## Modules
//!
//! - `ledger` - Collection-partitioned state and the public transaction log (redb)
//! - `contract` - The asset transfer operations
//! - `gateway` - Client side of submit/evaluate (in-process or HTTP)
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Caller organization extraction
//! - `config` / `logging` - Runtime setup

pub mod api;
pub mod auth;
pub mod config;
pub mod contract;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod state;
