// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Private data collection configuration and membership rules.
//!
//! Membership is a ledger concern. The protocol engine only ever names a
//! collection; whether the calling organization may read or write it is
//! decided here, and a read the caller is not entitled to simply yields
//! nothing.

use std::collections::{BTreeMap, BTreeSet};

use super::{LedgerError, LedgerResult};

/// Collection shared by every organization on the channel. Holds the public
/// asset records and the transfer agreements.
pub const ASSET_COLLECTION: &str = "assetCollection";

/// Name of an organization's own private collection.
pub fn private_collection_name(msp_id: &str) -> String {
    format!("{msp_id}PrivateCollection")
}

/// Static configuration of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub name: String,
    pub members: BTreeSet<String>,
    /// Non-members get no data back on reads.
    pub member_only_read: bool,
    /// Non-members are refused on writes. When false, non-members may blind
    /// write (the new owner's collection receives data from the seller).
    pub member_only_write: bool,
}

impl CollectionConfig {
    pub fn is_member(&self, msp_id: &str) -> bool {
        self.members.contains(msp_id)
    }
}

/// All collections known to the ledger.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: BTreeMap<String, CollectionConfig>,
}

impl CollectionRegistry {
    /// Standard layout: one shared asset collection plus one private
    /// collection per organization.
    pub fn for_organizations<S: AsRef<str>>(organizations: &[S]) -> Self {
        let members: BTreeSet<String> = organizations
            .iter()
            .map(|org| org.as_ref().to_string())
            .collect();

        let mut registry = Self::default();
        registry.insert(CollectionConfig {
            name: ASSET_COLLECTION.to_string(),
            members: members.clone(),
            member_only_read: true,
            member_only_write: true,
        });

        for org in &members {
            registry.insert(CollectionConfig {
                name: private_collection_name(org),
                members: BTreeSet::from([org.clone()]),
                member_only_read: true,
                member_only_write: false,
            });
        }

        registry
    }

    pub fn insert(&mut self, config: CollectionConfig) {
        self.collections.insert(config.name.clone(), config);
    }

    pub fn get(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.get(name)
    }

    /// Whether the MSP ID belongs to any collection on the channel.
    pub fn is_organization(&self, msp_id: &str) -> bool {
        self.collections.values().any(|c| c.is_member(msp_id))
    }

    /// Every organization that is a member of at least one collection.
    pub fn organizations(&self) -> BTreeSet<&str> {
        self.collections
            .values()
            .flat_map(|c| c.members.iter().map(String::as_str))
            .collect()
    }

    /// Read access: unknown collections and non-members both read as empty.
    pub fn can_read(&self, msp_id: &str, collection: &str) -> bool {
        match self.get(collection) {
            Some(config) => !config.member_only_read || config.is_member(msp_id),
            None => false,
        }
    }

    pub fn check_write(&self, msp_id: &str, collection: &str) -> LedgerResult<()> {
        let config = self
            .get(collection)
            .ok_or_else(|| LedgerError::UnknownCollection(collection.to_string()))?;

        if config.member_only_write && !config.is_member(msp_id) {
            return Err(LedgerError::WriteDenied {
                msp_id: msp_id.to_string(),
                collection: collection.to_string(),
            });
        }
        Ok(())
    }

    /// Purging erases history, so it always requires membership.
    pub fn check_purge(&self, msp_id: &str, collection: &str) -> LedgerResult<()> {
        let config = self
            .get(collection)
            .ok_or_else(|| LedgerError::UnknownCollection(collection.to_string()))?;

        if !config.is_member(msp_id) {
            return Err(LedgerError::WriteDenied {
                msp_id: msp_id.to_string(),
                collection: collection.to_string(),
            });
        }
        Ok(())
    }
}
