// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::gateway::LocalGateway;
use crate::ledger::Ledger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    /// Address this node reports in rejection details.
    pub peer_address: String,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>, peer_address: impl Into<String>) -> Self {
        Self {
            ledger,
            peer_address: peer_address.into(),
        }
    }

    /// Gateway acting for `msp_id` through this node.
    pub fn gateway_for(&self, msp_id: &str) -> LocalGateway {
        LocalGateway::new(Arc::clone(&self.ledger), msp_id, self.peer_address.clone())
    }
}
