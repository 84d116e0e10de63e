use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::ai::world::UnitId;

use super::types::{PathOutcome, RequestTicket};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Delivery {
    ticket: RequestTicket,
    outcome: PathOutcome,
}

/// Executed path requests waiting to be collected by their owners.
///
/// Holds at most one delivery per owner. Owners collect by ticket, so a
/// result for a request the owner has since replaced is never consumed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathMailbox {
    deliveries: BTreeMap<UnitId, Delivery>,
}

impl PathMailbox {
    pub fn deliver(&mut self, owner: UnitId, ticket: RequestTicket, outcome: PathOutcome) {
        self.deliveries.insert(owner, Delivery { ticket, outcome });
    }

    /// Take the outcome for `ticket`. A delivery for any other ticket of the
    /// same owner is stale and is dropped.
    pub fn take(&mut self, owner: UnitId, ticket: RequestTicket) -> Option<PathOutcome> {
        let delivery = self.deliveries.remove(&owner)?;
        if delivery.ticket == ticket {
            Some(delivery.outcome)
        } else if delivery.ticket > ticket {
            // Newer than what the caller waits for; keep it for its owner
            self.deliveries.insert(owner, delivery);
            None
        } else {
            None
        }
    }

    pub fn has(&self, owner: UnitId, ticket: RequestTicket) -> bool {
        self.deliveries.get(&owner).is_some_and(|d| d.ticket == ticket)
    }

    /// Drop anything addressed to `owner` (e.g. the unit died).
    pub fn discard(&mut self, owner: UnitId) {
        self.deliveries.remove(&owner);
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}
