use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{GoalId, PaymentId, PaymentMethod, PurchaseId, PurchaseStatus, StoreId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // purchase events
    PurchaseRegistered {
        purchase_id: PurchaseId,
        store_id: StoreId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PurchaseSettled {
        purchase_id: PurchaseId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentApplied {
        purchase_id: PurchaseId,
        payment_id: PaymentId,
        amount: Money,
        method: PaymentMethod,
        remaining: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentRejected {
        purchase_id: Option<PurchaseId>,
        amount: Money,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    BatchPaymentApplied {
        total: Money,
        purchases_paid: Vec<PurchaseId>,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        purchase_id: PurchaseId,
        old_status: PurchaseStatus,
        new_status: PurchaseStatus,
        timestamp: DateTime<Utc>,
    },

    // goal events
    GoalContribution {
        goal_id: GoalId,
        amount: Money,
        new_total: Money,
        timestamp: DateTime<Utc>,
    },
    GoalReached {
        goal_id: GoalId,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
