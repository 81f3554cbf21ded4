use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::purchase::Purchase;
use crate::types::{PaymentMethod, PurchaseStatus, StoreId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub partially_paid: usize,
    pub paid: usize,
}

impl StatusCounts {
    fn record(&mut self, status: PurchaseStatus) {
        match status {
            PurchaseStatus::Pending => self.pending += 1,
            PurchaseStatus::PartiallyPaid => self.partially_paid += 1,
            PurchaseStatus::Paid => self.paid += 1,
        }
    }

    pub fn open(&self) -> usize {
        self.pending + self.partially_paid
    }
}

/// totals for one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub store_id: StoreId,
    pub purchase_count: usize,
    pub total_amount: Money,
    pub total_paid: Money,
    pub total_remaining: Money,
    pub statuses: StatusCounts,
}

impl StoreSummary {
    fn empty(store_id: StoreId) -> Self {
        Self {
            store_id,
            purchase_count: 0,
            total_amount: Money::ZERO,
            total_paid: Money::ZERO,
            total_remaining: Money::ZERO,
            statuses: StatusCounts::default(),
        }
    }
}

/// aggregate view over a set of purchases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub purchase_count: usize,
    pub total_amount: Money,
    pub total_paid: Money,
    pub total_remaining: Money,
    pub statuses: StatusCounts,
    pub paid_by_method: BTreeMap<PaymentMethod, Money>,
    pub stores: Vec<StoreSummary>,
}

impl LedgerSummary {
    pub fn from_purchases(purchases: &[Purchase]) -> Self {
        let mut statuses = StatusCounts::default();
        let mut paid_by_method = BTreeMap::new();
        let mut stores: BTreeMap<StoreId, StoreSummary> = BTreeMap::new();

        for purchase in purchases {
            let status = purchase.status();
            statuses.record(status);

            let store = stores
                .entry(purchase.store_id)
                .or_insert_with(|| StoreSummary::empty(purchase.store_id));
            store.purchase_count += 1;
            store.total_amount += purchase.amount();
            store.total_paid += purchase.paid_amount();
            store.total_remaining += purchase.remaining_amount();
            store.statuses.record(status);

            for payment in purchase.payments() {
                *paid_by_method.entry(payment.method).or_insert(Money::ZERO) += payment.amount;
            }
        }

        Self {
            purchase_count: purchases.len(),
            total_amount: purchases.iter().map(|p| p.amount()).sum(),
            total_paid: purchases.iter().map(|p| p.paid_amount()).sum(),
            total_remaining: purchases.iter().map(|p| p.remaining_amount()).sum(),
            statuses,
            paid_by_method,
            stores: stores.into_values().collect(),
        }
    }

    pub fn store(&self, store_id: StoreId) -> Option<&StoreSummary> {
        self.stores.iter().find(|s| s.store_id == store_id)
    }
}

/// money paid with payment dates in `[from, to]`
pub fn paid_between(purchases: &[Purchase], from: NaiveDate, to: NaiveDate) -> Money {
    purchases
        .iter()
        .flat_map(|p| p.payments())
        .filter(|payment| payment.date >= from && payment.date <= to)
        .map(|payment| payment.amount)
        .sum()
}

/// money spent on purchases dated in `[from, to]`
pub fn spent_between(purchases: &[Purchase], from: NaiveDate, to: NaiveDate) -> Money {
    purchases
        .iter()
        .filter(|p| p.purchase_date >= from && p.purchase_date <= to)
        .map(|p| p.amount())
        .sum()
}
