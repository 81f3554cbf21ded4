use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::goals::Goal;
use crate::payments::AllocatedPayment;
use crate::purchase::{Payment, Purchase};
use crate::types::{GoalId, PurchaseId, Store, StoreId};

use super::{check_version, PurchaseStore};

/// in-memory purchase store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    purchases: BTreeMap<PurchaseId, Purchase>,
    payments: Vec<Payment>,
    #[serde(default)]
    stores: BTreeMap<StoreId, Store>,
    #[serde(default)]
    goals: BTreeMap<GoalId, Goal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// payment log entries for one purchase, in append order
    pub fn payments_for(&self, purchase_id: PurchaseId) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.purchase_id == purchase_id)
            .collect()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    fn validate_payment(&self, payment: &Payment) -> Result<()> {
        if !self.purchases.contains_key(&payment.purchase_id) {
            return Err(LedgerError::PurchaseNotFound {
                id: payment.purchase_id,
            });
        }
        if self.payments.iter().any(|p| p.id == payment.id) {
            return Err(LedgerError::storage(format!(
                "payment {} already recorded",
                payment.id
            )));
        }
        Ok(())
    }

    /// check every change against the current state without applying any
    pub(crate) fn validate_changes(&self, changes: &[AllocatedPayment]) -> Result<()> {
        let mut staged: BTreeMap<PurchaseId, &Purchase> = BTreeMap::new();
        for change in changes {
            let current = staged
                .get(&change.purchase.id)
                .copied()
                .or_else(|| self.purchases.get(&change.purchase.id));
            if current.is_none() {
                return Err(LedgerError::PurchaseNotFound {
                    id: change.purchase.id,
                });
            }
            check_version(current, &change.purchase)?;
            if change.payment.purchase_id != change.purchase.id {
                return Err(LedgerError::storage(format!(
                    "payment {} does not belong to purchase {}",
                    change.payment.id, change.purchase.id
                )));
            }
            if self.payments.iter().any(|p| p.id == change.payment.id) {
                return Err(LedgerError::storage(format!(
                    "payment {} already recorded",
                    change.payment.id
                )));
            }
            staged.insert(change.purchase.id, &change.purchase);
        }
        Ok(())
    }

    pub(crate) fn apply_changes(&mut self, changes: &[AllocatedPayment]) {
        for change in changes {
            self.purchases.insert(change.purchase.id, change.purchase.clone());
            self.payments.push(change.payment.clone());
        }
    }
}

impl PurchaseStore for MemoryStore {
    fn read_purchase(&self, id: PurchaseId) -> Result<Purchase> {
        self.purchases
            .get(&id)
            .cloned()
            .ok_or(LedgerError::PurchaseNotFound { id })
    }

    fn write_purchase(&mut self, purchase: &Purchase) -> Result<()> {
        check_version(self.purchases.get(&purchase.id), purchase)?;
        self.purchases.insert(purchase.id, purchase.clone());
        Ok(())
    }

    fn append_payment(&mut self, payment: &Payment) -> Result<()> {
        self.validate_payment(payment)?;
        self.payments.push(payment.clone());
        Ok(())
    }

    fn commit(&mut self, changes: &[AllocatedPayment]) -> Result<()> {
        self.validate_changes(changes)?;
        self.apply_changes(changes);
        Ok(())
    }

    fn list_purchases(&self) -> Result<Vec<Purchase>> {
        Ok(self.purchases.values().cloned().collect())
    }

    fn read_store(&self, id: StoreId) -> Result<Store> {
        self.stores
            .get(&id)
            .cloned()
            .ok_or(LedgerError::StoreNotFound { id })
    }

    fn write_store(&mut self, store: &Store) -> Result<()> {
        self.stores.insert(store.id, store.clone());
        Ok(())
    }

    fn list_stores(&self) -> Result<Vec<Store>> {
        Ok(self.stores.values().cloned().collect())
    }

    fn read_goal(&self, id: GoalId) -> Result<Goal> {
        self.goals
            .get(&id)
            .cloned()
            .ok_or(LedgerError::GoalNotFound { id })
    }

    fn write_goal(&mut self, goal: &Goal) -> Result<()> {
        self.goals.insert(goal.id, goal.clone());
        Ok(())
    }

    fn list_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::payments::{PaymentAllocator, PaymentRequest};
    use crate::types::PaymentMethod;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use uuid::Uuid;

    fn time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()))
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    fn purchase(amount: i64) -> Purchase {
        Purchase::new(Uuid::new_v4(), "item", Money::from_major(amount), date(), Utc::now()).unwrap()
    }

    fn pay(purchase: &Purchase, amount: i64) -> AllocatedPayment {
        let request = PaymentRequest::new(Money::from_major(amount), PaymentMethod::Pix, date());
        PaymentAllocator::default().apply(purchase, &request, &time()).unwrap()
    }

    #[test]
    fn test_read_missing() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.read_purchase(id),
            Err(LedgerError::PurchaseNotFound { id: missing }) if missing == id
        ));
    }

    #[test]
    fn test_write_and_append() {
        let mut store = MemoryStore::new();
        let original = purchase(100);
        store.write_purchase(&original).unwrap();

        let change = pay(&original, 40);
        store.write_purchase(&change.purchase).unwrap();
        store.append_payment(&change.payment).unwrap();

        let loaded = store.read_purchase(original.id).unwrap();
        assert_eq!(loaded.paid_amount(), Money::from_major(40));
        assert_eq!(store.payments_for(original.id).len(), 1);

        // appending the same payment twice is refused
        assert!(store.append_payment(&change.payment).is_err());
    }

    #[test]
    fn test_stale_write_rejected() {
        let mut store = MemoryStore::new();
        let original = purchase(100);
        store.write_purchase(&original).unwrap();

        // two writers start from the same version
        let first = pay(&original, 30);
        let second = pay(&original, 50);

        store.write_purchase(&first.purchase).unwrap();
        let err = store.write_purchase(&second.purchase).unwrap_err();

        assert!(matches!(
            err,
            LedgerError::ConcurrentModification { expected: 0, found: 1, .. }
        ));
        assert_eq!(store.read_purchase(original.id).unwrap().paid_amount(), Money::from_major(30));
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let mut store = MemoryStore::new();
        let a = purchase(10);
        let b = purchase(20);
        store.write_purchase(&a).unwrap();
        store.write_purchase(&b).unwrap();

        // b moves on before the batch commits
        let concurrent = pay(&b, 5);
        store.commit(&[concurrent]).unwrap();

        let batch = vec![pay(&a, 10), pay(&b, 20)];
        assert!(store.commit(&batch).is_err());

        assert_eq!(store.read_purchase(a.id).unwrap().paid_amount(), Money::ZERO);
        assert_eq!(store.payments_for(a.id).len(), 0);
        assert_eq!(store.payment_count(), 1);
    }

    #[test]
    fn test_commit_unknown_purchase() {
        let mut store = MemoryStore::new();
        let change = pay(&purchase(10), 5);
        assert!(matches!(
            store.commit(&[change]),
            Err(LedgerError::PurchaseNotFound { .. })
        ));
    }

    #[test]
    fn test_stores_and_goals() {
        let mut store = MemoryStore::new();
        let shop = Store::new("bakery", Utc::now());
        let goal = Goal::new("trip", Money::from_major(900), None).unwrap();

        assert!(matches!(store.read_store(shop.id), Err(LedgerError::StoreNotFound { .. })));
        store.write_store(&shop).unwrap();
        store.write_goal(&goal).unwrap();

        assert_eq!(store.read_store(shop.id).unwrap(), shop);
        assert_eq!(store.list_stores().unwrap(), vec![shop]);

        let mut saved = goal.clone();
        saved.contribute(Money::from_major(100)).unwrap();
        store.write_goal(&saved).unwrap();
        assert_eq!(store.read_goal(goal.id).unwrap().current_amount, Money::from_major(100));
        assert_eq!(store.list_goals().unwrap().len(), 1);
    }

    #[test]
    fn test_document_without_stores_or_goals() {
        let store: MemoryStore = serde_json::from_str(r#"{"purchases":{},"payments":[]}"#).unwrap();
        assert!(store.list_stores().unwrap().is_empty());
        assert!(store.list_goals().unwrap().is_empty());
    }
}
