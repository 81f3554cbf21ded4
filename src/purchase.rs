use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::payments::status::project_status;
use crate::types::{PaymentId, PaymentMethod, PurchaseId, PurchaseStatus, StoreId};

/// a debt owed to a store, paid off over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub store_id: StoreId,
    pub description: String,
    pub purchase_date: NaiveDate,
    amount: Money,
    paid_amount: Money,
    payments: Vec<Payment>,
    version: u64,
    pub created_at: DateTime<Utc>,
}

/// a single application of money against a purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub purchase_id: PurchaseId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub installments: Option<u8>,
    pub date: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

impl Purchase {
    /// create a new unpaid purchase
    pub fn new(
        store_id: StoreId,
        description: impl Into<String>,
        amount: Money,
        purchase_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::validation("purchase amount must be positive"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            store_id,
            description: description.into(),
            purchase_date,
            amount,
            paid_amount: Money::ZERO,
            payments: Vec::new(),
            version: 0,
            created_at,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_amount(&self) -> Money {
        self.paid_amount
    }

    /// outstanding balance, floored at zero
    pub fn remaining_amount(&self) -> Money {
        self.amount.saturating_sub(self.paid_amount)
    }

    pub fn status(&self) -> PurchaseStatus {
        project_status(self.amount, self.paid_amount)
    }

    /// payments in the order they were applied
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_settled(&self) -> bool {
        self.status() == PurchaseStatus::Paid
    }

    pub fn last_payment(&self) -> Option<&Payment> {
        self.payments.last()
    }

    /// copy of this purchase with one more payment applied
    pub(crate) fn with_payment(&self, payment: Payment) -> Self {
        let mut next = self.clone();
        next.paid_amount += payment.amount;
        next.payments.push(payment);
        next.version += 1;
        next
    }

    /// verify the monetary invariants, used when loading from storage
    pub fn check_invariants(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::validation(format!(
                "purchase {} has non-positive amount {}",
                self.id, self.amount
            )));
        }

        let total: Money = self.payments.iter().map(|p| p.amount).sum();
        if total != self.paid_amount {
            return Err(LedgerError::validation(format!(
                "purchase {} paid amount {} does not match its payments {}",
                self.id, self.paid_amount, total
            )));
        }

        if self.paid_amount > self.amount {
            return Err(LedgerError::validation(format!(
                "purchase {} is overpaid: paid {} of {}",
                self.id, self.paid_amount, self.amount
            )));
        }

        if let Some(foreign) = self.payments.iter().find(|p| p.purchase_id != self.id) {
            return Err(LedgerError::validation(format!(
                "payment {} does not belong to purchase {}",
                foreign.id, self.id
            )));
        }

        Ok(())
    }
}

/// serializable view of a purchase with derived fields filled in
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseView {
    pub id: PurchaseId,
    pub store_id: StoreId,
    pub description: String,
    pub purchase_date: NaiveDate,
    pub amount: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: PurchaseStatus,
    pub payment_count: usize,
    pub last_payment_date: Option<NaiveDate>,
}

impl PurchaseView {
    pub fn from_purchase(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id,
            store_id: purchase.store_id,
            description: purchase.description.clone(),
            purchase_date: purchase.purchase_date,
            amount: purchase.amount(),
            paid_amount: purchase.paid_amount(),
            remaining_amount: purchase.remaining_amount(),
            status: purchase.status(),
            payment_count: purchase.payments().len(),
            last_payment_date: purchase.last_payment().map(|p| p.date),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn payment_for(purchase: &Purchase, amount: Money) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            purchase_id: purchase.id,
            amount,
            method: PaymentMethod::Pix,
            installments: None,
            date: date(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_purchase_is_pending() {
        let purchase = Purchase::new(Uuid::new_v4(), "groceries", Money::from_major(100), date(), Utc::now()).unwrap();

        assert_eq!(purchase.paid_amount(), Money::ZERO);
        assert_eq!(purchase.remaining_amount(), Money::from_major(100));
        assert_eq!(purchase.status(), PurchaseStatus::Pending);
        assert_eq!(purchase.version(), 0);
        assert!(purchase.payments().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let err = Purchase::new(Uuid::new_v4(), "nothing", Money::ZERO, date(), Utc::now()).unwrap_err();
        assert!(err.is_validation());

        let err = Purchase::new(Uuid::new_v4(), "refund", Money::from_major(-5), date(), Utc::now()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_with_payment_leaves_original_untouched() {
        let purchase = Purchase::new(Uuid::new_v4(), "tv", Money::from_major(100), date(), Utc::now()).unwrap();
        let payment = payment_for(&purchase, Money::from_major(40));

        let updated = purchase.with_payment(payment);

        assert_eq!(purchase.paid_amount(), Money::ZERO);
        assert_eq!(updated.paid_amount(), Money::from_major(40));
        assert_eq!(updated.remaining_amount(), Money::from_major(60));
        assert_eq!(updated.version(), 1);
        assert!(updated.check_invariants().is_ok());
    }

    #[test]
    fn test_invariants_detect_mismatch() {
        let purchase = Purchase::new(Uuid::new_v4(), "tv", Money::from_major(100), date(), Utc::now()).unwrap();
        let mut tampered = purchase.with_payment(payment_for(&purchase, Money::from_major(40)));
        tampered.paid_amount = Money::from_major(50);

        assert!(tampered.check_invariants().is_err());
    }

    #[test]
    fn test_view_includes_derived_fields() {
        let purchase = Purchase::new(Uuid::new_v4(), "tv", Money::from_major(100), date(), Utc::now()).unwrap();
        let updated = purchase.with_payment(payment_for(&purchase, Money::from_major(100)));

        let view = PurchaseView::from_purchase(&updated);
        assert_eq!(view.status, PurchaseStatus::Paid);
        assert_eq!(view.remaining_amount, Money::ZERO);
        assert_eq!(view.last_payment_date, Some(date()));

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"remainingAmount\""));
        assert!(json.contains("\"status\": \"paid\""));
    }
}
