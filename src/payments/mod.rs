pub mod allocator;
pub mod batch;
pub mod installments;
pub mod status;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::purchase::{Payment, Purchase};
use crate::types::PaymentMethod;

pub use allocator::PaymentAllocator;
pub use batch::{BatchAllocation, BatchAllocator};
pub use installments::{Installment, InstallmentPlan};
pub use status::project_status;

/// payment request as collected from the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Money,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub installments: Option<u8>,
}

impl PaymentRequest {
    pub fn new(amount: Money, method: PaymentMethod, date: NaiveDate) -> Self {
        Self {
            amount,
            method,
            date,
            installments: None,
        }
    }

    /// credit payment split into installments
    pub fn credit(amount: Money, date: NaiveDate, installments: u8) -> Self {
        Self {
            amount,
            method: PaymentMethod::Credit,
            date,
            installments: Some(installments),
        }
    }

    /// validate against the balance the payment is applied to
    pub fn validate(&self, remaining: Money, max_installments: u8) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::validation("amount must be positive"));
        }

        if self.amount > remaining {
            return Err(LedgerError::validation("amount exceeds remaining balance"));
        }

        if let Some(count) = self.effective_installments() {
            if count == 0 || count > max_installments {
                return Err(LedgerError::validation(format!(
                    "installments must be between 1 and {}",
                    max_installments
                )));
            }
        }

        Ok(())
    }

    /// installments are dropped for methods that don't support them
    pub fn effective_installments(&self) -> Option<u8> {
        if self.method.supports_installments() {
            self.installments
        } else {
            None
        }
    }
}

/// an updated purchase together with the payment that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedPayment {
    pub purchase: Purchase,
    pub payment: Payment,
}

impl AllocatedPayment {
    pub fn amount(&self) -> Money {
        self.payment.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_request_validation() {
        let remaining = Money::from_major(50);

        let zero = PaymentRequest::new(Money::ZERO, PaymentMethod::Pix, date());
        assert_eq!(
            zero.validate(remaining, 12).unwrap_err().to_string(),
            "validation failed: amount must be positive"
        );

        let negative = PaymentRequest::new(Money::from_major(-1), PaymentMethod::Pix, date());
        assert!(negative.validate(remaining, 12).is_err());

        let too_much = PaymentRequest::new(Money::from_major(60), PaymentMethod::Debit, date());
        assert_eq!(
            too_much.validate(remaining, 12).unwrap_err().to_string(),
            "validation failed: amount exceeds remaining balance"
        );

        let exact = PaymentRequest::new(Money::from_major(50), PaymentMethod::Cash, date());
        assert!(exact.validate(remaining, 12).is_ok());
    }

    #[test]
    fn test_installment_bounds() {
        let remaining = Money::from_major(500);

        assert!(PaymentRequest::credit(Money::from_major(100), date(), 0)
            .validate(remaining, 12)
            .is_err());
        assert!(PaymentRequest::credit(Money::from_major(100), date(), 13)
            .validate(remaining, 12)
            .is_err());
        assert!(PaymentRequest::credit(Money::from_major(100), date(), 12)
            .validate(remaining, 12)
            .is_ok());
    }

    #[test]
    fn test_installments_ignored_for_non_credit() {
        let mut request = PaymentRequest::new(Money::from_major(10), PaymentMethod::Pix, date());
        request.installments = Some(0);

        assert_eq!(request.effective_installments(), None);
        assert!(request.validate(Money::from_major(10), 12).is_ok());
    }

    #[test]
    fn test_deserialized_amounts_are_rounded() {
        let dust: PaymentRequest = serde_json::from_str(
            r#"{"amount":"0.004","method":"pix","date":"2024-05-01","installments":null}"#,
        )
        .unwrap();
        assert_eq!(dust.amount, Money::ZERO);
        assert_eq!(
            dust.validate(Money::from_major(10), 12).unwrap_err().to_string(),
            "validation failed: amount must be positive"
        );

        // midpoint rounds to even
        let half_cent: PaymentRequest = serde_json::from_str(
            r#"{"amount":"10.005","method":"debit","date":"2024-05-01","installments":null}"#,
        )
        .unwrap();
        assert_eq!(half_cent.amount, Money::from_major(10));
        assert!(half_cent.validate(Money::from_major(10), 12).is_ok());
    }
}
