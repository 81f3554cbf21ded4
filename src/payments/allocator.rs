use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::errors::Result;
use crate::purchase::{Payment, Purchase};

use super::{AllocatedPayment, PaymentRequest};

/// applies one payment to one purchase
#[derive(Debug, Clone)]
pub struct PaymentAllocator {
    max_installments: u8,
}

impl PaymentAllocator {
    pub fn new(max_installments: u8) -> Self {
        Self { max_installments }
    }

    pub fn max_installments(&self) -> u8 {
        self.max_installments
    }

    /// apply the request, returning the updated purchase and the new payment.
    /// the input purchase is never modified.
    pub fn apply(
        &self,
        purchase: &Purchase,
        request: &PaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<AllocatedPayment> {
        let remaining = purchase.remaining_amount();
        if let Err(err) = request.validate(remaining, self.max_installments) {
            tracing::warn!(
                purchase_id = %purchase.id,
                amount = %request.amount,
                %remaining,
                error = %err,
                "payment rejected"
            );
            return Err(err);
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            purchase_id: purchase.id,
            amount: request.amount,
            method: request.method,
            installments: request.effective_installments(),
            date: request.date,
            recorded_at: time_provider.now(),
        };

        let updated = purchase.with_payment(payment.clone());

        tracing::debug!(
            purchase_id = %updated.id,
            amount = %payment.amount,
            paid = %updated.paid_amount(),
            remaining = %updated.remaining_amount(),
            status = %updated.status(),
            "payment allocated"
        );

        Ok(AllocatedPayment {
            purchase: updated,
            payment,
        })
    }
}

impl Default for PaymentAllocator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_INSTALLMENTS)
    }
}
