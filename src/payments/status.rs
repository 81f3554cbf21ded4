use crate::decimal::Money;
use crate::types::PurchaseStatus;

/// derive a purchase's lifecycle state from its monetary fields
pub fn project_status(amount: Money, paid_amount: Money) -> PurchaseStatus {
    if paid_amount <= Money::ZERO {
        PurchaseStatus::Pending
    } else if paid_amount >= amount {
        PurchaseStatus::Paid
    } else {
        PurchaseStatus::PartiallyPaid
    }
}
