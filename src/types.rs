use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LedgerError;

/// unique identifier for a purchase
pub type PurchaseId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// unique identifier for a store
pub type StoreId = Uuid;

/// unique identifier for a savings goal
pub type GoalId = Uuid;

/// purchase lifecycle, derived from its monetary fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// nothing paid yet
    Pending,
    /// some but not all of the amount paid
    PartiallyPaid,
    /// fully paid off
    Paid,
}

impl PurchaseStatus {
    /// still accepts payments
    pub fn is_open(&self) -> bool {
        !matches!(self, PurchaseStatus::Paid)
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::PartiallyPaid => "partially_paid",
            PurchaseStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// how a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Credit,
    Debit,
    #[serde(alias = "money")]
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::Credit,
        PaymentMethod::Debit,
        PaymentMethod::Cash,
    ];

    /// installments only apply to credit
    pub fn supports_installments(&self) -> bool {
        matches!(self, PaymentMethod::Credit)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Cash => "cash",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pix" => Ok(PaymentMethod::Pix),
            "credit" => Ok(PaymentMethod::Credit),
            "debit" => Ok(PaymentMethod::Debit),
            "cash" | "money" => Ok(PaymentMethod::Cash),
            other => Err(LedgerError::validation(format!(
                "unknown payment method: {}",
                other
            ))),
        }
    }
}

/// a store purchases are owed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at,
        }
    }
}
