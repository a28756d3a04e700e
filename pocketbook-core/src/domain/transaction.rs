//! Transaction domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category;
use super::result::{Error, Result};

/// Which side of the ledger a transaction sits on
///
/// Fixed at creation time; an income record can never become an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::validation(format!(
                "Unknown transaction kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense record belonging to a user
///
/// `id` and ultimately `created_at` are owned by the remote store; the
/// in-memory copy is a read-through cache that is refetched wholesale
/// after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    /// Key into the static category table
    pub category: String,
    /// User-assigned transaction date
    pub date: DateTime<Utc>,
    /// Creation timestamp, used for ordering
    pub created_at: DateTime<Utc>,
}

/// Fields a user supplies when recording a new transaction
///
/// `user_id` and `created_at` are stamped by the store at submit time;
/// the server assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    /// Defaults to "now" when the user does not pick a date
    pub date: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    /// Validate the draft against a target kind before any network I/O
    pub fn validate(&self, kind: TransactionKind) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::validation("Description is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("Amount must be a positive number"));
        }
        match category::find(&self.category) {
            None => {
                return Err(Error::validation(format!(
                    "Unknown category: {}",
                    self.category
                )))
            }
            Some(cat) if cat.kind != kind => {
                return Err(Error::validation(format!(
                    "Category '{}' is not a valid {} category",
                    self.category, kind
                )))
            }
            Some(_) => {}
        }
        Ok(())
    }
}

/// A partial update to an existing transaction
///
/// Only amount, description and category are mutable; kind and owner are
/// fixed at creation. Serializes to exactly the supplied fields so the
/// PATCH body never touches anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.category.is_none()
    }

    /// Validate the supplied fields against the record's kind
    pub fn validate(&self, kind: TransactionKind) -> Result<()> {
        if self.is_empty() {
            return Err(Error::validation("Nothing to update"));
        }
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(Error::validation("Amount must be a positive number"));
            }
        }
        if let Some(desc) = &self.description {
            if desc.trim().is_empty() {
                return Err(Error::validation("Description is required"));
            }
        }
        if let Some(key) = &self.category {
            match category::find(key) {
                None => {
                    return Err(Error::validation(format!("Unknown category: {}", key)))
                }
                Some(cat) if cat.kind != kind => {
                    return Err(Error::validation(format!(
                        "Category '{}' is not a valid {} category",
                        key, kind
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
