//! Static category table
//!
//! Categories are fixed client-side; the backend stores only the key.

use super::transaction::TransactionKind;

/// A category entry: stable key, display label, and which side of the
/// ledger it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: TransactionKind,
}

/// All known categories
pub const CATEGORIES: &[Category] = &[
    // Expense categories
    Category { key: "food", label: "Food", kind: TransactionKind::Expense },
    Category { key: "shopping", label: "Shopping", kind: TransactionKind::Expense },
    Category { key: "transport", label: "Transport", kind: TransactionKind::Expense },
    Category { key: "entertainment", label: "Entertainment", kind: TransactionKind::Expense },
    Category { key: "health", label: "Health", kind: TransactionKind::Expense },
    Category { key: "utilities", label: "Utilities", kind: TransactionKind::Expense },
    Category { key: "education", label: "Education", kind: TransactionKind::Expense },
    Category { key: "rent", label: "Rent", kind: TransactionKind::Expense },
    Category { key: "groceries", label: "Groceries", kind: TransactionKind::Expense },
    Category { key: "gym", label: "Gym", kind: TransactionKind::Expense },
    // Income categories
    Category { key: "salary", label: "Salary", kind: TransactionKind::Income },
    Category { key: "freelance", label: "Freelance", kind: TransactionKind::Income },
    Category { key: "investment", label: "Investment", kind: TransactionKind::Income },
    Category { key: "business", label: "Business", kind: TransactionKind::Income },
    Category { key: "rental", label: "Rental", kind: TransactionKind::Income },
    Category { key: "dividend", label: "Dividend", kind: TransactionKind::Income },
    Category { key: "bonus", label: "Bonus", kind: TransactionKind::Income },
];

/// Look up a category by key
pub fn find(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Categories belonging to one side of the ledger
pub fn for_kind(kind: TransactionKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES.iter().filter(move |c| c.kind == kind)
}
