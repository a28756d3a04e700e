//! Edit command - patch an existing transaction

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use pocketbook_core::{TransactionKind, TransactionPatch};

use super::{finish, get_context};

pub fn run(
    kind: &str,
    id: &str,
    amount: Option<String>,
    title: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;

    let kind = TransactionKind::parse(kind)?;
    let amount: Option<Decimal> = amount
        .map(|a| a.parse().with_context(|| format!("Invalid amount: {}", a)))
        .transpose()?;

    let patch = TransactionPatch {
        amount,
        description: title,
        category,
    };

    finish(ctx.transactions.update(kind, id, patch), "Transaction updated")
}
