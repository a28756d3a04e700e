//! Add command - record a new transaction

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use pocketbook_core::{TransactionDraft, TransactionKind};

use super::{finish, get_context, parse_date};

pub fn run(
    kind: &str,
    amount: &str,
    title: &str,
    category: &str,
    date: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;

    let kind = TransactionKind::parse(kind)?;
    let amount: Decimal = amount
        .parse()
        .with_context(|| format!("Invalid amount: {}", amount))?;
    let date = date.as_deref().map(parse_date).transpose()?;

    let draft = TransactionDraft {
        amount,
        description: title.to_string(),
        category: category.to_string(),
        date,
    };

    finish(ctx.transactions.add(kind, draft), "Transaction added")
}
