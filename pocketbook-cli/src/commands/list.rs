//! List command - show the transaction list

use anyhow::Result;
use pocketbook_core::TransactionKind;

use crate::output;

use super::get_context;

pub fn run(kind: Option<String>, category: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if !ctx.auth.is_authenticated() {
        output::warning("Not signed in; nothing to list.");
        return Ok(());
    }

    let kind_filter = kind.as_deref().map(TransactionKind::parse).transpose()?;
    let list = ctx.transactions.fetch_all()?;
    let filtered: Vec<_> = list
        .into_iter()
        .filter(|t| kind_filter.map_or(true, |k| t.kind == k))
        .filter(|t| category.as_deref().map_or(true, |c| t.category == c))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!("No transactions.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Kind", "Description", "Category", "Amount", "Id"]);
    for t in &filtered {
        table.add_row(vec![
            t.date.format("%Y-%m-%d").to_string(),
            t.kind.to_string(),
            t.description.clone(),
            t.category.clone(),
            output::format_signed_amount(t.amount, t.kind == TransactionKind::Income),
            t.id.clone(),
        ]);
    }
    println!("{}", table);

    println!();
    println!("Income:  {}", output::format_amount(ctx.transactions.total_income()));
    println!("Expense: {}", output::format_amount(ctx.transactions.total_expense()));
    println!("Balance: {}", output::format_amount(ctx.transactions.balance()));

    Ok(())
}
