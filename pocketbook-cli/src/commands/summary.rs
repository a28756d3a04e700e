//! Summary command - the dashboard numbers

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;

use pocketbook_core::{Period, TransactionKind};

use crate::output;

use super::get_context;

pub fn run(period: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if !ctx.auth.is_authenticated() {
        output::warning("Not signed in; nothing to summarize.");
        return Ok(());
    }

    let period = period.as_deref().map(Period::parse).transpose()?;
    ctx.transactions.fetch_all()?;
    let overview = ctx.summary.overview(period);

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!("{}", "Overview".bold());
    if let Some(period) = period {
        println!("Period: {}", period.as_str());
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Income", &output::format_amount(overview.total_income)]);
    table.add_row(vec!["Expenses", &output::format_amount(overview.total_expense)]);
    table.add_row(vec!["Balance", &output::format_amount(overview.balance)]);
    table.add_row(vec![
        "Spent of income",
        &format!("{}%", (overview.spending_ratio * Decimal::ONE_HUNDRED).round_dp(0)),
    ]);
    if let Some(trend) = overview.month_over_month {
        let sign = if trend >= Decimal::ZERO { "+" } else { "" };
        table.add_row(vec![
            "Expenses vs last month",
            &format!("{}{}%", sign, trend),
        ]);
    }
    println!("{}", table);

    if !overview.top_categories.is_empty() {
        println!();
        println!("{}", "Top spending categories".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Amount", "Share"]);
        for entry in &overview.top_categories {
            table.add_row(vec![
                entry.category.clone(),
                output::format_amount(entry.amount),
                format!("{}%", entry.percentage),
            ]);
        }
        println!("{}", table);
    }

    if !overview.recent.is_empty() {
        println!();
        println!("{}", "Recent activity".bold());
        let mut table = output::create_table();
        table.set_header(vec!["Date", "Description", "Amount"]);
        for t in &overview.recent {
            table.add_row(vec![
                t.date.format("%Y-%m-%d").to_string(),
                t.description.clone(),
                output::format_signed_amount(t.amount, t.kind == TransactionKind::Income),
            ]);
        }
        println!("{}", table);
    }

    Ok(())
}
