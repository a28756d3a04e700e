//! Remove command - delete a transaction

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use pocketbook_core::TransactionKind;

use super::{finish, get_context};

pub fn run(kind: &str, id: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let kind = TransactionKind::parse(kind)?;

    // Confirm removal unless --force
    if !force {
        println!(
            "{}",
            format!("This will permanently delete {} record '{}'.", kind, id).yellow()
        );
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    finish(ctx.transactions.remove(kind, id), "Transaction removed")
}
