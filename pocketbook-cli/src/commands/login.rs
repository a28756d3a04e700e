//! Login command - sign in and pull the transaction list

use anyhow::Result;
use dialoguer::Password;

use crate::output;

use super::get_context;

pub fn run(email: &str) -> Result<()> {
    let ctx = get_context()?;

    let password = Password::new().with_prompt("Password").interact()?;

    let result = ctx.auth.sign_in(email, &password);
    if !result.success {
        anyhow::bail!(result.error.unwrap_or_else(|| "Sign-in failed".to_string()));
    }

    let user = result.data.expect("successful sign-in carries a user");
    output::success(&format!(
        "Signed in as {}",
        user.email.as_deref().unwrap_or(&user.id)
    ));

    match ctx.transactions.fetch_all() {
        Ok(list) => println!("{} transactions on record", list.len()),
        Err(e) => output::warning(&format!("Could not fetch transactions: {}", e)),
    }

    Ok(())
}
