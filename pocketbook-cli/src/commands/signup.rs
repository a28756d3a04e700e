//! Signup command - register a new account

use anyhow::Result;
use dialoguer::Password;

use super::{finish, get_context};

pub fn run(email: &str) -> Result<()> {
    let ctx = get_context()?;

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let result = ctx.auth.sign_up(email, &password);
    finish(result, "Account created. Sign in with 'pb login'.")
}
