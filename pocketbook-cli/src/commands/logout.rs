//! Logout command
//!
//! Local sign-out always succeeds; a failed server call is only a warning.

use anyhow::Result;

use crate::output;

use super::get_context;

pub fn run() -> Result<()> {
    let ctx = get_context()?;

    let result = ctx.auth.sign_out();
    if !result.success {
        output::warning(&format!(
            "Server logout failed: {}",
            result.error.unwrap_or_default()
        ));
    }

    output::success("Signed out");
    Ok(())
}
