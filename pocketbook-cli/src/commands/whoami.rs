//! Whoami command - show the current session state

use anyhow::Result;

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let state = ctx.auth.session_state();

    match ctx.auth.current_user() {
        Some(user) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "state": state.as_str(), "user": user })
                );
            } else {
                println!(
                    "Signed in as {} (id {})",
                    user.email.as_deref().unwrap_or("<no email>"),
                    user.id
                );
            }
        }
        None => {
            if json {
                println!("{}", serde_json::json!({ "state": state.as_str(), "user": null }));
            } else {
                println!("Not signed in. Use 'pb login <email>'.");
            }
        }
    }

    Ok(())
}
