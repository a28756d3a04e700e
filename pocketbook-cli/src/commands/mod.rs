//! CLI command implementations

pub mod add;
pub mod categories;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod remove;
pub mod signup;
pub mod summary;
pub mod whoami;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use pocketbook_core::{OperationResult, PocketbookContext};

/// Get the pocketbook directory from environment or default
pub fn get_app_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("POCKETBOOK_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".pocketbook")
    }
}

/// Get or create the pocketbook context
///
/// Restores the stored session (and the transaction list when the session
/// is still valid) before the command runs.
pub fn get_context() -> Result<PocketbookContext> {
    let app_dir = get_app_dir();

    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create pocketbook directory: {:?}", app_dir))?;

    let ctx = PocketbookContext::new(&app_dir)
        .context("Failed to initialize pocketbook context")?;
    ctx.start();
    Ok(ctx)
}

/// Turn an operation result into a process outcome
pub fn finish<T>(result: OperationResult<T>, success_message: &str) -> Result<()> {
    if result.success {
        crate::output::success(success_message);
        Ok(())
    } else {
        anyhow::bail!(result.error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

/// Parse a user-supplied date (`YYYY-MM-DD` or full RFC3339)
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = input.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", input))?;
    Ok(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0).expect("midnight is valid"),
        Utc,
    ))
}
