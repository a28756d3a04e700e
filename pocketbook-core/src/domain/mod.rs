//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod category;
pub mod result;
mod session;
mod transaction;
mod user;

pub use category::Category;
pub use session::Session;
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};
pub use user::User;
