//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
pub mod summary;
mod transactions;

pub use auth::{AuthService, SessionState};
pub use summary::{CategoryTotal, Overview, Period, SummaryService};
pub use transactions::TransactionService;
