//! Pocketbook Core - client logic for personal finance tracking
//!
//! This crate implements the client core following hexagonal architecture:
//!
//! - **domain**: Core entities (Session, User, Transaction, categories)
//! - **ports**: Trait definitions for external dependencies (SessionStore)
//! - **services**: Auth state machine, transaction store, summary queries
//! - **adapters**: Concrete implementations (file session store, REST client)
//!
//! All records live in the remote store; the services keep a read-through
//! in-memory cache gated by the auth session.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::file_store::FileSessionStore;
use adapters::rest::ApiClient;
use config::Config;
use ports::SessionStore;
use services::{AuthService, SummaryService, TransactionService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Session, Transaction, TransactionDraft, TransactionKind, TransactionPatch, User,
};
pub use services::{Overview, Period, SessionState};

/// Main context for Pocketbook operations
///
/// The single composition root: it owns the session store, auth service
/// and transaction store instances and hands references down. Nothing in
/// the crate reaches for ambient global state.
pub struct PocketbookContext {
    pub config: Config,
    pub session_store: Arc<dyn SessionStore>,
    pub api: Arc<ApiClient>,
    pub auth: Arc<AuthService>,
    pub transactions: Arc<TransactionService>,
    pub summary: SummaryService,
}

impl std::fmt::Debug for PocketbookContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketbookContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PocketbookContext {
    /// Create a new Pocketbook context rooted at the given app directory
    pub fn new(app_dir: &Path) -> Result<Self> {
        let config = Config::load(app_dir)?;
        config.require_api()?;

        let session_store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(app_dir));
        let api = Arc::new(ApiClient::new(&config.base_url, &config.api_key)?);

        let auth = Arc::new(AuthService::new(Arc::clone(&api), Arc::clone(&session_store)));
        let transactions = Arc::new(TransactionService::new(
            Arc::clone(&api),
            Arc::clone(&auth),
            config.send_authorization,
        ));
        let summary = SummaryService::new(Arc::clone(&transactions));

        Ok(Self {
            config,
            session_store,
            api,
            auth,
            transactions,
            summary,
        })
    }

    /// Restore the session and pull the user's transactions
    ///
    /// The auth lifecycle gates the transaction fetch: a change of current
    /// user is what triggers (re)fetching. A failed fetch is not fatal at
    /// startup - the list is simply empty.
    pub fn start(&self) -> SessionState {
        let state = self.auth.restore();
        if state == SessionState::Authenticated {
            if let Err(e) = self.transactions.fetch_all() {
                tracing::warn!(error = %e, "initial transaction fetch failed");
            }
        }
        state
    }
}
