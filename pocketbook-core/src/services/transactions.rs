//! Transaction store - session-gated CRUD and derived aggregates
//!
//! Keeps the in-memory combined list of income and expense records for the
//! current user. The remote store owns the records; this is a read-through
//! cache that is invalidated and fully refetched after every mutation - no
//! local append, no optimistic update.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::adapters::rest::{ApiClient, NewRecord};
use crate::domain::result::{Error, OperationResult, Result};
use crate::domain::{Session, Transaction, TransactionDraft, TransactionKind, TransactionPatch};
use crate::services::auth::AuthService;

/// Transaction store over the remote record collections
///
/// Invariant: immediately after any successful fetch the list holds
/// "income union expense for the current user, sorted by created_at
/// descending"; it is never left partially populated.
pub struct TransactionService {
    api: Arc<ApiClient>,
    auth: Arc<AuthService>,
    /// Attach the bearer header on collection requests; deployments with
    /// row-level security disabled run with this off
    send_authorization: bool,
    transactions: Mutex<Vec<Transaction>>,
}

impl TransactionService {
    pub fn new(api: Arc<ApiClient>, auth: Arc<AuthService>, send_authorization: bool) -> Self {
        Self {
            api,
            auth,
            send_authorization,
            transactions: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the in-memory list
    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// Refetch both collections and rebuild the in-memory list
    ///
    /// With no current user (or no cached session) the list is cleared and
    /// no network call is made. The two reads run concurrently and are
    /// joined before the merge: if either fails, the list is left EMPTY
    /// rather than half-populated, and the error is returned.
    pub fn fetch_all(&self) -> Result<Vec<Transaction>> {
        let user = match self.auth.current_user() {
            Some(user) => user,
            None => {
                debug!("fetch_all without user, clearing list");
                self.transactions.lock().unwrap().clear();
                return Ok(Vec::new());
            }
        };
        let session = match self.auth.cached_session() {
            Some(session) if session.has_access_token() => session,
            _ => {
                debug!("fetch_all without session, clearing list");
                self.transactions.lock().unwrap().clear();
                return Ok(Vec::new());
            }
        };

        let bearer = self.bearer(&session);
        let (income_result, expense_result) = std::thread::scope(|scope| {
            let income = scope
                .spawn(|| self.api.list_records(TransactionKind::Income, &user.id, bearer));
            let expense = scope
                .spawn(|| self.api.list_records(TransactionKind::Expense, &user.id, bearer));
            (
                income
                    .join()
                    .unwrap_or_else(|_| Err(Error::Network("income read panicked".to_string()))),
                expense
                    .join()
                    .unwrap_or_else(|_| Err(Error::Network("expense read panicked".to_string()))),
            )
        });

        let (income, expense) = match (income_result, expense_result) {
            (Ok(income), Ok(expense)) => (income, expense),
            (Err(e), _) | (_, Err(e)) => {
                // Joined failure: one good half would paint a wrong picture
                warn!(error = %e, "fetch failed, discarding both reads");
                self.transactions.lock().unwrap().clear();
                return Err(e);
            }
        };

        // The two server results are each ordered, but interleaving them
        // requires a client-side merge.
        let mut combined = income;
        combined.extend(expense);
        combined.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(count = combined.len(), "fetched transactions");
        *self.transactions.lock().unwrap() = combined.clone();
        Ok(combined)
    }

    /// Record a new transaction, then refetch
    ///
    /// Validation and the auth/session preconditions run before any network
    /// I/O. The store never appends locally: the server assigns the id, so
    /// the trailing refetch is the only way the record enters the list.
    pub fn add(&self, kind: TransactionKind, draft: TransactionDraft) -> OperationResult<()> {
        self.try_add(kind, draft).into()
    }

    fn try_add(&self, kind: TransactionKind, draft: TransactionDraft) -> Result<()> {
        draft.validate(kind)?;
        let (user, session) = self.require_login()?;

        let record = NewRecord {
            user_id: user.id,
            amount: draft.amount,
            description: draft.description,
            category: draft.category,
            date: draft.date.unwrap_or_else(Utc::now),
            created_at: Utc::now(),
        };
        self.api.create_record(kind, &record, self.bearer(&session))?;
        self.refetch_after_mutation();
        Ok(())
    }

    /// Patch an existing transaction, then refetch
    pub fn update(
        &self,
        kind: TransactionKind,
        id: &str,
        patch: TransactionPatch,
    ) -> OperationResult<()> {
        self.try_update(kind, id, patch).into()
    }

    fn try_update(&self, kind: TransactionKind, id: &str, patch: TransactionPatch) -> Result<()> {
        patch.validate(kind)?;
        let (_user, session) = self.require_login()?;

        self.api
            .update_record(kind, id, &patch, self.bearer(&session))?;
        self.refetch_after_mutation();
        Ok(())
    }

    /// Delete a transaction, then refetch
    pub fn remove(&self, kind: TransactionKind, id: &str) -> OperationResult<()> {
        self.try_remove(kind, id).into()
    }

    fn try_remove(&self, kind: TransactionKind, id: &str) -> Result<()> {
        let (_user, session) = self.require_login()?;

        self.api.delete_record(kind, id, self.bearer(&session))?;
        self.refetch_after_mutation();
        Ok(())
    }

    // =========================================================================
    // Aggregate queries - pure reads over the in-memory list
    // =========================================================================

    /// Sum of all income amounts
    pub fn total_income(&self) -> Decimal {
        self.sum_kind(TransactionKind::Income)
    }

    /// Sum of all expense amounts
    pub fn total_expense(&self) -> Decimal {
        self.sum_kind(TransactionKind::Expense)
    }

    /// Income minus expense
    pub fn balance(&self) -> Decimal {
        self.total_income() - self.total_expense()
    }

    fn sum_kind(&self, kind: TransactionKind) -> Decimal {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Mutations require a current user and a cached session with a token;
    /// either missing fails the call before any network I/O.
    fn require_login(&self) -> Result<(crate::domain::User, Session)> {
        let user = self.auth.current_user().ok_or(Error::NotAuthenticated)?;
        let session = self.auth.cached_session().ok_or(Error::NoSession)?;
        if !session.has_access_token() {
            return Err(Error::NoSession);
        }
        Ok((user, session))
    }

    /// Bearer token for collection requests, subject to the header policy
    fn bearer<'a>(&self, session: &'a Session) -> Option<&'a str> {
        self.send_authorization
            .then_some(session.access_token.as_str())
    }

    /// A mutation succeeded; rebuild the list from the server
    ///
    /// A failing refetch leaves the list empty (already consistent) and is
    /// surfaced through the log, not the mutation result - the mutation
    /// itself did succeed.
    fn refetch_after_mutation(&self) {
        if let Err(e) = self.fetch_all() {
            warn!(error = %e, "refetch after mutation failed");
        }
    }
}
