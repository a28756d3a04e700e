//! Session storage port
//!
//! Defines the interface for persisting the session blob in the platform's
//! app-scoped secure storage. The store holds exactly one session under one
//! well-known key; there is no history and no partial update.

use crate::domain::result::Result;
use crate::domain::Session;

/// Session storage trait
///
/// `save` overwrites any existing value and propagates persistence errors.
/// `load` returns `None` both when nothing was stored and when the stored
/// blob fails to deserialize - a corrupt session is indistinguishable from
/// an absent one. `clear` is idempotent.
pub trait SessionStore: Send + Sync {
    /// Serialize and persist the session, replacing any existing value
    fn save(&self, session: &Session) -> Result<()>;

    /// Return the persisted session, or None if absent or unreadable
    fn load(&self) -> Result<Option<Session>>;

    /// Delete the persisted session; clearing an absent session is not an error
    fn clear(&self) -> Result<()>;
}
