//! Session domain model

use serde::{Deserialize, Serialize};

/// Cached credential material for authenticated calls
///
/// Created on successful sign-in, deleted on sign-out or when server-side
/// validation fails. The refresh token is stored but never proactively
/// used; expiry is the server's word, not enforced locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// True when the session carries a usable access token
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}
